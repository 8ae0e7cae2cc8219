//! 列分类服务 - 业务能力层
//!
//! 只负责"哪些列属于哪个部分、按什么顺序"这一能力

use crate::config::Config;
use crate::models::{SectionColumns, SectionId};
use anyhow::{Context, Result};
use regex::Regex;
use std::ops::RangeInclusive;
use tracing::{debug, info, warn};

/// 列分类服务
///
/// 职责：
/// - 按 `^<前缀><部分号>\..+` 匹配题目列
/// - 排除基础列
/// - 按列名中的题号排序（题号无法解析时视为 0）
pub struct ColumnClassifier {
    patterns: Vec<(SectionId, Regex)>,
    base_cols: Vec<String>,
}

impl ColumnClassifier {
    /// 根据配置创建分类服务
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_prefix(&config.section_column_prefix, config.base_cols.clone())
    }

    /// 使用指定的列名前缀创建
    pub fn with_prefix(prefix: &str, base_cols: Vec<String>) -> Result<Self> {
        let prefix = regex::escape(prefix);
        let patterns = SectionId::all()
            .map(|section| {
                let pattern = format!(r"^{}{}\..+", prefix, section.number());
                Regex::new(&pattern)
                    .with_context(|| format!("无效的列名模式: {}", pattern))
                    .map(|re| (section, re))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            patterns,
            base_cols,
        })
    }

    /// 将列名划分到各部分
    ///
    /// 没有任何题目列的部分会记录警告并从结果中省略。
    pub fn classify(&self, columns: &[String], section_range: RangeInclusive<u8>) -> SectionColumns {
        let mut result = SectionColumns::new();

        for (section, pattern) in &self.patterns {
            if !section_range.contains(&section.number()) {
                continue;
            }

            let mut section_cols: Vec<&String> = columns
                .iter()
                .filter(|col| pattern.is_match(col) && !self.base_cols.contains(col))
                .collect();

            if section_cols.is_empty() {
                warn!("⚠️ 第 {} 部分没有题目列", section);
                continue;
            }

            // 稳定排序，题号相同的列保持原顺序
            section_cols.sort_by_key(|col| question_ordinal(col));
            debug!("第 {} 部分题目列: {:?}", section, section_cols);
            info!("✓ 第 {} 部分: {} 道题目", section, section_cols.len());

            result.insert(*section, section_cols.into_iter().cloned().collect());
        }

        result
    }
}

/// 列名中第二个以 '.' 分隔的片段作为题号，不是纯数字时为 0
pub fn question_ordinal(column: &str) -> u32 {
    column
        .split('.')
        .nth(1)
        .filter(|token| !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()))
        .and_then(|token| token.parse().ok())
        .unwrap_or(0)
}
