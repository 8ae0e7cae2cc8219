//! 评分流程 - 流程层
//!
//! 核心职责：定义"一张答题表"的完整评分流程
//!
//! 流程顺序：
//! 1. 校验基础列
//! 2. 列分类 → 检查答案是否覆盖全部题目列
//! 3. 评分 → 汇总整张表得分
//! 4. 按部分拆分并重新计算部分得分

use anyhow::Result;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{GradeError, GradeResult, ValidationError};
use crate::models::{
    AnswerKey, GradedTable, GradingOutcome, ResponseTable, SectionId, SectionReport,
};
use crate::services::{aggregator, partitioner, ColumnClassifier, Grader};

/// 评分流程
///
/// - 只做计算，不读写外部表格
/// - 所有结果算完才返回，调用方拿到的要么是完整结果，要么是错误
pub struct GradingFlow {
    classifier: ColumnClassifier,
    base_cols: Vec<String>,
}

impl GradingFlow {
    /// 创建新的评分流程
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            classifier: ColumnClassifier::new(config)?,
            base_cols: config.base_cols.clone(),
        })
    }

    pub fn run(&self, table: &ResponseTable, key: &AnswerKey) -> GradeResult<GradingOutcome> {
        info!("⚙️ 开始处理数据");

        // 完全空白的工作表
        if table.headers().is_empty() {
            warn!("⚠️ 工作表为空，没有可处理的数据");
            return Ok(GradingOutcome::empty(self.base_cols.clone()));
        }

        let missing = table.missing_columns(&self.base_cols);
        if !missing.is_empty() {
            return Err(ValidationError::MissingBaseColumns(missing).into());
        }

        let sections = self
            .classifier
            .classify(table.headers(), SectionId::domain());

        if sections.is_empty() {
            if table.is_empty() {
                warn!("⚠️ 没有数据行，也没有题目列");
                return Ok(GradingOutcome::empty(self.base_cols.clone()));
            }
            return Err(GradeError::NoSectionsFound);
        }

        key.validate_coverage(&sections)?;

        let indicators = Grader::new(key).grade_table(table, &self.base_cols, &sections)?;
        let grades: GradedTable = aggregator::aggregate_table(indicators)?;
        let reports = partitioner::partition(&grades, &sections)?;

        log_outcome(&grades, reports.values());

        Ok(GradingOutcome {
            grades,
            sections: reports,
        })
    }
}

fn log_outcome<'a>(grades: &GradedTable, reports: impl Iterator<Item = &'a SectionReport>) {
    info!(
        "✓ 评分完成: {} 名答题者, {} 道题目",
        grades.rows.len(),
        grades.question_columns.len()
    );
    for report in reports {
        info!(
            "  第 {} 部分: {} 道题目",
            report.section,
            report.question_columns.len()
        );
    }
}
