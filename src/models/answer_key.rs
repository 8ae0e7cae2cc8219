//! 答案模型
//!
//! 以 `SectionId` 为键的类型化映射。加载后不可变，按部分和题目列查找标准答案。

use crate::error::{GradeError, GradeResult};
use crate::models::section::{SectionColumns, SectionId};
use crate::models::table::CellValue;
use std::collections::{BTreeMap, HashMap};

/// 某道题的标准答案
#[derive(Debug, Clone, PartialEq)]
pub enum ExpectedAnswer {
    /// 单个答案，直接比较
    Exact(CellValue),
    /// 多个可接受答案（已转换为去除首尾空白的字符串）
    AnyOf(Vec<String>),
}

impl ExpectedAnswer {
    pub fn any_of<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<CellValue>,
    {
        ExpectedAnswer::AnyOf(
            values
                .into_iter()
                .map(|v| v.into().to_text().trim().to_string())
                .collect(),
        )
    }
}

/// 答案表：部分 → 题目列 → 标准答案
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnswerKey {
    sections: BTreeMap<SectionId, HashMap<String, ExpectedAnswer>>,
}

impl AnswerKey {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加一道题的答案
    pub fn with_answer(
        mut self,
        section: SectionId,
        column: impl Into<String>,
        expected: ExpectedAnswer,
    ) -> Self {
        self.insert(section, column.into(), expected);
        self
    }

    pub(crate) fn insert(&mut self, section: SectionId, column: String, expected: ExpectedAnswer) {
        self.sections
            .entry(section)
            .or_default()
            .insert(column, expected);
    }

    /// 查找标准答案，不存在时返回 `MissingAnswerKey`
    pub fn expected(&self, section: SectionId, column: &str) -> GradeResult<&ExpectedAnswer> {
        self.sections
            .get(&section)
            .and_then(|answers| answers.get(column))
            .ok_or_else(|| GradeError::MissingAnswerKey {
                section: section.number(),
                column: column.to_string(),
            })
    }

    /// 答案总数
    pub fn len(&self) -> usize {
        self.sections.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn sections(&self) -> impl Iterator<Item = SectionId> + '_ {
        self.sections.keys().copied()
    }

    /// 在评分前检查每个题目列都有对应答案
    ///
    /// 第一个缺失的题目列（按部分和题号顺序）会出现在错误里。
    pub fn validate_coverage(&self, columns: &SectionColumns) -> GradeResult<()> {
        for (section, section_columns) in columns {
            for column in section_columns {
                self.expected(*section, column)?;
            }
        }
        Ok(())
    }
}
