//! 评分结果模型
//!
//! - `IndicatorTable`：评分后的 0/1 指示表（尚未汇总）
//! - `GradedTable`：整张表的成绩（含 Score / PercentCorrect）
//! - `SectionReport`：单个部分的成绩（部分内的 Score / PercentCorrect）

use crate::models::section::SectionId;
use crate::models::table::CellValue;
use std::collections::BTreeMap;

pub const SCORE_COLUMN: &str = "Score";
pub const PERCENT_COLUMN: &str = "PercentCorrect";

/// 得分与正确率
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    pub points: u32,
    /// 形如 "66.67%" 的显示字符串
    pub percent: String,
}

/// 单行的指示值
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRow {
    pub identity: Vec<CellValue>,
    pub indicators: Vec<u8>,
}

/// 评分后的指示表
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorTable {
    pub identity_columns: Vec<String>,
    pub question_columns: Vec<String>,
    pub rows: Vec<IndicatorRow>,
}

/// 带得分的一行
#[derive(Debug, Clone, PartialEq)]
pub struct GradedRow {
    pub identity: Vec<CellValue>,
    pub indicators: Vec<u8>,
    pub score: Score,
}

/// 整张表的成绩
#[derive(Debug, Clone, PartialEq)]
pub struct GradedTable {
    pub identity_columns: Vec<String>,
    pub question_columns: Vec<String>,
    pub rows: Vec<GradedRow>,
}

impl GradedTable {
    pub fn empty(identity_columns: Vec<String>) -> Self {
        Self {
            identity_columns,
            question_columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn question_position(&self, column: &str) -> Option<usize> {
        self.question_columns.iter().position(|c| c == column)
    }

    /// 转换为写入用的网格：身份列 + 题目列 + Score + PercentCorrect
    pub fn to_grid(&self) -> Vec<Vec<CellValue>> {
        let mut header: Vec<CellValue> = self
            .identity_columns
            .iter()
            .chain(&self.question_columns)
            .map(|c| CellValue::from(c.as_str()))
            .collect();
        header.push(SCORE_COLUMN.into());
        header.push(PERCENT_COLUMN.into());

        let mut grid = Vec::with_capacity(self.rows.len() + 1);
        grid.push(header);
        for row in &self.rows {
            let mut cells = row.identity.clone();
            cells.extend(row.indicators.iter().map(|&i| CellValue::from(u32::from(i))));
            cells.push(row.score.points.into());
            cells.push(row.score.percent.as_str().into());
            grid.push(cells);
        }
        grid
    }
}

/// 单个部分的成绩
#[derive(Debug, Clone, PartialEq)]
pub struct SectionReport {
    pub section: SectionId,
    pub identity_columns: Vec<String>,
    pub question_columns: Vec<String>,
    pub rows: Vec<GradedRow>,
}

impl SectionReport {
    /// 转换为写入用的网格：身份列 + Score + PercentCorrect + 本部分题目列
    pub fn to_grid(&self) -> Vec<Vec<CellValue>> {
        let mut header: Vec<CellValue> = self
            .identity_columns
            .iter()
            .map(|c| CellValue::from(c.as_str()))
            .collect();
        header.push(SCORE_COLUMN.into());
        header.push(PERCENT_COLUMN.into());
        header.extend(self.question_columns.iter().map(|c| CellValue::from(c.as_str())));

        let mut grid = Vec::with_capacity(self.rows.len() + 1);
        grid.push(header);
        for row in &self.rows {
            let mut cells = row.identity.clone();
            cells.push(row.score.points.into());
            cells.push(row.score.percent.as_str().into());
            cells.extend(row.indicators.iter().map(|&i| CellValue::from(u32::from(i))));
            grid.push(cells);
        }
        grid
    }
}

/// 一次评分的全部结果
#[derive(Debug, Clone, PartialEq)]
pub struct GradingOutcome {
    pub grades: GradedTable,
    pub sections: BTreeMap<SectionId, SectionReport>,
}

impl GradingOutcome {
    pub fn empty(identity_columns: Vec<String>) -> Self {
        Self {
            grades: GradedTable::empty(identity_columns),
            sections: BTreeMap::new(),
        }
    }

    pub fn respondents(&self) -> usize {
        self.grades.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_report_grid_layout() {
        let report = SectionReport {
            section: SectionId::new(2).unwrap(),
            identity_columns: vec!["ФИО".to_string(), "Группа".to_string()],
            question_columns: vec!["2.1".to_string(), "2.2".to_string()],
            rows: vec![GradedRow {
                identity: vec!["A".into(), "G1".into()],
                indicators: vec![1, 0],
                score: Score {
                    points: 1,
                    percent: "50.0%".to_string(),
                },
            }],
        };

        let grid = report.to_grid();
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[0][2], CellValue::from(SCORE_COLUMN));
        assert_eq!(grid[0][4], CellValue::from("2.1"));
        assert_eq!(grid[1][2], CellValue::Number(1.0));
        assert_eq!(grid[1][3], CellValue::from("50.0%"));
        assert_eq!(grid[1][5], CellValue::Number(0.0));
    }

    #[test]
    fn test_empty_grades_grid_has_header_only() {
        let grades = GradedTable::empty(vec!["ФИО".to_string()]);
        let grid = grades.to_grid();
        assert_eq!(grid.len(), 1);
        assert_eq!(grid[0].len(), 3);
    }
}
