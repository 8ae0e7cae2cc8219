//! 评分服务 - 业务能力层
//!
//! 只负责"单元格是否答对"这一判断，不关心得分汇总

use crate::error::GradeResult;
use crate::models::{
    AnswerKey, CellValue, ExpectedAnswer, IndicatorRow, IndicatorTable, ResponseTable,
    SectionColumns, SectionId,
};
use tracing::debug;

/// 评分服务
///
/// 职责：
/// - 单个答案：直接比较，不做跨类型转换
/// - 多个可接受答案：转换为字符串后判断是否在集合中
/// - 答案缺失时报错，而不是记 0 分
/// - 只生成新的指示表，不修改源表
pub struct Grader<'a> {
    key: &'a AnswerKey,
}

impl<'a> Grader<'a> {
    pub fn new(key: &'a AnswerKey) -> Self {
        Self { key }
    }

    /// 判断单个单元格，答对为 1，否则为 0
    pub fn grade_cell(cell: &CellValue, expected: &ExpectedAnswer) -> u8 {
        let matched = match expected {
            ExpectedAnswer::Exact(value) => cell == value,
            ExpectedAnswer::AnyOf(accepted) => {
                let text = cell.to_text();
                let text = text.trim();
                accepted.iter().any(|a| a == text)
            }
        };
        u8::from(matched)
    }

    /// 按部分和题目列评分
    pub fn grade(&self, section: SectionId, column: &str, cell: &CellValue) -> GradeResult<u8> {
        let expected = self.key.expected(section, column)?;
        Ok(Self::grade_cell(cell, expected))
    }

    /// 为整张表生成指示表
    ///
    /// 题目列按部分顺序排列，每个部分内部保持分类时的题号顺序。
    pub fn grade_table(
        &self,
        table: &ResponseTable,
        base_cols: &[String],
        sections: &SectionColumns,
    ) -> GradeResult<IndicatorTable> {
        // 先解析所有题目的位置和答案，空表也会检查答案是否齐全
        let mut questions = Vec::new();
        for (section, columns) in sections {
            for column in columns {
                let expected = self.key.expected(*section, column)?;
                questions.push((column.clone(), table.column_index(column), expected));
            }
        }

        let identity_positions: Vec<Option<usize>> = base_cols
            .iter()
            .map(|name| table.column_index(name))
            .collect();

        let rows = table
            .rows()
            .iter()
            .map(|row| IndicatorRow {
                identity: identity_positions
                    .iter()
                    .map(|p| p.and_then(|i| row.get(i)).cloned().unwrap_or_default())
                    .collect(),
                indicators: questions
                    .iter()
                    .map(|(_, position, expected)| match position.and_then(|i| row.get(i)) {
                        Some(cell) => Self::grade_cell(cell, expected),
                        None => Self::grade_cell(&CellValue::Empty, expected),
                    })
                    .collect(),
            })
            .collect::<Vec<_>>();

        debug!("已评分 {} 行, {} 道题目", rows.len(), questions.len());

        Ok(IndicatorTable {
            identity_columns: base_cols.to_vec(),
            question_columns: questions.into_iter().map(|(column, _, _)| column).collect(),
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GradeError;

    fn section(n: u32) -> SectionId {
        SectionId::new(n).unwrap()
    }

    #[test]
    fn test_exact_answers_compare_without_coercion() {
        let expected = ExpectedAnswer::Exact(CellValue::Number(3.0));
        assert_eq!(Grader::grade_cell(&CellValue::Number(3.0), &expected), 1);
        assert_eq!(Grader::grade_cell(&CellValue::Number(4.0), &expected), 0);
        assert_eq!(Grader::grade_cell(&CellValue::from("3"), &expected), 0);

        let text = ExpectedAnswer::Exact(CellValue::from("Москва"));
        assert_eq!(Grader::grade_cell(&CellValue::from("Москва"), &text), 1);
        assert_eq!(Grader::grade_cell(&CellValue::from("москва"), &text), 0);
        assert_eq!(Grader::grade_cell(&CellValue::Empty, &text), 0);
    }

    #[test]
    fn test_list_answers_use_string_membership() {
        let expected = ExpectedAnswer::any_of([CellValue::from("y"), CellValue::from("z"), CellValue::Number(3.0)]);
        assert_eq!(Grader::grade_cell(&CellValue::from("y"), &expected), 1);
        assert_eq!(Grader::grade_cell(&CellValue::from("z "), &expected), 1);
        assert_eq!(Grader::grade_cell(&CellValue::Number(3.0), &expected), 1);
        assert_eq!(Grader::grade_cell(&CellValue::from("3"), &expected), 1);
        assert_eq!(Grader::grade_cell(&CellValue::from("x"), &expected), 0);
        assert_eq!(Grader::grade_cell(&CellValue::Empty, &expected), 0);
    }

    #[test]
    fn test_grade_missing_key_is_error() {
        let key = AnswerKey::new();
        let grader = Grader::new(&key);
        let err = grader
            .grade(section(2), "2.1", &CellValue::from("x"))
            .unwrap_err();
        assert!(matches!(err, GradeError::MissingAnswerKey { .. }));
    }

    #[test]
    fn test_grade_table_does_not_touch_source() {
        let key = AnswerKey::new()
            .with_answer(section(2), "2.1", ExpectedAnswer::Exact("x".into()))
            .with_answer(section(3), "3.1", ExpectedAnswer::any_of(["a", "b"]));
        let table = ResponseTable::new(
            vec!["ФИО".into(), "3.1".into(), "Группа".into(), "2.1".into()],
            vec![
                vec!["A".into(), "b".into(), "G1".into(), "x".into()],
                vec!["B".into(), "c".into(), "G2".into(), "y".into()],
            ],
        );
        let before = table.clone();

        let mut sections = SectionColumns::new();
        sections.insert(section(2), vec!["2.1".to_string()]);
        sections.insert(section(3), vec!["3.1".to_string()]);

        let base = vec!["ФИО".to_string(), "Группа".to_string()];
        let graded = Grader::new(&key).grade_table(&table, &base, &sections).unwrap();

        assert_eq!(graded.question_columns, vec!["2.1", "3.1"]);
        assert_eq!(graded.rows[0].identity, vec![CellValue::from("A"), CellValue::from("G1")]);
        assert_eq!(graded.rows[0].indicators, vec![1, 1]);
        assert_eq!(graded.rows[1].indicators, vec![0, 0]);
        assert_eq!(table, before);
    }
}
