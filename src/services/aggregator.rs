//! 得分汇总
//!
//! 得分 = 指示值之和；正确率 = round(得分 / 题目数 × 100, 2)，以 "%" 结尾的字符串。

use crate::error::{GradeError, GradeResult};
use crate::models::{GradedRow, GradedTable, IndicatorTable, Score};

/// 汇总一组指示值
///
/// 题目数为 0 时返回 `NoSectionsFound`，不会出现除以零。
pub fn aggregate(indicators: &[u8]) -> GradeResult<Score> {
    if indicators.is_empty() {
        return Err(GradeError::NoSectionsFound);
    }

    let points: u32 = indicators.iter().map(|&i| u32::from(i)).sum();
    Ok(Score {
        points,
        percent: format_percent(points, indicators.len()),
    })
}

/// 为指示表的每一行计算整张表的得分
pub fn aggregate_table(table: IndicatorTable) -> GradeResult<GradedTable> {
    if table.question_columns.is_empty() {
        return Err(GradeError::NoSectionsFound);
    }

    let rows = table
        .rows
        .into_iter()
        .map(|row| {
            let score = aggregate(&row.indicators)?;
            Ok(GradedRow {
                identity: row.identity,
                indicators: row.indicators,
                score,
            })
        })
        .collect::<GradeResult<Vec<_>>>()?;

    Ok(GradedTable {
        identity_columns: table.identity_columns,
        question_columns: table.question_columns,
        rows,
    })
}

/// 正确率的显示形式：保留两位小数，至少一位小数，如 "100.0%"、"66.67%"、"12.5%"
///
/// 恰好落在中间的值取偶数，3.125 → "3.12%"
pub fn format_percent(points: u32, total: usize) -> String {
    let ratio = f64::from(points) / total as f64 * 100.0;
    let rounded = (ratio * 100.0).round_ties_even() / 100.0;

    let mut text = rounded.to_string();
    if !text.contains('.') {
        text.push_str(".0");
    }
    text.push('%');
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CellValue, IndicatorRow};

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(2, 2), "100.0%");
        assert_eq!(format_percent(0, 5), "0.0%");
        assert_eq!(format_percent(2, 3), "66.67%");
        assert_eq!(format_percent(1, 3), "33.33%");
        assert_eq!(format_percent(1, 8), "12.5%");
        assert_eq!(format_percent(1, 2), "50.0%");
        assert_eq!(format_percent(5, 7), "71.43%");
    }

    #[test]
    fn test_format_percent_ties_round_to_even() {
        assert_eq!(format_percent(1, 32), "3.12%");
        assert_eq!(format_percent(5, 32), "15.62%");
        assert_eq!(format_percent(1, 160), "0.62%");
        assert_eq!(format_percent(3, 32), "9.38%");
    }

    #[test]
    fn test_aggregate_sums_indicators() {
        let score = aggregate(&[1, 0, 1, 1]).unwrap();
        assert_eq!(score.points, 3);
        assert_eq!(score.percent, "75.0%");
    }

    #[test]
    fn test_aggregate_refuses_empty_columns() {
        assert!(matches!(aggregate(&[]), Err(GradeError::NoSectionsFound)));

        let table = IndicatorTable {
            identity_columns: vec!["ФИО".to_string()],
            question_columns: Vec::new(),
            rows: Vec::new(),
        };
        assert!(matches!(aggregate_table(table), Err(GradeError::NoSectionsFound)));
    }

    #[test]
    fn test_aggregate_table_keeps_rows() {
        let table = IndicatorTable {
            identity_columns: vec!["ФИО".to_string()],
            question_columns: vec!["2.1".to_string(), "2.2".to_string()],
            rows: vec![
                IndicatorRow {
                    identity: vec![CellValue::from("A")],
                    indicators: vec![1, 0],
                },
                IndicatorRow {
                    identity: vec![CellValue::from("B")],
                    indicators: vec![1, 1],
                },
            ],
        };

        let graded = aggregate_table(table).unwrap();
        assert_eq!(graded.rows[0].score.points, 1);
        assert_eq!(graded.rows[0].score.percent, "50.0%");
        assert_eq!(graded.rows[1].score.percent, "100.0%");
    }
}
