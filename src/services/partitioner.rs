//! 按部分拆分成绩表

use crate::error::GradeResult;
use crate::models::{GradedRow, GradedTable, SectionColumns, SectionId, SectionReport};
use crate::services::aggregator;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// 把整张成绩表拆分为各部分的成绩
///
/// 每个部分只保留身份列和本部分的题目列，并用本部分的题目重新计算得分。
/// 整张表的得分保留在 `graded` 中，不会被覆盖。
pub fn partition(
    graded: &GradedTable,
    sections: &SectionColumns,
) -> GradeResult<BTreeMap<SectionId, SectionReport>> {
    let mut reports = BTreeMap::new();

    for (section, columns) in sections {
        let positions: Vec<usize> = columns
            .iter()
            .filter_map(|column| graded.question_position(column))
            .collect();

        if positions.len() != columns.len() {
            warn!("⚠️ 第 {} 部分有题目列不在成绩表中", section);
        }
        if positions.is_empty() {
            continue;
        }

        let rows = graded
            .rows
            .iter()
            .map(|row| {
                let indicators: Vec<u8> = positions.iter().map(|&p| row.indicators[p]).collect();
                let score = aggregator::aggregate(&indicators)?;
                Ok(GradedRow {
                    identity: row.identity.clone(),
                    indicators,
                    score,
                })
            })
            .collect::<GradeResult<Vec<_>>>()?;

        let question_columns = positions
            .iter()
            .map(|&p| graded.question_columns[p].clone())
            .collect();

        info!("✓ 已拆分第 {} 部分: {} 行", section, rows.len());
        reports.insert(
            *section,
            SectionReport {
                section: *section,
                identity_columns: graded.identity_columns.clone(),
                question_columns,
                rows,
            },
        );
    }

    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CellValue, Score};

    fn section(n: u32) -> SectionId {
        SectionId::new(n).unwrap()
    }

    fn graded() -> GradedTable {
        GradedTable {
            identity_columns: vec!["ФИО".to_string(), "Группа".to_string()],
            question_columns: vec!["2.1".into(), "2.2".into(), "3.1".into(), "3.2".into(), "3.3".into()],
            rows: vec![GradedRow {
                identity: vec![CellValue::from("A"), CellValue::from("G1")],
                indicators: vec![1, 1, 0, 1, 0],
                score: Score {
                    points: 3,
                    percent: "60.0%".to_string(),
                },
            }],
        }
    }

    #[test]
    fn test_partition_recomputes_section_scores() {
        let mut sections = SectionColumns::new();
        sections.insert(section(2), vec!["2.1".into(), "2.2".into()]);
        sections.insert(section(3), vec!["3.1".into(), "3.2".into(), "3.3".into()]);

        let table = graded();
        let reports = partition(&table, &sections).unwrap();

        let second = &reports[&section(2)];
        assert_eq!(second.question_columns, vec!["2.1", "2.2"]);
        assert_eq!(second.rows[0].indicators, vec![1, 1]);
        assert_eq!(second.rows[0].score.percent, "100.0%");

        let third = &reports[&section(3)];
        assert_eq!(third.rows[0].score.points, 1);
        assert_eq!(third.rows[0].score.percent, "33.33%");
        assert_eq!(third.rows[0].identity, table.rows[0].identity);

        // 整张表的得分保持不变
        assert_eq!(table.rows[0].score.percent, "60.0%");
    }

    #[test]
    fn test_sections_without_columns_produce_no_report() {
        let mut sections = SectionColumns::new();
        sections.insert(section(5), vec!["5.1".into()]);

        let reports = partition(&graded(), &sections).unwrap();
        assert!(reports.is_empty());
    }
}
