//! 结果写入服务 - 业务能力层
//!
//! 只负责"把算好的结果写到工作表"这一能力

use crate::config::Config;
use crate::error::{GradeError, GradeResult};
use crate::infrastructure::TableStore;
use crate::models::{CellValue, GradingOutcome};
use tracing::info;

/// 新建工作表的最小行数
pub const MIN_SHEET_ROWS: usize = 100;
/// 新建工作表的最小列数
pub const MIN_SHEET_COLS: usize = 10;

/// 结果写入服务
///
/// 职责：
/// - 工作表不存在时创建（至少 100 行 × 10 列）
/// - 先清空再整体写入，不追加
/// - 不重试，写入失败直接返回错误
pub struct ResultWriter<'a, S: TableStore> {
    store: &'a S,
    config: &'a Config,
}

impl<'a, S: TableStore> ResultWriter<'a, S> {
    pub fn new(store: &'a S, config: &'a Config) -> Self {
        Self { store, config }
    }

    /// 写入各部分结果和总成绩，返回写入的工作表数量
    pub async fn write_all(&self, outcome: &GradingOutcome) -> GradeResult<usize> {
        info!("📤 开始写入结果...");
        let mut written = 0;

        for (section, report) in &outcome.sections {
            let sheet = self.config.section_sheet_name(section.number());
            self.write_sheet(&sheet, &report.to_grid()).await?;
            info!("✓ 第 {} 部分已写入: {}", section, sheet);
            written += 1;
        }

        let grades_sheet = &self.config.grades_sheet_name;
        self.write_sheet(grades_sheet, &outcome.grades.to_grid()).await?;
        info!("✓ 总成绩已写入: {}", grades_sheet);
        written += 1;

        Ok(written)
    }

    /// 创建（如有必要）、清空并写入一张工作表
    pub async fn write_sheet(&self, sheet: &str, grid: &[Vec<CellValue>]) -> GradeResult<()> {
        let id = &self.config.spreadsheet_id;
        let fail = |e| GradeError::write_failed(sheet, e);

        if !self.store.sheet_exists(id, sheet).await.map_err(fail)? {
            let rows = grid.len().max(MIN_SHEET_ROWS);
            let cols = grid.iter().map(Vec::len).max().unwrap_or(0).max(MIN_SHEET_COLS);
            info!("创建工作表: {} ({} 行 × {} 列)", sheet, rows, cols);
            self.store.add_sheet(id, sheet, rows, cols).await.map_err(fail)?;
        }

        self.store.clear_sheet(id, sheet).await.map_err(fail)?;
        self.store.write_sheet(id, sheet, grid).await.map_err(fail)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::MemoryTableStore;

    #[tokio::test]
    async fn test_new_sheet_gets_minimum_size() {
        let config = Config::default();
        let store = MemoryTableStore::new();
        let writer = ResultWriter::new(&store, &config);

        writer
            .write_sheet("Раздел 2", &[vec!["ФИО".into(), "Score".into()]])
            .await
            .unwrap();

        assert_eq!(store.sheet_size("", "Раздел 2"), Some((100, 10)));
    }

    #[tokio::test]
    async fn test_existing_sheet_is_overwritten() {
        let config = Config::default();
        let store = MemoryTableStore::new().with_sheet(
            "",
            "Grades",
            vec![vec!["old".into()], vec!["old".into()], vec!["old".into()]],
        );
        let writer = ResultWriter::new(&store, &config);

        writer.write_sheet("Grades", &[vec!["new".into()]]).await.unwrap();
        assert_eq!(store.sheet("", "Grades"), Some(vec![vec![CellValue::from("new")]]));
    }

    #[tokio::test]
    async fn test_write_failure_names_sheet() {
        let config = Config::default();
        let store = MemoryTableStore::new();
        store.fail_writes(1);
        let writer = ResultWriter::new(&store, &config);

        let err = writer.write_sheet("Раздел 3", &[]).await.unwrap_err();
        assert!(matches!(err, GradeError::Write { ref sheet, .. } if sheet == "Раздел 3"));
    }
}
