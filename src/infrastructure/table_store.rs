//! 表格存储能力 - 基础设施层
//!
//! 评分流程只通过这个 trait 访问外部表格，不认识具体的传输方式。

use crate::models::CellValue;
use anyhow::Result;

/// 表格存储
///
/// 职责：
/// - 按工作表读取原始网格（第一行是表头）
/// - 创建、清空、整体写入工作表
/// - 不做重试，不理解评分数据
#[allow(async_fn_in_trait)]
pub trait TableStore {
    /// 读取整张工作表
    async fn read_sheet(&self, spreadsheet_id: &str, sheet: &str) -> Result<Vec<Vec<CellValue>>>;

    /// 工作表是否存在
    async fn sheet_exists(&self, spreadsheet_id: &str, sheet: &str) -> Result<bool>;

    /// 创建指定大小的工作表
    async fn add_sheet(&self, spreadsheet_id: &str, sheet: &str, rows: usize, cols: usize) -> Result<()>;

    /// 清空工作表内容
    async fn clear_sheet(&self, spreadsheet_id: &str, sheet: &str) -> Result<()>;

    /// 从 A1 开始写入网格
    async fn write_sheet(&self, spreadsheet_id: &str, sheet: &str, grid: &[Vec<CellValue>]) -> Result<()>;
}
