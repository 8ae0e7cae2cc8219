//! 运行上下文
//!
//! 封装"这是第几次运行、处理的是哪张表"这一信息

use std::fmt::Display;

/// 运行上下文
#[derive(Debug, Clone)]
pub struct RunCtx {
    /// 运行序号（从1开始，轮询模式下递增）
    pub iteration: usize,

    /// 表格ID
    pub spreadsheet_id: String,

    /// 源工作表名称
    pub source_sheet: String,
}

impl RunCtx {
    pub fn new(iteration: usize, spreadsheet_id: String, source_sheet: String) -> Self {
        Self {
            iteration,
            spreadsheet_id,
            source_sheet,
        }
    }
}

impl Display for RunCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[运行 #{} 表格 {} 工作表 {}]",
            self.iteration, self.spreadsheet_id, self.source_sheet
        )
    }
}
