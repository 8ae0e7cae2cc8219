//! 内存表格存储
//!
//! 用于测试和本地检查，支持注入读写失败。

use crate::infrastructure::table_store::TableStore;
use crate::models::CellValue;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, Default)]
struct Sheet {
    grid: Vec<Vec<CellValue>>,
    rows: usize,
    cols: usize,
}

/// 内存表格存储
#[derive(Debug, Default)]
pub struct MemoryTableStore {
    sheets: Mutex<HashMap<(String, String), Sheet>>,
    failing_reads: AtomicUsize,
    failing_writes: AtomicUsize,
    read_attempts: AtomicUsize,
}

impl MemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置一张工作表
    pub fn with_sheet(self, spreadsheet_id: &str, sheet: &str, grid: Vec<Vec<CellValue>>) -> Self {
        let rows = grid.len();
        let cols = grid.iter().map(Vec::len).max().unwrap_or(0);
        self.lock().insert(
            (spreadsheet_id.to_string(), sheet.to_string()),
            Sheet { grid, rows, cols },
        );
        self
    }

    /// 接下来的 `count` 次读取返回错误
    pub fn fail_reads(&self, count: usize) {
        self.failing_reads.store(count, Ordering::SeqCst);
    }

    /// 接下来的 `count` 次写入返回错误
    pub fn fail_writes(&self, count: usize) {
        self.failing_writes.store(count, Ordering::SeqCst);
    }

    /// 已发生的读取次数（含失败）
    pub fn read_attempts(&self) -> usize {
        self.read_attempts.load(Ordering::SeqCst)
    }

    pub fn sheet(&self, spreadsheet_id: &str, sheet: &str) -> Option<Vec<Vec<CellValue>>> {
        self.lock()
            .get(&key(spreadsheet_id, sheet))
            .map(|s| s.grid.clone())
    }

    /// 工作表的行列容量
    pub fn sheet_size(&self, spreadsheet_id: &str, sheet: &str) -> Option<(usize, usize)> {
        self.lock()
            .get(&key(spreadsheet_id, sheet))
            .map(|s| (s.rows, s.cols))
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<(String, String), Sheet>> {
        self.sheets.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn take_failure(counter: &AtomicUsize) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

fn key(spreadsheet_id: &str, sheet: &str) -> (String, String) {
    (spreadsheet_id.to_string(), sheet.to_string())
}

impl TableStore for MemoryTableStore {
    async fn read_sheet(&self, spreadsheet_id: &str, sheet: &str) -> Result<Vec<Vec<CellValue>>> {
        self.read_attempts.fetch_add(1, Ordering::SeqCst);
        if Self::take_failure(&self.failing_reads) {
            return Err(anyhow!("模拟的读取失败: {}", sheet));
        }

        self.lock()
            .get(&key(spreadsheet_id, sheet))
            .map(|s| s.grid.clone())
            .ok_or_else(|| anyhow!("工作表不存在: {}", sheet))
    }

    async fn sheet_exists(&self, spreadsheet_id: &str, sheet: &str) -> Result<bool> {
        Ok(self.lock().contains_key(&key(spreadsheet_id, sheet)))
    }

    async fn add_sheet(&self, spreadsheet_id: &str, sheet: &str, rows: usize, cols: usize) -> Result<()> {
        let mut sheets = self.lock();
        let entry = sheets.entry(key(spreadsheet_id, sheet));
        match entry {
            std::collections::hash_map::Entry::Occupied(_) => Err(anyhow!("工作表已存在: {}", sheet)),
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(Sheet {
                    grid: Vec::new(),
                    rows,
                    cols,
                });
                Ok(())
            }
        }
    }

    async fn clear_sheet(&self, spreadsheet_id: &str, sheet: &str) -> Result<()> {
        let mut sheets = self.lock();
        let existing = sheets
            .get_mut(&key(spreadsheet_id, sheet))
            .ok_or_else(|| anyhow!("工作表不存在: {}", sheet))?;
        existing.grid.clear();
        Ok(())
    }

    async fn write_sheet(&self, spreadsheet_id: &str, sheet: &str, grid: &[Vec<CellValue>]) -> Result<()> {
        if Self::take_failure(&self.failing_writes) {
            return Err(anyhow!("模拟的写入失败: {}", sheet));
        }

        let mut sheets = self.lock();
        let existing = sheets
            .get_mut(&key(spreadsheet_id, sheet))
            .ok_or_else(|| anyhow!("工作表不存在: {}", sheet))?;

        // 写入超出容量时自动扩展
        existing.rows = existing.rows.max(grid.len());
        existing.cols = existing.cols.max(grid.iter().map(Vec::len).max().unwrap_or(0));
        existing.grid = grid.to_vec();
        Ok(())
    }
}
