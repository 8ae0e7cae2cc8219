//! 表格数据模型
//!
//! `ResponseTable` 按列对齐存储：一份表头，每一行都被补齐或截断到表头宽度，
//! 因此每行的列集合始终一致。

use serde_json::{json, Value as JsonValue};
use std::collections::HashMap;
use std::fmt;

/// 单元格的值
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// 单元格的字符串形式，用于多答案匹配
    ///
    /// 整数值的数字不带小数部分（`3.0` 显示为 `"3"`）。
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Bool(true) => "TRUE".to_string(),
            CellValue::Bool(false) => "FALSE".to_string(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => s.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// 转换为写入表格用的 JSON 值
    pub fn to_json(&self) -> JsonValue {
        match self {
            CellValue::Empty => json!(""),
            CellValue::Bool(b) => json!(b),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => json!(*n as i64),
            CellValue::Number(n) => json!(n),
            CellValue::Text(s) => json!(s),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

impl From<JsonValue> for CellValue {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => CellValue::Empty,
            JsonValue::Bool(b) => CellValue::Bool(b),
            JsonValue::Number(n) => n.as_f64().map(CellValue::Number).unwrap_or_default(),
            JsonValue::String(s) => CellValue::from(s),
            other => CellValue::Text(other.to_string()),
        }
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value)
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::from(value.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        CellValue::Number(f64::from(value))
    }
}

/// 问卷答题表
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseTable {
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
    index: HashMap<String, usize>,
}

impl ResponseTable {
    /// 创建答题表，每行补齐或截断到表头宽度
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();

        let mut index = HashMap::with_capacity(width);
        for (position, name) in headers.iter().enumerate() {
            // 重复列名只保留第一次出现的位置
            index.entry(name.clone()).or_insert(position);
        }

        Self {
            headers,
            rows,
            index,
        }
    }

    /// 从原始网格创建：第一行是表头，其余是数据
    ///
    /// 完全空白的数据行会被丢弃。
    pub fn from_grid(grid: Vec<Vec<CellValue>>) -> Self {
        let mut grid = grid.into_iter();
        let Some(header_row) = grid.next() else {
            return Self::default();
        };

        let headers = header_row.iter().map(CellValue::to_text).collect();
        let rows = grid
            .filter(|row| row.iter().any(|cell| !cell.is_empty()))
            .collect();

        Self::new(headers, rows)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// 没有数据行（可能仍有表头）
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&CellValue> {
        let position = self.column_index(column)?;
        self.rows.get(row)?.get(position)
    }

    /// 返回表头中不存在的必需列
    pub fn missing_columns(&self, required: &[String]) -> Vec<String> {
        required
            .iter()
            .filter(|name| !self.index.contains_key(name.as_str()))
            .cloned()
            .collect()
    }

    /// 出现不止一次的列名，按第一次出现的顺序
    pub fn duplicate_headers(&self) -> Vec<String> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for name in &self.headers {
            *counts.entry(name.as_str()).or_default() += 1;
        }

        let mut duplicates: Vec<String> = Vec::new();
        for name in &self.headers {
            if counts[name.as_str()] > 1 && !duplicates.contains(name) {
                duplicates.push(name.clone());
            }
        }
        duplicates
    }
}
