//! 评分流程错误类型
//!
//! 所有致命错误都汇总到 `GradeError`，由顶层运行器统一输出本地化的失败信息。
//! 传输层（表格读写）内部使用 `anyhow`，在进入评分流程时被包装成这里的变体。

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 评分流程错误
#[derive(Debug, Error)]
pub enum GradeError {
    /// 获取源数据失败（已用尽全部重试次数）
    #[error("获取数据失败 (已尝试 {attempts} 次): {source}")]
    Fetch {
        attempts: usize,
        #[source]
        source: BoxError,
    },

    /// 输入数据或配置不合法，不会重试
    #[error("数据校验失败: {0}")]
    Validation(#[from] ValidationError),

    /// 答案文件无法加载
    #[error("答案文件加载失败 ({path}): {reason}")]
    AnswerKeyLoad { path: String, reason: String },

    /// 题目列在答案中没有对应条目
    #[error("答案中缺少题目 '{column}' (第 {section} 部分)")]
    MissingAnswerKey { section: u8, column: String },

    /// 没有任何列匹配到任何部分
    #[error("未找到任何部分的题目列")]
    NoSectionsFound,

    /// 写入结果失败
    #[error("写入工作表 '{sheet}' 失败: {source}")]
    Write {
        sheet: String,
        #[source]
        source: BoxError,
    },
}

/// 数据校验错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// 缺少基础列
    #[error("数据中缺少基础列: {}", .0.join(", "))]
    MissingBaseColumns(Vec<String>),

    /// 表格 ID 格式不正确
    #[error("表格 ID 格式不正确 (长度 {actual}，应为 {expected})")]
    MalformedSpreadsheetId { actual: usize, expected: usize },

    /// 表头存在重复列名
    #[error("表头中存在重复列名: {}，需要先清理", .0.join(", "))]
    DuplicateHeaders(Vec<String>),
}

impl GradeError {
    /// 创建获取失败错误
    pub fn fetch_failed(attempts: usize, source: anyhow::Error) -> Self {
        GradeError::Fetch {
            attempts,
            source: source.into(),
        }
    }

    /// 创建写入失败错误
    pub fn write_failed(sheet: impl Into<String>, source: anyhow::Error) -> Self {
        GradeError::Write {
            sheet: sheet.into(),
            source: source.into(),
        }
    }

    /// 创建答案文件加载错误
    pub fn answer_key_load(path: impl Into<String>, reason: impl ToString) -> Self {
        GradeError::AnswerKeyLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// 评分流程结果类型
pub type GradeResult<T> = Result<T, GradeError>;
