//! # Sheet Grader
//!
//! 从在线表格读取答题记录，按答案评分，再把各部分成绩写回表格
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有表格连接，只暴露读写能力
//! - `TableStore` - 表格读写能力（Google Sheets / 内存实现）
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `FetchRetrier` - 带重试的数据获取
//! - `ColumnClassifier` / `Grader` - 列分类和逐格评分
//! - `aggregator` / `partitioner` - 得分汇总和按部分拆分
//! - `ResultWriter` - 写回结果工作表
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一张答题表"的完整评分流程
//! - `GradingFlow` - 校验 → 分类 → 评分 → 汇总 → 拆分
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 资源持有、单次运行和轮询
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::{Config, DuplicateHeaderPolicy};
pub use error::{GradeError, GradeResult, ValidationError};
pub use infrastructure::{MemoryTableStore, SheetsClient, TableStore};
pub use models::{AnswerKey, CellValue, ExpectedAnswer, GradingOutcome, ResponseTable, SectionId};
pub use orchestrator::{App, PollStats, RunStats};
pub use workflow::GradingFlow;
