//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责资源持有和运行调度，是整个系统的"指挥中心"。
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (单次运行 / 轮询)
//!     ↓
//! workflow::GradingFlow (处理一张答题表)
//!     ↓
//! services (能力层：fetch / classify / grade / aggregate / partition / write)
//!     ↓
//! infrastructure (基础设施：TableStore)
//! ```
//!
//! ## 设计原则
//!
//! 1. **资源隔离**：只有编排层持有 `TableStore` 和答案
//! 2. **向下依赖**：编排层 → workflow → services → infrastructure
//! 3. **无业务逻辑**：只做调度和统计，不做具体评分判断

pub mod app;

pub use app::{App, PollStats, RunStats};
