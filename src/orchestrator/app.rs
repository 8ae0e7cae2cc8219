//! 应用运行器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责资源持有和运行调度。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：读取访问令牌、创建表格客户端、加载答案
//! 2. **单次运行**：获取 → 评分 → 拆分 → 写入
//! 3. **轮询运行**：按固定间隔重复单次运行，直到时间预算用完或收到中断信号
//! 4. **统计输出**：记录每次运行和整个轮询的结果
//!
//! ## 设计特点
//!
//! - **资源所有者**：唯一持有 `TableStore` 和答案的模块
//! - **先算后写**：全部结果计算完成后才开始写入
//! - **向下委托**：评分细节交给 `GradingFlow`，读写交给 services

use crate::config::Config;
use crate::error::GradeResult;
use crate::infrastructure::{load_access_token, SheetsClient, TableStore};
use crate::models::{load_answer_key, AnswerKey};
use crate::services::{FetchRetrier, ResultWriter};
use crate::utils::logging::{log_run_complete, log_run_start, print_poll_stats};
use crate::workflow::{GradingFlow, RunCtx};
use anyhow::Result;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::{error, info};

/// 单次运行统计
#[derive(Debug, Clone, PartialEq)]
pub struct RunStats {
    pub respondents: usize,
    pub sections: usize,
    pub sheets_written: usize,
    pub elapsed: Duration,
}

/// 轮询统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollStats {
    pub success: usize,
    pub failed: usize,
}

impl PollStats {
    pub fn total(&self) -> usize {
        self.success + self.failed
    }
}

/// 应用主结构
pub struct App<S: TableStore> {
    config: Config,
    store: S,
    answer_key: AnswerKey,
    flow: GradingFlow,
    runs: AtomicUsize,
}

impl App<SheetsClient> {
    /// 初始化应用（连接 Google Sheets）
    pub async fn initialize(config: Config) -> Result<Self> {
        let token = load_access_token(&config).await?;
        let client = SheetsClient::new(&config, token);
        Self::with_store(config, client).await
    }
}

impl<S: TableStore> App<S> {
    /// 使用指定的表格存储初始化应用，答案只在这里加载一次
    pub async fn with_store(config: Config, store: S) -> Result<Self> {
        let answer_key = load_answer_key(&config.answers_path).await?;
        Self::with_answer_key(config, store, answer_key)
    }

    /// 使用已加载的答案初始化应用
    pub fn with_answer_key(config: Config, store: S, answer_key: AnswerKey) -> Result<Self> {
        let flow = GradingFlow::new(&config)?;
        Ok(Self {
            config,
            store,
            answer_key,
            flow,
            runs: AtomicUsize::new(0),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// 执行一次完整的评分运行
    pub async fn run_once(&self) -> GradeResult<RunStats> {
        let iteration = self.runs.fetch_add(1, Ordering::SeqCst) + 1;
        let ctx = RunCtx::new(
            iteration,
            self.config.spreadsheet_id.clone(),
            self.config.source_sheet_name.clone(),
        );
        log_run_start(&ctx.to_string());
        let started = Instant::now();

        let table = FetchRetrier::new(&self.store, &self.config).fetch().await?;
        let outcome = self.flow.run(&table, &self.answer_key)?;
        let sheets_written = ResultWriter::new(&self.store, &self.config)
            .write_all(&outcome)
            .await?;

        let stats = RunStats {
            respondents: outcome.respondents(),
            sections: outcome.sections.len(),
            sheets_written,
            elapsed: started.elapsed(),
        };
        log_run_complete(stats.respondents, stats.sheets_written, stats.elapsed);
        Ok(stats)
    }

    /// 轮询运行
    ///
    /// 单次失败只记录日志；时间预算只在两次运行之间检查，正在进行的运行不会被打断
    pub async fn run_polling(&self) -> PollStats {
        let started = Instant::now();
        let mut stats = PollStats::default();

        info!(
            "🔁 进入轮询模式，间隔 {}s",
            self.config.poll_interval.as_secs_f64()
        );

        loop {
            match self.run_once().await {
                Ok(_) => stats.success += 1,
                Err(e) => {
                    error!("❌ 第 {} 次运行失败: {}", stats.total() + 1, e);
                    stats.failed += 1;
                }
            }

            // 等待不超过剩余预算，醒来后预算已用完就不再开始新的运行
            let wait = match self.remaining_budget(started) {
                Some(Duration::ZERO) => {
                    info!("⏱️ 时间预算已用完，停止轮询");
                    break;
                }
                Some(remaining) => remaining.min(self.config.poll_interval),
                None => self.config.poll_interval,
            };

            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("🛑 收到中断信号，停止轮询");
                    break;
                }
            }

            if self.remaining_budget(started) == Some(Duration::ZERO) {
                info!("⏱️ 时间预算已用完，停止轮询");
                break;
            }
        }

        print_poll_stats(stats.success, stats.failed);
        stats
    }

    /// 剩余时间预算，未设置预算时为 `None`
    fn remaining_budget(&self, started: Instant) -> Option<Duration> {
        self.config
            .time_budget
            .map(|budget| budget.saturating_sub(started.elapsed()))
    }
}
