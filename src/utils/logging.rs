/// 日志工具模块
///
/// 提供日志初始化和统计输出的辅助函数
use crate::config::Config;
use anyhow::Result;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// 初始化日志
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择 debug 或 info
pub fn init(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err.to_string()))
}

/// 记录程序启动信息
pub fn log_startup(config: &Config, polling: bool) {
    info!("{}", "=".repeat(60));
    info!(
        "🚀 程序启动 - {}",
        if polling { "轮询模式" } else { "单次运行模式" }
    );
    info!(
        "启动时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    if config.debug {
        info!("🧪 调试模式：使用测试表格");
    }
    info!("📄 表格: {}", config.spreadsheet_id);
    info!("📋 源工作表: {}", config.source_sheet_name);
    info!("🔑 答案文件: {}", config.answers_path.display());
    info!("{}", "=".repeat(60));
}

/// 记录单次运行开始
pub fn log_run_start(label: &str) {
    info!("\n{}", "─".repeat(60));
    info!("▶️ 开始处理 {}", label);
    info!("{}", "─".repeat(60));
}

/// 记录单次运行完成
///
/// # 参数
/// - `respondents`: 答题者数量
/// - `sheets`: 写入的工作表数量
/// - `elapsed`: 耗时
pub fn log_run_complete(respondents: usize, sheets: usize, elapsed: Duration) {
    info!("\n{}", "─".repeat(60));
    info!(
        "✓ 本次完成: {} 名答题者, 写入 {} 张工作表, 耗时 {:.2}s",
        respondents,
        sheets,
        elapsed.as_secs_f64()
    );
    info!("{}", "─".repeat(60));
}

/// 打印轮询结束统计
///
/// # 参数
/// - `success`: 成功次数
/// - `failed`: 失败次数
pub fn print_poll_stats(success: usize, failed: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📊 轮询结束统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", success, success + failed);
    info!("❌ 失败: {}", failed);
    info!("{}", "=".repeat(60));
}
