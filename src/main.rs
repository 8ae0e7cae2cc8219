use sheet_grader::utils::logging;
use sheet_grader::{App, Config};
use std::process::ExitCode;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    // 加载 .env（文件不存在时忽略）
    let _ = dotenvy::dotenv();

    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    if let Err(e) = logging::init(config.verbose_logging) {
        eprintln!("日志初始化失败: {}", e);
    }

    let polling = std::env::args().any(|arg| arg == "--poll")
        || std::env::var("POLL").is_ok_and(|v| v.trim().eq_ignore_ascii_case("true"));

    match run(config, polling).await {
        Ok(()) => {
            println!("✅ 所有操作已成功完成");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            println!("❌ 错误: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config, polling: bool) -> anyhow::Result<()> {
    logging::log_startup(&config, polling);

    // 初始化应用
    let app = App::initialize(config).await?;

    if polling {
        let stats = app.run_polling().await;
        if stats.success == 0 && stats.failed > 0 {
            anyhow::bail!("轮询期间所有 {} 次运行均失败", stats.failed);
        }
    } else {
        app.run_once().await?;
    }

    Ok(())
}
