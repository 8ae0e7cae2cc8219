//! 访问令牌读取
//!
//! 启动时读取一次。令牌的申请和刷新由外部流程负责。

use crate::config::Config;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct TokenFile {
    token: Option<String>,
    access_token: Option<String>,
    expiry: Option<String>,
}

/// 读取访问令牌：优先使用配置中的令牌，否则读取令牌文件
pub async fn load_access_token(config: &Config) -> Result<String> {
    if let Some(token) = &config.access_token {
        debug!("使用环境变量中的访问令牌");
        return Ok(token.clone());
    }

    let path = &config.token_path;
    if !fs::try_exists(path).await.unwrap_or(false) {
        bail!(
            "未找到访问令牌: 请设置 ACCESS_TOKEN 或提供令牌文件 {}",
            path.display()
        );
    }

    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取令牌文件: {}", path.display()))?;
    let token_file: TokenFile = serde_json::from_str(&content)
        .with_context(|| format!("无法解析令牌文件: {}", path.display()))?;

    if let Some(expiry) = &token_file.expiry {
        debug!("令牌有效期至: {}", expiry);
    }

    match token_file.token.or(token_file.access_token) {
        Some(token) if !token.is_empty() => {
            info!("✓ 已读取访问令牌: {}", path.display());
            Ok(token)
        }
        _ => bail!("令牌文件中没有 token 字段: {}", path.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_config_token_wins() {
        let config = Config {
            access_token: Some("from-env".to_string()),
            ..Config::default()
        };
        assert_eq!(load_access_token(&config).await.unwrap(), "from-env");
    }

    #[tokio::test]
    async fn test_reads_token_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"token": "ya29.abc", "refresh_token": "r", "expiry": "2026-01-01T00:00:00Z"}}"#).unwrap();

        let config = Config {
            token_path: file.path().to_path_buf(),
            ..Config::default()
        };
        assert_eq!(load_access_token(&config).await.unwrap(), "ya29.abc");
    }

    #[tokio::test]
    async fn test_missing_token_file_fails() {
        let config = Config {
            token_path: "no/such/token.json".into(),
            ..Config::default()
        };
        assert!(load_access_token(&config).await.is_err());
    }
}
