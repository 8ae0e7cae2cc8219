//! 源数据获取服务 - 业务能力层
//!
//! 只负责"带重试地拿到答题表"这一能力

use crate::config::{Config, DuplicateHeaderPolicy};
use crate::error::{GradeError, GradeResult, ValidationError};
use crate::infrastructure::TableStore;
use crate::models::ResponseTable;
use tokio::time::sleep;
use tracing::{info, warn};

/// 表格 ID 的固定长度
pub const SPREADSHEET_ID_LEN: usize = 44;

/// 源数据获取服务
///
/// 职责：
/// - 校验表格 ID（格式错误直接失败，不重试）
/// - 读取失败时按固定间隔重试，超过次数后返回 `Fetch` 错误
/// - 检查表头重复列名
/// - 只有表头没有数据时返回空表，不算错误
pub struct FetchRetrier<'a, S: TableStore> {
    store: &'a S,
    config: &'a Config,
}

impl<'a, S: TableStore> FetchRetrier<'a, S> {
    pub fn new(store: &'a S, config: &'a Config) -> Self {
        Self { store, config }
    }

    /// 获取答题表
    pub async fn fetch(&self) -> GradeResult<ResponseTable> {
        info!("📥 正在获取数据...");
        validate_spreadsheet_id(&self.config.spreadsheet_id)?;

        let max_attempts = self.config.max_fetch_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            info!("尝试 {}/{}", attempt, max_attempts);
            info!("读取工作表: {}", self.config.source_sheet_name);

            match self
                .store
                .read_sheet(&self.config.spreadsheet_id, &self.config.source_sheet_name)
                .await
            {
                Ok(grid) => {
                    let table = ResponseTable::from_grid(grid);
                    self.check_duplicates(&table)?;

                    if table.is_empty() {
                        warn!("⚠️ 获取到空数据");
                    } else {
                        info!("✓ 成功获取 {} 行", table.len());
                    }
                    return Ok(table);
                }
                Err(e) => {
                    warn!("获取失败 (尝试 {}/{}): {:#}", attempt, max_attempts, e);
                    if attempt >= max_attempts {
                        return Err(GradeError::fetch_failed(attempt, e));
                    }
                    warn!(
                        "{} 秒后重试...",
                        self.config.fetch_retry_delay.as_secs_f64()
                    );
                    sleep(self.config.fetch_retry_delay).await;
                }
            }
        }
    }

    fn check_duplicates(&self, table: &ResponseTable) -> GradeResult<()> {
        let duplicates = table.duplicate_headers();
        if duplicates.is_empty() {
            return Ok(());
        }

        match self.config.duplicate_header_policy {
            DuplicateHeaderPolicy::Reject => {
                Err(ValidationError::DuplicateHeaders(duplicates).into())
            }
            DuplicateHeaderPolicy::Warn => {
                warn!(
                    "⚠️ 发现重复列名: {:?}，需要清理；将使用每个列名第一次出现的列",
                    duplicates
                );
                Ok(())
            }
        }
    }
}

/// 表格 ID 必须正好 44 个字符
pub fn validate_spreadsheet_id(id: &str) -> Result<(), ValidationError> {
    let actual = id.chars().count();
    if actual == SPREADSHEET_ID_LEN {
        Ok(())
    } else {
        Err(ValidationError::MalformedSpreadsheetId {
            actual,
            expected: SPREADSHEET_ID_LEN,
        })
    }
}
