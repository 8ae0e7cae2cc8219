/// Google Sheets API 客户端
///
/// 封装所有与 Sheets v4 REST API 相关的调用逻辑
use crate::config::Config;
use crate::infrastructure::table_store::TableStore;
use crate::models::CellValue;
use anyhow::{anyhow, Context, Result};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use tracing::debug;

/// Sheets API 客户端
pub struct SheetsClient {
    http: Client,
    base_url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<JsonValue>>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

impl SheetsClient {
    /// 创建新的 Sheets 客户端
    pub fn new(config: &Config, token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: config.sheets_api_base_url.clone(),
            token: token.into(),
        }
    }

    /// 工作表整体范围（A1 表示法）
    fn sheet_range(sheet: &str) -> String {
        format!("'{}'", sheet.replace('\'', "''"))
    }

    /// 拼接 API 地址，每个片段都会被转义
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .with_context(|| format!("无效的 API 地址: {}", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("无效的 API 地址: {}", self.base_url))?
            .pop_if_empty()
            .push("v4")
            .push("spreadsheets")
            .extend(segments);
        Ok(url)
    }

    /// 发送请求并检查状态码
    async fn send(&self, request: RequestBuilder, action: &str) -> Result<Response> {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .with_context(|| format!("{}: 请求失败", action))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("{}: HTTP {} {}", action, status, body));
        }

        Ok(response)
    }
}

impl TableStore for SheetsClient {
    async fn read_sheet(&self, spreadsheet_id: &str, sheet: &str) -> Result<Vec<Vec<CellValue>>> {
        let range = Self::sheet_range(sheet);
        let url = self.url(&[spreadsheet_id, "values", &range])?;
        debug!("读取工作表: {}", url);

        let request = self.http.get(url).query(&[
            ("valueRenderOption", "UNFORMATTED_VALUE"),
            ("majorDimension", "ROWS"),
        ]);
        let response = self.send(request, "读取工作表").await?;
        let body: ValueRange = response.json().await.context("无法解析工作表数据")?;

        Ok(body
            .values
            .into_iter()
            .map(|row| row.into_iter().map(CellValue::from).collect())
            .collect())
    }

    async fn sheet_exists(&self, spreadsheet_id: &str, sheet: &str) -> Result<bool> {
        let url = self.url(&[spreadsheet_id])?;
        let request = self
            .http
            .get(url)
            .query(&[("fields", "sheets.properties.title")]);
        let response = self.send(request, "获取表格信息").await?;
        let meta: SpreadsheetMeta = response.json().await.context("无法解析表格信息")?;

        Ok(meta.sheets.iter().any(|s| s.properties.title == sheet))
    }

    async fn add_sheet(&self, spreadsheet_id: &str, sheet: &str, rows: usize, cols: usize) -> Result<()> {
        let url = self.url(&[&format!("{}:batchUpdate", spreadsheet_id)])?;
        let payload = json!({
            "requests": [{
                "addSheet": {
                    "properties": {
                        "title": sheet,
                        "gridProperties": {
                            "rowCount": rows,
                            "columnCount": cols
                        }
                    }
                }
            }]
        });

        debug!("创建工作表 Payload: {}", payload);
        self.send(self.http.post(url).json(&payload), "创建工作表").await?;
        Ok(())
    }

    async fn clear_sheet(&self, spreadsheet_id: &str, sheet: &str) -> Result<()> {
        let range = Self::sheet_range(sheet);
        let url = self.url(&[spreadsheet_id, "values", &format!("{}:clear", range)])?;
        self.send(self.http.post(url).json(&json!({})), "清空工作表").await?;
        Ok(())
    }

    async fn write_sheet(&self, spreadsheet_id: &str, sheet: &str, grid: &[Vec<CellValue>]) -> Result<()> {
        let range = Self::sheet_range(sheet);
        let url = self.url(&[spreadsheet_id, "values", &range])?;
        let values: Vec<Vec<JsonValue>> = grid
            .iter()
            .map(|row| row.iter().map(CellValue::to_json).collect())
            .collect();
        let payload = json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": values
        });

        let request = self
            .http
            .put(url)
            .query(&[("valueInputOption", "RAW")])
            .json(&payload);
        self.send(request, "写入工作表").await?;
        Ok(())
    }
}
