use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// 表头重复列名的处理策略
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DuplicateHeaderPolicy {
    /// 立即中止获取，不重试
    #[default]
    Reject,
    /// 记录警告并继续，同名列只保留第一次出现的那一列
    Warn,
}

impl FromStr for DuplicateHeaderPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" | "abort" => Ok(DuplicateHeaderPolicy::Reject),
            "warn" => Ok(DuplicateHeaderPolicy::Warn),
            other => Err(format!("未知的重复表头策略: {}", other)),
        }
    }
}

/// 程序配置
///
/// 启动时构建一次，之后以只读引用传给每个组件
#[derive(Clone, Debug)]
pub struct Config {
    /// 调试模式（使用测试表格）
    pub debug: bool,
    /// 目标表格 ID
    pub spreadsheet_id: String,
    /// 源数据工作表名称
    pub source_sheet_name: String,
    /// 基础列（身份列），每张输入和输出表都必须包含
    pub base_cols: Vec<String>,
    /// 答案文件路径
    pub answers_path: PathBuf,
    /// 授权令牌文件路径
    pub token_path: PathBuf,
    /// 直接提供的访问令牌（优先于令牌文件）
    pub access_token: Option<String>,
    /// Google Sheets API 地址
    pub sheets_api_base_url: String,
    /// 题目列名前缀，例如 "Section " 对应 "Section 2.1"
    pub section_column_prefix: String,
    /// 各部分结果工作表的名称前缀
    pub section_sheet_prefix: String,
    /// 总成绩工作表名称
    pub grades_sheet_name: String,
    /// 表头重复列名的处理策略
    pub duplicate_header_policy: DuplicateHeaderPolicy,
    /// 获取源数据的最大尝试次数
    pub max_fetch_attempts: usize,
    /// 两次获取之间的等待时间
    pub fetch_retry_delay: Duration,
    /// 轮询模式下两次运行之间的间隔
    pub poll_interval: Duration,
    /// 轮询模式的总时间预算，用完后不再开始新的运行
    pub time_budget: Option<Duration>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            spreadsheet_id: String::new(),
            source_sheet_name: "Оценки".to_string(),
            base_cols: vec!["ФИО".to_string(), "Группа".to_string()],
            answers_path: PathBuf::from("work-file-dir").join("answers.json"),
            token_path: PathBuf::from("creds").join("token.json"),
            access_token: None,
            sheets_api_base_url: "https://sheets.googleapis.com".to_string(),
            section_column_prefix: String::new(),
            section_sheet_prefix: "Раздел ".to_string(),
            grades_sheet_name: "Grades".to_string(),
            duplicate_header_policy: DuplicateHeaderPolicy::default(),
            max_fetch_attempts: 3,
            fetch_retry_delay: Duration::from_secs(5),
            poll_interval: Duration::from_secs(5),
            time_budget: None,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        let debug = env_parse("DEBUG").unwrap_or(default.debug);
        let spreadsheet_id = if debug {
            std::env::var("SPREADSHEET_ID_TEST")
        } else {
            std::env::var("SPREADSHEET_ID")
        }
        .unwrap_or(default.spreadsheet_id);

        Self {
            debug,
            spreadsheet_id,
            source_sheet_name: std::env::var("SOURCE_SHEET_NAME").unwrap_or(default.source_sheet_name),
            base_cols: std::env::var("BASE_COLS").ok().map(|v| split_list(&v)).filter(|cols| !cols.is_empty()).unwrap_or(default.base_cols),
            answers_path: std::env::var("ANSWERS_PATH").map(PathBuf::from).unwrap_or(default.answers_path),
            token_path: std::env::var("TOKEN_PATH").map(PathBuf::from).unwrap_or(default.token_path),
            access_token: std::env::var("ACCESS_TOKEN").ok().filter(|v| !v.is_empty()),
            sheets_api_base_url: std::env::var("SHEETS_API_BASE_URL").unwrap_or(default.sheets_api_base_url),
            section_column_prefix: std::env::var("SECTION_COLUMN_PREFIX").unwrap_or(default.section_column_prefix),
            section_sheet_prefix: std::env::var("SECTION_SHEET_PREFIX").unwrap_or(default.section_sheet_prefix),
            grades_sheet_name: std::env::var("GRADES_SHEET_NAME").unwrap_or(default.grades_sheet_name),
            duplicate_header_policy: env_parse("DUPLICATE_HEADERS").unwrap_or(default.duplicate_header_policy),
            max_fetch_attempts: env_parse("MAX_FETCH_ATTEMPTS").filter(|n| *n > 0).unwrap_or(default.max_fetch_attempts),
            fetch_retry_delay: env_parse("FETCH_RETRY_DELAY_SECS").map(Duration::from_secs).unwrap_or(default.fetch_retry_delay),
            poll_interval: env_parse("POLL_INTERVAL_SECS").map(Duration::from_secs).unwrap_or(default.poll_interval),
            time_budget: env_parse("TIME_BUDGET_SECS").map(Duration::from_secs).or(default.time_budget),
            verbose_logging: env_parse("VERBOSE_LOGGING").unwrap_or(default.verbose_logging),
        }
    }

    /// 某一部分结果工作表的名称
    pub fn section_sheet_name(&self, section: u8) -> String {
        format!("{}{}", self.section_sheet_prefix, section)
    }
}

fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_source_layout() {
        let config = Config::default();
        assert_eq!(config.base_cols, vec!["ФИО", "Группа"]);
        assert_eq!(config.max_fetch_attempts, 3);
        assert_eq!(config.fetch_retry_delay, Duration::from_secs(5));
        assert_eq!(config.section_sheet_name(4), "Раздел 4");
    }

    #[test]
    fn test_duplicate_header_policy_parse() {
        assert_eq!("warn".parse(), Ok(DuplicateHeaderPolicy::Warn));
        assert_eq!(" Reject ".parse(), Ok(DuplicateHeaderPolicy::Reject));
        assert!("ignore".parse::<DuplicateHeaderPolicy>().is_err());
    }

    #[test]
    fn test_split_list_skips_blanks() {
        assert_eq!(split_list("Name, Group,,"), vec!["Name", "Group"]);
    }
}
