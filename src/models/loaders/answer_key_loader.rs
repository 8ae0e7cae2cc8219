use crate::error::{GradeError, GradeResult};
use crate::models::answer_key::{AnswerKey, ExpectedAnswer};
use crate::models::section::SectionId;
use crate::models::table::CellValue;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::path::Path;
use tokio::fs;
use tracing::{info, warn};

/// 答案文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFormat {
    Json,
    Toml,
}

impl KeyFormat {
    /// 根据扩展名判断格式，默认 JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => KeyFormat::Toml,
            _ => KeyFormat::Json,
        }
    }
}

type RawKey = BTreeMap<String, BTreeMap<String, JsonValue>>;

/// 从文件加载答案
pub async fn load_answer_key(path: &Path) -> GradeResult<AnswerKey> {
    let display = path.display().to_string();

    if !fs::try_exists(path).await.unwrap_or(false) {
        return Err(GradeError::answer_key_load(display, "文件不存在"));
    }

    let content = fs::read_to_string(path)
        .await
        .map_err(|e| GradeError::answer_key_load(&display, e))?;

    let key = parse_answer_key(&content, KeyFormat::from_path(path), &display)?;
    info!("✓ 已加载答案: {} 个部分, {} 道题目", key.sections().count(), key.len());

    Ok(key)
}

/// 解析答案文档
///
/// 文档顶层以部分名称为键（"Section 2"、"Раздел 2"、"2" 均可），
/// 值为 题目列 → 答案（标量或可接受答案列表）。
pub fn parse_answer_key(content: &str, format: KeyFormat, source: &str) -> GradeResult<AnswerKey> {
    let raw: RawKey = match format {
        KeyFormat::Json => {
            serde_json::from_str(content).map_err(|e| GradeError::answer_key_load(source, e))?
        }
        KeyFormat::Toml => toml::from_str(content).map_err(|e| GradeError::answer_key_load(source, e))?,
    };

    let mut key = AnswerKey::new();
    for (label, answers) in raw {
        let number = parse_section_label(&label)
            .ok_or_else(|| GradeError::answer_key_load(source, format!("无法识别的部分名称 '{}'", label)))?;

        let Some(section) = SectionId::new(number) else {
            warn!("⚠️ 答案中的部分 '{}' 超出范围，已忽略", label);
            continue;
        };

        for (column, value) in answers {
            let expected = parse_expected(value).ok_or_else(|| {
                GradeError::answer_key_load(
                    source,
                    format!("题目 '{}' 的答案必须是标量或标量列表", column),
                )
            })?;
            key.insert(section, column, expected);
        }
    }

    Ok(key)
}

/// 取部分名称末尾的数字
fn parse_section_label(label: &str) -> Option<u32> {
    let trimmed = label.trim();
    let prefix_len = trimmed.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    trimmed[prefix_len..].parse().ok()
}

fn parse_expected(value: JsonValue) -> Option<ExpectedAnswer> {
    match value {
        JsonValue::Array(items) => {
            let mut accepted = Vec::with_capacity(items.len());
            for item in items {
                if !is_scalar(&item) {
                    return None;
                }
                accepted.push(item);
            }
            Some(ExpectedAnswer::any_of(accepted.into_iter().map(CellValue::from)))
        }
        scalar if is_scalar(&scalar) => Some(ExpectedAnswer::Exact(CellValue::from(scalar))),
        _ => None,
    }
}

fn is_scalar(value: &JsonValue) -> bool {
    matches!(
        value,
        JsonValue::String(_) | JsonValue::Number(_) | JsonValue::Bool(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(n: u32) -> SectionId {
        SectionId::new(n).unwrap()
    }

    #[test]
    fn test_parse_json_key() {
        let content = r#"{
            "Section2": {"Section 2.1": "x", "Section 2.2": ["y", "z"]},
            "Раздел 3": {"3.1": 42}
        }"#;

        let key = parse_answer_key(content, KeyFormat::Json, "answers.json").unwrap();
        assert_eq!(key.len(), 3);
        assert_eq!(
            key.expected(section(2), "Section 2.1").unwrap(),
            &ExpectedAnswer::Exact(CellValue::from("x"))
        );
        assert_eq!(
            key.expected(section(2), "Section 2.2").unwrap(),
            &ExpectedAnswer::AnyOf(vec!["y".to_string(), "z".to_string()])
        );
        assert_eq!(
            key.expected(section(3), "3.1").unwrap(),
            &ExpectedAnswer::Exact(CellValue::Number(42.0))
        );
    }

    #[test]
    fn test_parse_toml_key() {
        let content = r#"
            ["Section 4"]
            "4.1 Capital" = "Paris"
            "4.2 Primes" = [2, 3, 5]
        "#;

        let key = parse_answer_key(content, KeyFormat::Toml, "answers.toml").unwrap();
        assert_eq!(
            key.expected(section(4), "4.2 Primes").unwrap(),
            &ExpectedAnswer::AnyOf(vec!["2".to_string(), "3".to_string(), "5".to_string()])
        );
    }

    #[test]
    fn test_out_of_range_section_is_skipped() {
        let content = r#"{"Section 9": {"9.1": "a"}, "Section 2": {"2.1": "b"}}"#;
        let key = parse_answer_key(content, KeyFormat::Json, "answers.json").unwrap();
        assert_eq!(key.sections().collect::<Vec<_>>(), vec![section(2)]);
    }

    #[test]
    fn test_malformed_documents_fail() {
        let cases = [
            "{not json",
            r#"{"Section": {"2.1": "a"}}"#,
            r#"{"Section 2": {"2.1": {"nested": true}}}"#,
            r#"{"Section 2": {"2.1": [["a"]]}}"#,
            r#"{"Section 2": {"2.1": null}}"#,
        ];

        for content in cases {
            let result = parse_answer_key(content, KeyFormat::Json, "answers.json");
            assert!(
                matches!(result, Err(GradeError::AnswerKeyLoad { .. })),
                "expected load error for {}",
                content
            );
        }
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(KeyFormat::from_path(Path::new("a/answers.TOML")), KeyFormat::Toml);
        assert_eq!(KeyFormat::from_path(Path::new("answers.json")), KeyFormat::Json);
        assert_eq!(KeyFormat::from_path(Path::new("answers")), KeyFormat::Json);
    }

    #[tokio::test]
    async fn test_missing_file_is_load_error() {
        let result = load_answer_key(Path::new("definitely/not/here.json")).await;
        assert!(matches!(result, Err(GradeError::AnswerKeyLoad { .. })));
    }
}
