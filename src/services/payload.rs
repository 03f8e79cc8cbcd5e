//! 载荷提取服务 - 业务能力层
//!
//! 只负责从 HTML 响应中取出 `JSON.parse('[...]')` 里的数组

use crate::error::PayloadError;
use regex::Regex;
use serde_json::Value as JsonValue;
use std::sync::OnceLock;

fn payload_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"JSON\.parse\('(\[.*?\])'\)").expect("payload regex is valid")
    })
}

/// 提取单引号包裹的 JSON 数组字面量（未反转义）
pub fn find_payload(body: &str) -> Option<&str> {
    payload_regex()
        .captures(body)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
}

/// 反转义 `\"` 与 `\'`
pub fn unescape_payload(literal: &str) -> String {
    literal.replace("\\\"", "\"").replace("\\'", "'")
}

/// 从响应体中提取并解析 JSON 数组
///
/// # 返回
/// - `Ok(rows)`: 解码后的数组元素
/// - `Err(PayloadError::Missing)`: 响应中没有载荷
/// - `Err(PayloadError::Decode)`: 载荷不是合法 JSON
pub fn extract_rows(body: &str) -> Result<Vec<JsonValue>, PayloadError> {
    let literal = find_payload(body).ok_or(PayloadError::Missing)?;
    let rows: Vec<JsonValue> = serde_json::from_str(&unescape_payload(literal))?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page(script: &str) -> String {
        format!(
            "<html><body><script>var rows = {};</script></body></html>",
            script
        )
    }

    #[test]
    fn test_extract_escaped_payload() {
        let body = page(r#"JSON.parse('[[\"9100000000\",\"Jio\",\"10\",\"Delhi\",\"No\"]]')"#);
        let rows = extract_rows(&body).unwrap();
        assert_eq!(rows, vec![json!(["9100000000", "Jio", "10", "Delhi", "No"])]);
    }

    #[test]
    fn test_single_quote_unescaped() {
        let body = page(r#"JSON.parse('[[\"O\'Neil\"]]')"#);
        let rows = extract_rows(&body).unwrap();
        assert_eq!(rows, vec![json!(["O'Neil"])]);
    }

    #[test]
    fn test_missing_payload() {
        let body = page("console.log('login required')");
        assert!(matches!(extract_rows(&body), Err(PayloadError::Missing)));
    }

    #[test]
    fn test_payload_does_not_span_lines() {
        let body = "JSON.parse('[\n[\"a\"]]')";
        assert!(matches!(extract_rows(body), Err(PayloadError::Missing)));
    }

    #[test]
    fn test_malformed_payload_is_decode_error() {
        let body = page(r#"JSON.parse('[[\"a\",]]')"#);
        assert!(matches!(extract_rows(&body), Err(PayloadError::Decode(_))));
    }

    #[test]
    fn test_first_payload_wins() {
        let body = format!(
            "{}{}",
            page(r#"JSON.parse('[]')"#),
            page(r#"JSON.parse('[[1]]')"#)
        );
        assert_eq!(find_payload(&body), Some("[]"));
    }
}
