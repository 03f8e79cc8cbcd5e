//! 单次查询流程 - 流程层
//!
//! 核心职责：把一次请求的结果归类为"前进"或"重试"
//!
//! 归类规则：
//! 1. 非 200 → 记录 http_error，前进
//! 2. 网络异常 → 记录 exception，前进
//! 3. 200 但没有载荷 / 载荷解析失败 → 冷却后重试同一号码
//! 4. 200 且解析成功 → 每行生成一条结果，前进

use serde_json::Value as JsonValue;

use crate::error::{ApiError, PayloadError};
use crate::infrastructure::RawResponse;
use crate::models::lookup::{LookupResult, LookupStatus, OutcomeRow};
use crate::services::payload;
use crate::workflow::lookup_ctx::LookupCtx;

/// 需要重试的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryReason {
    /// 响应中没有 JSON 载荷
    PayloadMissing,
    /// JSON 载荷解析失败
    PayloadDecode(String),
}

/// 单次尝试的结论
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    /// 号码已结束，附带结果与表格行
    Advance {
        result: LookupResult,
        rows: Vec<OutcomeRow>,
    },
    /// 保持当前号码，冷却后重试
    Retry(RetryReason),
}

/// 归类一次尝试
pub fn classify(ctx: &LookupCtx, response: &Result<RawResponse, ApiError>) -> AttemptOutcome {
    let response = match response {
        Ok(response) => response,
        Err(e) => {
            return advance_without_data(
                ctx,
                LookupStatus::Exception(e.to_string()),
                OutcomeRow::exception(ctx.attempt, &ctx.number),
            )
        }
    };

    if response.status != 200 {
        return advance_without_data(
            ctx,
            LookupStatus::HttpError(response.status),
            OutcomeRow::http_error(ctx.attempt, &ctx.number, response.status),
        );
    }

    match payload::extract_rows(&response.body) {
        Ok(decoded) => {
            let rows = decoded
                .iter()
                .map(|row| OutcomeRow::from_decoded(ctx.attempt, row))
                .collect();

            AttemptOutcome::Advance {
                result: LookupResult {
                    number: ctx.number.clone(),
                    data: Some(JsonValue::Array(decoded)),
                    attempt: ctx.attempt,
                    status: LookupStatus::Ok,
                },
                rows,
            }
        }
        Err(PayloadError::Missing) => AttemptOutcome::Retry(RetryReason::PayloadMissing),
        Err(PayloadError::Decode(e)) => {
            AttemptOutcome::Retry(RetryReason::PayloadDecode(e.to_string()))
        }
    }
}

/// 达到最大尝试次数后放弃
pub fn give_up(ctx: &LookupCtx) -> AttemptOutcome {
    advance_without_data(
        ctx,
        LookupStatus::RetriesExhausted,
        OutcomeRow::retries_exhausted(ctx.attempt, &ctx.number),
    )
}

fn advance_without_data(ctx: &LookupCtx, status: LookupStatus, row: OutcomeRow) -> AttemptOutcome {
    AttemptOutcome::Advance {
        result: LookupResult {
            number: ctx.number.clone(),
            data: None,
            attempt: ctx.attempt,
            status,
        },
        rows: vec![row],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::INVALID_DATA;
    use serde_json::json;

    fn ctx() -> LookupCtx {
        LookupCtx::new("9100000000", 1, 1, 1)
    }

    #[test]
    fn test_non_200_advances_with_http_error() {
        let outcome = classify(&ctx(), &Ok(RawResponse::new(503, "busy")));
        match outcome {
            AttemptOutcome::Advance { result, rows } => {
                assert_eq!(result.status, LookupStatus::HttpError(503));
                assert_eq!(result.data, None);
                assert_eq!(rows, vec![OutcomeRow::http_error(1, "9100000000", 503)]);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_transport_error_advances_with_exception() {
        let err = ApiError::request_failed(
            "http://localhost",
            std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out"),
        );
        match classify(&ctx(), &Err(err)) {
            AttemptOutcome::Advance { result, rows } => {
                assert!(matches!(result.status, LookupStatus::Exception(ref m) if m.contains("timed out")));
                assert_eq!(rows[0].operator, "Exception");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_missing_payload_retries() {
        let outcome = classify(&ctx(), &Ok(RawResponse::new(200, "<html></html>")));
        assert_eq!(outcome, AttemptOutcome::Retry(RetryReason::PayloadMissing));
    }

    #[test]
    fn test_decode_failure_retries_with_detail() {
        let body = r#"JSON.parse('[[\"a\",]]')"#;
        match classify(&ctx(), &Ok(RawResponse::new(200, body))) {
            AttemptOutcome::Retry(RetryReason::PayloadDecode(detail)) => {
                assert!(!detail.is_empty())
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_decoded_rows_follow_five_field_rule() {
        let body = r#"JSON.parse('[[\"91xxxxxxxxx\",\"Jio\",\"10\",\"Delhi\",\"No\"],[\"x\",\"y\",\"z\",\"w\"]]')"#;
        match classify(&ctx(), &Ok(RawResponse::new(200, body))) {
            AttemptOutcome::Advance { result, rows } => {
                assert!(result.is_ok());
                assert_eq!(
                    result.data,
                    Some(json!([["91xxxxxxxxx", "Jio", "10", "Delhi", "No"], ["x", "y", "z", "w"]]))
                );
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[0].operator, "Jio");
                assert_eq!(rows[1].number, INVALID_DATA);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_empty_payload_advances_without_rows() {
        match classify(&ctx(), &Ok(RawResponse::new(200, "JSON.parse('[]')"))) {
            AttemptOutcome::Advance { result, rows } => {
                assert!(result.is_ok());
                assert!(rows.is_empty());
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
