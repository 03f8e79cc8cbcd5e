use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// 解析失败时填充的占位文本
pub const INVALID_DATA: &str = "Invalid Data";

/// 导出表格的列名
pub const TABLE_COLUMNS: [&str; 6] = [
    "Attempt",
    "Number",
    "Operator",
    "Circle Code",
    "Circle Name",
    "Ported",
];

/// 单个号码的最终状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupStatus {
    /// 成功解析出载荷
    Ok,
    /// 接口返回非 200 状态码
    HttpError(u16),
    /// 网络层异常（超时、连接失败等）
    Exception(String),
    /// 达到配置的最大尝试次数仍未拿到载荷
    RetriesExhausted,
}

impl fmt::Display for LookupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupStatus::Ok => write!(f, "ok"),
            LookupStatus::HttpError(code) => write!(f, "http_error({})", code),
            LookupStatus::Exception(msg) => write!(f, "exception({})", msg),
            LookupStatus::RetriesExhausted => write!(f, "retries_exhausted"),
        }
    }
}

/// 号码查询结果（已结束的号码才会产生）
#[derive(Debug, Clone, PartialEq)]
pub struct LookupResult {
    pub number: String,
    /// 解码后的 JSON 数组，失败时为 None
    pub data: Option<JsonValue>,
    /// 产生该结果的尝试次数
    pub attempt: u32,
    pub status: LookupStatus,
}

impl LookupResult {
    pub fn is_ok(&self) -> bool {
        self.status == LookupStatus::Ok
    }
}

/// 保存到 JSON 文件的结构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedResult {
    pub number: String,
    pub data: Option<JsonValue>,
    pub attempt: u32,
}

impl From<&LookupResult> for SavedResult {
    fn from(result: &LookupResult) -> Self {
        Self {
            number: result.number.clone(),
            data: result.data.clone(),
            attempt: result.attempt,
        }
    }
}

/// 结果表格中的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeRow {
    pub attempt: u32,
    pub number: String,
    pub operator: String,
    pub circle_code: String,
    pub circle_name: String,
    pub ported: String,
}

impl OutcomeRow {
    /// 从解码后的一行数据构建表格行
    ///
    /// 只有恰好 5 个字段的数组才视为有效行
    /// `[号码, 运营商, 地区代码, 地区名称, 是否携号转网]`，
    /// 其他形状一律填充 `Invalid Data`。
    pub fn from_decoded(attempt: u32, row: &JsonValue) -> Self {
        match row.as_array() {
            Some(fields) if fields.len() == 5 => Self {
                attempt,
                number: field_text(&fields[0]),
                operator: field_text(&fields[1]),
                circle_code: field_text(&fields[2]),
                circle_name: field_text(&fields[3]),
                ported: field_text(&fields[4]),
            },
            _ => Self {
                attempt,
                number: INVALID_DATA.to_string(),
                operator: INVALID_DATA.to_string(),
                circle_code: INVALID_DATA.to_string(),
                circle_name: INVALID_DATA.to_string(),
                ported: INVALID_DATA.to_string(),
            },
        }
    }

    /// 非 200 响应的占位行
    pub fn http_error(attempt: u32, number: &str, code: u16) -> Self {
        Self::placeholder(attempt, number, format!("Error {}", code))
    }

    /// 网络异常的占位行
    pub fn exception(attempt: u32, number: &str) -> Self {
        Self::placeholder(attempt, number, "Exception".to_string())
    }

    /// 达到最大尝试次数的占位行
    pub fn retries_exhausted(attempt: u32, number: &str) -> Self {
        Self::placeholder(attempt, number, "No Data".to_string())
    }

    fn placeholder(attempt: u32, number: &str, operator: String) -> Self {
        Self {
            attempt,
            number: number.to_string(),
            operator,
            circle_code: String::new(),
            circle_name: String::new(),
            ported: String::new(),
        }
    }

    /// 按列顺序返回单元格文本
    pub fn cells(&self) -> [String; 6] {
        [
            self.attempt.to_string(),
            self.number.clone(),
            self.operator.clone(),
            self.circle_code.clone(),
            self.circle_name.clone(),
            self.ported.clone(),
        ]
    }
}

fn field_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}
