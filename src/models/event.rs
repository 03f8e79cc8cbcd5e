//! 查询过程中由后台任务发出的事件
//!
//! 后台任务只通过事件通道与展示层通信，不共享任何可变状态。

use crate::models::lookup::OutcomeRow;
use std::time::Duration;

/// 查询事件
#[derive(Debug, Clone, PartialEq)]
pub enum LookupEvent {
    /// 开始一次尝试
    Checking {
        index: usize,
        total: usize,
        attempt: u32,
        number: String,
    },
    /// 收到响应
    ResponseStatus { number: String, code: u16 },
    /// 冷却时间发生变化
    CooldownAdjusted { from: f64, to: f64 },
    /// 新的结果行
    Row(OutcomeRow),
    /// 非 200 响应
    HttpFailed { number: String, code: u16 },
    /// 网络异常
    TransportFailed { number: String, message: String },
    /// 响应中没有 JSON 载荷，将在冷却后重试
    PayloadMissing { number: String },
    /// JSON 载荷解析失败，将在冷却后重试
    PayloadDecodeFailed { number: String, error: String },
    /// 达到最大尝试次数，放弃该号码
    RetriesExhausted { number: String, attempts: u32 },
    /// 冷却倒计时
    CooldownTick { remaining: Duration },
    /// 进度
    Progress { processed: usize, total: usize },
    /// 运行结束
    Finished {
        processed: usize,
        total: usize,
        cancelled: bool,
    },
}

impl LookupEvent {
    /// 渲染为日志行，倒计时和进度这类高频事件返回 None
    pub fn log_line(&self) -> Option<String> {
        let line = match self {
            LookupEvent::Checking {
                index,
                total,
                attempt,
                number,
            } => format!("Checking {}/{} Attempt {}: {}", index, total, attempt, number),
            LookupEvent::ResponseStatus { code, .. } => format!("Response code: {}", code),
            LookupEvent::CooldownAdjusted { from, to } => {
                format!("Adjusting cooldown: {:.1}s -> {:.1}s", from, to)
            }
            LookupEvent::Row(row) => row.cells().join(" | "),
            LookupEvent::HttpFailed { number, code } => {
                format!("Failed request for number {} with status {}", number, code)
            }
            LookupEvent::TransportFailed { number, message } => {
                format!("Error during request for {}: {}", number, message)
            }
            LookupEvent::PayloadMissing { number } => format!(
                "No JSON found for number {}. Waiting cooldown and retrying...",
                number
            ),
            LookupEvent::PayloadDecodeFailed { number, error } => format!(
                "JSON decode error for number {}: {}. Retrying after cooldown.",
                number, error
            ),
            LookupEvent::RetriesExhausted { number, attempts } => format!(
                "Giving up on number {} after {} attempts",
                number, attempts
            ),
            LookupEvent::Finished {
                processed,
                total,
                cancelled,
            } => {
                if *cancelled {
                    format!("Bulk search stopped at {} / {}.", processed, total)
                } else {
                    "Bulk search completed.".to_string()
                }
            }
            LookupEvent::CooldownTick { .. } | LookupEvent::Progress { .. } => return None,
        };
        Some(line)
    }
}
