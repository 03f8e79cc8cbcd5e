//! 号码查询上下文
//!
//! 封装"我正在第几次查询第几个号码"这一信息

use std::fmt::Display;

/// 号码查询上下文
#[derive(Debug, Clone)]
pub struct LookupCtx {
    /// 号码
    pub number: String,

    /// 号码在列表中的位置（从1开始，仅用于日志显示）
    pub index: usize,

    /// 号码总数
    pub total: usize,

    /// 本次尝试次数（从1开始）
    pub attempt: u32,
}

impl LookupCtx {
    pub fn new(number: impl Into<String>, index: usize, total: usize, attempt: u32) -> Self {
        Self {
            number: number.into(),
            index,
            total,
            attempt,
        }
    }
}

impl Display for LookupCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[号码 {} ({}/{}) 第{}次]",
            self.number, self.index, self.total, self.attempt
        )
    }
}
