//! 自适应冷却 - 业务能力层
//!
//! 根据上一次请求的耗时调整两次请求之间的等待时间

use crate::config::Config;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

/// 冷却时间变化超过该值才视为"调整"
const ADJUST_THRESHOLD_SECS: f64 = 0.1;

/// 自适应冷却
///
/// `new = clamp(latency + 1s, min, max)`
#[derive(Debug, Clone)]
pub struct AdaptiveCooldown {
    initial: f64,
    min: f64,
    max: f64,
    current: f64,
    tick: Duration,
}

impl AdaptiveCooldown {
    pub fn new(initial: f64, min: f64, max: f64, tick: Duration) -> Self {
        Self {
            initial,
            min,
            max,
            current: initial,
            tick,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.initial_cooldown,
            config.min_cooldown,
            config.max_cooldown,
            config.cooldown_tick(),
        )
    }

    /// 回到初始值（每次运行开始时调用）
    pub fn reset(&mut self) {
        self.current = self.initial;
    }

    /// 当前冷却时间（秒）
    pub fn current_secs(&self) -> f64 {
        self.current
    }

    /// 根据请求耗时更新冷却时间
    ///
    /// # 返回
    /// 变化超过 0.1 秒时返回 `Some((旧值, 新值))`
    pub fn adjust(&mut self, latency: Duration) -> Option<(f64, f64)> {
        let next = (latency.as_secs_f64() + 1.0).max(self.min).min(self.max);
        let previous = self.current;
        self.current = next;

        if (next - previous).abs() > ADJUST_THRESHOLD_SECS {
            Some((previous, next))
        } else {
            None
        }
    }

    /// 等待当前冷却时间
    ///
    /// 等待按刻度拆分，每个刻度开始前回调剩余时间；
    /// 取消信号在当前刻度内立即生效。
    ///
    /// # 返回
    /// 完整等待结束返回 true，被取消返回 false
    pub async fn wait<F>(&self, cancel: &CancellationToken, mut on_tick: F) -> bool
    where
        F: FnMut(Duration),
    {
        let total_ms = (self.current * 1000.0).round() as u128;
        let ticks = (total_ms / self.tick.as_millis().max(1)) as u32;

        for remaining in (1..=ticks).rev() {
            if cancel.is_cancelled() {
                return false;
            }
            on_tick(self.tick * remaining);

            tokio::select! {
                _ = cancel.cancelled() => return false,
                _ = sleep(self.tick) => {}
            }
        }

        !cancel.is_cancelled()
    }
}
