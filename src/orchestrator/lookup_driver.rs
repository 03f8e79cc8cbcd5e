//! 批量查询驱动 - 编排层
//!
//! ## 职责
//!
//! 按顺序逐个查询号码，同一时刻只有一个请求在途。
//!
//! ## 核心规则
//!
//! 1. **取消检查**：每个号码开始前、冷却的每个刻度都检查取消信号；
//!    事件接收方关闭后同样停止
//! 2. **尝试计数**：每次请求前对号码的尝试次数加一
//! 3. **自适应冷却**：每次收到响应后按耗时更新冷却时间
//! 4. **前进 / 重试**：由 `workflow::classify` 决定
//! 5. **事件输出**：所有进度、日志、结果行都通过事件通道发出

use std::collections::HashMap;

use tokio::sync::mpsc::UnboundedSender;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::Config;
use crate::error::ConfigError;
use crate::infrastructure::LookupTransport;
use crate::models::{LookupEvent, LookupResult};
use crate::services::AdaptiveCooldown;
use crate::utils::logging::truncate_text;
use crate::workflow::{classify, give_up, AttemptOutcome, LookupCtx, RetryReason};

/// 批量查询驱动
///
/// 持有传输、冷却状态与尝试计数，三者都只在一次运行期间有效
pub struct LookupDriver<T: LookupTransport> {
    transport: T,
    cooldown: AdaptiveCooldown,
    attempts: HashMap<String, u32>,
    max_attempts: Option<u32>,
}

impl<T: LookupTransport> LookupDriver<T> {
    /// 创建驱动
    ///
    /// # 返回
    /// 冷却参数或最大尝试次数不合法时返回 `ConfigError`
    pub fn new(transport: T, config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            transport,
            cooldown: AdaptiveCooldown::from_config(config),
            attempts: HashMap::new(),
            max_attempts: config.max_attempts,
        })
    }

    /// 当前冷却时间（秒）
    pub fn cooldown_secs(&self) -> f64 {
        self.cooldown.current_secs()
    }

    /// 运行一批号码
    ///
    /// # 参数
    /// - `numbers`: 有序号码列表
    /// - `events`: 事件通道，接收方关闭后运行在当前请求结束时停止
    /// - `cancel`: 取消信号
    ///
    /// # 返回
    /// 按完成顺序排列的结果；取消前未结束的号码不会出现
    pub async fn run(
        &mut self,
        numbers: &[String],
        events: &UnboundedSender<LookupEvent>,
        cancel: &CancellationToken,
    ) -> Vec<LookupResult> {
        let emit = |event: LookupEvent| {
            let _ = events.send(event);
        };

        self.attempts.clear();
        self.cooldown.reset();

        let total = numbers.len();
        let mut results = Vec::with_capacity(total);
        let mut idx = 0;

        while idx < total {
            if cancel.is_cancelled() || events.is_closed() {
                break;
            }

            let number = &numbers[idx];
            let attempt = self.next_attempt(number);
            let ctx = LookupCtx::new(number.as_str(), idx + 1, total, attempt);

            emit(LookupEvent::Checking {
                index: ctx.index,
                total,
                attempt,
                number: number.clone(),
            });

            let started = Instant::now();
            let response = self.transport.post_number(number).await;
            let latency = started.elapsed();

            if let Ok(raw) = &response {
                debug!("{} 响应 {}，耗时 {:?}", ctx, raw.status, latency);
                if let Some((from, to)) = self.cooldown.adjust(latency) {
                    emit(LookupEvent::CooldownAdjusted { from, to });
                }
                emit(LookupEvent::ResponseStatus {
                    number: number.clone(),
                    code: raw.status,
                });
            }

            let outcome = match classify(&ctx, &response) {
                AttemptOutcome::Retry(_) if self.exhausted(attempt) => {
                    emit(LookupEvent::RetriesExhausted {
                        number: number.clone(),
                        attempts: attempt,
                    });
                    give_up(&ctx)
                }
                outcome => outcome,
            };

            match outcome {
                AttemptOutcome::Advance { result, rows } => {
                    match &response {
                        Ok(raw) if raw.status != 200 => emit(LookupEvent::HttpFailed {
                            number: number.clone(),
                            code: raw.status,
                        }),
                        Err(e) => emit(LookupEvent::TransportFailed {
                            number: number.clone(),
                            message: e.to_string(),
                        }),
                        _ => {}
                    }
                    for row in rows {
                        emit(LookupEvent::Row(row));
                    }
                    debug!("{} 结束: {}", ctx, result.status);
                    results.push(result);
                    idx += 1;
                }
                AttemptOutcome::Retry(reason) => {
                    if let Ok(raw) = &response {
                        debug!("{} 响应内容: {}", ctx, truncate_text(&raw.body, 200));
                    }
                    emit(match reason {
                        RetryReason::PayloadMissing => LookupEvent::PayloadMissing {
                            number: number.clone(),
                        },
                        RetryReason::PayloadDecode(error) => LookupEvent::PayloadDecodeFailed {
                            number: number.clone(),
                            error,
                        },
                    });
                    self.cooldown
                        .wait(cancel, |remaining| {
                            emit(LookupEvent::CooldownTick { remaining })
                        })
                        .await;
                }
            }

            emit(LookupEvent::Progress {
                processed: idx,
                total,
            });
        }

        emit(LookupEvent::Finished {
            processed: idx,
            total,
            cancelled: idx < total,
        });

        results
    }

    fn next_attempt(&mut self, number: &str) -> u32 {
        let attempt = self.attempts.entry(number.to_string()).or_insert(0);
        *attempt += 1;
        *attempt
    }

    fn exhausted(&self, attempt: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempt >= max)
    }
}
