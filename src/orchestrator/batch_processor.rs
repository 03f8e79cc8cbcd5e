//! 批量查询处理器 - 编排层（展示层入口）
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责一次批量查询的启动、停止和结果收集。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：校验配置、初始化日志文件
//! 2. **输入校验**：cookie 或号码为空时在发出任何请求前报错
//! 3. **后台运行**：查询驱动在独立的 tokio 任务中运行
//! 4. **事件消费**：在调用方任务上渲染日志、收集结果表格
//! 5. **停止**：提升取消信号，当前请求结束后停止
//!
//! ## 设计特点
//!
//! - **消息传递**：后台任务只发事件，不共享任何可变状态
//! - **单任务**：同一时刻只允许一次运行
//! - **取消信号按运行轮换**：运行结束（包括调用方放弃等待）时才换新的信号，
//!   在运行真正开始前调用的 `stop()` 也会生效

use crate::config::Config;
use crate::error::{AppResult, InputError};
use crate::infrastructure::{LookupTransport, ReqwestTransport};
use crate::models::{parse_numbers, LookupEvent, LookupResult, OutcomeRow};
use crate::orchestrator::lookup_driver::LookupDriver;
use crate::services::RunLog;
use crate::utils::logging::{init_log_file, log_numbers_loaded, log_startup, print_final_stats};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// 一次运行的结果
#[derive(Debug, Default)]
pub struct RunReport {
    /// 已结束号码的结果（完成顺序）
    pub results: Vec<LookupResult>,
    /// 结果表格
    pub rows: Vec<OutcomeRow>,
    /// 号码总数
    pub total: usize,
    /// 是否被停止
    pub cancelled: bool,
}

impl RunReport {
    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_ok()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.results.len() - self.success_count()
    }
}

/// 应用主结构
pub struct App {
    config: Config,
    run_log: RunLog,
    running: AtomicBool,
    cancel: Mutex<CancellationToken>,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> AppResult<Self> {
        config.validate()?;

        // 初始化日志文件
        init_log_file(&config.output_log_file)?;

        log_startup(&config);

        let run_log = RunLog::with_path(config.output_log_file.clone());

        Ok(Self {
            config,
            run_log,
            running: AtomicBool::new(false),
            cancel: Mutex::new(CancellationToken::new()),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// 开始一次批量查询
    ///
    /// # 参数
    /// - `credential`: ci_session cookie
    /// - `numbers_text`: 逗号或换行分隔的号码
    ///
    /// # 返回
    /// 输入为空时返回 `InputError`，不会发出任何请求
    pub async fn start(&self, credential: &str, numbers_text: &str) -> AppResult<RunReport> {
        let credential = credential.trim();
        if credential.is_empty() {
            return Err(InputError::MissingCredential.into());
        }

        let numbers = parse_numbers(numbers_text);
        if numbers.is_empty() {
            return Err(InputError::NoNumbers.into());
        }

        let transport = ReqwestTransport::new(&self.config, credential)?;
        self.run_with(transport, numbers).await
    }

    /// 使用指定传输运行一批号码
    pub async fn run_with<T>(&self, transport: T, numbers: Vec<String>) -> AppResult<RunReport>
    where
        T: LookupTransport + 'static,
    {
        if numbers.is_empty() {
            return Err(InputError::NoNumbers.into());
        }
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(InputError::AlreadyRunning.into());
        }

        let guard = RunGuard::new(self);
        let report = self.run_worker(transport, numbers, guard.token.clone()).await;
        drop(guard);

        let report = report?;
        print_final_stats(
            report.success_count(),
            report.failed_count(),
            report.total,
            self.run_log.path(),
        );
        Ok(report)
    }

    /// 停止当前运行（当前请求结束后生效）
    ///
    /// 在 `start` 之后、运行真正开始之前调用同样有效
    pub fn stop(&self) {
        if let Ok(token) = self.cancel.lock() {
            token.cancel();
        }
        self.render_line("Stopping search after current request...", false);
    }

    async fn run_worker<T>(
        &self,
        transport: T,
        numbers: Vec<String>,
        token: CancellationToken,
    ) -> AppResult<RunReport>
    where
        T: LookupTransport + 'static,
    {
        let total = numbers.len();
        log_numbers_loaded(total);

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut driver = LookupDriver::new(transport, &self.config)?;

        let worker = tokio::spawn(async move { driver.run(&numbers, &tx, &token).await });

        let mut report = RunReport {
            total,
            ..Default::default()
        };

        // 发送端随后台任务结束而关闭
        while let Some(event) = rx.recv().await {
            self.render(&event);
            match event {
                LookupEvent::Row(row) => report.rows.push(row),
                LookupEvent::Finished { cancelled, .. } => report.cancelled = cancelled,
                _ => {}
            }
        }

        report.results = worker.await?;
        Ok(report)
    }

    fn current_token(&self) -> CancellationToken {
        match self.cancel.lock() {
            Ok(token) => token.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn rotate_token(&self) {
        let mut current = match self.cancel.lock() {
            Ok(token) => token,
            Err(poisoned) => poisoned.into_inner(),
        };
        *current = CancellationToken::new();
    }

    fn render(&self, event: &LookupEvent) {
        match event {
            LookupEvent::Progress { processed, total } => {
                debug!("Progress: {} / {}", processed, total);
            }
            LookupEvent::CooldownTick { remaining } => {
                debug!("Cooldown: {:.1}s", remaining.as_secs_f64());
            }
            _ => {
                if let Some(line) = event.log_line() {
                    let is_warning = matches!(
                        event,
                        LookupEvent::HttpFailed { .. }
                            | LookupEvent::TransportFailed { .. }
                            | LookupEvent::PayloadMissing { .. }
                            | LookupEvent::PayloadDecodeFailed { .. }
                            | LookupEvent::RetriesExhausted { .. }
                    );
                    self.render_line(&line, is_warning);
                }
            }
        }
    }

    fn render_line(&self, line: &str, is_warning: bool) {
        if is_warning {
            warn!("{}", line);
        } else {
            info!("{}", line);
        }
        if let Err(e) = self.run_log.append(line) {
            warn!("写入运行日志失败: {}", e);
        }
    }
}

/// 一次运行的占用标记
///
/// 释放时取消本次运行的信号并换上新信号，然后清除运行标记。
/// 调用方的 future 被丢弃时同样会释放，后台任务随之退出。
struct RunGuard<'a> {
    app: &'a App,
    token: CancellationToken,
}

impl<'a> RunGuard<'a> {
    fn new(app: &'a App) -> Self {
        Self {
            token: app.current_token(),
            app,
        }
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.token.cancel();
        self.app.rotate_token();
        self.app.running.store(false, Ordering::SeqCst);
    }
}
