//! # MNP Checker
//!
//! 批量查询手机号码携号转网（MNP）信息的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（HTTP 客户端 + 会话 cookie），只暴露能力
//! - `LookupTransport` - 提交一个号码，返回原始响应
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，不关心流程
//! - `payload` - 从 HTML 中提取 `JSON.parse('[...]')` 载荷
//! - `AdaptiveCooldown` - 自适应冷却与可中断等待
//! - `persistence` - 保存 / 导出 / 复制结果
//! - `RunLog` - 写运行日志
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次尝试"的归类规则（前进 or 重试）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/lookup_driver` - 顺序查询驱动，维护尝试计数和冷却
//! - `orchestrator/batch_processor` - 展示层入口，启动 / 停止并消费事件
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{LookupTransport, RawResponse, ReqwestTransport};
pub use models::{LookupEvent, LookupResult, LookupStatus, OutcomeRow};
pub use orchestrator::{App, LookupDriver, RunReport};
