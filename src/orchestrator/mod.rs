//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量查询的调度与展示，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量查询处理器（展示层入口）
//! - 校验输入（cookie、号码列表）
//! - 启动 / 停止一次运行
//! - 在调用方任务上消费事件、渲染日志、收集结果表格
//! - 输出全局统计信息
//!
//! ### `lookup_driver` - 批量查询驱动
//! - 按顺序逐个查询号码，同一时刻只有一个请求在途
//! - 维护尝试计数与自适应冷却
//! - 决定前进还是冷却后重试
//! - 通过事件通道发出日志、结果行与进度
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (App: start / stop，消费 LookupEvent)
//!     ↓ mpsc 事件通道
//! lookup_driver (处理 Vec<号码>)
//!     ↓
//! workflow::classify (处理单次尝试)
//!     ↓
//! services (能力层：payload / cooldown)
//!     ↓
//! infrastructure (基础设施：LookupTransport)
//! ```

pub mod batch_processor;
pub mod lookup_driver;

// 重新导出主要类型
pub use batch_processor::{App, RunReport};
pub use lookup_driver::LookupDriver;
