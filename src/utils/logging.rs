use crate::config::Config;
use crate::error::{AppError, AppResult};
/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use std::fs;
use tracing::info;

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> AppResult<()> {
    let log_header = format!(
        "{}\nMNP 批量查询日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header).map_err(|e| AppError::file_write_failed(log_file_path, e))?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - MNP 批量查询");
    info!("🌐 查询接口: {}", config.endpoint_url);
    info!(
        "⏱️ 冷却时间: 初始 {:.1}s, 范围 [{:.1}s, {:.1}s]",
        config.initial_cooldown, config.min_cooldown, config.max_cooldown
    );
    match config.max_attempts {
        Some(max) => info!("🔁 每个号码最多尝试 {} 次", max),
        None => info!("🔁 未找到数据时无限重试，直到手动停止"),
    }
    info!("{}", "=".repeat(60));
}

/// 记录号码加载信息
///
/// # 参数
/// - `total`: 号码总数
pub fn log_numbers_loaded(total: usize) {
    info!("✓ 共 {} 个待查询的号码", total);
    info!("💡 按顺序逐个查询，按 Ctrl-C 停止\n");
}

/// 打印最终统计信息
///
/// # 参数
/// - `success`: 成功数量
/// - `failed`: 失败数量（非 200、网络异常、放弃）
/// - `total`: 总数
/// - `log_file_path`: 日志文件路径
pub fn print_final_stats(success: usize, failed: usize, total: usize, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 查询完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", success, total);
    info!("❌ 失败: {}", failed);
    info!("⏸️ 未完成: {}", total.saturating_sub(success + failed));
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
