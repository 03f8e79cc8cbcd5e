//! 运行日志写入服务 - 业务能力层
//!
//! 只负责把日志行追加到输出日志文件

use crate::error::{AppError, AppResult};
use std::fs::OpenOptions;
use std::io::Write;

/// 运行日志写入服务
///
/// 职责：
/// - 把展示层渲染出的日志行追加到文件
/// - 每行带本地时间戳
/// - 不关心事件类型
pub struct RunLog {
    log_file_path: String,
}

impl RunLog {
    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            log_file_path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.log_file_path
    }

    /// 追加一行日志
    pub fn append(&self, line: &str) -> AppResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file_path)
            .map_err(|e| AppError::file_write_failed(&self.log_file_path, e))?;

        let entry = format!(
            "[{}] {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            line
        );

        file.write_all(entry.as_bytes())
            .map_err(|e| AppError::file_write_failed(&self.log_file_path, e))?;

        Ok(())
    }
}
