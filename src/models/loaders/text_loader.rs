use crate::error::{AppError, AppResult};
use std::path::Path;
use tokio::fs;

/// 从文本文件读取号码原文
///
/// 文件内容按逗号或换行分隔，原样返回，由调用方决定如何合并与解析
pub async fn load_numbers_text(path: &Path) -> AppResult<String> {
    fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))
}
