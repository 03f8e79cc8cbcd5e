//! 结果持久化服务 - 业务能力层
//!
//! 只在保存 / 导出边界被调用，查询过程中不会触碰文件

use crate::error::{AppError, AppResult, FileError};
use crate::models::lookup::{LookupResult, OutcomeRow, SavedResult, TABLE_COLUMNS};
use rust_xlsxwriter::{Workbook, XlsxError};
use serde::Serialize;
use std::path::Path;
use tokio::fs;
use tracing::{info, warn};

/// 保存查询结果为 JSON
///
/// 格式为 `[{"number", "data", "attempt"}]`，4 空格缩进。
///
/// # 返回
/// 结果为空时不写文件，返回 false
pub async fn save_results(path: &Path, results: &[LookupResult]) -> AppResult<bool> {
    if results.is_empty() {
        warn!("⚠️ 没有可保存的结果");
        return Ok(false);
    }

    let saved: Vec<SavedResult> = results.iter().map(SavedResult::from).collect();
    let json = to_pretty_json(&saved).map_err(|source| FileError::SerializeFailed {
        path: path.display().to_string(),
        source,
    })?;

    fs::write(path, json)
        .await
        .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))?;

    info!("✓ 结果已保存至 {}", path.display());
    Ok(true)
}

/// 导出结果表格
///
/// 扩展名为 `.xlsx` 时写入 Excel 工作簿，其余按 CSV 写入；两种格式都带表头行。
///
/// # 返回
/// 表格为空时不写文件，返回 false
pub async fn export_table(path: &Path, rows: &[OutcomeRow]) -> AppResult<bool> {
    if rows.is_empty() {
        warn!("⚠️ 没有可导出的结果");
        return Ok(false);
    }

    let is_xlsx = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"));
    let bytes = if is_xlsx {
        render_xlsx(path, rows)?
    } else {
        render_csv(path, rows)?
    };

    fs::write(path, bytes)
        .await
        .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))?;

    info!("✓ 结果已导出至 {}", path.display());
    Ok(true)
}

fn render_csv(path: &Path, rows: &[OutcomeRow]) -> AppResult<Vec<u8>> {
    let csv_failed = |source: csv::Error| FileError::CsvFailed {
        path: path.display().to_string(),
        source,
    };

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(TABLE_COLUMNS).map_err(csv_failed)?;
    for row in rows {
        writer.write_record(row.cells()).map_err(csv_failed)?;
    }
    writer
        .into_inner()
        .map_err(|e| AppError::file_write_failed(path.display().to_string(), e.into_error()))
}

fn render_xlsx(path: &Path, rows: &[OutcomeRow]) -> AppResult<Vec<u8>> {
    let xlsx_failed = |source: XlsxError| FileError::XlsxFailed {
        path: path.display().to_string(),
        source,
    };

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (col, title) in TABLE_COLUMNS.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *title)
            .map_err(xlsx_failed)?;
    }
    for (idx, row) in rows.iter().enumerate() {
        for (col, cell) in row.cells().iter().enumerate() {
            worksheet
                .write_string(idx as u32 + 1, col as u16, cell.as_str())
                .map_err(xlsx_failed)?;
        }
    }

    Ok(workbook.save_to_buffer().map_err(xlsx_failed)?)
}

/// 渲染为制表符分隔的文本（"复制全部结果"）
pub fn render_tsv(rows: &[OutcomeRow]) -> String {
    rows.iter()
        .map(|row| row.cells().join("\t") + "\n")
        .collect()
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}
