pub mod cooldown;
pub mod payload;
pub mod persistence;
pub mod run_log;

pub use cooldown::AdaptiveCooldown;
pub use payload::extract_rows;
pub use persistence::{export_table, render_tsv, save_results};
pub use run_log::RunLog;
