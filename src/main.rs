use anyhow::{Context, Result};
use clap::Parser;
use mnp_checker::models::load_numbers_text;
use mnp_checker::services::{export_table, render_tsv, save_results};
use mnp_checker::{logger, App, Config};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(version)]
#[command(about = "批量查询手机号码携号转网（MNP）信息", long_about = None)]
struct Args {
    /// ci_session cookie 的值
    #[arg(short, long, env = "MNP_CI_SESSION", hide_env_values = true)]
    cookie: String,

    /// 号码，逗号或换行分隔
    #[arg(short, long, default_value = "")]
    numbers: String,

    /// 从文本文件加载号码
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// 保存结果为 JSON
    #[arg(long)]
    save: Option<PathBuf>,

    /// 导出结果表格（.xlsx 为 Excel 工作簿，其余为 CSV）
    #[arg(long)]
    export: Option<PathBuf>,

    /// 把结果表格以制表符分隔写入文件
    #[arg(long)]
    copy: Option<PathBuf>,

    /// 结束后在标准输出打印结果表格
    #[arg(long)]
    print_table: bool,

    /// TOML 配置文件
    #[arg(long)]
    config: Option<PathBuf>,

    /// 显示详细日志
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 加载配置
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("无法加载配置文件: {}", path.display()))?
            .with_env(),
        None => Config::from_env(),
    };
    config.verbose_logging |= args.verbose;

    // 初始化日志
    logger::init(config.verbose_logging);

    let mut numbers_text = args.numbers.clone();
    if let Some(path) = &args.input {
        let loaded = load_numbers_text(path)
            .await
            .with_context(|| format!("无法加载号码文件: {}", path.display()))?;
        info!("📁 已从 {} 加载号码", path.display());
        numbers_text.push('\n');
        numbers_text.push_str(&loaded);
    }

    let app = Arc::new(App::initialize(config).context("初始化失败")?);

    // Ctrl-C 停止查询
    let stopper = app.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stopper.stop();
        }
    });

    let report = app.start(&args.cookie, &numbers_text).await?;

    if let Some(path) = &args.save {
        save_results(path, &report.results)
            .await
            .context("保存结果失败")?;
    }

    if let Some(path) = &args.export {
        export_table(path, &report.rows)
            .await
            .context("导出结果失败")?;
    }

    let table = render_tsv(&report.rows);
    if let Some(path) = &args.copy {
        if report.rows.is_empty() {
            warn!("⚠️ 没有可复制的结果");
        } else {
            tokio::fs::write(path, &table)
                .await
                .with_context(|| format!("写入文件失败: {}", path.display()))?;
            info!("✓ 全部结果已写入 {}", path.display());
        }
    }

    if args.print_table {
        print!("{}", table);
    }

    Ok(())
}
