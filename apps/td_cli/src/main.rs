// apps/td_cli/src/main.rs

//! TerraDrain 命令行界面
//!
//! 提供地形排水分析的命令行工具：排水路径追踪、积水体积求解
//! 与网格信息查看。

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// TerraDrain 地形排水分析命令行工具
#[derive(Parser)]
#[command(name = "td_cli")]
#[command(author = "TerraDrain Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "TerraDrain terrain drainage analysis", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 完整工况：追踪 + 积水求解
    Run(commands::run::RunArgs),
    /// 排水路径追踪
    Trace(commands::trace::TraceArgs),
    /// 积水体积求解
    Pools(commands::pools::PoolsArgs),
    /// 显示网格信息
    Info(commands::info::InfoArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // 执行命令
    match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Trace(args) => commands::trace::execute(args),
        Commands::Pools(args) => commands::pools::execute(args),
        Commands::Info(args) => commands::info::execute(args),
    }
}
