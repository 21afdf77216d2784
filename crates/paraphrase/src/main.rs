//! paraphrase 命令行入口

use clap::Parser;
use paraphrase::cli::{Cli, CommandRunner, RunSettings};
use paraphrase_shared::config::AppConfig;
use paraphrase_shared::observability;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load("paraphrase")?;
    if let Some(level) = &cli.log_level {
        config.observability.log_level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.observability.log_format = format;
    }

    // 优先使用环境变量 RUST_LOG，否则使用配置或命令行指定的级别
    observability::init(&config.observability)?;
    info!(
        service = %config.service_name,
        environment = %config.environment,
        version = env!("CARGO_PKG_VERSION"),
        "启动"
    );

    let settings = RunSettings::resolve(cli, &config);
    CommandRunner::new(settings).run()
}
