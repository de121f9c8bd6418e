use anyhow::Result;
use clap::Parser;
use question_paper::cli::Cli;
use question_paper::{logger, App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置：文件 → 环境变量 → 命令行
    let config = match &cli.config {
        Some(path) => Config::from_toml_file(path).await?,
        None => Config::from_env(),
    };
    let config = cli.apply_overrides(config);

    // 初始化日志
    logger::init_with_verbose(config.verbose_logging);

    // 初始化并运行应用
    App::initialize(config)?.run(&cli.command).await?;

    Ok(())
}
