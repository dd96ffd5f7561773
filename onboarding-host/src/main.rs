//! Onboarding Host - 无界面运行入口
//!
//! 取数一次，用文本渲染器运行引导会话。Ctrl-C 通过取消令牌拆除会话。

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use onboarding_host::{AppConfig, AppOutcome, TextRenderer, fetcher_for, run_app};
use onboarding_runtime::CancellationToken;
use tokio::task::LocalSet;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "onboarding-host")]
#[command(about = "引导页轮播 - 无界面运行")]
#[command(version)]
struct Cli {
    /// 配置文件路径
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// 数据来源（文件路径或 URL），覆盖配置文件
    #[arg(long)]
    source: Option<String>,

    /// 日志级别，覆盖配置文件
    #[arg(long)]
    log_level: Option<String>,

    /// 帧率（Hz），覆盖配置文件
    #[arg(long)]
    frame_rate: Option<f32>,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.config)
        .with_context(|| format!("加载配置失败: {}", cli.config.display()))?;
    if let Some(source) = cli.source {
        config.source = source;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(frame_rate) = cli.frame_rate {
        config.timing.frame_rate = frame_rate;
    }
    config.validate()?;

    let level = config
        .log_level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    info!(config = %cli.config.display(), source = %config.source, "配置加载完成");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let local = LocalSet::new();

    let outcome = local.block_on(&runtime, async {
        let token = CancellationToken::new();
        let ctrl_c = token.clone();
        tokio::task::spawn_local(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("收到 Ctrl-C，取消会话");
                ctrl_c.cancel();
            }
        });

        let fetcher = fetcher_for(&config).context("创建数据来源失败")?;
        let mut renderer = TextRenderer::new(std::io::stdout().lock());
        run_app(&config, fetcher.as_ref(), &mut renderer, token).await
    })?;

    info!(?outcome, "运行结束");
    Ok(match outcome {
        AppOutcome::Completed => ExitCode::SUCCESS,
        AppOutcome::Cancelled => ExitCode::from(130),
        AppOutcome::Failed(_) => ExitCode::FAILURE,
    })
}
