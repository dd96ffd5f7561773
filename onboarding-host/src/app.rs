//! # App 模块
//!
//! 宿主主流程：取数 → 屏幕状态 → 会话 → 渲染。

use onboarding_runtime::{CancellationToken, OnboardingSession, SessionError};
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::fetcher::DataFetcher;
use crate::renderer::CarouselRenderer;
use crate::screen::{MessageKey, OnboardingScreen, UiState};

/// 一次运行的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppOutcome {
    /// 轮播与 CTA 入场全部完成
    Completed,
    /// 宿主取消了会话
    Cancelled,
    /// 取数失败，屏幕处于错误状态
    Failed(MessageKey),
}

/// 运行一次引导流程
pub async fn run_app(
    config: &AppConfig,
    fetcher: &dyn DataFetcher,
    renderer: &mut dyn CarouselRenderer,
    token: CancellationToken,
) -> anyhow::Result<AppOutcome> {
    let screen = OnboardingScreen::new();

    let content = match screen.load(fetcher).await {
        UiState::Success(content) => content,
        UiState::Error(message) => {
            renderer.error(message)?;
            return Ok(AppOutcome::Failed(message));
        }
        UiState::Loading => anyhow::bail!("引导数据未能完成加载"),
    };

    renderer.header(&content)?;

    let session_config = config.session_config(&content.intervals);
    info!(
        cards = content.cards.len(),
        rise_ms = session_config.carousel.rise.as_millis() as u64,
        hold_ms = session_config.carousel.hold.as_millis() as u64,
        "启动引导会话"
    );
    let (session, mut handle) = OnboardingSession::new(content, session_config, token);
    let mut frames = handle.subscribe();
    renderer.render(&frames.borrow_and_update())?;

    let run = session.run();
    tokio::pin!(run);
    let result = loop {
        tokio::select! {
            result = &mut run => break result,
            Ok(()) = frames.changed() => {
                let snapshot = frames.borrow_and_update().clone();
                renderer.render(&snapshot)?;
            }
            Some(event) = handle.next_event() => {
                debug!(?event, "会话事件");
            }
        }
    };

    renderer.render(&handle.snapshot())?;
    for event in handle.drain_events() {
        debug!(?event, "会话事件");
    }

    Ok(match result {
        Ok(()) => AppOutcome::Completed,
        Err(SessionError::Cancelled) => AppOutcome::Cancelled,
    })
}
