//! # Screen 模块
//!
//! 屏幕级状态：`Loading → Success(content) | Error(message)`。
//! 取数只进行一次，结果通过 watch 通道发布给界面。

use onboarding_runtime::OnboardingContent;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::fetcher::DataFetcher;

/// 用户可见消息的引用，由宿主解析为文本
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKey {
    ApiError,
}

impl MessageKey {
    pub fn text(self) -> &'static str {
        match self {
            MessageKey::ApiError => "Something went wrong, please try again later",
        }
    }
}

/// 屏幕状态
#[derive(Debug, Clone, PartialEq)]
pub enum UiState {
    Loading,
    Success(OnboardingContent),
    Error(MessageKey),
}

impl UiState {
    pub fn is_loading(&self) -> bool {
        matches!(self, UiState::Loading)
    }
}

/// 引导屏幕
#[derive(Debug)]
pub struct OnboardingScreen {
    state: watch::Sender<UiState>,
}

impl Default for OnboardingScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl OnboardingScreen {
    pub fn new() -> Self {
        let (state, _) = watch::channel(UiState::Loading);
        Self { state }
    }

    /// 当前状态
    pub fn state(&self) -> UiState {
        self.state.borrow().clone()
    }

    /// 订阅状态变化
    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.state.subscribe()
    }

    /// 取数并转换为内容，任何失败都进入错误状态
    pub async fn load(&self, fetcher: &dyn DataFetcher) -> UiState {
        self.state.send_replace(UiState::Loading);

        let result = match fetcher.fetch().await {
            Ok(response) => response.into_content().map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        let next = match result {
            Ok(content) => {
                info!(cards = content.cards.len(), "引导数据加载成功");
                UiState::Success(content)
            }
            Err(error) => {
                warn!(error = %error, "引导数据加载失败");
                UiState::Error(MessageKey::ApiError)
            }
        };
        self.state.send_replace(next.clone());
        next
    }
}
