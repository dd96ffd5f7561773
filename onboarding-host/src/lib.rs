//! # Onboarding Host
//!
//! 引导页轮播的宿主层实现。
//!
//! ## 架构说明
//!
//! Host 层负责：
//! - 配置加载
//! - 引导数据获取（本地文件 / HTTP）
//! - 屏幕状态（加载中 / 成功 / 错误）
//! - 把会话快照交给渲染层
//!
//! Host 层不包含动画逻辑，时序与状态全部由 `onboarding-runtime` 负责。

pub mod app;
pub mod config;
pub mod fetcher;
pub mod renderer;
pub mod screen;

pub use app::{AppOutcome, run_app};
pub use config::{AppConfig, ConfigError, LayoutConfig, TimingConfig};
pub use fetcher::{DataFetcher, FetchError, FileFetcher, HttpFetcher, fetcher_for};
pub use renderer::{CarouselRenderer, TextRenderer, format_frame};
pub use screen::{MessageKey, OnboardingScreen, UiState};
