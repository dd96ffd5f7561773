//! # Onboarding Runtime
//!
//! 引导页轮播引擎的核心运行时库。
//!
//! ## 架构概述
//!
//! `onboarding-runtime` 是纯逻辑核心，不做任何 IO，也不依赖渲染引擎。
//! 宿主负责取数与绘制，核心只负责时序与动画状态：
//!
//! ```text
//! Host                                   Runtime
//!   │                                       │
//!   │── OnboardingContent + SessionConfig ─►│ OnboardingSession::run()
//!   │                                       │
//!   │◄── OnboardingSnapshot（每帧）──────────│
//!   │◄── OnboardingEvent ───────────────────│
//!   │                                       │
//!   │── SessionHandle::cancel() ───────────►│ 所有动画立即停止
//! ```
//!
//! ## 核心类型
//!
//! - [`AnimatedValue`]：可重定向的标量动画值
//! - [`CardVisualState`]：单张卡片的位置、高度、透明度
//! - [`CarouselController`]：驱动卡片依次 上升 → 停留 → 折叠
//! - [`CtaRevealController`]：轮播完成后 CTA 的滑入与淡入
//! - [`OnboardingSession`] / [`SessionHandle`]：会话装配与宿主侧句柄
//!
//! ## 使用示例
//!
//! ```ignore
//! let content = OnboardingResponse::from_json(&text)?.into_content()?;
//! let (session, mut handle) =
//!     OnboardingSession::new(content, SessionConfig::default(), CancellationToken::new());
//!
//! let mut frames = handle.subscribe();
//! let run = session.run();
//! tokio::pin!(run);
//! loop {
//!     tokio::select! {
//!         result = &mut run => break result?,
//!         Ok(()) = frames.changed() => renderer.render(&frames.borrow_and_update()),
//!     }
//! }
//! ```
//!
//! 会话在调用方所在的单个任务内并发推进所有动画，状态用 `Rc` / `Cell` 共享，
//! 不要求 `Send`，也不要求 `LocalSet`。
//!
//! ## 模块结构
//!
//! - [`animation`]：帧时钟、缓动函数、动画值
//! - [`card`]：卡片视觉状态
//! - [`carousel`]：轮播控制器
//! - [`cta`]：CTA 入场控制器
//! - [`session`]：会话与快照
//! - [`model`]：远端数据与描述符
//! - [`layout`]：布局度量与时序
//! - [`backdrop`]：背景渐变派生
//! - [`color`]：颜色解析
//! - [`event`]：会话事件
//! - [`error`]：错误类型定义

pub mod animation;
pub mod backdrop;
pub mod card;
pub mod carousel;
pub mod color;
pub mod cta;
pub mod error;
pub mod event;
pub mod layout;
pub mod model;
pub mod session;

// 重导出核心类型
pub use animation::{
    AnimatedValue, AnimationOutcome, AnimationSpec, DEFAULT_FRAME_INTERVAL, EasingFunction,
    FrameClock, frame_interval_for,
};
pub use backdrop::{BACKDROP_ALPHA, Backdrop, VerticalGradient, stroke_gradient};
pub use card::{CardPhase, CardSnapshot, CardVisualState};
pub use carousel::{CarouselController, StepOutcome};
pub use color::Color;
pub use cta::{CtaRevealController, CtaSnapshot};
pub use error::{ContentError, SessionError, SessionResult};
pub use event::{EventSink, OnboardingEvent};
pub use layout::{CarouselTimings, CtaTimings, LayoutMetrics};
pub use model::{
    CardDescriptor, CtaDescriptor, OnboardingContent, OnboardingResponse, RemoteIntervals,
};
pub use session::{OnboardingSession, OnboardingSnapshot, SessionConfig, SessionHandle};

pub use tokio_util::sync::CancellationToken;
