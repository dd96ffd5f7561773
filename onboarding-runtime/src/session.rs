//! # Session 模块
//!
//! 一次引导会话的装配：轮播 → CTA → 快照发布。
//!
//! ```text
//! OnboardingSession::run()
//!   ├─ CarouselController::run()          卡片序列，结束时发出完成信号
//!   ├─ CtaRevealController::run_after()   等待完成信号后入场
//!   └─ 发布循环                            每帧把只读快照写入 watch 通道
//! ```
//!
//! 渲染层只持有 [`SessionHandle`]：读取快照、订阅帧、接收事件、取消会话，
//! 没有任何修改状态的接口。

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::animation::{DEFAULT_FRAME_INTERVAL, FrameClock};
use crate::backdrop::Backdrop;
use crate::card::CardSnapshot;
use crate::carousel::CarouselController;
use crate::cta::{CtaRevealController, CtaSnapshot};
use crate::error::{SessionError, SessionResult};
use crate::event::{EventSink, OnboardingEvent};
use crate::layout::{CarouselTimings, CtaTimings, LayoutMetrics};
use crate::model::OnboardingContent;

/// 会话配置
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub layout: LayoutMetrics,
    pub carousel: CarouselTimings,
    pub cta: CtaTimings,
    pub frame_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            layout: LayoutMetrics::default(),
            carousel: CarouselTimings::default(),
            cta: CtaTimings::default(),
            frame_interval: DEFAULT_FRAME_INTERVAL,
        }
    }
}

/// 单帧只读快照
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OnboardingSnapshot {
    pub cards: Vec<CardSnapshot>,
    pub active_index: Option<usize>,
    pub backdrop: Option<Backdrop>,
    pub carousel_finished: bool,
    /// CTA 可见后才存在
    pub cta: Option<CtaSnapshot>,
}

impl OnboardingSnapshot {
    pub fn cta_visible(&self) -> bool {
        self.cta.is_some()
    }
}

/// 引导会话
pub struct OnboardingSession {
    carousel: CarouselController,
    cta: CtaRevealController,
    clock: FrameClock,
    snapshots: watch::Sender<OnboardingSnapshot>,
}

/// 宿主 / 渲染层持有的会话句柄
#[derive(Debug)]
pub struct SessionHandle {
    snapshots: watch::Receiver<OnboardingSnapshot>,
    events: mpsc::UnboundedReceiver<OnboardingEvent>,
    token: CancellationToken,
}

impl OnboardingSession {
    /// 创建会话
    ///
    /// `token` 是会话级取消令牌，宿主销毁视图时取消它。
    pub fn new(
        content: OnboardingContent,
        config: SessionConfig,
        token: CancellationToken,
    ) -> (Self, SessionHandle) {
        let clock = FrameClock::new(config.frame_interval, token.clone());
        let (events, events_rx) = EventSink::channel();

        let carousel = CarouselController::new(
            content.cards,
            config.layout,
            config.carousel,
            clock.clone(),
            events.clone(),
        );
        let cta = CtaRevealController::new(content.cta, config.cta, clock.clone(), events);

        let (snapshots, snapshots_rx) = watch::channel(OnboardingSnapshot::default());
        let session = Self {
            carousel,
            cta,
            clock,
            snapshots,
        };
        session.publish();

        let handle = SessionHandle {
            snapshots: snapshots_rx,
            events: events_rx,
            token,
        };
        (session, handle)
    }

    pub fn carousel(&self) -> &CarouselController {
        &self.carousel
    }

    pub fn cta(&self) -> &CtaRevealController {
        &self.cta
    }

    /// 当前状态的快照
    pub fn snapshot(&self) -> OnboardingSnapshot {
        OnboardingSnapshot {
            cards: self.carousel.snapshot(),
            active_index: self.carousel.active_index(),
            backdrop: self.carousel.backdrop(),
            carousel_finished: self.carousel.is_finished(),
            cta: self.cta.snapshot(),
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.snapshot());
    }

    /// 运行会话直到 CTA 入场完成
    pub async fn run(&self) -> SessionResult<()> {
        let work = async {
            let (carousel, cta) = tokio::join!(
                self.carousel.run(),
                self.cta.run_after(self.carousel.finished_signal()),
            );
            carousel.and(cta)
        };
        let publisher = async {
            while self.clock.next_frame().await.is_ok() {
                self.publish();
            }
        };

        let result = tokio::select! {
            result = work => result,
            _ = publisher => Err(SessionError::Cancelled),
        };

        match result {
            Ok(()) => {
                self.publish();
                info!("引导会话完成");
            }
            Err(SessionError::Cancelled) => info!("引导会话已取消"),
        }
        result
    }
}

impl std::fmt::Debug for OnboardingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnboardingSession")
            .field("carousel", &self.carousel)
            .field("cta", &self.cta)
            .finish()
    }
}

impl SessionHandle {
    /// 最近发布的快照
    pub fn snapshot(&self) -> OnboardingSnapshot {
        self.snapshots.borrow().clone()
    }

    /// 订阅快照（每帧更新）
    pub fn subscribe(&self) -> watch::Receiver<OnboardingSnapshot> {
        self.snapshots.clone()
    }

    /// 下一个事件；会话结束且事件取尽后返回 `None`
    pub async fn next_event(&mut self) -> Option<OnboardingEvent> {
        self.events.recv().await
    }

    /// 非阻塞地取出已到达的事件
    pub fn drain_events(&mut self) -> Vec<OnboardingEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }

    /// 取消会话：所有进行中的动画和延迟立即停止，不再提交任何帧
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}
