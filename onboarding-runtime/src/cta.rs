//! # CTA 模块
//!
//! 轮播完成后出现的行动按钮入场动画：
//! - `slide_offset`: 初始下移距离 → 0（FastOutSlowIn）
//! - `opacity`: 0 → 1（Linear）
//!
//! 两个动画同时启动、各自独立结束。完成信号到来之前按钮既不可见也不可交互，
//! 快照中不会出现。

use std::cell::Cell;

use tokio::sync::watch;
use tracing::info;

use crate::animation::{AnimatedValue, AnimationSpec, EasingFunction, FrameClock};
use crate::color::Color;
use crate::error::{SessionError, SessionResult};
use crate::event::{EventSink, OnboardingEvent};
use crate::layout::CtaTimings;
use crate::model::CtaDescriptor;

/// CTA 单帧快照（仅在可见后存在）
#[derive(Debug, Clone, PartialEq)]
pub struct CtaSnapshot {
    pub slide_offset: f32,
    pub opacity: f32,
    pub text: String,
    pub deeplink: Option<String>,
    pub icon: Option<String>,
    /// 循环播放的装饰动画资源
    pub looping_animation: String,
    pub background: Color,
    pub text_color: Color,
    pub stroke: Color,
}

/// CTA 入场控制器
pub struct CtaRevealController {
    descriptor: CtaDescriptor,
    timings: CtaTimings,
    clock: FrameClock,
    slide_offset: AnimatedValue,
    opacity: AnimatedValue,
    visible: Cell<bool>,
    events: EventSink,
}

impl CtaRevealController {
    pub fn new(
        descriptor: CtaDescriptor,
        timings: CtaTimings,
        clock: FrameClock,
        events: EventSink,
    ) -> Self {
        Self {
            descriptor,
            timings,
            slide_offset: AnimatedValue::new(timings.slide_distance, clock.clone()),
            opacity: AnimatedValue::new(0.0, clock.clone()),
            clock,
            visible: Cell::new(false),
            events,
        }
    }

    pub fn descriptor(&self) -> &CtaDescriptor {
        &self.descriptor
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    pub fn slide_offset(&self) -> f32 {
        self.slide_offset.current()
    }

    pub fn opacity(&self) -> f32 {
        self.opacity.current()
    }

    /// 等待完成信号后入场
    pub async fn run_after(&self, mut finished: watch::Receiver<bool>) -> SessionResult<()> {
        tokio::select! {
            biased;
            _ = self.clock.token().cancelled() => return Err(SessionError::Cancelled),
            signal = finished.wait_for(|done| *done) => {
                if signal.is_err() {
                    // 发送端在完成前被丢弃，只可能是会话已被拆除
                    return Err(SessionError::Cancelled);
                }
            }
        }
        self.reveal().await
    }

    /// 立即入场（重复调用无效果）
    pub async fn reveal(&self) -> SessionResult<()> {
        if self.visible.replace(true) {
            return Ok(());
        }
        info!(text = %self.descriptor.text, "CTA 入场");
        self.events.emit(OnboardingEvent::CtaRevealStarted);

        let slide = AnimationSpec::tween(self.timings.slide, EasingFunction::FastOutSlowIn);
        let fade = AnimationSpec::tween(self.timings.fade, EasingFunction::Linear);
        let (slide, fade) = tokio::join!(
            self.slide_offset.animate_to(0.0, slide),
            self.opacity.animate_to(1.0, fade),
        );
        slide?;
        fade?;

        self.events.emit(OnboardingEvent::CtaRevealed);
        Ok(())
    }

    pub fn snapshot(&self) -> Option<CtaSnapshot> {
        if !self.is_visible() {
            return None;
        }
        Some(CtaSnapshot {
            slide_offset: self.slide_offset(),
            opacity: self.opacity(),
            text: self.descriptor.text.clone(),
            deeplink: self.descriptor.deeplink.clone(),
            icon: self.descriptor.icon.clone(),
            looping_animation: self.descriptor.looping_animation.clone(),
            background: self.descriptor.background,
            text_color: self.descriptor.text_color,
            stroke: self.descriptor.stroke,
        })
    }
}

impl std::fmt::Debug for CtaRevealController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CtaRevealController")
            .field("visible", &self.is_visible())
            .field("slide_offset", &self.slide_offset())
            .field("opacity", &self.opacity())
            .finish()
    }
}
