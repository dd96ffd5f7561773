//! # Event 模块
//!
//! 会话按时间顺序发出的事件，供宿主观察与测试使用。

use tokio::sync::mpsc;

/// 引导会话事件
#[derive(Debug, Clone, PartialEq)]
pub enum OnboardingEvent {
    /// 游标移动到该卡片
    Activated { index: usize },
    /// 开始上升
    RiseStarted { index: usize, snapping_point: f32 },
    /// 上升完成，开始停留
    Holding { index: usize },
    /// 下一张卡片已瞬间放到底部（展开高度、可见）
    NextStaged { index: usize },
    /// 开始折叠
    CollapseStarted {
        index: usize,
        top_offset: f32,
        target_height: f32,
    },
    /// 折叠完成，进入堆叠
    Stacked { index: usize },
    /// 轮播全部完成（只发出一次）
    Finished,
    /// CTA 开始入场
    CtaRevealStarted,
    /// CTA 入场动画全部完成
    CtaRevealed,
}

/// 事件发送端（可选）
///
/// 接收端被丢弃后发送静默失败，不影响会话推进。
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    tx: Option<mpsc::UnboundedSender<OnboardingEvent>>,
}

impl EventSink {
    pub fn new(tx: mpsc::UnboundedSender<OnboardingEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    /// 不发送任何事件
    pub fn disabled() -> Self {
        Self::default()
    }

    /// 创建事件通道
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<OnboardingEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    pub fn emit(&self, event: OnboardingEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }
}
