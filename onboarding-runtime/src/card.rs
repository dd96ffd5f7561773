//! # Card 模块
//!
//! 单张卡片的可视状态：纵向偏移、高度、透明度三个可动画值，外加当前阶段。

use std::cell::Cell;
use std::rc::Rc;

use crate::animation::{AnimatedValue, FrameClock};
use crate::backdrop::{VerticalGradient, stroke_gradient};
use crate::layout::LayoutMetrics;
use crate::model::CardDescriptor;

/// 卡片阶段（按时间顺序）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardPhase {
    /// 屏幕外，等待激活
    #[default]
    Hidden,
    /// 底部 → 中央 上升并展开
    RisingToCenter,
    /// 展开停留
    ExpandedHolding,
    /// 中央 → 堆叠 折叠
    CollapsingToStack,
    /// 已折叠并进入堆叠（终态）
    StackedCollapsed,
}

/// 单帧卡片快照（只读）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardSnapshot {
    pub index: usize,
    pub phase: CardPhase,
    pub y_offset: f32,
    pub height: f32,
    pub opacity: f32,
    /// 当前高度是否足以显示展开内容
    pub shows_expanded_content: bool,
    /// 描边渐变，覆盖卡片当前高度
    pub stroke: VerticalGradient,
}

/// 卡片可视状态
///
/// 克隆得到的是同一张卡片的句柄，用于把折叠动画交给折叠驱动。
/// 动画值只在 crate 内可写，外部只能读取当前值。
#[derive(Debug, Clone)]
pub struct CardVisualState {
    index: usize,
    pub(crate) y_offset: AnimatedValue,
    pub(crate) height: AnimatedValue,
    pub(crate) opacity: AnimatedValue,
    phase: Rc<Cell<CardPhase>>,
}

impl CardVisualState {
    /// 创建初始状态：位于屏幕底部、展开高度；只有第一张卡片可见
    pub fn new(index: usize, layout: &LayoutMetrics, clock: &FrameClock) -> Self {
        let opacity = if index == 0 { 1.0 } else { 0.0 };
        Self {
            index,
            y_offset: AnimatedValue::new(layout.bottom_offset(), clock.clone()),
            height: AnimatedValue::new(layout.expanded_height(), clock.clone()),
            opacity: AnimatedValue::new(opacity, clock.clone()),
            phase: Rc::new(Cell::new(CardPhase::Hidden)),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn phase(&self) -> CardPhase {
        self.phase.get()
    }

    pub fn y_offset(&self) -> f32 {
        self.y_offset.current()
    }

    pub fn height(&self) -> f32 {
        self.height.current()
    }

    pub fn opacity(&self) -> f32 {
        self.opacity.current()
    }

    /// 任一属性是否仍在动画中
    pub fn is_animating(&self) -> bool {
        self.y_offset.is_animating() || self.height.is_animating() || self.opacity.is_animating()
    }

    pub(crate) fn set_phase(&self, phase: CardPhase) {
        tracing::debug!(index = self.index, ?phase, "卡片阶段变化");
        self.phase.set(phase);
    }

    /// 瞬间放到屏幕底部、展开高度、完全可见，准备上升
    pub(crate) fn stage_at_bottom(&self, layout: &LayoutMetrics) {
        self.y_offset.snap_to(layout.bottom_offset());
        self.height.snap_to(layout.expanded_height());
        self.opacity.snap_to(1.0);
    }

    pub fn snapshot(&self, layout: &LayoutMetrics, descriptor: &CardDescriptor) -> CardSnapshot {
        let height = self.height();
        CardSnapshot {
            index: self.index,
            phase: self.phase(),
            y_offset: self.y_offset(),
            height,
            opacity: self.opacity(),
            shows_expanded_content: height > layout.expanded_content_threshold,
            stroke: stroke_gradient(descriptor, height),
        }
    }
}
