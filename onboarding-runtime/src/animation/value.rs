//! # AnimatedValue 模块
//!
//! 单个可插值的 f32 值。
//!
//! - `snap_to`：立即设置当前值，取消正在进行的动画
//! - `animate_to`：从**当前实时值**出发，在给定时长内按缓动曲线过渡到目标值，
//!   挂起调用方直到最后一帧提交
//!
//! 每次新指令都会递增 `generation`，旧的动画循环在下一帧发现代数不一致后
//! 立即退出（不会先跳到旧目标）。

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use super::{EasingFunction, FrameClock};
use crate::error::{SessionError, SessionResult};

/// 动画规格（时长 + 缓动）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSpec {
    pub duration: Duration,
    pub easing: EasingFunction,
}

impl AnimationSpec {
    pub fn tween(duration: Duration, easing: EasingFunction) -> Self {
        Self { duration, easing }
    }
}

/// `animate_to` 的结束方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationOutcome {
    /// 最后一帧已提交，`current == target`
    Completed,
    /// 被新的 `snap_to` / `animate_to` 取代
    Superseded,
}

#[derive(Debug)]
struct ValueCell {
    current: Cell<f32>,
    target: Cell<f32>,
    generation: Cell<u64>,
    running: Cell<Option<AnimationSpec>>,
}

/// 可动画值
///
/// 克隆得到的是同一个值的句柄。
#[derive(Debug, Clone)]
pub struct AnimatedValue {
    cell: Rc<ValueCell>,
    clock: FrameClock,
}

impl AnimatedValue {
    pub fn new(initial: f32, clock: FrameClock) -> Self {
        Self {
            cell: Rc::new(ValueCell {
                current: Cell::new(initial),
                target: Cell::new(initial),
                generation: Cell::new(0),
                running: Cell::new(None),
            }),
            clock,
        }
    }

    /// 当前值
    pub fn current(&self) -> f32 {
        self.cell.current.get()
    }

    /// 最近一次指令的目标值
    pub fn target(&self) -> f32 {
        self.cell.target.get()
    }

    /// 是否有动画正在进行
    pub fn is_animating(&self) -> bool {
        self.cell.running.get().is_some()
    }

    fn begin(&self, target: f32, spec: Option<AnimationSpec>) -> u64 {
        let generation = self.cell.generation.get() + 1;
        self.cell.generation.set(generation);
        self.cell.target.set(target);
        self.cell.running.set(spec);
        generation
    }

    fn is_current(&self, generation: u64) -> bool {
        self.cell.generation.get() == generation
    }

    /// 立即设置值，取消正在进行的动画
    ///
    /// 会话已取消时不再写入。
    pub fn snap_to(&self, value: f32) {
        if self.clock.is_cancelled() {
            return;
        }
        self.begin(value, None);
        self.cell.current.set(value);
    }

    /// 过渡到目标值
    ///
    /// # 返回
    /// - `Ok(Completed)`: 最后一帧已提交，`current() == target`
    /// - `Ok(Superseded)`: 中途被新指令取代
    /// - `Err(Cancelled)`: 会话被取消，不再提交任何帧
    pub async fn animate_to(
        &self,
        target: f32,
        spec: AnimationSpec,
    ) -> SessionResult<AnimationOutcome> {
        if self.clock.is_cancelled() {
            return Err(SessionError::Cancelled);
        }

        let generation = self.begin(target, Some(spec));
        let from = self.current();

        if spec.duration.is_zero() || from == target {
            self.cell.current.set(target);
            self.cell.running.set(None);
            return Ok(AnimationOutcome::Completed);
        }

        let start = tokio::time::Instant::now();
        loop {
            let frame = match self.clock.next_frame().await {
                Ok(frame) => frame,
                Err(e) => {
                    // 取消后不再提交帧，但也不能留下进行中的标记
                    if self.is_current(generation) {
                        self.cell.running.set(None);
                    }
                    return Err(e);
                }
            };
            if !self.is_current(generation) {
                return Ok(AnimationOutcome::Superseded);
            }

            let raw = frame.saturating_duration_since(start).as_secs_f32()
                / spec.duration.as_secs_f32();
            if raw >= 1.0 {
                self.cell.current.set(target);
                self.cell.running.set(None);
                tracing::trace!(value = target, "动画完成");
                return Ok(AnimationOutcome::Completed);
            }

            let progress = spec.easing.apply(raw);
            self.cell.current.set(from + (target - from) * progress);
        }
    }
}
