//! # Animation 模块
//!
//! 基于共享帧时钟的挂起式动画原语。
//!
//! ## 核心设计理念
//!
//! 动画只负责 **时间轴管理**：
//! - 知道某个值从 A 到 B 需要在 duration 内变化
//! - 每帧提交一次当前值，渲染层只读
//! - 同一个值同一时刻只有一个动画在进行，新指令取代旧指令
//!
//! ## 核心概念
//!
//! - `FrameClock`: 会话共享的帧时钟（携带取消令牌）
//! - `AnimatedValue`: 单个可动画的 f32 值
//! - `AnimationSpec`: 时长 + 缓动
//! - `EasingFunction`: 缓动函数
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! let clock = FrameClock::new(DEFAULT_FRAME_INTERVAL, token);
//! let alpha = AnimatedValue::new(0.0, clock.clone());
//!
//! alpha
//!     .animate_to(1.0, AnimationSpec::tween(Duration::from_millis(600), EasingFunction::Linear))
//!     .await?;
//! assert_eq!(alpha.current(), 1.0);
//! ```

mod clock;
mod easing;
mod value;

pub use clock::{DEFAULT_FRAME_INTERVAL, FrameClock, frame_interval_for};
pub use easing::EasingFunction;
pub use value::{AnimatedValue, AnimationOutcome, AnimationSpec};
