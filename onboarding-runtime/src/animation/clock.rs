//! # Clock 模块
//!
//! 会话共享的帧时钟。
//!
//! 所有帧边界都对齐到同一个起点 `epoch`，因此同时运行的多个动画总在
//! 同一时刻提交帧。时钟同时持有会话级取消令牌：取消后 `next_frame` 与
//! `delay` 立即返回 [`SessionError::Cancelled`]，调用方不会再提交任何帧。

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{SessionError, SessionResult};

/// 默认帧间隔（60 Hz）
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_nanos(16_666_667);

/// 帧率（Hz）换算为帧间隔
///
/// 非正、NaN 或倒数无法表示为时长的帧率退回 [`DEFAULT_FRAME_INTERVAL`]。
pub fn frame_interval_for(frame_rate: f32) -> Duration {
    Duration::try_from_secs_f32(1.0 / frame_rate)
        .ok()
        .filter(|interval| !interval.is_zero())
        .unwrap_or(DEFAULT_FRAME_INTERVAL)
}

/// 共享帧时钟
#[derive(Debug, Clone)]
pub struct FrameClock {
    epoch: Instant,
    frame_interval: Duration,
    token: CancellationToken,
}

impl FrameClock {
    /// 以当前时刻为起点创建时钟
    pub fn new(frame_interval: Duration, token: CancellationToken) -> Self {
        Self {
            epoch: Instant::now(),
            frame_interval: frame_interval.max(Duration::from_millis(1)),
            token,
        }
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// 会话取消令牌
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// 下一个帧边界（严格晚于 `now`）
    fn next_boundary(&self, now: Instant) -> Instant {
        let elapsed = now.saturating_duration_since(self.epoch).as_nanos();
        let interval = self.frame_interval.as_nanos();
        let frames = elapsed / interval + 1;
        let offset = u64::try_from(frames * interval).unwrap_or(u64::MAX);
        self.epoch + Duration::from_nanos(offset)
    }

    /// 等待下一帧，返回该帧的时间戳
    pub async fn next_frame(&self) -> SessionResult<Instant> {
        let boundary = self.next_boundary(Instant::now());
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(SessionError::Cancelled),
            _ = tokio::time::sleep_until(boundary) => Ok(boundary),
        }
    }

    /// 可取消的延迟
    pub async fn delay(&self, duration: Duration) -> SessionResult<()> {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(SessionError::Cancelled),
            _ = tokio::time::sleep(duration) => Ok(()),
        }
    }
}
