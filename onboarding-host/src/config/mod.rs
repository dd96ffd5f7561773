//! # Config 模块
//!
//! 宿主配置管理，集中管理所有配置项。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (config.json)
//! 3. 默认值（最低）

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use onboarding_runtime::{
    CarouselTimings, CtaTimings, LayoutMetrics, RemoteIntervals, SessionConfig,
    frame_interval_for,
};
use thiserror::Error;

/// 应用配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// 引导数据来源：本地文件路径或 `http(s)://` URL
    #[serde(default = "default_source")]
    pub source: String,

    /// 布局配置
    #[serde(default)]
    pub layout: LayoutConfig,

    /// 时序配置
    #[serde(default)]
    pub timing: TimingConfig,

    /// 日志级别（trace / debug / info / warn / error）
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// 布局配置（dp）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_viewport_height_dp")]
    pub viewport_height_dp: f32,

    /// 像素密度（px / dp）
    #[serde(default = "default_density")]
    pub density: f32,

    #[serde(default = "default_collapsed_height_dp")]
    pub collapsed_height_dp: f32,

    #[serde(default = "default_card_gap_dp")]
    pub card_gap_dp: f32,

    #[serde(default = "default_top_margin_dp")]
    pub top_margin_dp: f32,

    #[serde(default = "default_side_margin_dp")]
    pub side_margin_dp: f32,

    /// 卡片高度超过该值时显示展开内容
    #[serde(default = "default_expanded_content_threshold_dp")]
    pub expanded_content_threshold_dp: f32,
}

/// 时序配置（毫秒）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_rise_ms")]
    pub rise_ms: u64,

    #[serde(default = "default_hold_ms")]
    pub hold_ms: u64,

    #[serde(default = "default_collapse_ms")]
    pub collapse_ms: u64,

    #[serde(default = "default_advance_delay_ms")]
    pub advance_delay_ms: u64,

    #[serde(default = "default_cta_slide_ms")]
    pub cta_slide_ms: u64,

    #[serde(default = "default_cta_fade_ms")]
    pub cta_fade_ms: u64,

    #[serde(default = "default_cta_slide_distance_dp")]
    pub cta_slide_distance_dp: f32,

    /// 帧率（Hz）
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f32,

    /// 是否使用远端下发的上升 / 停留间隔
    #[serde(default)]
    pub use_remote_intervals: bool,
}

// 默认值函数
fn default_source() -> String {
    "assets/onboarding.json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_viewport_height_dp() -> f32 {
    800.0
}

fn default_density() -> f32 {
    1.0
}

fn default_collapsed_height_dp() -> f32 {
    60.0
}

fn default_card_gap_dp() -> f32 {
    16.0
}

fn default_top_margin_dp() -> f32 {
    70.0
}

fn default_side_margin_dp() -> f32 {
    16.0
}

fn default_expanded_content_threshold_dp() -> f32 {
    100.0
}

fn default_rise_ms() -> u64 {
    800
}

fn default_hold_ms() -> u64 {
    1000
}

fn default_collapse_ms() -> u64 {
    600
}

fn default_advance_delay_ms() -> u64 {
    600
}

fn default_cta_slide_ms() -> u64 {
    800
}

fn default_cta_fade_ms() -> u64 {
    600
}

fn default_cta_slide_distance_dp() -> f32 {
    200.0
}

fn default_frame_rate() -> f32 {
    60.0
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            layout: LayoutConfig::default(),
            timing: TimingConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            viewport_height_dp: default_viewport_height_dp(),
            density: default_density(),
            collapsed_height_dp: default_collapsed_height_dp(),
            card_gap_dp: default_card_gap_dp(),
            top_margin_dp: default_top_margin_dp(),
            side_margin_dp: default_side_margin_dp(),
            expanded_content_threshold_dp: default_expanded_content_threshold_dp(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            rise_ms: default_rise_ms(),
            hold_ms: default_hold_ms(),
            collapse_ms: default_collapse_ms(),
            advance_delay_ms: default_advance_delay_ms(),
            cta_slide_ms: default_cta_slide_ms(),
            cta_fade_ms: default_cta_fade_ms(),
            cta_slide_distance_dp: default_cta_slide_distance_dp(),
            frame_rate: default_frame_rate(),
            use_remote_intervals: false,
        }
    }
}

impl AppConfig {
    /// 加载配置文件
    ///
    /// 文件不存在时返回默认配置；读取或解析失败返回错误。
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| ConfigError::SerializationFailed(e.to_string()))
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        fs::write(path, json).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "必须配置 source（数据来源）".to_string(),
            ));
        }

        let layout = &self.layout;
        if !is_positive(layout.viewport_height_dp) {
            return Err(ConfigError::ValidationFailed(
                "视口高度必须大于 0".to_string(),
            ));
        }
        if !is_positive(layout.density) {
            return Err(ConfigError::ValidationFailed(
                "像素密度必须大于 0".to_string(),
            ));
        }
        if layout.collapsed_height_dp < 0.0 || layout.card_gap_dp < 0.0 {
            return Err(ConfigError::ValidationFailed(
                "折叠高度和卡片间距不能为负".to_string(),
            ));
        }

        let frame_rate = self.timing.frame_rate;
        if !is_positive(frame_rate) || !(1.0 / frame_rate).is_finite() {
            return Err(ConfigError::ValidationFailed(
                "帧率必须大于 0".to_string(),
            ));
        }
        if self.timing.cta_slide_distance_dp < 0.0 {
            return Err(ConfigError::ValidationFailed(
                "CTA 滑入距离不能为负".to_string(),
            ));
        }

        if tracing::Level::from_str(&self.log_level).is_err() {
            return Err(ConfigError::ValidationFailed(format!(
                "无效的日志级别: {}",
                self.log_level
            )));
        }

        Ok(())
    }

    /// 数据来源是否为远端 URL
    pub fn is_remote_source(&self) -> bool {
        self.source.starts_with("http://") || self.source.starts_with("https://")
    }

    pub fn layout_metrics(&self) -> LayoutMetrics {
        let layout = &self.layout;
        LayoutMetrics::from_dp(
            layout.viewport_height_dp,
            layout.density,
            layout.collapsed_height_dp,
            layout.card_gap_dp,
            layout.top_margin_dp,
            layout.side_margin_dp,
            layout.expanded_content_threshold_dp,
        )
    }

    pub fn carousel_timings(&self) -> CarouselTimings {
        CarouselTimings {
            rise: Duration::from_millis(self.timing.rise_ms),
            hold: Duration::from_millis(self.timing.hold_ms),
            collapse: Duration::from_millis(self.timing.collapse_ms),
            advance_delay: Duration::from_millis(self.timing.advance_delay_ms),
        }
    }

    pub fn cta_timings(&self) -> CtaTimings {
        CtaTimings {
            slide: Duration::from_millis(self.timing.cta_slide_ms),
            fade: Duration::from_millis(self.timing.cta_fade_ms),
            slide_distance: self.timing.cta_slide_distance_dp * self.layout.density,
        }
    }

    /// 帧间隔；无效帧率退回默认 60 Hz
    pub fn frame_interval(&self) -> Duration {
        frame_interval_for(self.timing.frame_rate)
    }

    /// 组装会话配置
    ///
    /// 开启 `use_remote_intervals` 时用远端间隔覆盖上升与停留时长。
    pub fn session_config(&self, intervals: &RemoteIntervals) -> SessionConfig {
        let mut carousel = self.carousel_timings();
        if self.timing.use_remote_intervals {
            carousel = carousel.with_remote_intervals(intervals);
        }
        SessionConfig {
            layout: self.layout_metrics(),
            carousel,
            cta: self.cta_timings(),
            frame_interval: self.frame_interval(),
        }
    }
}

/// 大于 0 且不是 NaN
fn is_positive(value: f32) -> bool {
    value > 0.0
}

/// 配置错误
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// 序列化失败
    #[error("配置序列化失败: {0}")]
    SerializationFailed(String),
    /// IO 错误
    #[error("配置 IO 错误: {0}")]
    IoError(String),
    /// 验证失败
    #[error("配置验证失败: {0}")]
    ValidationFailed(String),
}
