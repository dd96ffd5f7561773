//! # Layout 模块
//!
//! 宿主注入的屏幕空间常量与动画时序。核心只根据这些值计算位置，
//! 不自行测量视口。

use std::time::Duration;

use crate::model::RemoteIntervals;

/// 布局度量（像素）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutMetrics {
    /// 视口高度
    pub viewport_height: f32,
    /// 折叠卡片高度
    pub collapsed_height: f32,
    /// 卡片间距
    pub card_gap: f32,
    /// 卡片区域顶部边距
    pub top_margin: f32,
    /// 卡片区域左右边距
    pub side_margin: f32,
    /// 卡片高度超过该值时显示展开内容
    pub expanded_content_threshold: f32,
}

impl LayoutMetrics {
    /// 由 dp 值和像素密度构造
    pub fn from_dp(
        viewport_height_dp: f32,
        density: f32,
        collapsed_height_dp: f32,
        card_gap_dp: f32,
        top_margin_dp: f32,
        side_margin_dp: f32,
        expanded_content_threshold_dp: f32,
    ) -> Self {
        Self {
            viewport_height: viewport_height_dp * density,
            collapsed_height: collapsed_height_dp * density,
            card_gap: card_gap_dp * density,
            top_margin: top_margin_dp * density,
            side_margin: side_margin_dp * density,
            expanded_content_threshold: expanded_content_threshold_dp * density,
        }
    }

    /// 展开高度：视口的 50%
    pub fn expanded_height(&self) -> f32 {
        self.viewport_height * 0.5
    }

    /// 屏幕底部（卡片隐藏 / 预备位置）
    pub fn bottom_offset(&self) -> f32 {
        self.viewport_height
    }

    /// 第 `index` 张卡片上升后停靠的纵向位置
    pub fn snapping_point(&self, index: usize) -> f32 {
        let fraction = match index {
            0 => 0.15,
            1 | 2 => 0.7,
            _ => 0.5,
        };
        self.viewport_height * fraction
    }

    /// 第 `index` 张卡片折叠后在堆叠中的纵向位置
    pub fn stacked_offset(&self, index: usize) -> f32 {
        index as f32 * (self.collapsed_height + self.card_gap)
    }
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self::from_dp(800.0, 1.0, 60.0, 16.0, 70.0, 16.0, 100.0)
    }
}

/// 轮播时序
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselTimings {
    /// 底部 → 中央 上升时长
    pub rise: Duration,
    /// 展开停留（自动滚动延迟）
    pub hold: Duration,
    /// 中央 → 堆叠 折叠时长
    pub collapse: Duration,
    /// 启动折叠后，游标前进前的等待
    ///
    /// 与 `collapse` 相互独立，数值相等只是默认配置。
    pub advance_delay: Duration,
}

impl Default for CarouselTimings {
    fn default() -> Self {
        Self {
            rise: Duration::from_millis(800),
            hold: Duration::from_millis(1000),
            collapse: Duration::from_millis(600),
            advance_delay: Duration::from_millis(600),
        }
    }
}

impl CarouselTimings {
    /// 用远端下发的间隔覆盖上升时长与停留时长
    pub fn with_remote_intervals(mut self, intervals: &RemoteIntervals) -> Self {
        if let Some(ms) = intervals.bottom_to_center_ms {
            self.rise = Duration::from_millis(ms);
        }
        if let Some(ms) = intervals.expand_stay_ms {
            self.hold = Duration::from_millis(ms);
        }
        self
    }
}

/// CTA 入场时序
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CtaTimings {
    /// 滑入时长
    pub slide: Duration,
    /// 淡入时长
    pub fade: Duration,
    /// 初始下移距离（dp）
    pub slide_distance: f32,
}

impl Default for CtaTimings {
    fn default() -> Self {
        Self {
            slide: Duration::from_millis(800),
            fade: Duration::from_millis(600),
            slide_distance: 200.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stacked_offset() {
        let layout = LayoutMetrics::default();
        assert_eq!(layout.stacked_offset(0), 0.0);
        assert_eq!(layout.stacked_offset(1), 76.0);
        assert_eq!(layout.stacked_offset(2), 152.0);
    }

    #[test]
    fn test_snapping_points() {
        let layout = LayoutMetrics {
            viewport_height: 1000.0,
            ..LayoutMetrics::default()
        };
        assert_eq!(layout.snapping_point(0), 150.0);
        assert_eq!(layout.snapping_point(1), 700.0);
        assert_eq!(layout.snapping_point(2), 700.0);
        assert_eq!(layout.snapping_point(3), 500.0);
        assert_eq!(layout.snapping_point(9), 500.0);
        assert_eq!(layout.expanded_height(), 500.0);
    }

    #[test]
    fn test_from_dp_scales_by_density() {
        let layout = LayoutMetrics::from_dp(800.0, 2.0, 60.0, 16.0, 70.0, 16.0, 100.0);
        assert_eq!(layout.viewport_height, 1600.0);
        assert_eq!(layout.collapsed_height, 120.0);
        assert_eq!(layout.stacked_offset(2), 304.0);
    }

    #[test]
    fn test_remote_intervals_override() {
        let timings = CarouselTimings::default().with_remote_intervals(&RemoteIntervals {
            bottom_to_center_ms: Some(1200),
            expand_stay_ms: None,
        });
        assert_eq!(timings.rise, Duration::from_millis(1200));
        assert_eq!(timings.hold, Duration::from_millis(1000));
        assert_eq!(timings.collapse, timings.advance_delay);
    }
}
