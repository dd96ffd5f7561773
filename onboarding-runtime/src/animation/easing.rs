//! # Easing 模块
//!
//! 缓动函数库，用于动画的时间插值。

/// 缓动函数类型
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EasingFunction {
    /// 线性（匀速）
    Linear,
    /// 缓入（Cubic）
    EaseIn,
    /// 缓出（Cubic）
    EaseOut,
    /// 缓入缓出（Cubic）
    EaseInOut,
    /// 标准缓入缓出曲线，等价于 `CubicBezier(0.4, 0.0, 0.2, 1.0)`
    #[default]
    FastOutSlowIn,
    /// 自定义三次贝塞尔曲线，控制点 (x1, y1) (x2, y2)
    CubicBezier(f32, f32, f32, f32),
}

impl EasingFunction {
    /// 计算缓动值
    ///
    /// # 参数
    /// - `t`: 时间进度 (0.0 - 1.0)
    ///
    /// # 返回
    /// - 缓动后的进度值，`apply(0.0) == 0.0` 且 `apply(1.0) == 1.0`
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match *self {
            EasingFunction::Linear => t,
            EasingFunction::EaseIn => t * t * t,
            EasingFunction::EaseOut => 1.0 - (1.0 - t).powi(3),
            EasingFunction::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            EasingFunction::FastOutSlowIn => cubic_bezier(0.4, 0.0, 0.2, 1.0, t),
            EasingFunction::CubicBezier(x1, y1, x2, y2) => cubic_bezier(x1, y1, x2, y2, t),
        }
    }
}

/// 单维三次贝塞尔（端点固定为 0 和 1）
fn bezier(p1: f32, p2: f32, s: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

fn bezier_slope(p1: f32, p2: f32, s: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// 求 x(s) == x 的参数 s，再返回 y(s)
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, x: f32) -> f32 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    // 牛顿迭代
    let mut s = x;
    for _ in 0..8 {
        let err = bezier(x1, x2, s) - x;
        if err.abs() < 1e-6 {
            return bezier(y1, y2, s);
        }
        let slope = bezier_slope(x1, x2, s);
        if slope.abs() < 1e-6 {
            break;
        }
        s -= err / slope;
    }

    // 牛顿不收敛时退回二分
    let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
    s = x;
    for _ in 0..32 {
        let value = bezier(x1, x2, s);
        if (value - x).abs() < 1e-6 {
            break;
        }
        if value < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    bezier(y1, y2, s)
}
