//! # Backdrop 模块
//!
//! 由当前激活卡片派生的背景：两段式纵向渐变 + 所有卡片共用的底色，
//! 以及每张卡片自己的描边渐变。
//! 纯派生值，激活索引或卡片高度变化时重新计算，不做持久化。

use crate::color::Color;
use crate::model::CardDescriptor;

/// 渐变结束色与卡片底色使用的透明度
pub const BACKDROP_ALPHA: f32 = 0.32;

/// 纵向渐变
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalGradient {
    pub top: Color,
    pub bottom: Color,
    pub start_y: f32,
    pub end_y: f32,
}

/// 背景派生结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backdrop {
    /// 整屏背景渐变
    pub gradient: VerticalGradient,
    /// 卡片填充色（激活卡片的背景色）
    pub card_fill: Color,
}

impl Backdrop {
    pub fn for_card(card: &CardDescriptor, viewport_height: f32) -> Self {
        Self {
            gradient: VerticalGradient {
                top: card.gradient_start,
                bottom: card.gradient_end.with_alpha(BACKDROP_ALPHA),
                start_y: 0.0,
                end_y: viewport_height,
            },
            card_fill: card.background.with_alpha(BACKDROP_ALPHA),
        }
    }
}

/// 卡片描边渐变：从卡片顶部到卡片当前高度
pub fn stroke_gradient(card: &CardDescriptor, card_height: f32) -> VerticalGradient {
    VerticalGradient {
        top: card.stroke_start,
        bottom: card.stroke_end,
        start_y: 0.0,
        end_y: card_height,
    }
}
