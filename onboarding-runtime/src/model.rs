//! # Model 模块
//!
//! 远端接口的数据格式，以及会话内使用的不可变描述符。
//!
//! ```text
//! OnboardingResponse (wire, camelCase)
//!        │ into_content()
//!        ▼
//! OnboardingContent { cards: Vec<CardDescriptor>, cta: CtaDescriptor, .. }
//! ```
//!
//! 颜色在转换时一次性解析，之后描述符不再变化。

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::ContentError;

/// 接口响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingResponse {
    pub success: bool,
    pub data: OnboardingDataContainer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingDataContainer {
    pub onboarding_data: OnboardingData,
}

/// 引导页数据
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OnboardingData {
    pub tool_bar_text: String,
    pub intro_title: String,
    pub intro_subtitle: String,
    pub education_card_list: Vec<EducationCard>,
    pub save_button_cta: SaveButtonCta,
    pub cta_lottie: String,
    pub screen_type: String,
    pub cohort: String,
    pub combination: String,
    pub collapse_card_tilt_interval: i64,
    pub collapse_expand_intro_interval: i64,
    pub bottom_to_center_translation_interval: i64,
    pub expand_card_stay_interval: i64,
    pub seen_count: i64,
}

/// 教育卡片（wire 格式）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationCard {
    pub image: String,
    pub collapsed_state_text: String,
    pub expand_state_text: String,
    #[serde(rename = "backGroundColor")]
    pub background_color: String,
    pub stroke_start_color: String,
    pub stroke_end_color: String,
    pub start_gradient: String,
    pub end_gradient: String,
}

/// 保存按钮 CTA（wire 格式）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveButtonCta {
    pub text: String,
    #[serde(default)]
    pub deeplink: Option<String>,
    pub background_color: String,
    pub text_color: String,
    pub stroke_color: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
}

/// 卡片描述符
#[derive(Debug, Clone, PartialEq)]
pub struct CardDescriptor {
    pub image: String,
    pub collapsed_text: String,
    pub expanded_text: String,
    pub background: Color,
    pub stroke_start: Color,
    pub stroke_end: Color,
    pub gradient_start: Color,
    pub gradient_end: Color,
}

/// CTA 描述符
#[derive(Debug, Clone, PartialEq)]
pub struct CtaDescriptor {
    pub text: String,
    pub deeplink: Option<String>,
    pub background: Color,
    pub text_color: Color,
    pub stroke: Color,
    pub icon: Option<String>,
    /// 循环播放的装饰动画资源（不透明外部资源）
    pub looping_animation: String,
}

/// 远端下发的时间间隔（毫秒），非正值视为未设置
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoteIntervals {
    pub bottom_to_center_ms: Option<u64>,
    pub expand_stay_ms: Option<u64>,
}

/// 一次引导会话的全部内容
#[derive(Debug, Clone, PartialEq)]
pub struct OnboardingContent {
    pub toolbar_text: String,
    pub intro_title: String,
    pub intro_subtitle: String,
    pub cards: Vec<CardDescriptor>,
    pub cta: CtaDescriptor,
    pub intervals: RemoteIntervals,
}

impl OnboardingResponse {
    /// 从 JSON 文本解码
    pub fn from_json(text: &str) -> Result<Self, ContentError> {
        Ok(serde_json::from_str(text)?)
    }

    /// 转换为会话内容
    ///
    /// `success == false` 视为接口失败。
    pub fn into_content(self) -> Result<OnboardingContent, ContentError> {
        if !self.success {
            return Err(ContentError::ApiFailure);
        }
        self.data.onboarding_data.into_content()
    }
}

impl OnboardingData {
    pub fn into_content(self) -> Result<OnboardingContent, ContentError> {
        let cards = self
            .education_card_list
            .iter()
            .map(CardDescriptor::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let cta_wire = &self.save_button_cta;
        let cta = CtaDescriptor {
            text: cta_wire.text.clone(),
            deeplink: cta_wire.deeplink.clone(),
            background: parse_color("saveButtonCta.backgroundColor", &cta_wire.background_color)?,
            text_color: parse_color("saveButtonCta.textColor", &cta_wire.text_color)?,
            stroke: parse_color("saveButtonCta.strokeColor", &cta_wire.stroke_color)?,
            icon: cta_wire.icon.clone(),
            looping_animation: self.cta_lottie.clone(),
        };

        Ok(OnboardingContent {
            toolbar_text: self.tool_bar_text,
            intro_title: self.intro_title,
            intro_subtitle: self.intro_subtitle,
            cards,
            cta,
            intervals: RemoteIntervals {
                bottom_to_center_ms: positive_ms(self.bottom_to_center_translation_interval),
                expand_stay_ms: positive_ms(self.expand_card_stay_interval),
            },
        })
    }
}

impl TryFrom<&EducationCard> for CardDescriptor {
    type Error = ContentError;

    fn try_from(card: &EducationCard) -> Result<Self, Self::Error> {
        Ok(Self {
            image: card.image.clone(),
            collapsed_text: card.collapsed_state_text.clone(),
            expanded_text: card.expand_state_text.clone(),
            background: parse_color("backGroundColor", &card.background_color)?,
            stroke_start: parse_color("strokeStartColor", &card.stroke_start_color)?,
            stroke_end: parse_color("strokeEndColor", &card.stroke_end_color)?,
            gradient_start: parse_color("startGradient", &card.start_gradient)?,
            gradient_end: parse_color("endGradient", &card.end_gradient)?,
        })
    }
}

fn parse_color(field: &str, value: &str) -> Result<Color, ContentError> {
    Color::parse(value).ok_or_else(|| ContentError::InvalidColor {
        field: field.to_string(),
        value: value.to_string(),
    })
}

fn positive_ms(value: i64) -> Option<u64> {
    u64::try_from(value).ok().filter(|v| *v > 0)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const SAMPLE_JSON: &str = r##"{
        "success": true,
        "data": {
            "onboardingData": {
                "toolBarText": "Onboarding",
                "introTitle": "Welcome",
                "introSubtitle": "Save daily",
                "educationCardList": [
                    {
                        "image": "https://example.com/1.png",
                        "collapsedStateText": "Save",
                        "expandStateText": "Save every day",
                        "backGroundColor": "#272239",
                        "strokeStartColor": "#FFFFFF",
                        "strokeEndColor": "#00FFFFFF",
                        "startGradient": "#713A65",
                        "endGradient": "#713A65"
                    },
                    {
                        "image": "https://example.com/2.png",
                        "collapsedStateText": "Grow",
                        "expandStateText": "Watch it grow",
                        "backGroundColor": "1E2B3C",
                        "strokeStartColor": "#FFFFFF",
                        "strokeEndColor": "#FFFFFF",
                        "startGradient": "#2D4A6B",
                        "endGradient": "#0F1B2A"
                    }
                ],
                "saveButtonCta": {
                    "text": "Save in Gold",
                    "deeplink": null,
                    "backgroundColor": "#7745FF",
                    "textColor": "#FFFFFF",
                    "strokeColor": "#FFFFFF",
                    "icon": null,
                    "order": null
                },
                "ctaLottie": "https://example.com/arrow.json",
                "screenType": "onboarding",
                "cohort": "a",
                "combination": "x",
                "collapseCardTiltInterval": 1000,
                "collapseExpandIntroInterval": 500,
                "bottomToCenterTranslationInterval": 1500,
                "expandCardStayInterval": 0,
                "seenCount": 0
            }
        }
    }"##;

    #[test]
    fn test_decode_and_convert() {
        let content = OnboardingResponse::from_json(SAMPLE_JSON)
            .unwrap()
            .into_content()
            .unwrap();

        assert_eq!(content.toolbar_text, "Onboarding");
        assert_eq!(content.cards.len(), 2);
        assert_eq!(content.cards[1].collapsed_text, "Grow");
        assert_eq!(content.cards[0].stroke_end.a, 0.0);
        assert_eq!(content.cta.text, "Save in Gold");
        assert_eq!(content.cta.looping_animation, "https://example.com/arrow.json");
        assert_eq!(content.intervals.bottom_to_center_ms, Some(1500));
        // 0 视为未设置
        assert_eq!(content.intervals.expand_stay_ms, None);
    }

    #[test]
    fn test_api_failure() {
        let json = SAMPLE_JSON.replacen("\"success\": true", "\"success\": false", 1);
        let err = OnboardingResponse::from_json(&json)
            .unwrap()
            .into_content()
            .unwrap_err();
        assert_eq!(err, ContentError::ApiFailure);
    }

    #[test]
    fn test_invalid_color() {
        let json = SAMPLE_JSON.replacen("#272239", "not-a-color", 1);
        let err = OnboardingResponse::from_json(&json)
            .unwrap()
            .into_content()
            .unwrap_err();
        assert_eq!(
            err,
            ContentError::InvalidColor {
                field: "backGroundColor".to_string(),
                value: "not-a-color".to_string(),
            }
        );
    }

    #[test]
    fn test_decode_error() {
        let err = OnboardingResponse::from_json("{").unwrap_err();
        assert!(matches!(err, ContentError::Decode { .. }));
    }
}
