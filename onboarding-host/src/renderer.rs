//! # Renderer 模块
//!
//! 消费会话快照的渲染层。渲染层只读快照，从不修改核心状态。
//!
//! [`TextRenderer`] 是无界面实现：每帧输出一行文本，内容不变的帧不重复输出。

use std::io::{self, Write};

use onboarding_runtime::{CardSnapshot, OnboardingContent, OnboardingSnapshot};

use crate::screen::MessageKey;

/// 渲染层接口
pub trait CarouselRenderer {
    /// 会话开始前的标题 / 引导语
    fn header(&mut self, content: &OnboardingContent) -> io::Result<()> {
        let _ = content;
        Ok(())
    }

    /// 渲染一帧
    fn render(&mut self, snapshot: &OnboardingSnapshot) -> io::Result<()>;

    /// 错误状态
    fn error(&mut self, message: MessageKey) -> io::Result<()>;
}

/// 文本渲染器
#[derive(Debug)]
pub struct TextRenderer<W: Write> {
    out: W,
    last_line: Option<String>,
    frames: usize,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_line: None,
            frames: 0,
        }
    }

    /// 实际输出的帧数
    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> CarouselRenderer for TextRenderer<W> {
    fn header(&mut self, content: &OnboardingContent) -> io::Result<()> {
        writeln!(self.out, "== {} ==", content.toolbar_text)?;
        if !content.intro_title.is_empty() {
            writeln!(self.out, "{}", content.intro_title)?;
        }
        if !content.intro_subtitle.is_empty() {
            writeln!(self.out, "{}", content.intro_subtitle)?;
        }
        Ok(())
    }

    fn render(&mut self, snapshot: &OnboardingSnapshot) -> io::Result<()> {
        let line = format_frame(snapshot);
        if self.last_line.as_deref() == Some(line.as_str()) {
            return Ok(());
        }
        writeln!(self.out, "{line}")?;
        self.frames += 1;
        self.last_line = Some(line);
        Ok(())
    }

    fn error(&mut self, message: MessageKey) -> io::Result<()> {
        writeln!(self.out, "error: {}", message.text())
    }
}

/// 把一帧快照格式化为单行文本
pub fn format_frame(snapshot: &OnboardingSnapshot) -> String {
    let mut parts = Vec::with_capacity(snapshot.cards.len() + 2);

    let active = snapshot
        .active_index
        .map_or_else(|| "-".to_string(), |index| index.to_string());
    parts.push(format!("active={active}"));

    parts.extend(snapshot.cards.iter().map(format_card));

    parts.push(match &snapshot.cta {
        Some(cta) => format!(
            "cta \"{}\" dy={:.1} a={:.2} bg={} fg={} stroke={}",
            cta.text, cta.slide_offset, cta.opacity, cta.background, cta.text_color, cta.stroke
        ),
        None => "cta hidden".to_string(),
    });

    if snapshot.carousel_finished {
        parts.push("finished".to_string());
    }
    parts.join(" | ")
}

fn format_card(card: &CardSnapshot) -> String {
    let mode = if card.shows_expanded_content {
        "expanded"
    } else {
        "collapsed"
    };
    format!(
        "#{} {:?} y={:.1} h={:.1} a={:.2} {} stroke={}>{}",
        card.index,
        card.phase,
        card.y_offset,
        card.height,
        card.opacity,
        mode,
        card.stroke.top,
        card.stroke.bottom
    )
}
