//! Transcript rendering: messages to styled terminal lines.
//!
//! Message bodies go through [`parse_blocks`], the same parse the HTML
//! emitter uses; this module only decides how each block and inline span
//! looks in a terminal cell grid.

use std::collections::BTreeMap;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::core::config::Config;
use crate::core::message::Message;
use crate::core::transcript::{format_separator, needs_time_separator};
use crate::render::{parse_blocks, Block, Inline, LinkPolicy};

/// Build the full transcript as display lines. `selected` marks one
/// message index with a selection gutter.
pub fn build_transcript_lines(
    messages: &[Message],
    selected: Option<usize>,
    config: &Config,
    policy: LinkPolicy,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut prev_ts = None;

    for (index, message) in messages.iter().enumerate() {
        if needs_time_separator(prev_ts, message.created_at) {
            lines.push(Line::from(Span::styled(
                format!("── {} ──", format_separator(message.created_at)),
                Style::default().fg(Color::DarkGray),
            )));
            lines.push(Line::from(""));
        }
        prev_ts = Some(message.created_at);

        lines.push(author_line(message, selected == Some(index), config));
        for block in parse_blocks(&message.text, policy) {
            push_block_lines(&mut lines, &block);
        }
        for attachment in &message.attachments {
            lines.push(Line::from(Span::styled(
                format!("📎 {} ({} bytes)", attachment.name, attachment.size),
                Style::default().fg(Color::DarkGray),
            )));
        }
        if let Some(line) = reaction_line(message) {
            lines.push(line);
        }
        lines.push(Line::from(""));
    }

    lines
}

fn author_line(message: &Message, selected: bool, config: &Config) -> Line<'static> {
    let (label, color) = if message.is_mine() {
        (config.user_label().to_string(), Color::Cyan)
    } else {
        (config.other_label().to_string(), Color::Green)
    };

    let mut spans = Vec::new();
    if selected {
        spans.push(Span::styled("▌ ", Style::default().fg(Color::Yellow)));
    }
    spans.push(Span::styled(
        label,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ));
    Line::from(spans)
}

fn push_block_lines(lines: &mut Vec<Line<'static>>, block: &Block) {
    match block {
        Block::Heading { level, spans } => {
            let style = match level {
                1 => Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                _ => Style::default().add_modifier(Modifier::BOLD),
            };
            lines.push(styled_spans_line(spans, style, None));
        }
        Block::Quote(spans) => {
            lines.push(styled_spans_line(
                spans,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
                Some(Span::styled("│ ", Style::default().fg(Color::DarkGray))),
            ));
        }
        Block::BulletList(items) => {
            for item in items {
                lines.push(styled_spans_line(
                    item,
                    Style::default(),
                    Some(Span::raw("• ")),
                ));
            }
        }
        Block::NumberedList(items) => {
            for (i, item) in items.iter().enumerate() {
                lines.push(styled_spans_line(
                    item,
                    Style::default(),
                    Some(Span::raw(format!("{}. ", i + 1))),
                ));
            }
        }
        Block::LineBreak => lines.push(Line::from("")),
        Block::Paragraph(spans) => lines.push(styled_spans_line(spans, Style::default(), None)),
    }
}

fn styled_spans_line(
    spans: &[Inline],
    base: Style,
    prefix: Option<Span<'static>>,
) -> Line<'static> {
    let mut out = Vec::new();
    if let Some(prefix) = prefix {
        out.push(prefix);
    }
    for span in spans {
        out.push(inline_span(span, base));
    }
    Line::from(out)
}

fn inline_span(span: &Inline, base: Style) -> Span<'static> {
    match span {
        Inline::Text(text) => Span::styled(text.clone(), base),
        Inline::Bold(text) => Span::styled(text.clone(), base.add_modifier(Modifier::BOLD)),
        Inline::Italic(text) => Span::styled(text.clone(), base.add_modifier(Modifier::ITALIC)),
        Inline::Strike(text) => {
            Span::styled(text.clone(), base.add_modifier(Modifier::CROSSED_OUT))
        }
        Inline::Code(text) => Span::styled(text.clone(), base.fg(Color::Yellow)),
        Inline::Link { label, .. } => Span::styled(
            label.clone(),
            base.fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
        ),
        Inline::BrokenLink(label) => {
            Span::styled(format!("[{label}]"), base.fg(Color::DarkGray))
        }
    }
}

/// One line summarizing reactions, e.g. "👍 2  🎉 1".
fn reaction_line(message: &Message) -> Option<Line<'static>> {
    if message.reactions.is_empty() {
        return None;
    }
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for reaction in &message.reactions {
        *counts.entry(reaction.emoji.as_str()).or_default() += 1;
    }
    let summary = counts
        .iter()
        .map(|(emoji, count)| format!("{emoji} {count}"))
        .collect::<Vec<_>>()
        .join("  ");
    Some(Line::from(Span::styled(
        summary,
        Style::default().fg(Color::Magenta),
    )))
}
