//! Frame composition: transcript, draft strip, status line, composer box.

use std::ops::Range;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::ui::chat_loop::{ChatApp, Mode};
use crate::ui::transcript::build_transcript_lines;

/// Longest composer box before it stops growing and starts scrolling.
const MAX_COMPOSER_ROWS: u16 = 6;

pub fn draw(f: &mut Frame, app: &ChatApp) {
    let composer_rows = (app.composer.text().split('\n').count() as u16)
        .clamp(1, MAX_COMPOSER_ROWS);
    let draft_rows = if app.composer.drafts().is_empty() { 0 } else { 1 };
    let status_rows = if app.status.is_some() { 1 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(draft_rows),
            Constraint::Length(status_rows),
            Constraint::Length(composer_rows + 2),
        ])
        .split(f.area());

    draw_messages(f, chunks[0], app);
    if draft_rows > 0 {
        draw_drafts(f, chunks[1], app);
    }
    if let Some(status) = &app.status {
        let line = Paragraph::new(status.as_str()).style(Style::default().fg(Color::Yellow));
        f.render_widget(line, chunks[2]);
    }
    draw_composer(f, chunks[3], app);
}

fn draw_messages(f: &mut Frame, area: Rect, app: &ChatApp) {
    let lines = build_transcript_lines(
        app.store.messages(),
        app.selected,
        &app.config,
        app.link_policy,
    );
    // Wrap to the viewport width ourselves so the scroll math counts the
    // same rows the terminal shows; ratatui's built-in wrap would make the
    // bottom-follow offset drift on long messages.
    let wrapped = wrap_lines(&lines, area.width);

    let available_height = area.height.saturating_sub(1);
    let total_rows = wrapped.len() as u16;
    let max_offset = total_rows.saturating_sub(available_height);
    let scroll = max_offset.saturating_sub(app.scroll_from_bottom);

    let paragraph = Paragraph::new(wrapped)
        .block(Block::default().title(transcript_title(app)))
        .scroll((scroll, 0));
    f.render_widget(paragraph, area);
}

/// Transcript pane title, surfacing the logging state when a log file is
/// configured.
pub(crate) fn transcript_title(app: &ChatApp) -> String {
    if app.logging.is_configured() {
        format!("causerie [log {}]", app.logging.get_status_string())
    } else {
        "causerie".to_string()
    }
}

fn draw_drafts(f: &mut Frame, area: Rect, app: &ChatApp) {
    let summary = app
        .composer
        .drafts()
        .iter()
        .map(|d| format!("📎 {}", d.name))
        .collect::<Vec<_>>()
        .join("  ");
    let line = Paragraph::new(summary).style(Style::default().fg(Color::DarkGray));
    f.render_widget(line, area);
}

fn draw_composer(f: &mut Frame, area: Rect, app: &ChatApp) {
    match app.mode {
        Mode::Compose => {
            let lines = composer_lines(app.composer.text(), app.composer.selection());
            let (row, col) = cursor_position(app.composer.text(), app.composer.cursor());

            let visible_rows = area.height.saturating_sub(2).max(1);
            let scroll = row.saturating_sub(visible_rows - 1);

            let input = Paragraph::new(lines)
                .scroll((scroll, 0))
                .block(Block::default().borders(Borders::ALL).title(
                    "Message (Enter to send, Alt+Enter for newline, Ctrl+C to quit)",
                ));
            f.render_widget(input, area);
            f.set_cursor_position((area.x + 1 + col, area.y + 1 + row - scroll));
        }
        Mode::AttachPrompt | Mode::LogPrompt => {
            let title = match app.mode {
                Mode::AttachPrompt => "Attach file path (Enter to stage, Esc to cancel)",
                _ => "Log file path (Enter to enable, Esc to cancel)",
            };
            let input = Paragraph::new(app.prompt_input.as_str())
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().borders(Borders::ALL).title(title));
            f.render_widget(input, area);
            let col = UnicodeWidthStr::width(app.prompt_input.as_str()) as u16;
            f.set_cursor_position((area.x + 1 + col, area.y + 1));
        }
    }
}

/// Composer text as display lines, with the selection shown reversed.
pub(crate) fn composer_lines(text: &str, selection: Option<Range<usize>>) -> Vec<Line<'static>> {
    let selected = Style::default().add_modifier(Modifier::REVERSED);
    let mut lines = Vec::new();
    let mut line_start = 0;

    for line in text.split('\n') {
        let line_end = line_start + line.len();
        let spans = match &selection {
            Some(sel) if sel.start < line_end && sel.end > line_start => {
                let from = sel.start.max(line_start) - line_start;
                let to = sel.end.min(line_end) - line_start;
                vec![
                    Span::raw(line[..from].to_string()),
                    Span::styled(line[from..to].to_string(), selected),
                    Span::raw(line[to..].to_string()),
                ]
            }
            _ => vec![Span::raw(line.to_string())],
        };
        lines.push(Line::from(spans));
        line_start = line_end + 1;
    }

    lines
}

/// Word-wrap styled lines to `width` display columns, preserving span
/// styles and hard-breaking tokens wider than the viewport. The wrapped
/// rows are rendered verbatim, so their count is exactly what scroll math
/// sees on screen.
pub(crate) fn wrap_lines(lines: &[Line<'static>], width: u16) -> Vec<Line<'static>> {
    let width = width as usize;
    if width == 0 {
        return lines.to_vec();
    }
    let mut out = Vec::with_capacity(lines.len());
    for line in lines {
        wrap_line(&mut out, line, width);
    }
    out
}

fn wrap_line(out: &mut Vec<Line<'static>>, line: &Line<'static>, width: usize) {
    let mut row: Vec<Span<'static>> = Vec::new();
    let mut used = 0usize;
    let mut emitted = false;

    for (text, style) in line_tokens(line) {
        if text == " " {
            if used + 1 > width {
                // The wrap swallows the breaking space.
                out.push(Line::from(std::mem::take(&mut row)));
                emitted = true;
                used = 0;
            } else {
                push_run(&mut row, " ", style);
                used += 1;
            }
            continue;
        }

        let token_width = UnicodeWidthStr::width(text.as_str());
        if used > 0 && used + token_width > width {
            out.push(Line::from(std::mem::take(&mut row)));
            emitted = true;
            used = 0;
        }
        if token_width <= width {
            push_run(&mut row, &text, style);
            used += token_width;
        } else {
            // Token wider than the viewport; break it by character.
            for c in text.chars() {
                let w = c.width().unwrap_or(0);
                if used > 0 && used + w > width {
                    out.push(Line::from(std::mem::take(&mut row)));
                    emitted = true;
                    used = 0;
                }
                push_run(&mut row, c.encode_utf8(&mut [0u8; 4]), style);
                used += w;
            }
        }
    }

    if !row.is_empty() || !emitted {
        out.push(Line::from(row));
    }
}

/// Split a line into space and word tokens, each carrying its span style.
fn line_tokens(line: &Line<'static>) -> Vec<(String, Style)> {
    let mut tokens = Vec::new();
    for span in &line.spans {
        let mut word = String::new();
        for c in span.content.chars() {
            if c == ' ' {
                if !word.is_empty() {
                    tokens.push((std::mem::take(&mut word), span.style));
                }
                tokens.push((" ".to_string(), span.style));
            } else {
                word.push(c);
            }
        }
        if !word.is_empty() {
            tokens.push((word, span.style));
        }
    }
    tokens
}

fn push_run(row: &mut Vec<Span<'static>>, text: &str, style: Style) {
    if let Some(last) = row.last_mut() {
        if last.style == style {
            let mut combined = last.content.to_string();
            combined.push_str(text);
            *last = Span::styled(combined, style);
            return;
        }
    }
    row.push(Span::styled(text.to_string(), style));
}

/// Cursor cell within the composer text, as (row, display column).
pub(crate) fn cursor_position(text: &str, cursor: usize) -> (u16, u16) {
    let before = &text[..cursor];
    let row = before.matches('\n').count() as u16;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let col = UnicodeWidthStr::width(&before[line_start..]) as u16;
    (row, col)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_position_counts_rows_and_display_columns() {
        assert_eq!(cursor_position("", 0), (0, 0));
        assert_eq!(cursor_position("ab", 2), (0, 2));
        assert_eq!(cursor_position("ab\ncd", 3), (1, 0));
        assert_eq!(cursor_position("ab\ncd", 5), (1, 2));
        // é is two bytes but one cell.
        assert_eq!(cursor_position("é", 2), (0, 1));
    }

    #[test]
    fn selection_splits_the_line_into_three_spans() {
        let lines = composer_lines("hello world", Some(6..11));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].spans.len(), 3);
        assert_eq!(lines[0].spans[1].content.as_ref(), "world");
    }

    #[test]
    fn selection_spanning_lines_highlights_both_parts() {
        let lines = composer_lines("ab\ncd", Some(1..4));
        assert_eq!(lines[0].spans[1].content.as_ref(), "b");
        assert_eq!(lines[1].spans[1].content.as_ref(), "c");
    }

    #[test]
    fn no_selection_is_a_single_span_per_line() {
        let lines = composer_lines("ab\ncd", None);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans.len(), 1);
    }

    #[test]
    fn short_lines_wrap_to_themselves() {
        let lines = vec![Line::from("hello"), Line::from("")];
        let wrapped = wrap_lines(&lines, 10);
        assert_eq!(wrapped.len(), 2);
        assert_eq!(wrapped[0].to_string(), "hello");
        assert_eq!(wrapped[1].to_string(), "");
    }

    #[test]
    fn words_wrap_at_boundaries_and_drop_the_breaking_space() {
        let lines = vec![Line::from("aaa bbb ccc")];
        let wrapped = wrap_lines(&lines, 7);
        let rows: Vec<String> = wrapped.iter().map(|l| l.to_string()).collect();
        assert_eq!(rows, vec!["aaa bbb", "ccc"]);
    }

    #[test]
    fn oversized_tokens_break_by_character() {
        let lines = vec![Line::from("abcdefghij")];
        let wrapped = wrap_lines(&lines, 4);
        let rows: Vec<String> = wrapped.iter().map(|l| l.to_string()).collect();
        assert_eq!(rows, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn wrapping_preserves_span_styles() {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let lines = vec![Line::from(vec![
            Span::raw("plain "),
            Span::styled("boldboldbold", bold),
        ])];
        let wrapped = wrap_lines(&lines, 8);
        assert!(wrapped.len() > 1);
        for line in &wrapped {
            for span in &line.spans {
                if span.content.contains("bold") {
                    assert_eq!(span.style, bold);
                }
            }
        }
    }

    #[test]
    fn wrapped_row_count_exceeds_line_count_on_narrow_viewports() {
        // Bottom-following scroll math counts wrapped rows, not source
        // lines; a long message on a narrow terminal must grow the count.
        let long = "word ".repeat(40);
        let lines = vec![Line::from(long)];
        let wrapped = wrap_lines(&lines, 20);
        assert!(wrapped.len() > lines.len());
        assert!(wrapped
            .iter()
            .all(|l| UnicodeWidthStr::width(l.to_string().as_str()) <= 20));
    }

    #[test]
    fn transcript_title_reflects_logging_state() {
        use crate::core::config::Config;
        use crate::ui::chat_loop::ChatApp;

        let app = ChatApp::new(Config::default(), None);
        assert_eq!(transcript_title(&app), "causerie");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.log");
        let app = ChatApp::new(
            Config::default(),
            Some(path.to_string_lossy().into_owned()),
        );
        assert!(transcript_title(&app).contains("log active"));
    }
}
