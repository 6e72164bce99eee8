//! Block segmentation: a single left-to-right scan over source lines.
//!
//! Per-line precedence is heading, blockquote, list run, blank line,
//! paragraph. List runs consume all contiguous matching lines greedily
//! before the outer scan resumes; there is no backtracking.

use crate::render::inline::{tokenize_inline, Inline, LinkPolicy};

/// A structural unit of rendered output, derived from one or more
/// consecutive source lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, spans: Vec<Inline> },
    Quote(Vec<Inline>),
    BulletList(Vec<Vec<Inline>>),
    NumberedList(Vec<Vec<Inline>>),
    LineBreak,
    Paragraph(Vec<Inline>),
}

/// Segment source text into blocks, running inline tokenization on each
/// logical line. Accepts both LF and CRLF line endings.
pub fn parse_blocks(source: &str, policy: LinkPolicy) -> Vec<Block> {
    let lines: Vec<&str> = source
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    let mut blocks = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];

        if let Some((level, content)) = heading_line(line) {
            blocks.push(Block::Heading {
                level,
                spans: tokenize_inline(content, policy),
            });
            i += 1;
            continue;
        }

        if let Some(content) = quote_line(line) {
            blocks.push(Block::Quote(tokenize_inline(content, policy)));
            i += 1;
            continue;
        }

        if bullet_item(line).is_some() {
            let mut items = Vec::new();
            while i < lines.len() {
                match bullet_item(lines[i]) {
                    Some(item) => items.push(tokenize_inline(item, policy)),
                    None => break,
                }
                i += 1;
            }
            blocks.push(Block::BulletList(items));
            continue;
        }

        if ordered_item(line).is_some() {
            let mut items = Vec::new();
            while i < lines.len() {
                match ordered_item(lines[i]) {
                    Some(item) => items.push(tokenize_inline(item, policy)),
                    None => break,
                }
                i += 1;
            }
            blocks.push(Block::NumberedList(items));
            continue;
        }

        if line.trim().is_empty() {
            blocks.push(Block::LineBreak);
            i += 1;
            continue;
        }

        blocks.push(Block::Paragraph(tokenize_inline(line, policy)));
        i += 1;
    }

    blocks
}

/// `^\s*(#{1,3})\s+(.+)$`: level capped at 3; four or more hashes fall
/// through to the paragraph rule.
fn heading_line(line: &str) -> Option<(u8, &str)> {
    let t = line.trim_start();
    let hashes = t.len() - t.trim_start_matches('#').len();
    if hashes == 0 || hashes > 3 {
        return None;
    }
    let rest = &t[hashes..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let content = rest.trim_start();
    if content.is_empty() {
        return None;
    }
    Some((hashes as u8, content))
}

/// `^\s*>\s?(.*)$`: the marker and at most one following space are
/// stripped; the remainder may be empty.
fn quote_line(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix('>')?;
    Some(rest.strip_prefix(char::is_whitespace).unwrap_or(rest))
}

/// `^\s*[-*]\s+`: marker plus following whitespace stripped.
fn bullet_item(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix(['-', '*'])?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.trim_start())
}

/// `^\s*\d+\.\s+`: the written number is discarded by the caller; items
/// render in document order.
fn ordered_item(line: &str) -> Option<&str> {
    let t = line.trim_start();
    let digits = t.len() - t.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    let rest = t[digits..].strip_prefix('.')?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.trim_start())
}
