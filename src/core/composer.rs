//! Composer editing state: a text buffer with cursor and optional
//! selection, mutated through an action enum, plus the staged draft
//! attachments.
//!
//! The formatting helpers mirror what the toolbar/shortcut surface does:
//! [`wrap_selection`] wraps an inline range in delimiters and
//! [`toggle_line_prefix`] adds or removes a block marker on every
//! non-blank line the selection touches.
//!
//! [`wrap_selection`]: ComposerState::wrap_selection
//! [`toggle_line_prefix`]: ComposerState::toggle_line_prefix

use std::ops::Range;

use crate::core::drafts::{DraftAttachment, DraftError};
use crate::utils::input::sanitize_text_input;

/// Inserted when a wrap action fires with no selection.
const PLACEHOLDER: &str = "text";

/// Edits the UI layer can request. Key mapping stays in the UI; this enum
/// is the whole mutation surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposerAction {
    Insert(char),
    Paste(String),
    Newline,
    Backspace,
    Delete,
    MoveLeft,
    MoveRight,
    MoveHome,
    MoveEnd,
    SelectLeft,
    SelectRight,
    ClearAll,
    Bold,
    Italic,
    Strikethrough,
    CodeInline,
    Link,
    BulletList,
    NumberedList,
    Quote,
    Heading1,
    Heading2,
}

#[derive(Debug, Default)]
pub struct ComposerState {
    text: String,
    /// Byte offset into `text`, always on a char boundary.
    cursor: usize,
    /// Selection anchor; selection is the span between anchor and cursor.
    anchor: Option<usize>,
    drafts: Vec<DraftAttachment>,
}

impl ComposerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Ordered selection range, if a non-empty selection exists.
    pub fn selection(&self) -> Option<Range<usize>> {
        let anchor = self.anchor?;
        if anchor == self.cursor {
            return None;
        }
        Some(anchor.min(self.cursor)..anchor.max(self.cursor))
    }

    pub fn drafts(&self) -> &[DraftAttachment] {
        &self.drafts
    }

    /// A message can be sent when there is trimmed text or a staged draft.
    pub fn has_content(&self) -> bool {
        !self.text.trim().is_empty() || !self.drafts.is_empty()
    }

    pub fn apply(&mut self, action: ComposerAction) {
        match action {
            ComposerAction::Insert(c) => self.insert_text(&c.to_string()),
            ComposerAction::Paste(text) => {
                let sanitized = sanitize_text_input(&text);
                self.insert_text(&sanitized);
            }
            ComposerAction::Newline => self.insert_text("\n"),
            ComposerAction::Backspace => self.backspace(),
            ComposerAction::Delete => self.delete_forward(),
            ComposerAction::MoveLeft => {
                self.cursor = self.prev_boundary();
                self.anchor = None;
            }
            ComposerAction::MoveRight => {
                self.cursor = self.next_boundary();
                self.anchor = None;
            }
            ComposerAction::MoveHome => {
                self.cursor = self.line_start(self.cursor);
                self.anchor = None;
            }
            ComposerAction::MoveEnd => {
                self.cursor = self.line_end(self.cursor);
                self.anchor = None;
            }
            ComposerAction::SelectLeft => {
                self.anchor.get_or_insert(self.cursor);
                self.cursor = self.prev_boundary();
            }
            ComposerAction::SelectRight => {
                self.anchor.get_or_insert(self.cursor);
                self.cursor = self.next_boundary();
            }
            ComposerAction::ClearAll => {
                self.text.clear();
                self.cursor = 0;
                self.anchor = None;
            }
            ComposerAction::Bold => self.wrap_selection("**", "**"),
            ComposerAction::Italic => self.wrap_selection("*", "*"),
            ComposerAction::Strikethrough => self.wrap_selection("~~", "~~"),
            ComposerAction::CodeInline => self.wrap_selection("`", "`"),
            ComposerAction::Link => self.wrap_selection("[", "](url)"),
            ComposerAction::BulletList => self.toggle_line_prefix("- "),
            ComposerAction::NumberedList => self.toggle_line_prefix("1. "),
            ComposerAction::Quote => self.toggle_line_prefix("> "),
            ComposerAction::Heading1 => self.toggle_line_prefix("# "),
            ComposerAction::Heading2 => self.toggle_line_prefix("## "),
        }
    }

    /// Wrap the selection in delimiters, or insert a wrapped placeholder at
    /// the cursor when nothing is selected. The cursor lands after the
    /// wrapped text (before the closing delimiter for the placeholder case,
    /// so the next keystroke replaces nothing but the typing position is
    /// right).
    pub fn wrap_selection(&mut self, before: &str, after: &str) {
        let (start, end) = self.selection_or_cursor();
        if start != end {
            let insertion = format!("{before}{}{after}", &self.text[start..end]);
            self.text.replace_range(start..end, &insertion);
            self.cursor = start + insertion.len();
        } else {
            let insertion = format!("{before}{PLACEHOLDER}{after}");
            self.text.insert_str(start, &insertion);
            self.cursor = start + before.len() + PLACEHOLDER.len();
        }
        self.anchor = None;
    }

    /// Toggle a line prefix (list marker, quote, heading) on every
    /// non-blank line intersecting the selection, preserving leading
    /// whitespace.
    pub fn toggle_line_prefix(&mut self, prefix: &str) {
        let (sel_start, sel_end) = self.selection_or_cursor();
        let start = self.line_start(sel_start);
        let end = self.line_end(sel_end);

        let mut new_lines: Vec<String> = Vec::new();
        for line in self.text[start..end].split('\n') {
            if line.trim().is_empty() {
                new_lines.push(line.to_string());
                continue;
            }
            let indent_len = line.len() - line.trim_start().len();
            let (indent, body) = line.split_at(indent_len);
            match body.strip_prefix(prefix) {
                Some(stripped) => new_lines.push(format!("{indent}{stripped}")),
                None => new_lines.push(format!("{indent}{prefix}{body}")),
            }
        }
        let replacement = new_lines.join("\n");
        self.text.replace_range(start..end, &replacement);
        self.cursor = start + replacement.len();
        self.anchor = None;
    }

    pub fn stage_draft(&mut self, draft: DraftAttachment) {
        self.drafts.push(draft);
    }

    /// Discard the most recently staged draft, releasing its preview.
    /// Returns the discarded draft's name, if any draft was staged.
    pub fn discard_last_draft(&mut self) -> Result<Option<String>, DraftError> {
        match self.drafts.pop() {
            Some(draft) => {
                let name = draft.name.clone();
                draft.discard()?;
                Ok(Some(name))
            }
            None => Ok(None),
        }
    }

    /// Take the sendable content out of the composer, resetting it.
    /// Returns `None` when there is nothing to send.
    pub fn take_send(&mut self) -> Option<(String, Vec<DraftAttachment>)> {
        if !self.has_content() {
            return None;
        }
        let text = self.text.trim().to_string();
        self.text.clear();
        self.cursor = 0;
        self.anchor = None;
        Some((text, std::mem::take(&mut self.drafts)))
    }

    fn insert_text(&mut self, insertion: &str) {
        let (start, end) = self.selection_or_cursor();
        self.text.replace_range(start..end, insertion);
        self.cursor = start + insertion.len();
        self.anchor = None;
    }

    fn backspace(&mut self) {
        match self.selection() {
            Some(range) => {
                self.cursor = range.start;
                self.text.replace_range(range, "");
            }
            None => {
                let prev = self.prev_boundary();
                self.text.replace_range(prev..self.cursor, "");
                self.cursor = prev;
            }
        }
        self.anchor = None;
    }

    fn delete_forward(&mut self) {
        match self.selection() {
            Some(range) => {
                self.cursor = range.start;
                self.text.replace_range(range, "");
            }
            None => {
                let next = self.next_boundary();
                self.text.replace_range(self.cursor..next, "");
            }
        }
        self.anchor = None;
    }

    fn selection_or_cursor(&self) -> (usize, usize) {
        match self.selection() {
            Some(range) => (range.start, range.end),
            None => (self.cursor, self.cursor),
        }
    }

    fn prev_boundary(&self) -> usize {
        self.text[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.text[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
            .unwrap_or(self.cursor)
    }

    fn line_start(&self, at: usize) -> usize {
        self.text[..at].rfind('\n').map(|i| i + 1).unwrap_or(0)
    }

    fn line_end(&self, at: usize) -> usize {
        self.text[at..]
            .find('\n')
            .map(|i| at + i)
            .unwrap_or(self.text.len())
    }
}
