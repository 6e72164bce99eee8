//! Terminal input sanitization shared by typing and paste paths.

/// Sanitize text before it enters the composer buffer.
///
/// Tabs become four spaces, carriage returns become newlines, and control
/// characters other than newline are dropped; anything else would corrupt
/// the TUI when echoed back.
pub fn sanitize_text_input(text: &str) -> String {
    let mut sanitized = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\t' => sanitized.push_str("    "),
            '\r' => sanitized.push('\n'),
            '\n' => sanitized.push('\n'),
            c if c.is_control() => {}
            c => sanitized.push(c),
        }
    }
    sanitized
}
