//! Markdown renderer: raw message text in, HTML-safe fragment out.
//!
//! The pipeline is deliberately small and deterministic. A line-oriented
//! block pass ([`blocks`]) segments the source into headings, blockquotes,
//! list runs, line breaks, and paragraphs; an inline pass ([`inline`])
//! tokenizes each logical line into typed spans with a fixed precedence
//! (strikethrough, code, bold, italic, link, autolink); the emitter
//! ([`html`]) is the only place text enters the output and escapes every
//! literal segment unconditionally ([`escape`]).
//!
//! The renderer is total: malformed markup (unmatched delimiters, bad URLs)
//! degrades to literal or partially-formatted text and never fails.

mod blocks;
mod escape;
mod html;
mod inline;

#[cfg(test)]
mod tests;

pub use blocks::{parse_blocks, Block};
pub use escape::{push_escaped_attr, push_escaped_text};
pub use inline::{tokenize_inline, Inline, LinkPolicy};

/// Options threaded through the render pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub link_policy: LinkPolicy,
}

impl RenderOptions {
    pub fn strict_links() -> Self {
        Self {
            link_policy: LinkPolicy::Strict,
        }
    }
}

/// Render Markdown source to an HTML fragment with default options.
///
/// Same input always yields byte-identical output; the caller must not
/// re-escape the result.
///
/// # Examples
///
/// ```
/// use causerie::render::render;
///
/// assert_eq!(render("**bold**"), "<p><strong>bold</strong></p>");
/// assert_eq!(render(""), "");
/// ```
pub fn render(source: &str) -> String {
    render_with_options(source, RenderOptions::default())
}

/// Render Markdown source to an HTML fragment.
pub fn render_with_options(source: &str, options: RenderOptions) -> String {
    if source.is_empty() {
        return String::new();
    }

    let blocks = parse_blocks(source, options.link_policy);
    let mut out = String::with_capacity(source.len() + source.len() / 2);
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        html::push_block(&mut out, block);
    }
    out
}

/// Wrap a rendered fragment into a self-contained HTML document.
///
/// Used by `causerie export`; styling is intentionally minimal.
pub fn render_document(title: &str, source: &str, options: RenderOptions) -> String {
    let fragment = render_with_options(source, options);
    let mut out = String::with_capacity(fragment.len() + 1024);
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\"/>\n<title>");
    push_escaped_text(&mut out, title);
    out.push_str("</title>\n<style>\n");
    out.push_str(DOCUMENT_CSS);
    out.push_str("</style>\n</head>\n<body>\n");
    out.push_str(&fragment);
    out.push_str("\n</body>\n</html>\n");
    out
}

const DOCUMENT_CSS: &str = "\
body { max-width: 42rem; margin: 2rem auto; padding: 0 1rem; font-family: sans-serif; line-height: 1.5; }
blockquote { border-left: 2px solid #ccc; margin-left: 0; padding-left: 0.75rem; font-style: italic; }
code { background: #eee; border-radius: 3px; padding: 0.1rem 0.25rem; font-family: monospace; }
.link-broken { color: #888; }
";
