//! HTML emission. The only module that writes user text into the output,
//! so the escaping calls here are the sanitization boundary.

use crate::render::blocks::Block;
use crate::render::escape::{push_escaped_attr, push_escaped_text};
use crate::render::inline::Inline;

pub(crate) fn push_block(out: &mut String, block: &Block) {
    match block {
        Block::Heading { level, spans } => {
            let tag = match level {
                1 => "h1",
                2 => "h2",
                _ => "h3",
            };
            out.push('<');
            out.push_str(tag);
            out.push('>');
            push_spans(out, spans);
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
        Block::Quote(spans) => {
            out.push_str("<blockquote>");
            push_spans(out, spans);
            out.push_str("</blockquote>");
        }
        Block::BulletList(items) => push_list(out, "ul", items),
        Block::NumberedList(items) => push_list(out, "ol", items),
        Block::LineBreak => out.push_str("<br/>"),
        Block::Paragraph(spans) => {
            out.push_str("<p>");
            push_spans(out, spans);
            out.push_str("</p>");
        }
    }
}

fn push_list(out: &mut String, tag: &str, items: &[Vec<Inline>]) {
    out.push('<');
    out.push_str(tag);
    out.push('>');
    for item in items {
        out.push_str("\n<li>");
        push_spans(out, item);
        out.push_str("</li>");
    }
    out.push_str("\n</");
    out.push_str(tag);
    out.push('>');
}

fn push_spans(out: &mut String, spans: &[Inline]) {
    for span in spans {
        push_inline(out, span);
    }
}

fn push_inline(out: &mut String, span: &Inline) {
    match span {
        Inline::Text(text) => push_escaped_text(out, text),
        Inline::Strike(text) => push_wrapped(out, "del", text),
        Inline::Code(text) => push_wrapped(out, "code", text),
        Inline::Bold(text) => push_wrapped(out, "strong", text),
        Inline::Italic(text) => push_wrapped(out, "em", text),
        Inline::Link { label, href } => {
            out.push_str("<a href=\"");
            push_escaped_attr(out, href);
            out.push_str("\" target=\"_blank\" rel=\"noopener noreferrer\">");
            push_escaped_text(out, label);
            out.push_str("</a>");
        }
        Inline::BrokenLink(label) => {
            out.push_str("<span class=\"link-broken\">[");
            push_escaped_text(out, label);
            out.push_str("]</span>");
        }
    }
}

fn push_wrapped(out: &mut String, tag: &str, text: &str) {
    out.push('<');
    out.push_str(tag);
    out.push('>');
    push_escaped_text(out, text);
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}
