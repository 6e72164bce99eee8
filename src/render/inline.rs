//! Inline tokenizer: one logical line in, a flat sequence of typed spans out.
//!
//! A single left-to-right scan tries delimiters in fixed precedence order:
//! strikethrough, inline code, bold, italic, explicit link, bare-URL
//! autolink. Matching bold before italic means a `**` pair is consumed
//! before the single-`*` rule can split it. Delimited content is literal;
//! later rules never re-enter the output of earlier ones, which is the
//! point of tokenizing instead of chained find-and-replace.

/// How `[text](url)` behaves when the url slot is not an http(s) URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinkPolicy {
    /// If the label itself looks like an http(s) URL, link it using the
    /// label as both label and href; otherwise fall back to a plain span.
    #[default]
    Lenient,
    /// Never promote the label to an href; a bad url slot always yields a
    /// plain span.
    Strict,
}

/// One inline span. Content is literal text, escaped at emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Strike(String),
    Code(String),
    Bold(String),
    Italic(String),
    Link { label: String, href: String },
    /// A bracketed link whose target failed the http(s) check; rendered as
    /// plain, visually-marked text rather than an unsafe href.
    BrokenLink(String),
}

/// Tokenize a single line (no newlines) into inline spans.
///
/// Total: unmatched delimiters fall through as literal text.
pub fn tokenize_inline(line: &str, policy: LinkPolicy) -> Vec<Inline> {
    let mut spans: Vec<Inline> = Vec::new();
    let mut literal = String::new();
    let mut rest = line;

    while let Some(first) = rest.chars().next() {
        let matched = match first {
            '~' if rest.starts_with("~~") => {
                match_pair(rest, "~~", '~').map(|(content, len)| (Inline::Strike(content), len))
            }
            '`' => match_pair(rest, "`", '`').map(|(content, len)| (Inline::Code(content), len)),
            '*' if rest.starts_with("**") => {
                match_pair(rest, "**", '*').map(|(content, len)| (Inline::Bold(content), len))
            }
            '*' => match_pair(rest, "*", '*').map(|(content, len)| (Inline::Italic(content), len)),
            '[' => match_link(rest, policy),
            'h' => match_autolink(rest),
            _ => None,
        };

        match matched {
            Some((span, len)) => {
                flush_literal(&mut spans, &mut literal);
                spans.push(span);
                rest = &rest[len..];
            }
            None => {
                literal.push(first);
                rest = &rest[first.len_utf8()..];
            }
        }
    }

    flush_literal(&mut spans, &mut literal);
    spans
}

fn flush_literal(spans: &mut Vec<Inline>, literal: &mut String) {
    if !literal.is_empty() {
        spans.push(Inline::Text(std::mem::take(literal)));
    }
}

/// Match `<delim>content<delim>` at the start of `rest`, where content is
/// non-empty and free of the delimiter character. Returns the content and
/// the total byte length consumed.
fn match_pair(rest: &str, delim: &str, delim_char: char) -> Option<(String, usize)> {
    let body = &rest[delim.len()..];
    let close = body.find(delim_char)?;
    if close == 0 || !body[close..].starts_with(delim) {
        return None;
    }
    Some((body[..close].to_string(), delim.len() * 2 + close))
}

/// Match `[label](url)` at the start of `rest` and classify it.
fn match_link(rest: &str, policy: LinkPolicy) -> Option<(Inline, usize)> {
    let body = &rest[1..];
    let label_end = body.find(']')?;
    if label_end == 0 {
        return None;
    }
    let label = &body[..label_end];
    let after = &body[label_end + 1..];
    let url_body = after.strip_prefix('(')?;
    let url_end = url_body.find(')')?;
    if url_end == 0 {
        return None;
    }
    let url = &url_body[..url_end];
    let consumed = 1 + label_end + 2 + url_end + 1;

    let span = if is_http_url(url) {
        Inline::Link {
            label: label.to_string(),
            href: url.to_string(),
        }
    } else if policy == LinkPolicy::Lenient && is_http_url(label) {
        // The url slot is junk but the visible text is itself a URL; link
        // it as both label and href rather than discarding the intent.
        Inline::Link {
            label: label.to_string(),
            href: label.to_string(),
        }
    } else {
        Inline::BrokenLink(label.to_string())
    };
    Some((span, consumed))
}

/// Match a bare `http(s)://` run at the start of `rest`, terminated at the
/// first whitespace with trailing punctuation trimmed.
fn match_autolink(rest: &str) -> Option<(Inline, usize)> {
    let scheme_len = if rest.starts_with("https://") {
        8
    } else if rest.starts_with("http://") {
        7
    } else {
        return None;
    };

    let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let mut url = &rest[..end];
    while let Some(last) = url.chars().last() {
        if matches!(last, '.' | ',' | ':' | ';' | '"' | '\'' | ')' | ']') {
            url = &url[..url.len() - last.len_utf8()];
        } else {
            break;
        }
    }

    if url.len() <= scheme_len {
        return None;
    }
    Some((
        Inline::Link {
            label: url.to_string(),
            href: url.to_string(),
        },
        url.len(),
    ))
}

/// True when `url` carries an http or https scheme with a non-empty rest.
pub(crate) fn is_http_url(url: &str) -> bool {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .is_some_and(|rest| !rest.is_empty())
}
