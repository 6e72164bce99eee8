//! HTML entity escaping for body text and attribute values.
//!
//! Every literal text segment passes through one of these two functions on
//! its way into the output; the emitter has no other path for user text.

use memchr::memchr3;

/// Append `text` to `out` with `&`, `<`, and `>` escaped.
///
/// `&` is handled first so entities introduced here are never re-escaped.
pub fn push_escaped_text(out: &mut String, text: &str) {
    let bytes = text.as_bytes();
    let mut start = 0;
    while let Some(pos) = memchr3(b'&', b'<', b'>', &bytes[start..]) {
        let pos = start + pos;
        out.push_str(&text[start..pos]);
        match bytes[pos] {
            b'&' => out.push_str("&amp;"),
            b'<' => out.push_str("&lt;"),
            _ => out.push_str("&gt;"),
        }
        start = pos + 1;
    }
    out.push_str(&text[start..]);
}

/// Append `text` to `out` escaped for use inside a quoted attribute value.
///
/// Attribute context needs quote escaping on top of the body set; attribute
/// values here are short (hrefs), so a plain scan is fine.
pub fn push_escaped_attr(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escaped(text: &str) -> String {
        let mut out = String::new();
        push_escaped_text(&mut out, text);
        out
    }

    #[test]
    fn test_escapes_angle_brackets_and_ampersand() {
        assert_eq!(escaped("a < b & c > d"), "a &lt; b &amp; c &gt; d");
    }

    #[test]
    fn test_already_escaped_entities_are_escaped_again() {
        // Literal "&amp;" typed by the user must show up as "&amp;" on
        // screen, which means double-escaping the ampersand here.
        assert_eq!(escaped("&amp;"), "&amp;amp;");
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(escaped("hello * _ ~ ` [world]"), "hello * _ ~ ` [world]");
    }

    #[test]
    fn test_attr_escaping_covers_quotes() {
        let mut out = String::new();
        push_escaped_attr(&mut out, "https://x.test/?q=\"a\"&p='b'");
        assert_eq!(out, "https://x.test/?q=&quot;a&quot;&amp;p=&#39;b&#39;");
    }

    #[test]
    fn test_multibyte_text_survives() {
        assert_eq!(escaped("héllo <wörld>"), "héllo &lt;wörld&gt;");
    }
}
