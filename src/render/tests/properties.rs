//! The renderer's contract-level properties: totality, determinism, and the
//! escaping invariant.

use crate::render::{render, render_with_options, RenderOptions};

#[test]
fn empty_input_renders_empty_fragment() {
    assert_eq!(render(""), "");
}

#[test]
fn identical_input_yields_byte_identical_output() {
    let source = "# Hi\n> quote\n- a\n- b\n\nVisit https://example.com, **now**.";
    assert_eq!(render(source), render(source));
}

#[test]
fn literal_angle_brackets_and_ampersands_are_escaped() {
    let html = render("<script>alert('x') & friends</script>");
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;"));
    assert!(html.contains("&amp; friends"));
}

#[test]
fn escaping_applies_inside_every_block_kind() {
    assert_eq!(render("# a<b"), "<h1>a&lt;b</h1>");
    assert_eq!(render("> a<b"), "<blockquote>a&lt;b</blockquote>");
    assert_eq!(render("- a<b"), "<ul>\n<li>a&lt;b</li>\n</ul>");
    assert_eq!(render("1. a<b"), "<ol>\n<li>a&lt;b</li>\n</ol>");
    assert_eq!(render("a<b"), "<p>a&lt;b</p>");
}

#[test]
fn escaping_applies_inside_inline_spans() {
    assert_eq!(render("**a&b**"), "<p><strong>a&amp;b</strong></p>");
    assert_eq!(render("~~a>b~~"), "<p><del>a&gt;b</del></p>");
}

#[test]
fn degenerate_inputs_do_not_panic() {
    for source in [
        "\n",
        "\r\n\r\n",
        "*",
        "**",
        "~",
        "`",
        "[",
        "[](x)",
        "[]()",
        "#",
        "# ",
        ">",
        "- ",
        "1.",
        "https://",
        "\u{0}\u{7f}",
        "﷽",
    ] {
        let _ = render(source);
        let _ = render_with_options(source, RenderOptions::strict_links());
    }
}

#[test]
fn output_is_linear_in_input() {
    // A long pathological run of open delimiters still renders in one pass.
    let source = "*".repeat(10_000);
    let html = render(&source);
    assert!(html.len() < source.len() * 8);
}

#[test]
fn document_wrapper_escapes_the_title() {
    let html = crate::render::render_document("a<b", "hi", RenderOptions::default());
    assert!(html.contains("<title>a&lt;b</title>"));
    assert!(html.contains("<p>hi</p>"));
}
