//! Minimal markdown to HTML rendering for page bodies and banners.
//!
//! The renderer understands a deliberately small grammar: fenced and inline code, bold, italic,
//! headings, single-line blockquotes, horizontal rules, `- ` bullet lists, absolute links and
//! paragraphs. Input is HTML-escaped before any tag is produced, so the only markup in the
//! output is markup the renderer wrote itself.

mod rules;

use crate::models::HtmlFragment;

use rules::{PIPELINE, WorkingFragment};

/// Render markdown into an HTML fragment.
///
/// Rendering is pure: the same input always yields byte-identical output.
pub fn render(markdown: &str) -> HtmlFragment {
    let normalised = markdown.replace("\r\n", "\n");
    let working = PIPELINE
        .iter()
        .fold(WorkingFragment::new(normalised), |working, stage| {
            (stage.apply)(working)
        });
    HtmlFragment::from_rendered(working.finish())
}

/// Names of the rewrite stages in the order they run.
pub fn stage_names() -> Vec<&'static str> {
    PIPELINE.iter().map(|stage| stage.name).collect()
}

/// Escape `&`, `<` and `>` for safe inclusion in markup.
pub fn escape_html(text: &str) -> String {
    rules::escape_html(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn html(markdown: &str) -> String {
        render(markdown).into_string()
    }

    #[test]
    fn stages_run_in_fixed_order() {
        assert_eq!(stage_names(), vec![
            "escape",
            "fenced_code",
            "inline_code",
            "bold",
            "italic",
            "headings",
            "blockquote",
            "rule",
            "lists",
            "links",
            "paragraphs",
        ]);
    }

    #[test]
    fn escapes_raw_markup() {
        assert_eq!(html("A & B <b>"), "<p>A &amp; B &lt;b&gt;</p>");
        assert_eq!(
            html("<script>alert(1)</script>"),
            "<p>&lt;script&gt;alert(1)&lt;/script&gt;</p>"
        );
    }

    #[test]
    fn renders_heading_then_paragraph() {
        assert_eq!(html("# Title\n\nBody"), "<h1>Title</h1>\n<p>Body</p>");
    }

    #[test]
    fn normalises_crlf_line_endings() {
        assert_eq!(html("# Title\r\n\r\nBody\r\n"), "<h1>Title</h1>\n<p>Body</p>");
    }

    #[test]
    fn renders_consecutive_bullets_as_one_list() {
        assert_eq!(
            html("- one\n- two\n- three"),
            "<ul><li>one</li><li>two</li><li>three</li></ul>"
        );
    }

    #[test]
    fn blank_line_or_text_ends_a_list() {
        assert_eq!(
            html("- a\n- b\n\nafter"),
            "<ul><li>a</li><li>b</li></ul>\n<p>after</p>"
        );

        let split = html("- a\ntext\n- b");
        assert_eq!(split.matches("<ul>").count(), 2);
    }

    #[test]
    fn bold_and_italic_do_not_interfere() {
        assert_eq!(
            html("**bold** and *italic*"),
            "<p><strong>bold</strong> and <em>italic</em></p>"
        );
    }

    #[test]
    fn triple_asterisks_nest_emphasis_around_strong() {
        assert_eq!(html("***a***"), "<p><em><strong>a</strong></em></p>");
    }

    #[test]
    fn italic_does_not_cross_lines() {
        assert_eq!(html("*a\nb*"), "<p>*a<br>b*</p>");
    }

    #[test]
    fn inline_code_keeps_escaped_content() {
        assert_eq!(html("Use `a < b`"), "<p>Use <code>a &lt; b</code></p>");
    }

    #[test]
    fn fenced_code_is_untouched_by_later_rules() {
        let source = "```\nlet *x* = `y`;\n\n# not a heading\n```";
        assert_eq!(
            html(source),
            "<pre><code>\nlet *x* = `y`;\n\n# not a heading\n</code></pre>"
        );
    }

    #[test]
    fn fenced_code_inside_text_stays_in_its_paragraph() {
        assert_eq!(
            html("see ```a<b``` here"),
            "<p>see <pre><code>a&lt;b</code></pre> here</p>"
        );
    }

    #[test]
    fn blockquotes_are_per_line() {
        assert_eq!(
            html("> quoted\n> twice"),
            "<blockquote>quoted</blockquote>\n<blockquote>twice</blockquote>"
        );
    }

    #[test]
    fn rules_split_paragraphs() {
        assert_eq!(html("above\n\n---\n\nbelow"), "<p>above</p>\n<hr>\n<p>below</p>");
    }

    #[test]
    fn only_absolute_links_become_anchors() {
        assert_eq!(
            html("[site](https://example.com/a?b=1&c=2) and [rel](docs/x.md)"),
            "<p><a href=\"https://example.com/a?b=1&amp;c=2\" target=\"_blank\" \
             rel=\"noopener noreferrer\">site</a> and [rel](docs/x.md)</p>"
        );
    }

    #[test]
    fn quotes_in_link_targets_cannot_add_attributes() {
        let rendered = html(r#"[x](https://e.com/"onmouseover="alert(1))"#);
        assert!(!rendered.contains("<a "), "{rendered}");
        assert_eq!(rendered, r#"<p>[x](https://e.com/"onmouseover="alert(1))</p>"#);
    }

    #[test]
    fn single_newlines_become_breaks() {
        assert_eq!(html("line one\nline two"), "<p>line one<br>line two</p>");
        assert_eq!(html("a\n\n\n\nb"), "<p>a</p>\n<p>b</p>");
    }

    #[test]
    fn rendering_is_deterministic() {
        let source = "# T\n\n- a\n- b\n\n**x** *y* `z`\n\n```\ncode\n```";
        assert_eq!(render(source), render(source));
    }

    #[test]
    fn empty_input_renders_nothing() {
        assert_eq!(html(""), "");
        assert_eq!(html("\n\n  \n"), "");
    }

    #[test]
    fn escape_helper_matches_pipeline() {
        assert_eq!(escape_html("a<b>&"), "a&lt;b&gt;&amp;");
    }
}
