//! The individual rewrite stages of the markdown pipeline.
//!
//! Each stage consumes and returns a [`WorkingFragment`]. Stages run strictly in the order of
//! [`PIPELINE`]; later stages only ever see the output of earlier ones.

use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Text in flight through the pipeline plus the fenced code bodies set aside by
/// [`fenced_code`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct WorkingFragment {
    pub(crate) text: String,
    fences: Vec<String>,
}

impl WorkingFragment {
    pub(crate) fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fences: Vec::new(),
        }
    }

    /// Put the fenced code bodies back in place of their placeholders.
    pub(crate) fn finish(self) -> String {
        if self.fences.is_empty() {
            return self.text;
        }

        let fences = self.fences;
        cached(&FENCE_PLACEHOLDER, r#"<pre data-fence="(\d+)"></pre>"#)
            .replace_all(&self.text, |caps: &Captures| {
                match caps[1].parse::<usize>().ok().and_then(|i| fences.get(i)) {
                    Some(code) => format!("<pre><code>{code}</code></pre>"),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    fn map_text(self, text: String) -> Self {
        Self {
            text,
            fences: self.fences,
        }
    }
}

/// A named, pure rewrite step.
#[derive(Clone, Copy)]
pub(crate) struct Stage {
    pub(crate) name: &'static str,
    pub(crate) apply: fn(WorkingFragment) -> WorkingFragment,
}

/// Every stage in execution order.
pub(crate) const PIPELINE: &[Stage] = &[
    Stage { name: "escape", apply: escape },
    Stage { name: "fenced_code", apply: fenced_code },
    Stage { name: "inline_code", apply: inline_code },
    Stage { name: "bold", apply: bold },
    Stage { name: "italic", apply: italic },
    Stage { name: "headings", apply: headings },
    Stage { name: "blockquote", apply: blockquote },
    Stage { name: "rule", apply: rule },
    Stage { name: "lists", apply: lists },
    Stage { name: "links", apply: links },
    Stage { name: "paragraphs", apply: paragraphs },
];

static FENCE: OnceLock<Regex> = OnceLock::new();
static FENCE_PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
static INLINE_CODE: OnceLock<Regex> = OnceLock::new();
static BOLD: OnceLock<Regex> = OnceLock::new();
static ITALIC: OnceLock<Regex> = OnceLock::new();
static HEADING: OnceLock<Regex> = OnceLock::new();
static BLOCKQUOTE: OnceLock<Regex> = OnceLock::new();
static RULE: OnceLock<Regex> = OnceLock::new();
static LIST_BLOCK: OnceLock<Regex> = OnceLock::new();
static LINK: OnceLock<Regex> = OnceLock::new();
static BLANK_LINES: OnceLock<Regex> = OnceLock::new();
static BLOCK_TAG: OnceLock<Regex> = OnceLock::new();

fn cached(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("invalid markdown rule regex"))
}

fn replace(
    working: WorkingFragment,
    cell: &'static OnceLock<Regex>,
    pattern: &str,
    replacement: &str,
) -> WorkingFragment {
    let text = cached(cell, pattern)
        .replace_all(&working.text, replacement)
        .into_owned();
    working.map_text(text)
}

/// Escape `&` first so the entities produced for `<` and `>` are not escaped again.
pub(crate) fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape(working: WorkingFragment) -> WorkingFragment {
    let text = escape_html(&working.text);
    working.map_text(text)
}

fn fenced_code(working: WorkingFragment) -> WorkingFragment {
    let WorkingFragment { text, mut fences } = working;
    let text = cached(&FENCE, r"(?s)```(.*?)```")
        .replace_all(&text, |caps: &Captures| {
            let index = fences.len();
            fences.push(caps[1].to_string());
            format!("<pre data-fence=\"{index}\"></pre>")
        })
        .into_owned();
    WorkingFragment { text, fences }
}

fn inline_code(working: WorkingFragment) -> WorkingFragment {
    replace(working, &INLINE_CODE, r"`([^`]+)`", "<code>${1}</code>")
}

fn bold(working: WorkingFragment) -> WorkingFragment {
    replace(working, &BOLD, r"\*\*([^*]+)\*\*", "<strong>${1}</strong>")
}

fn italic(working: WorkingFragment) -> WorkingFragment {
    replace(working, &ITALIC, r"\*([^*\n]+)\*", "<em>${1}</em>")
}

fn headings(working: WorkingFragment) -> WorkingFragment {
    let text = cached(&HEADING, r"(?m)^(#{1,6})[ \t]+(.*)$")
        .replace_all(&working.text, |caps: &Captures| {
            let level = caps[1].len();
            format!("<h{level}>{}</h{level}>", &caps[2])
        })
        .into_owned();
    working.map_text(text)
}

fn blockquote(working: WorkingFragment) -> WorkingFragment {
    // `>` has already been escaped by the time quotes are recognised.
    replace(
        working,
        &BLOCKQUOTE,
        r"(?m)^&gt;[ \t]+(.*)$",
        "<blockquote>${1}</blockquote>",
    )
}

fn rule(working: WorkingFragment) -> WorkingFragment {
    replace(working, &RULE, r"(?m)^---$", "<hr>")
}

fn lists(working: WorkingFragment) -> WorkingFragment {
    let text = cached(&LIST_BLOCK, r"(?m)^- .*(?:\n- .*)*")
        .replace_all(&working.text, |caps: &Captures| {
            let items: String = caps[0]
                .split('\n')
                .map(|line| format!("<li>{}</li>", line.strip_prefix("- ").unwrap_or(line)))
                .collect();
            format!("<ul>{items}</ul>")
        })
        .into_owned();
    working.map_text(text)
}

fn links(working: WorkingFragment) -> WorkingFragment {
    replace(
        working,
        &LINK,
        // A quote in the target would close the `href` attribute.
        r#"\[([^\]]+)\]\((https?://[^\s)"]+)\)"#,
        r#"<a href="${2}" target="_blank" rel="noopener noreferrer">${1}</a>"#,
    )
}

fn paragraphs(working: WorkingFragment) -> WorkingFragment {
    let block_tag = cached(
        &BLOCK_TAG,
        r"(?i)^<(h[1-6]|ul|li|pre|blockquote|hr|table|img)\b",
    );

    let text = cached(&BLANK_LINES, r"\n\s*\n")
        .split(&working.text)
        .filter(|chunk| !chunk.trim().is_empty())
        .map(|chunk| {
            let chunk = chunk.trim_matches('\n');
            if block_tag.is_match(chunk.trim_start()) {
                chunk.to_string()
            } else {
                format!("<p>{}</p>", chunk.replace('\n', "<br>"))
            }
        })
        .collect::<Vec<_>>()
        .join("\n");
    working.map_text(text)
}
