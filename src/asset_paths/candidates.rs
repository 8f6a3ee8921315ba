use crate::models::{BaseIdentifier, Candidate};

/// Expand the image candidate space (suffix position x extension).
///
/// The result holds one entry per suffix position, each listing the candidates for that suffix
/// in extension priority order. Probing walks each inner list until the first hit.
pub fn generate_image_candidates<'a>(
    max_suffixes: usize,
    extension_order: &'a [String],
) -> Vec<Vec<Candidate<'a>>> {
    let builder = CandidateBuilder::new(extension_order);
    (0..max_suffixes)
        .map(|suffix_index| builder.for_suffix(suffix_index))
        .collect()
}

struct CandidateBuilder<'a> {
    extensions: Vec<&'a str>,
}

impl<'a> CandidateBuilder<'a> {
    fn new(extension_order: &'a [String]) -> Self {
        let mut extensions: Vec<&'a str> = Vec::with_capacity(extension_order.len());
        for extension in extension_order {
            let cleaned = extension.trim().trim_start_matches('.');
            if cleaned.is_empty() || extensions.contains(&cleaned) {
                continue;
            }
            extensions.push(cleaned);
        }
        Self { extensions }
    }

    fn for_suffix(&self, suffix_index: usize) -> Vec<Candidate<'a>> {
        self.extensions
            .iter()
            .map(|&extension| Candidate {
                suffix_index,
                extension,
            })
            .collect()
    }
}

/// Convention-derived sibling asset URLs for a page.
pub mod conventions {
    use super::BaseIdentifier;

    /// Markdown body: `{dir}{base}.md`.
    pub fn markdown_url(dir: &str, base: &BaseIdentifier) -> String {
        format!("{dir}{base}.md")
    }

    /// Banner shown above the body: `{dir}{base}_top.md`.
    pub fn top_banner_url(dir: &str, base: &BaseIdentifier) -> String {
        format!("{dir}{base}_top.md")
    }

    /// Banner shown below the body: `{dir}{base}_bottom.md`.
    pub fn bottom_banner_url(dir: &str, base: &BaseIdentifier) -> String {
        format!("{dir}{base}_bottom.md")
    }

    /// Optional ambient clip: `{dir}{base}.mp4`.
    pub fn video_url(dir: &str, base: &BaseIdentifier) -> String {
        format!("{dir}{base}.mp4")
    }
}
