//! Page configuration describing overrides, probing limits and fallback media.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::asset_paths::DEFAULT_CACHE_PARAM;

/// File searched for next to the served root when no explicit config is given.
pub const DEFAULT_CONFIG_FILE: &str = "pageweaver.config.json";

const FALLBACK_VIDEO_URL: &str =
    "https://interactive-examples.mdn.mozilla.net/media/cc0-videos/flower.mp4";

/// Explicit per-page values that win over convention-derived paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageOverrides {
    /// Markdown body URL used instead of `{dir}{base}.md`.
    pub markdown_path: Option<String>,
    /// Single hero image URL used instead of probing the image chain.
    pub image_path: Option<String>,
    /// Display title used instead of the one derived from the base identifier.
    pub title: Option<String>,
    /// Video URL used instead of `{dir}{base}.mp4`.
    pub video_path: Option<String>,
}

impl PageOverrides {
    /// Layer `higher` on top of `self`; any value set in `higher` wins.
    pub fn merged_with(self, higher: PageOverrides) -> PageOverrides {
        PageOverrides {
            markdown_path: non_blank(higher.markdown_path).or(non_blank(self.markdown_path)),
            image_path: non_blank(higher.image_path).or(non_blank(self.image_path)),
            title: non_blank(higher.title).or(non_blank(self.title)),
            video_path: non_blank(higher.video_path).or(non_blank(self.video_path)),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Limits of the image candidate space.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolverSettings {
    /// Number of suffix positions probed: the primary image plus `_2` ... `_N`.
    pub max_suffixes: usize,
    /// Image extensions tried per suffix, highest priority first.
    pub image_extensions: Vec<String>,
    /// Query parameter carrying the cache-defeating token on every probe.
    pub cache_param: String,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            max_suffixes: 6,
            image_extensions: ["jpg", "jpeg", "png", "webp"]
                .into_iter()
                .map(String::from)
                .collect(),
            cache_param: DEFAULT_CACHE_PARAM.into(),
        }
    }
}

/// Complete configuration for one page load.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageConfig {
    /// Explicit per-page overrides.
    pub overrides: PageOverrides,
    /// Candidate space used while probing images.
    pub resolver: ResolverSettings,
    /// Delay between slideshow frames, in milliseconds.
    pub slideshow_interval_ms: u64,
    /// Images shown when no local image resolves. Empty hides the hero slot instead.
    pub fallback_images: Vec<String>,
    /// Clip shown when no local video exists. `None` hides the video slot instead.
    pub fallback_video: Option<String>,
    /// Playback length of the ambient clip before it pauses, in seconds.
    pub video_clip_seconds: Option<u64>,
    /// Start the fallback slideshow before probing and swap in local images once resolved.
    pub eager_fallback: bool,
    /// Per-request timeout for HTTP sources, in milliseconds.
    pub request_timeout_ms: u64,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            overrides: PageOverrides::default(),
            resolver: ResolverSettings::default(),
            slideshow_interval_ms: 6_000,
            fallback_images: (1..=6)
                .map(|n| format!("https://picsum.photos/seed/pw{n}/1600/900.jpg"))
                .collect(),
            fallback_video: Some(FALLBACK_VIDEO_URL.into()),
            video_clip_seconds: Some(6),
            eager_fallback: false,
            request_timeout_ms: 10_000,
        }
    }
}

impl PageConfig {
    /// Attempt to load configuration from the provided directory.
    ///
    /// A missing file yields the defaults. A file that fails to parse is reported and the
    /// defaults are used so that a page load never stops on configuration.
    pub fn discover(root: &Path) -> Self {
        let candidate = root.join(DEFAULT_CONFIG_FILE);
        if !candidate.is_file() {
            return Self::default();
        }

        match Self::from_path(&candidate) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %candidate.display(), error = %err, "Ignoring unreadable config");
                Self::default()
            }
        }
    }

    /// Read configuration from a specific JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Slideshow frame interval, never shorter than one millisecond.
    pub fn slideshow_interval(&self) -> Duration {
        Duration::from_millis(self.slideshow_interval_ms.max(1))
    }

    /// Timeout applied to each HTTP request.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Slideshow interval rounded to whole seconds for captions.
    pub fn slideshow_interval_secs(&self) -> u64 {
        (self.slideshow_interval_ms + 500) / 1_000
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_convention() {
        let config = PageConfig::default();
        assert_eq!(config.resolver.max_suffixes, 6);
        assert_eq!(config.resolver.image_extensions, vec!["jpg", "jpeg", "png", "webp"]);
        assert_eq!(config.resolver.cache_param, "cb");
        assert_eq!(config.fallback_images.len(), 6);
        assert_eq!(config.slideshow_interval_secs(), 6);
        assert!(!config.eager_fallback);
    }

    #[test]
    fn discover_uses_defaults_without_file() {
        let dir = tempdir().unwrap();
        assert_eq!(PageConfig::discover(dir.path()), PageConfig::default());
    }

    #[test]
    fn discover_reads_partial_files() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            r#"{
              "overrides": { "title": "Field Notes" },
              "resolver": { "maxSuffixes": 3 },
              "fallbackImages": [],
              "eagerFallback": true
            }"#,
        )
        .unwrap();

        let config = PageConfig::discover(dir.path());
        assert_eq!(config.overrides.title.as_deref(), Some("Field Notes"));
        assert_eq!(config.resolver.max_suffixes, 3);
        assert_eq!(config.resolver.image_extensions.len(), 4);
        assert!(config.fallback_images.is_empty());
        assert!(config.eager_fallback);
    }

    #[test]
    fn discover_ignores_malformed_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "{ not json").unwrap();
        assert_eq!(PageConfig::discover(dir.path()), PageConfig::default());
    }

    #[test]
    fn from_path_reports_parse_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, r#"{ "slideshowIntervalMs": "soon" }"#).unwrap();
        let err = PageConfig::from_path(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    fn higher_overrides_win_and_blanks_are_ignored() {
        let file = PageOverrides {
            markdown_path: Some("body.md".into()),
            title: Some("From File".into()),
            ..Default::default()
        };
        let cli = PageOverrides {
            title: Some("From Flag".into()),
            markdown_path: Some("   ".into()),
            video_path: Some("clip.mp4".into()),
            ..Default::default()
        };

        let merged = file.merged_with(cli);
        assert_eq!(merged.title.as_deref(), Some("From Flag"));
        assert_eq!(merged.markdown_path.as_deref(), Some("body.md"));
        assert_eq!(merged.video_path.as_deref(), Some("clip.mp4"));
        assert_eq!(merged.image_path, None);
    }
}
