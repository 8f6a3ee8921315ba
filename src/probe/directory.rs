use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

use async_trait::async_trait;
use percent_encoding::percent_decode_str;
use regex::Regex;

use super::AssetSource;

/// Matches anything carrying its own scheme (`https:`, `data:`, `blob:` ...) or authority (`//host`).
fn foreign_url() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:[A-Za-z][A-Za-z0-9+.-]*:|//)").expect("invalid URL scheme regex")
    })
}

/// Asset source reading sibling files from a local directory tree.
///
/// URLs are interpreted relative to `root`: the query and fragment are dropped, leading `./`
/// and `/` are ignored, and the path is percent-decoded. Remote references and paths that
/// would escape the root are always absent, so a remote override given to a directory source
/// falls through to the configured fallback.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Serve assets from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory assets are read from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns `true` when `url` maps onto a path under the root.
    ///
    /// Says nothing about whether the file exists; it only separates sibling paths from
    /// references this source can never serve.
    pub fn serves(&self, url: &str) -> bool {
        self.local_path(url).is_some()
    }

    fn local_path(&self, url: &str) -> Option<PathBuf> {
        if foreign_url().is_match(url) {
            return None;
        }

        let path = url.split(['?', '#']).next().unwrap_or_default();
        let decoded = percent_decode_str(path).decode_utf8().ok()?;
        let relative = Path::new(decoded.trim_start_matches('/'));

        let mut resolved = self.root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(resolved)
    }
}

#[async_trait]
impl AssetSource for DirectorySource {
    async fn exists(&self, url: &str) -> bool {
        let Some(path) = self.local_path(url) else {
            return false;
        };
        tokio::fs::metadata(&path)
            .await
            .map(|metadata| metadata.is_file())
            .unwrap_or(false)
    }

    async fn fetch_text(&self, url: &str) -> Option<String> {
        let path = self.local_path(url)?;
        tokio::fs::read_to_string(&path).await.ok()
    }
}
