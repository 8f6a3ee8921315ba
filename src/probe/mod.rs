//! Existence probes and ordered media-chain discovery.
//!
//! Transport is abstracted behind [`AssetSource`]. Every probe resolves to a plain yes/no (or
//! text/nothing): a missing asset and a failed request are the same outcome, so discovery
//! never fails.

mod directory;
mod http;

use async_trait::async_trait;
use futures::future::join_all;

use crate::asset_paths::{cache_token_now, generate_image_candidates, with_cache_bust};
use crate::config::ResolverSettings;
use crate::models::{BaseIdentifier, MediaChain, ProbeResult};

pub use directory::DirectorySource;
pub use http::HttpSource;

/// Transport used to test and fetch sibling assets.
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Lightweight existence check. Transport failures report `false`.
    async fn exists(&self, url: &str) -> bool;

    /// Check whether `url` loads as an image. Defaults to [`AssetSource::exists`].
    async fn probe_image(&self, url: &str) -> bool {
        self.exists(url).await
    }

    /// Fetch a text asset. Missing assets and transport failures yield `None`.
    async fn fetch_text(&self, url: &str) -> Option<String>;
}

/// Probes sibling assets through an [`AssetSource`], cache-busting every request.
pub struct AssetResolver<S> {
    source: S,
    settings: ResolverSettings,
    cache_token: String,
}

impl<S: AssetSource> AssetResolver<S> {
    /// Create a resolver whose cache token is taken from the wall clock.
    pub fn new(source: S, settings: ResolverSettings) -> Self {
        Self {
            source,
            settings,
            cache_token: cache_token_now(),
        }
    }

    /// Replace the cache token appended to probe URLs.
    pub fn with_cache_token(mut self, token: impl Into<String>) -> Self {
        self.cache_token = token.into();
        self
    }

    /// Settings describing the image candidate space.
    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Borrow the underlying transport.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Probe the configured candidate space for `base` inside `dir`.
    pub async fn probe_configured_chain(&self, dir: &str, base: &BaseIdentifier) -> MediaChain {
        self.probe_image_chain(
            dir,
            base,
            self.settings.max_suffixes,
            &self.settings.image_extensions,
        )
        .await
    }

    /// Resolve the ordered image chain for `base`.
    ///
    /// Suffix positions are probed concurrently; within a position extensions are tried in
    /// priority order and the first hit wins. The joined results keep suffix order no matter
    /// which probe finishes first, and positions without a hit are left out.
    pub async fn probe_image_chain(
        &self,
        dir: &str,
        base: &BaseIdentifier,
        max_suffixes: usize,
        extension_order: &[String],
    ) -> MediaChain {
        let groups = generate_image_candidates(max_suffixes, extension_order);
        let probes = groups.into_iter().map(|group| async move {
            for candidate in group {
                let url = candidate.url(dir, base);
                if self.source.probe_image(&self.busted(&url)).await {
                    tracing::debug!(url = %url, "Image candidate found");
                    return ProbeResult::Exists(url);
                }
                tracing::trace!(url = %url, "Image candidate absent");
            }
            ProbeResult::Absent
        });

        let chain = MediaChain::from_results(join_all(probes).await);
        tracing::info!(base = %base, count = chain.len(), "Image chain resolved");
        chain
    }

    /// Existence check for a single non-image asset such as a video or banner.
    pub async fn probe_single_asset(&self, url: &str) -> bool {
        let found = self.source.exists(&self.busted(url)).await;
        tracing::debug!(url = %url, found, "Asset probe");
        found
    }

    /// Fetch a text asset such as a markdown body, bypassing caches.
    pub async fn fetch_text(&self, url: &str) -> Option<String> {
        let text = self.source.fetch_text(&self.busted(url)).await;
        tracing::debug!(url = %url, found = text.is_some(), "Text fetch");
        text
    }

    fn busted(&self, url: &str) -> String {
        with_cache_bust(url, &self.settings.cache_param, &self.cache_token)
    }
}


#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::testing::MemorySource;
    use super::*;

    fn resolver(source: MemorySource) -> AssetResolver<MemorySource> {
        AssetResolver::new(source, ResolverSettings::default()).with_cache_token("t")
    }

    #[tokio::test]
    async fn skips_missing_suffixes_without_placeholders() {
        let source = MemorySource::default()
            .with_file("./walk.jpg", "")
            .with_file("./walk_3.png", "");
        let resolver = resolver(source);

        let chain = resolver
            .probe_configured_chain("./", &BaseIdentifier::new("walk"))
            .await;

        assert_eq!(chain.urls(), ["./walk.jpg".to_string(), "./walk_3.png".to_string()]);
    }

    #[tokio::test]
    async fn prefers_extensions_in_priority_order() {
        let source = MemorySource::default()
            .with_file("walk.png", "")
            .with_file("walk.jpg", "");
        let resolver = resolver(source);

        let chain = resolver
            .probe_image_chain("", &BaseIdentifier::new("walk"), 1, &resolver.settings().image_extensions)
            .await;

        assert_eq!(chain.urls(), ["walk.jpg".to_string()]);
        assert!(
            !resolver.source().requested().iter().any(|u| u.starts_with("walk.png")),
            "probing must stop at the first hit"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn keeps_suffix_order_when_probes_finish_out_of_order() {
        let source = MemorySource::default()
            .with_file("s.jpg", "")
            .with_delay("s.jpg", Duration::from_millis(500))
            .with_file("s_2.webp", "")
            .with_file("s_4.jpg", "")
            .with_delay("s_4.jpg", Duration::from_millis(10));
        let resolver = resolver(source);

        let chain = resolver
            .probe_configured_chain("", &BaseIdentifier::new("s"))
            .await;

        assert_eq!(chain.urls(), [
            "s.jpg".to_string(),
            "s_2.webp".to_string(),
            "s_4.jpg".to_string(),
        ]);
    }

    #[tokio::test]
    async fn empty_candidate_space_yields_empty_chain() {
        let resolver = resolver(MemorySource::default());
        let chain = resolver
            .probe_configured_chain("./", &BaseIdentifier::new("nothing"))
            .await;
        assert!(chain.is_empty());
        assert_eq!(resolver.source().requested().len(), 24);
    }

    #[tokio::test]
    async fn probes_carry_cache_busting_parameter() {
        let resolver = resolver(MemorySource::default().with_file("clip.mp4", ""));

        assert!(resolver.probe_single_asset("clip.mp4").await);
        assert!(!resolver.probe_single_asset("other.mp4").await);
        assert_eq!(resolver.source().requested(), vec![
            "clip.mp4?cb=t".to_string(),
            "other.mp4?cb=t".to_string(),
        ]);
    }

    #[tokio::test]
    async fn fetches_text_through_the_source() {
        let resolver = resolver(MemorySource::default().with_file("a.md", "# A"));
        assert_eq!(resolver.fetch_text("a.md").await.as_deref(), Some("# A"));
        assert_eq!(resolver.fetch_text("b.md").await, None);
    }
}
