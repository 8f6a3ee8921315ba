use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, Url};

use super::AssetSource;

/// Asset source backed by an HTTP origin.
///
/// Relative asset URLs are joined onto the origin; absolute URLs are requested as they are.
pub struct HttpSource {
    origin: Url,
    client: Client,
}

impl HttpSource {
    /// Create a source for `origin` with a per-request timeout.
    pub fn new(origin: &str, timeout: Duration) -> Result<Self> {
        let origin = Url::parse(origin).with_context(|| format!("invalid origin URL {origin}"))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { origin, client })
    }

    fn resolve(&self, url: &str) -> Option<Url> {
        match self.origin.join(url) {
            Ok(resolved) => Some(resolved),
            Err(err) => {
                tracing::debug!(url = %url, error = %err, "Unresolvable asset URL");
                None
            }
        }
    }

    async fn head(&self, url: &str) -> Option<Response> {
        let target = self.resolve(url)?;
        match self.client.head(target).send().await {
            Ok(response) if response.status().is_success() => Some(response),
            Ok(response) => {
                tracing::trace!(url = %url, status = %response.status(), "Asset missing");
                None
            }
            Err(err) => {
                tracing::debug!(url = %url, error = %err, "Asset probe failed");
                None
            }
        }
    }
}

#[async_trait]
impl AssetSource for HttpSource {
    async fn exists(&self, url: &str) -> bool {
        self.head(url).await.is_some()
    }

    async fn probe_image(&self, url: &str) -> bool {
        let Some(response) = self.head(url).await else {
            return false;
        };

        match response.headers().get(CONTENT_TYPE) {
            Some(value) => value
                .to_str()
                .map(|content_type| content_type.trim_start().starts_with("image/"))
                .unwrap_or(false),
            None => true,
        }
    }

    async fn fetch_text(&self, url: &str) -> Option<String> {
        let target = self.resolve(url)?;
        let response = match self.client.get(target).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(_) => return None,
            Err(err) => {
                tracing::debug!(url = %url, error = %err, "Text fetch failed");
                return None;
            }
        };
        response.text().await.ok()
    }
}
