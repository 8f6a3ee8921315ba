//! Page load orchestrator wiring asset discovery and markdown rendering into page slots.

use std::sync::Arc;

use serde::Serialize;

use crate::asset_paths::{conventions, resolve_location, title_from_identifier};
use crate::config::PageConfig;
use crate::markdown::{escape_html, render};
use crate::models::{BaseIdentifier, HtmlFragment, MediaChain, PageLocation};
use crate::probe::{AssetResolver, AssetSource};
use crate::slideshow::{SlideshowHandle, start_slideshow, stop_slideshow};
use crate::slots::{PageSlots, Slot, SlotContent, VideoBlock};

const VIDEO_CAPTION: &str = "Video loaded by filename convention";

/// Where the hero images of a load came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageOrigin {
  /// The configured image override.
  Override,
  /// Convention-named sibling images.
  Local,
  /// The configured fallback set.
  Fallback,
  /// Nothing to show, or no hero slot on the page.
  None,
}

/// Outcome of a single page load.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadSummary {
  /// Directory prefix and base identifier of the loaded page.
  pub location: PageLocation,
  /// Title written to the page.
  pub title: String,
  /// Images driving the hero slideshow.
  pub images: MediaChain,
  /// Where `images` came from.
  pub image_origin: ImageOrigin,
  /// Whether a non-empty markdown body was rendered.
  pub markdown_found: bool,
  /// Whether the top banner was rendered.
  pub top_banner: bool,
  /// Whether the bottom banner was rendered.
  pub bottom_banner: bool,
  /// Video source placed in the video slot, if any.
  pub video: Option<String>,
}

/// Drives one page: resolves assets, renders markdown and owns the hero slideshow.
pub struct PageController<S, P> {
  resolver: AssetResolver<S>,
  slots: Arc<P>,
  config: PageConfig,
  slideshow: Option<SlideshowHandle>,
}

impl<S: AssetSource, P: PageSlots> PageController<S, P> {
  /// Create a controller writing into `slots`.
  pub fn new(source: S, slots: Arc<P>, config: PageConfig) -> Self {
    let resolver = AssetResolver::new(source, config.resolver.clone());
    Self {
      resolver,
      slots,
      config,
      slideshow: None,
    }
  }

  /// Replace the cache token used on probe URLs.
  pub fn with_cache_token(mut self, token: impl Into<String>) -> Self {
    self.resolver = self.resolver.with_cache_token(token);
    self
  }

  /// Page slots the controller writes into.
  pub fn slots(&self) -> &Arc<P> {
    &self.slots
  }

  /// Currently running slideshow, if any.
  pub fn slideshow(&self) -> Option<&SlideshowHandle> {
    self.slideshow.as_ref()
  }

  /// Load the page at `location_path` into the slots.
  ///
  /// Missing assets and failed requests only ever shrink what is shown; the load itself
  /// cannot fail.
  pub async fn load(&mut self, location_path: &str) -> LoadSummary {
    let location = resolve_location(location_path);
    let PageLocation { dir, base } = &location;

    let title = self.apply_title(base);
    let (images, image_origin) = self.load_images(dir, base).await;
    let markdown_found = self.load_markdown(dir, base).await;
    let top_banner = self
      .load_banner(Slot::TopBanner, conventions::top_banner_url(dir, base))
      .await;
    let bottom_banner = self
      .load_banner(Slot::BottomBanner, conventions::bottom_banner_url(dir, base))
      .await;
    let video = self.load_video(dir, base).await;

    tracing::info!(
      base = %base,
      images = images.len(),
      markdown_found,
      video = video.is_some(),
      "Page loaded"
    );

    LoadSummary {
      location,
      title,
      images,
      image_origin,
      markdown_found,
      top_banner,
      bottom_banner,
      video,
    }
  }

  /// Swap the hero slideshow for one cycling `chain`.
  ///
  /// The previous slideshow is stopped before the replacement starts, so two slideshows never
  /// write to the hero slot at the same time. Returns `false` when nothing could be started.
  pub fn replace_slideshow(&mut self, chain: &MediaChain) -> bool {
    self.stop();

    let started = start_slideshow(
      chain.urls().to_vec(),
      Arc::clone(&self.slots),
      self.config.slideshow_interval(),
    );
    let Some(handle) = started else {
      return false;
    };

    self.slots.write(
      Slot::HeroCaption,
      SlotContent::Text(format!(
        "Image chain slideshow ({} images, {}s each)",
        handle.frames(),
        self.config.slideshow_interval_secs()
      )),
    );
    self.slideshow = Some(handle);
    true
  }

  /// Stop the running slideshow, if any.
  pub fn stop(&mut self) {
    if let Some(handle) = self.slideshow.take() {
      stop_slideshow(handle);
    }
  }

  fn apply_title(&self, base: &BaseIdentifier) -> String {
    let title = self
      .config
      .overrides
      .title
      .clone()
      .unwrap_or_else(|| title_from_identifier(base.as_str()));

    self
      .slots
      .write(Slot::DocumentTitle, SlotContent::Text(title.clone()));
    self.slots.write(Slot::Title, SlotContent::Text(title.clone()));
    title
  }

  async fn load_images(&mut self, dir: &str, base: &BaseIdentifier) -> (MediaChain, ImageOrigin) {
    if !self.slots.has(Slot::HeroImage) {
      return (MediaChain::default(), ImageOrigin::None);
    }

    if let Some(path) = self.config.overrides.image_path.clone() {
      let chain = MediaChain::from_urls([path]);
      self.replace_slideshow(&chain);
      return (chain, ImageOrigin::Override);
    }

    let fallback = MediaChain::from_urls(self.config.fallback_images.iter().cloned());
    let eager = self.config.eager_fallback && !fallback.is_empty();
    if eager {
      self.replace_slideshow(&fallback);
    }

    let local = self.resolver.probe_configured_chain(dir, base).await;
    if !local.is_empty() {
      self.replace_slideshow(&local);
      return (local, ImageOrigin::Local);
    }

    if fallback.is_empty() {
      self.stop();
      self.slots.write(Slot::HeroImage, SlotContent::Hidden);
      self.slots.write(Slot::HeroCaption, SlotContent::Hidden);
      return (fallback, ImageOrigin::None);
    }

    tracing::debug!(base = %base, "No local images, using fallback set");
    if !eager {
      self.replace_slideshow(&fallback);
    }
    (fallback, ImageOrigin::Fallback)
  }

  async fn load_markdown(&self, dir: &str, base: &BaseIdentifier) -> bool {
    if !self.slots.has(Slot::Markdown) {
      return false;
    }

    let url = self
      .config
      .overrides
      .markdown_path
      .clone()
      .unwrap_or_else(|| conventions::markdown_url(dir, base));

    match self.fetch_non_blank(&url).await {
      Some(text) => {
        self.slots.write(Slot::Markdown, SlotContent::Html(render(&text)));
        true
      }
      None => {
        let placeholder = HtmlFragment::from_rendered(format!(
          "<p>No Markdown found for <code>{}.md</code>.</p>",
          escape_html(base.as_str())
        ));
        self.slots.write(Slot::Markdown, SlotContent::Html(placeholder));
        false
      }
    }
  }

  async fn load_banner(&self, slot: Slot, url: String) -> bool {
    if !self.slots.has(slot) {
      return false;
    }

    match self.fetch_non_blank(&url).await {
      Some(text) => {
        self.slots.write(slot, SlotContent::Html(render(&text)));
        true
      }
      None => {
        self.slots.write(slot, SlotContent::Hidden);
        false
      }
    }
  }

  async fn load_video(&self, dir: &str, base: &BaseIdentifier) -> Option<String> {
    if !self.slots.has(Slot::Video) {
      return None;
    }

    let url = self
      .config
      .overrides
      .video_path
      .clone()
      .unwrap_or_else(|| conventions::video_url(dir, base));

    let chosen = if self.resolver.probe_single_asset(&url).await {
      Some(url)
    } else {
      self.config.fallback_video.clone()
    };

    match &chosen {
      Some(url) => self.slots.write(
        Slot::Video,
        SlotContent::Video(VideoBlock {
          url: url.clone(),
          caption: VIDEO_CAPTION.to_string(),
          clip_seconds: self.config.video_clip_seconds,
        }),
      ),
      None => self.slots.write(Slot::Video, SlotContent::Hidden),
    }
    chosen
  }

  async fn fetch_non_blank(&self, url: &str) -> Option<String> {
    self
      .resolver
      .fetch_text(url)
      .await
      .filter(|text| !text.trim().is_empty())
  }
}
