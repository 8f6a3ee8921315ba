//! Named page slots the controller writes into, and a recording implementation.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use serde::Serialize;

use crate::models::HtmlFragment;

/// Places on the host page that receive content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Slot {
    /// Title of the document itself (browser tab, window title).
    DocumentTitle,
    /// Visible page heading.
    Title,
    /// Hero image element driven by the slideshow.
    HeroImage,
    /// Caption under the hero image.
    HeroCaption,
    /// Main markdown body.
    Markdown,
    /// Banner above the body.
    TopBanner,
    /// Banner below the body.
    BottomBanner,
    /// Container for the optional ambient clip.
    Video,
}

impl Slot {
    /// Every slot a full page layout exposes.
    pub const ALL: [Slot; 8] = [
        Slot::DocumentTitle,
        Slot::Title,
        Slot::HeroImage,
        Slot::HeroCaption,
        Slot::Markdown,
        Slot::TopBanner,
        Slot::BottomBanner,
        Slot::Video,
    ];
}

/// Ambient clip shown in the [`Slot::Video`] container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoBlock {
    /// Source URL of the clip.
    pub url: String,
    /// Caption rendered under the clip.
    pub caption: String,
    /// Playback pauses after this many seconds when set.
    pub clip_seconds: Option<u64>,
}

/// Content written into a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum SlotContent {
    /// Plain text.
    Text(String),
    /// Rendered markup.
    Html(HtmlFragment),
    /// Image source URL.
    Image(String),
    /// Video block.
    Video(VideoBlock),
    /// Slot hidden because it has nothing to show.
    Hidden,
}

/// Host page abstraction: which slots exist and how to fill them.
///
/// Writes may arrive from the slideshow task while the controller is still loading, so
/// implementations synchronise internally.
pub trait PageSlots: Send + Sync + 'static {
    /// Returns `true` when the page exposes `slot`.
    fn has(&self, slot: Slot) -> bool;

    /// Replace the content of `slot`. Writes to missing slots are ignored.
    fn write(&self, slot: Slot, content: SlotContent);
}

/// In-memory page that records the latest content of every slot it exposes.
#[derive(Debug, Default)]
pub struct PageView {
    present: BTreeSet<Slot>,
    contents: Mutex<BTreeMap<Slot, SlotContent>>,
    hero_history: Mutex<Vec<String>>,
}

impl PageView {
    /// Page exposing exactly `slots`.
    pub fn with_slots(slots: impl IntoIterator<Item = Slot>) -> Self {
        Self {
            present: slots.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Page exposing every slot.
    pub fn full() -> Self {
        Self::with_slots(Slot::ALL)
    }

    /// Latest content of `slot`, if anything was written.
    pub fn get(&self, slot: Slot) -> Option<SlotContent> {
        self.lock_contents().get(&slot).cloned()
    }

    /// Every hero image source shown so far, in display order.
    pub fn hero_history(&self) -> Vec<String> {
        self.hero_history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Copy of all written slots, suitable for serialisation.
    pub fn snapshot(&self) -> BTreeMap<Slot, SlotContent> {
        self.lock_contents().clone()
    }

    fn lock_contents(&self) -> std::sync::MutexGuard<'_, BTreeMap<Slot, SlotContent>> {
        self.contents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PageSlots for PageView {
    fn has(&self, slot: Slot) -> bool {
        self.present.contains(&slot)
    }

    fn write(&self, slot: Slot, content: SlotContent) {
        if !self.has(slot) {
            return;
        }
        if let (Slot::HeroImage, SlotContent::Image(url)) = (slot, &content) {
            self.hero_history
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .push(url.clone());
        }
        self.lock_contents().insert(slot, content);
    }
}
