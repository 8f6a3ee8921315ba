#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_paths;
pub mod config;
pub mod controller;
pub mod markdown;
pub mod models;
pub mod probe;
pub mod slideshow;
pub mod slots;

pub use config::{PageConfig, PageOverrides, ResolverSettings};
pub use controller::{ImageOrigin, LoadSummary, PageController};
pub use markdown::render;
pub use models::{BaseIdentifier, HtmlFragment, MediaChain, PageLocation};
pub use probe::{AssetResolver, AssetSource, DirectorySource, HttpSource};
pub use slideshow::{SlideshowHandle, start_slideshow, stop_slideshow};
pub use slots::{PageSlots, PageView, Slot, SlotContent, VideoBlock};
