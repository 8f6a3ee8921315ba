//! Helpers for deriving page identity and convention-based asset paths.
//!
//! The responsibilities are split into focused submodules so that identifier parsing, candidate
//! expansion and cache busting can be tested independently. Nothing
//! in here performs I/O; probing lives in [`crate::probe`].

mod base;
mod cache;
mod candidates;

pub use base::{resolve_base, resolve_location, title_from_identifier};
pub use cache::{DEFAULT_CACHE_PARAM, cache_token_now, with_cache_bust};
pub use candidates::{conventions, generate_image_candidates};
