//! Data structures produced while resolving and rendering a single page load.

use std::fmt;

use serde::Serialize;

/// Identifier used when the location path carries no usable file segment.
pub const DEFAULT_BASE_IDENTIFIER: &str = "index";

/// File name of the current page with its final extension stripped.
///
/// Every convention-based asset name is built from this value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BaseIdentifier(String);

impl BaseIdentifier {
  /// Wrap an already normalised identifier.
  pub fn new(value: impl Into<String>) -> Self {
    Self(value.into())
  }

  /// Borrow the identifier as a string slice.
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl Default for BaseIdentifier {
  fn default() -> Self {
    Self(DEFAULT_BASE_IDENTIFIER.to_string())
  }
}

impl fmt::Display for BaseIdentifier {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl AsRef<str> for BaseIdentifier {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

/// Directory prefix and base identifier derived from the current location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLocation {
  /// Location path up to and including the final `/`, or empty for bare file names.
  pub dir: String,
  /// Base identifier of the current page.
  pub base: BaseIdentifier,
}

/// One point of the candidate space: a suffix position paired with an extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate<'a> {
  /// Position in the suffix sequence; `0` is the unsuffixed primary asset.
  pub suffix_index: usize,
  /// File extension without the leading dot.
  pub extension: &'a str,
}

impl Candidate<'_> {
  /// Suffix appended to the base identifier for this candidate (`""`, `"_2"`, `"_3"`, ...).
  pub fn suffix(&self) -> String {
    suffix_for_index(self.suffix_index)
  }

  /// Concrete URL of the candidate within `dir`.
  pub fn url(&self, dir: &str, base: &BaseIdentifier) -> String {
    format!("{dir}{base}{}.{}", self.suffix(), self.extension)
  }
}

/// Suffix for a position in the chain; position `i >= 1` maps to `_{i + 1}`.
pub fn suffix_for_index(index: usize) -> String {
  if index == 0 {
    String::new()
  } else {
    format!("_{}", index + 1)
  }
}

/// Outcome of testing a single candidate URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
  /// The asset exists at the resolved URL.
  Exists(String),
  /// Nothing answered for the candidate, or the transport failed.
  Absent,
}

impl ProbeResult {
  /// Resolved URL when the probe succeeded.
  pub fn into_url(self) -> Option<String> {
    match self {
      ProbeResult::Exists(url) => Some(url),
      ProbeResult::Absent => None,
    }
  }
}

/// Dense, ordered list of resolved media URLs with at most one entry per suffix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MediaChain {
  urls: Vec<String>,
}

impl MediaChain {
  /// Build a chain from per-suffix probe outcomes kept in suffix order.
  pub fn from_results(results: impl IntoIterator<Item = ProbeResult>) -> Self {
    Self {
      urls: results.into_iter().filter_map(ProbeResult::into_url).collect(),
    }
  }

  /// Build a chain from already resolved URLs.
  pub fn from_urls(urls: impl IntoIterator<Item = String>) -> Self {
    Self {
      urls: urls.into_iter().collect(),
    }
  }

  /// Resolved URLs in suffix order.
  pub fn urls(&self) -> &[String] {
    &self.urls
  }

  /// Number of resolved entries.
  pub fn len(&self) -> usize {
    self.urls.len()
  }

  /// Returns `true` when no suffix resolved.
  pub fn is_empty(&self) -> bool {
    self.urls.is_empty()
  }

  /// Take ownership of the resolved URLs.
  pub fn into_urls(self) -> Vec<String> {
    self.urls
  }
}

/// HTML produced by the markdown renderer, intended for insertion into an existing element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HtmlFragment(String);

impl HtmlFragment {
  pub(crate) fn from_rendered(html: String) -> Self {
    Self(html)
  }

  /// Borrow the fragment markup.
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Take ownership of the fragment markup.
  pub fn into_string(self) -> String {
    self.0
  }
}

impl fmt::Display for HtmlFragment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}
