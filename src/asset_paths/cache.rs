use std::time::{SystemTime, UNIX_EPOCH};

/// Default query parameter used to defeat intermediate caches during probing.
pub const DEFAULT_CACHE_PARAM: &str = "cb";

/// Append a cache-defeating query parameter to `url`.
///
/// A fragment, when present, stays at the end of the URL.
pub fn with_cache_bust(url: &str, param: &str, token: &str) -> String {
    let (head, fragment) = match url.find('#') {
        Some(index) => url.split_at(index),
        None => (url, ""),
    };
    let separator = if head.contains('?') { '&' } else { '?' };
    format!("{head}{separator}{param}={token}{fragment}")
}

/// Token derived from the current wall clock, in milliseconds since the Unix epoch.
pub fn cache_token_now() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default()
        .to_string()
}
