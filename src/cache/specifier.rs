//! Import specifier classification

use once_cell::sync::Lazy;
use regex::Regex;

/// Fully-qualified http(s) URL prefix
pub static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://").expect("Invalid URL_RE regex"));

/// The shapes of specifier the cache can resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Specifier<'a> {
    /// Leading `/`, looked up literally in the referrer's manifest
    /// (e.g. `/npm:tough-cookie@3?dew`)
    CacheAbsolute(&'a str),
    /// Leading `.`, resolved against the referrer's URL path
    Relative(&'a str),
    /// `http://` or `https://`, possibly on another origin
    Url(&'a str),
    /// Anything else (bare package names, `node:`/`npm:` schemes, ...)
    Bare(&'a str),
}

impl<'a> Specifier<'a> {
    pub fn classify(specifier: &'a str) -> Self {
        if specifier.starts_with('/') {
            Specifier::CacheAbsolute(specifier)
        } else if specifier.starts_with('.') {
            Specifier::Relative(specifier)
        } else if URL_RE.is_match(specifier) {
            Specifier::Url(specifier)
        } else {
            Specifier::Bare(specifier)
        }
    }
}
