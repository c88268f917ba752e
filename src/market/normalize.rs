// src/market/normalize.rs

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use super::SiteKind;

static COUNTY_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s+county$").unwrap());

/// Cell values that stand in for "no website" in the source.
const PLACEHOLDER_URLS: &[&str] = &["or facebook.com", "facebook.com", "www.facebook.com"];

/// Turn a raw URL cell into a parsed `Url`.
///
/// Adds `https://` when the scheme is missing. Returns `None` for blanks,
/// known placeholders, a bare facebook.com with no page, and anything that
/// still fails to parse.
pub fn normalize_url(raw: &str) -> Option<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let bare = trimmed.trim_end_matches('/').to_lowercase();
    if PLACEHOLDER_URLS.contains(&bare.as_str()) {
        return None;
    }

    let lower = trimmed.to_lowercase();
    let candidate = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&candidate).ok()?;
    let host = url.host_str()?;
    if matches!(host, "facebook.com" | "www.facebook.com") && url.path() == "/" {
        return None;
    }
    Some(url)
}

/// Categorise a normalised URL. Checks run in order, first hit wins.
pub fn categorize_site(url: &Url) -> SiteKind {
    let s = url.as_str().to_lowercase();
    if s.contains("facebook.com") {
        SiteKind::Facebook
    } else if [".gov", "twp.", "borough", "city"]
        .iter()
        .any(|p| s.contains(p))
    {
        SiteKind::Municipal
    } else if s.contains("chamber") {
        SiteKind::Chamber
    } else if s.contains("farmersmarket") || s.contains("market") {
        SiteKind::DedicatedMarket
    } else {
        SiteKind::Other
    }
}

/// Strip the location qualifier (after an en dash) and a trailing "COUNTY".
pub fn short_name(name: &str) -> String {
    // the source sometimes carries the en dash as mis-decoded UTF-8
    let head = name
        .split('\u{2013}')
        .next()
        .unwrap_or(name)
        .split("\u{e2}\u{20ac}\u{201c}")
        .next()
        .unwrap_or(name)
        .trim();
    COUNTY_SUFFIX.replace(head, "").trim().to_string()
}
