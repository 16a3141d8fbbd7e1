//! Content helpers: URL link extraction and `{token}` substitution.
//!
//! Both are pure functions applied at edit/render time. Extracted link lists
//! are fully derived from the current text and replace any previously stored
//! list; substitution output is never persisted.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Thumbnail shown for a link until the UI replaces it.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg?height=60&width=60";

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("regex should compile"));

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("regex should compile"));

/// A link derived from a URL found in free text. The `description` is the
/// only hand-edited field; `url` and `image` are machine-managed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepLink {
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
}

impl StepLink {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            description: String::new(),
            image: PLACEHOLDER_IMAGE.to_string(),
        }
    }
}

/// Scan free text for HTTP/HTTPS URLs (greedy non-whitespace match after the
/// scheme) and produce a link record per match, in order of appearance.
pub fn extract_links(content: &str) -> Vec<StepLink> {
    URL_RE
        .find_iter(content)
        .map(|m| StepLink::new(m.as_str()))
        .collect()
}

/// Re-extract links after an edit, preserving the hand-authored
/// `description` (and any replaced `image`) of links whose URL still appears
/// in the text. URLs no longer present are dropped; new URLs start blank.
pub fn refresh_links(content: &str, previous: &[StepLink]) -> Vec<StepLink> {
    extract_links(content)
        .into_iter()
        .map(|link| {
            match previous.iter().find(|prev| prev.url == link.url) {
                Some(prev) => prev.clone(),
                None => link,
            }
        })
        .collect()
}

/// Replace every `{token}` occurrence with its mapped value. Tokens with no
/// mapping are left verbatim so partially-filled forms remain readable.
pub fn substitute(content: &str, vars: &HashMap<String, String>) -> String {
    TOKEN_RE
        .replace_all(content, |caps: &regex::Captures<'_>| {
            match vars.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
