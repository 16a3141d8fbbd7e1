use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TemplateError;

/// The authenticated identity a repository operation is performed for.
///
/// This is the opaque user handle issued by the identity provider. It is
/// always passed explicitly into repository calls; the repository layer never
/// reads it from ambient state, so the core stays testable without a UI
/// harness.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewer {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, rename = "photoURL")]
    pub photo_url: String,
}

impl Viewer {
    /// Create a viewer with only an id; the profile fields default to empty.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

/// Content language. Informational only: it drives right-to-left rendering in
/// the presentation layer and is never authoritative for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    He,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::En => write!(f, "en"),
            Language::He => write!(f, "he"),
        }
    }
}

impl FromStr for Language {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" => Ok(Language::En),
            "he" => Ok(Language::He),
            _ => Err(TemplateError::InvalidLanguage(s.to_string())),
        }
    }
}

pub const VALID_LANGUAGES: &[&str] = &["en", "he"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_round_trip() {
        for s in VALID_LANGUAGES {
            let lang: Language = s.parse().unwrap();
            assert_eq!(lang.to_string(), *s);
        }
    }

    #[test]
    fn test_language_invalid() {
        assert!(matches!(
            "fr".parse::<Language>(),
            Err(TemplateError::InvalidLanguage(_))
        ));
    }

    #[test]
    fn test_viewer_new_defaults() {
        let viewer = Viewer::new("u-1");
        assert_eq!(viewer.id, "u-1");
        assert!(viewer.email.is_empty());
        assert!(viewer.display_name.is_empty());
    }
}
