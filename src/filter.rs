//! Client-side filtering over listed entities.
//!
//! Listings are fetched wholesale per session; narrowing by search text and
//! tag happens in memory, after the visibility rules have already been
//! applied by the repository.

use unicase::UniCase;

use crate::repository::{CaseResolution, ChatTemplate, EmailTemplate};

/// Case-insensitive substring match using Unicode case folding.
fn contains_case_insensitive(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let haystack_folded = UniCase::new(haystack).to_folded_case();
    let needle_folded = UniCase::new(needle).to_folded_case();
    haystack_folded.contains(&needle_folded)
}

/// Anything that can be narrowed by the search box and the tag selector.
pub trait Filterable {
    fn display_name(&self) -> &str;
    fn tags(&self) -> &[String];
}

impl Filterable for ChatTemplate {
    fn display_name(&self) -> &str {
        &self.name
    }
    fn tags(&self) -> &[String] {
        &self.tags
    }
}

impl Filterable for EmailTemplate {
    fn display_name(&self) -> &str {
        &self.name
    }
    fn tags(&self) -> &[String] {
        &self.tags
    }
}

impl Filterable for CaseResolution {
    fn display_name(&self) -> &str {
        &self.title
    }
    fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// Search text plus an optional tag selection; `None` means "all tags".
#[derive(Debug, Clone, Default)]
pub struct TemplateFilter {
    pub query: String,
    pub tag: Option<String>,
}

impl TemplateFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn matches<T: Filterable>(&self, item: &T) -> bool {
        let matches_search = contains_case_insensitive(item.display_name(), &self.query);
        let matches_tag = match &self.tag {
            Some(tag) => item.tags().iter().any(|t| t == tag),
            None => true,
        };
        matches_search && matches_tag
    }

    /// Narrow a listing, preserving its order.
    pub fn apply<'a, T: Filterable>(&self, items: &'a [T]) -> Vec<&'a T> {
        items.iter().filter(|item| self.matches(*item)).collect()
    }
}
