//! Display-only tag vocabularies.
//!
//! Each entity kind has its own predefined list used by the presentation
//! layer for suggestion and badge coloring. The vocabularies are reference
//! tables joined at display time; stored tags are never validated against
//! them, so entities may carry tags outside these lists.

/// One predefined tag with its badge color token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagSpec {
    pub name: &'static str,
    pub color: &'static str,
}

pub const FALLBACK_TAG_COLOR: &str = "bg-gray-100 text-gray-800";

pub const CHAT_TEMPLATE_TAGS: &[TagSpec] = &[
    TagSpec { name: "pixel", color: "bg-blue-100 text-blue-800" },
    TagSpec { name: "whatsapp", color: "bg-green-100 text-green-800" },
    TagSpec { name: "instagram", color: "bg-purple-100 text-purple-800" },
    TagSpec { name: "ads-manager", color: "bg-orange-100 text-orange-800" },
    TagSpec { name: "facebook", color: "bg-indigo-100 text-indigo-800" },
    TagSpec { name: "messenger", color: "bg-pink-100 text-pink-800" },
    TagSpec { name: "business-manager", color: "bg-teal-100 text-teal-800" },
    TagSpec { name: "commerce-manager", color: "bg-red-100 text-red-800" },
    TagSpec { name: "new chat", color: "bg-blue-100 text-blue-800" },
    TagSpec { name: "closing", color: "bg-green-100 text-green-800" },
    TagSpec { name: "pause", color: "bg-yellow-100 text-yellow-800" },
    TagSpec { name: "collecting assets", color: "bg-red-100 text-red-800" },
    TagSpec { name: "self serve", color: "bg-purple-100 text-purple-800" },
    TagSpec { name: "MPS transfer", color: "bg-pink-100 text-pink-800" },
    TagSpec { name: "call permission", color: "bg-indigo-100 text-indigo-800" },
    TagSpec { name: "no response", color: "bg-teal-100 text-teal-800" },
    TagSpec { name: "other", color: "bg-gray-100 text-gray-800" },
    TagSpec { name: "email", color: "bg-gray-100 text-gray-800" },
];

pub const EMAIL_TEMPLATE_TAGS: &[TagSpec] = &[
    TagSpec { name: "updating", color: "bg-blue-100 text-blue-800" },
    TagSpec { name: "asking", color: "bg-green-100 text-green-800" },
    TagSpec { name: "requesting", color: "bg-yellow-100 text-yellow-800" },
    TagSpec { name: "facebook", color: "bg-indigo-100 text-indigo-800" },
    TagSpec { name: "instagram", color: "bg-purple-100 text-purple-800" },
    TagSpec { name: "whatsapp", color: "bg-green-200 text-green-800" },
    TagSpec { name: "messenger", color: "bg-pink-100 text-pink-800" },
    TagSpec { name: "ads-manager", color: "bg-orange-100 text-orange-800" },
    TagSpec { name: "business-manager", color: "bg-teal-100 text-teal-800" },
    TagSpec { name: "commerce-manager", color: "bg-red-100 text-red-800" },
];

pub const CASE_RESOLUTION_TAGS: &[TagSpec] = &[
    TagSpec { name: "facebook", color: "bg-blue-100 text-blue-800" },
    TagSpec { name: "instagram", color: "bg-purple-100 text-purple-800" },
    TagSpec { name: "whatsapp", color: "bg-green-200 text-green-800" },
    TagSpec { name: "messenger", color: "bg-pink-100 text-pink-800" },
    TagSpec { name: "ads-manager", color: "bg-orange-100 text-orange-800" },
    TagSpec { name: "business-manager", color: "bg-teal-100 text-teal-800" },
    TagSpec { name: "commerce-manager", color: "bg-red-100 text-red-800" },
    TagSpec { name: "pixel", color: "bg-indigo-100 text-indigo-800" },
    TagSpec { name: "events-manager", color: "bg-yellow-100 text-yellow-800" },
];

/// Badge color for `name` within a vocabulary, falling back to the neutral
/// token for tags outside the predefined list.
pub fn tag_color(vocabulary: &[TagSpec], name: &str) -> &'static str {
    vocabulary
        .iter()
        .find(|spec| spec.name == name)
        .map(|spec| spec.color)
        .unwrap_or(FALLBACK_TAG_COLOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tag_color() {
        assert_eq!(
            tag_color(CHAT_TEMPLATE_TAGS, "pixel"),
            "bg-blue-100 text-blue-800"
        );
    }

    #[test]
    fn test_unknown_tag_falls_back() {
        assert_eq!(tag_color(CHAT_TEMPLATE_TAGS, "bespoke"), FALLBACK_TAG_COLOR);
    }

    #[test]
    fn test_vocabularies_have_no_duplicates() {
        for vocab in [CHAT_TEMPLATE_TAGS, EMAIL_TEMPLATE_TAGS, CASE_RESOLUTION_TAGS] {
            let mut names: Vec<&str> = vocab.iter().map(|s| s.name).collect();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), vocab.len());
        }
    }
}
