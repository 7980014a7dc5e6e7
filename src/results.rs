use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder used when a page has no usable `<title>`
pub const NO_TITLE: &str = "No title found";

/// A heading found on the page (`h1`..`h6`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading level, 1 through 6
    pub level: u8,

    /// Whitespace-normalized heading text
    pub text: String,
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H{}: {}", self.level, self.text)
    }
}

/// An anchor with a visible label and a target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Visible anchor text
    pub label: String,

    /// Target, resolved against the page URL when possible
    pub target: String,
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.target)
    }
}

/// Normalized snapshot of one fetched page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRecord {
    /// URL the page was fetched from
    pub url: String,

    /// Page title, or [`NO_TITLE`]
    pub title: String,

    /// Main text, whitespace-collapsed and truncated
    pub main_text: String,

    /// Headings in document order
    pub headings: Vec<Heading>,

    /// Links in document order
    pub links: Vec<Link>,

    /// Meta description, empty when the page has none
    pub meta_description: String,
}

impl ContentRecord {
    /// Create a new content record
    pub fn new(
        url: String,
        title: String,
        main_text: String,
        headings: Vec<Heading>,
        links: Vec<Link>,
        meta_description: String,
    ) -> Self {
        Self {
            url,
            title,
            main_text,
            headings,
            links,
            meta_description,
        }
    }

    /// Main text length in characters
    pub fn content_length(&self) -> usize {
        self.main_text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_and_link_rendering() {
        let heading = Heading {
            level: 2,
            text: "Getting started".to_string(),
        };
        assert_eq!(heading.to_string(), "H2: Getting started");

        let link = Link {
            label: "More information".to_string(),
            target: "https://www.iana.org/domains/example".to_string(),
        };
        assert_eq!(
            link.to_string(),
            "More information: https://www.iana.org/domains/example"
        );
    }

    #[test]
    fn test_content_length_counts_characters() {
        let record = ContentRecord::new(
            "https://example.com".to_string(),
            NO_TITLE.to_string(),
            "héllo".to_string(),
            Vec::new(),
            Vec::new(),
            String::new(),
        );
        assert_eq!(record.content_length(), 5);
    }
}
