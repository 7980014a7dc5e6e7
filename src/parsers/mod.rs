pub mod html;
pub mod text;


use crate::config::ExtractorConfig;
use crate::filter::LinkFilter;
use crate::results::{ContentRecord, Heading, Link};
use url::Url;

/// Enum to represent the kinds of body we know how to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserType {
    /// HTML or XHTML markup
    Html,
    /// Plain text
    Text,
}

impl ParserType {
    /// Determines the parser type from a `Content-Type` header value
    ///
    /// A missing header is treated as HTML. Returns `None` for bodies that are
    /// not text at all (images, PDFs, archives, ...).
    pub fn from_content_type(content_type: Option<&str>) -> Option<Self> {
        let Some(content_type) = content_type else {
            ::log::debug!("No Content-Type, classifying as HTML");
            return Some(ParserType::Html);
        };

        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match mime.as_str() {
            "" | "text/html" | "application/xhtml+xml" | "application/xml" | "text/xml" => {
                ::log::debug!("Classifying as HTML: {}", mime);
                Some(ParserType::Html)
            }
            other if other.starts_with("text/") => {
                ::log::debug!("Classifying as Text: {}", mime);
                Some(ParserType::Text)
            }
            _ => {
                ::log::debug!("Unsupported content type: {}", mime);
                None
            }
        }
    }
}

/// Caps applied while extracting a page
#[derive(Debug, Clone, Copy)]
pub struct ExtractionLimits {
    /// Characters of main text kept before the truncation marker
    pub max_main_text_chars: usize,
    /// Headings kept
    pub max_headings: usize,
    /// Links kept
    pub max_links: usize,
}

impl Default for ExtractionLimits {
    fn default() -> Self {
        Self::from(&ExtractorConfig::default())
    }
}

impl From<&ExtractorConfig> for ExtractionLimits {
    fn from(config: &ExtractorConfig) -> Self {
        Self {
            max_main_text_chars: config.max_main_text_chars,
            max_headings: config.max_headings,
            max_links: config.max_links,
        }
    }
}

/// Everything extracted from one body, before it is tied to a URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPage {
    pub title: String,
    pub main_text: String,
    pub headings: Vec<Heading>,
    pub links: Vec<Link>,
    pub meta_description: String,
}

impl ParsedPage {
    /// Attach the source URL and produce the final record
    pub fn into_record(self, url: String) -> ContentRecord {
        ContentRecord::new(
            url,
            self.title,
            self.main_text,
            self.headings,
            self.links,
            self.meta_description,
        )
    }
}

/// Main parser that delegates to specific format parsers
pub struct Parser;

impl Parser {
    /// Parse a body based on the parser type
    pub fn parse(
        body: &str,
        parser_type: ParserType,
        base_url: Option<&Url>,
        limits: &ExtractionLimits,
        link_filter: &LinkFilter,
    ) -> ParsedPage {
        match parser_type {
            ParserType::Html => html::parse(body, base_url, limits, link_filter),
            ParserType::Text => text::parse(body, limits.max_main_text_chars),
        }
    }
}
