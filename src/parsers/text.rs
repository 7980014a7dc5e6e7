use crate::parsers::ParsedPage;
use crate::results::NO_TITLE;

/// Appended to text that was cut at the character limit
pub const TRUNCATION_MARKER: &str = "...";

/// Parses a plain-text body
///
/// Plain text has no title, headings or links; the whole body becomes the
/// main text after whitespace normalization and truncation.
pub fn parse(text: &str, max_chars: usize) -> ParsedPage {
    let main_text = truncate(&normalize_whitespace(text), max_chars);
    ::log::debug!("Text parser kept {} characters", main_text.chars().count());

    ParsedPage {
        title: NO_TITLE.to_string(),
        main_text,
        headings: Vec::new(),
        links: Vec::new(),
        meta_description: String::new(),
    }
}

/// Collapses every whitespace run to a single space and trims the ends
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keeps the first `max_chars` characters, appending [`TRUNCATION_MARKER`] if anything was cut
///
/// The cut is a hard character boundary; words and sentences are not respected.
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => {
            let mut cut = text[..byte_index].to_string();
            cut.push_str(TRUNCATION_MARKER);
            cut
        }
        None => text.to_string(),
    }
}
