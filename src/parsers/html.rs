use crate::filter::LinkFilter;
use crate::parsers::text::{normalize_whitespace, truncate};
use crate::parsers::{ExtractionLimits, ParsedPage};
use crate::results::{Heading, Link, NO_TITLE};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Elements whose text never counts as page content
const STRIPPED_ELEMENTS: &[&str] = &[
    "script", "style", "noscript", "nav", "footer", "header", "aside",
];

/// Selectors tried in order when looking for the main content
const MAIN_SELECTORS: &[&str] = &["main", "article", ".content", "#content", ".main", "#main"];

/// Elements that separate words even when the markup has no whitespace between them
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "figure", "form", "h1", "h2", "h3", "h4", "h5", "h6", "hr", "li", "main", "ol", "p",
    "pre", "section", "table", "td", "th", "tr", "ul",
];

/// Parses an HTML document into title, main text, headings, links and description
pub fn parse(
    html: &str,
    base_url: Option<&Url>,
    limits: &ExtractionLimits,
    link_filter: &LinkFilter,
) -> ParsedPage {
    let doc = Html::parse_document(html);

    let page = ParsedPage {
        title: extract_title(&doc),
        main_text: extract_main_text(&doc, limits.max_main_text_chars),
        headings: extract_headings(&doc, limits.max_headings),
        links: extract_links(&doc, base_url, limits.max_links, link_filter),
        meta_description: extract_meta_description(&doc),
    };

    ::log::debug!(
        "HTML parser found {} headings and {} links",
        page.headings.len(),
        page.links.len()
    );
    if !page.links.is_empty() {
        ::log::debug!(
            "First few links: {:?}",
            page.links.iter().take(5).collect::<Vec<_>>()
        );
    }

    page
}

/// First `<title>` text, or the placeholder
pub fn extract_title(doc: &Html) -> String {
    doc.select(&selector("title"))
        .next()
        .map(|title| normalize_whitespace(&title.text().collect::<String>()))
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string())
}

/// Text of the first matching main-content selector, else the whole body
pub fn extract_main_text(doc: &Html, max_chars: usize) -> String {
    for css in MAIN_SELECTORS {
        let text = doc
            .select(&selector(css))
            .filter(|element| !is_stripped(*element))
            .map(visible_text)
            .map(|text| normalize_whitespace(&text))
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if !text.is_empty() {
            ::log::debug!("Main content found with selector '{}'", css);
            return truncate(&text, max_chars);
        }
    }

    ::log::debug!("No main content container, falling back to body");
    let text = match doc.select(&selector("body")).next() {
        Some(body) => visible_text(body),
        None => visible_text(doc.root_element()),
    };
    truncate(&normalize_whitespace(&text), max_chars)
}

/// `h1`..`h6` in document order, skipping empty ones
pub fn extract_headings(doc: &Html, max_headings: usize) -> Vec<Heading> {
    doc.select(&selector("h1, h2, h3, h4, h5, h6"))
        .filter(|element| !is_stripped(*element))
        .filter_map(|element| {
            let level = element.value().name()[1..].parse::<u8>().ok()?;
            let text = normalize_whitespace(&visible_text(element));
            (!text.is_empty()).then_some(Heading { level, text })
        })
        .take(max_headings)
        .collect()
}

/// Anchors with a visible label and a target accepted by the filter
pub fn extract_links(
    doc: &Html,
    base_url: Option<&Url>,
    max_links: usize,
    link_filter: &LinkFilter,
) -> Vec<Link> {
    doc.select(&selector("a[href]"))
        .filter(|element| !is_stripped(*element))
        .filter_map(|element| {
            let label = normalize_whitespace(&visible_text(element));
            if label.is_empty() {
                return None;
            }
            let href = element.value().attr("href")?;
            let target = link_filter.accept(href, base_url)?;
            Some(Link { label, target })
        })
        .take(max_links)
        .collect()
}

/// `content` of `<meta name="description">`, or an empty string
pub fn extract_meta_description(doc: &Html) -> String {
    doc.select(&selector("meta[name]"))
        .find(|meta| {
            meta.value()
                .attr("name")
                .is_some_and(|name| name.trim().eq_ignore_ascii_case("description"))
        })
        .and_then(|meta| meta.value().attr("content"))
        .map(|content| content.trim().to_string())
        .unwrap_or_default()
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("Built-in selectors should be valid")
}

/// True if the element or one of its ancestors is a stripped element
fn is_stripped(element: ElementRef) -> bool {
    if STRIPPED_ELEMENTS.contains(&element.value().name()) {
        return true;
    }
    element.ancestors().any(|node| {
        node.value()
            .as_element()
            .is_some_and(|ancestor| STRIPPED_ELEMENTS.contains(&ancestor.name()))
    })
}

/// Text under `element`, leaving out stripped subtrees
fn visible_text(element: ElementRef) -> String {
    let mut out = String::new();
    collect_text(element, &mut out);
    out
}

fn collect_text(element: ElementRef, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            continue;
        }

        let Some(child) = ElementRef::wrap(child) else {
            continue;
        };
        let name = child.value().name();
        if STRIPPED_ELEMENTS.contains(&name) {
            continue;
        }

        let block = BLOCK_ELEMENTS.contains(&name);
        if block {
            out.push(' ');
        }
        collect_text(child, out);
        if block {
            out.push(' ');
        }
    }
}
