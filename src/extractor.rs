use crate::config::ExtractorConfig;
use crate::error::{Error, ExtractError};
use crate::filter::LinkFilter;
use crate::parsers::{ExtractionLimits, Parser, ParserType};
use crate::results::ContentRecord;
use crate::utils::normalize_url;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

/// Fetches one page and turns it into a [`ContentRecord`]
pub struct Extractor {
    client: Client,
    limits: ExtractionLimits,
    link_filter: LinkFilter,
}

impl Extractor {
    /// Create an extractor from configuration
    pub fn new(config: &ExtractorConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::Setup(format!("failed to build HTTP client: {}", e)))?;

        let link_filter = LinkFilter::new(&config.include_patterns, &config.exclude_patterns)
            .map_err(|e| Error::Setup(format!("invalid link pattern: {}", e)))?;

        Ok(Self {
            client,
            limits: ExtractionLimits::from(config),
            link_filter,
        })
    }

    /// Fetch `url` with a single GET and extract its content
    ///
    /// Any failure yields an error; a record is only returned when the page
    /// was fetched and read completely.
    pub async fn extract(&self, url: &str) -> Result<ContentRecord, ExtractError> {
        let url = normalize_url(url)?;
        let url_str = url.to_string();
        let start = std::time::Instant::now();
        ::log::info!("Fetching content from: {}", url_str);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| network_error(&url_str, source))?;

        let status = response.status();
        if !status.is_success() {
            ::log::warn!("{} returned {}", url_str, status);
            return Err(ExtractError::HttpStatus {
                url: url_str,
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let Some(parser_type) = ParserType::from_content_type(content_type.as_deref()) else {
            return Err(ExtractError::Parse {
                url: url_str,
                reason: format!(
                    "unsupported content type {}",
                    content_type.unwrap_or_default()
                ),
            });
        };

        // Decoded with the charset the server declares, UTF-8 otherwise
        let body = response
            .text_with_charset("utf-8")
            .await
            .map_err(|source| network_error(&url_str, source))?;
        if !looks_like_text(&body) {
            return Err(ExtractError::Parse {
                url: url_str,
                reason: "body is not valid text".to_string(),
            });
        }

        // The final URL after redirects is the base for relative links
        let page = Parser::parse(
            &body,
            parser_type,
            Some(&final_url),
            &self.limits,
            &self.link_filter,
        );

        ::log::info!(
            "Extracted {} characters, {} headings and {} links from {} in {:.2} seconds",
            page.main_text.chars().count(),
            page.headings.len(),
            page.links.len(),
            url_str,
            start.elapsed().as_secs_f64()
        );

        Ok(page.into_record(url_str))
    }
}

fn network_error(url: &str, source: reqwest::Error) -> ExtractError {
    ::log::error!("Failed to fetch {}: {}", url, source);
    ExtractError::Network {
        url: url.to_string(),
        source,
    }
}

/// False for decoded bodies that are mostly binary
///
/// A few undecodable bytes in otherwise readable text are tolerated.
fn looks_like_text(body: &str) -> bool {
    if body.contains('\0') {
        return false;
    }
    let replaced = body
        .chars()
        .filter(|c| *c == char::REPLACEMENT_CHARACTER)
        .count();
    let total = body.chars().count().max(1);
    replaced * 10 < total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looks_like_text() {
        assert!(looks_like_text("<p>hi</p>"));
        assert!(looks_like_text(""));
        assert!(looks_like_text("Crème brûlée et café à Paris"));

        // One undecodable byte in otherwise readable text is tolerated
        let mostly_text = String::from_utf8_lossy(b"caf\xe9 au lait and a long enough sentence");
        assert!(looks_like_text(&mostly_text));

        let png = String::from_utf8_lossy(&[0x89, b'P', b'N', b'G', 0, 0, 0x0d]);
        assert!(!looks_like_text(&png));
        let noise = String::from_utf8_lossy(&[0xff, 0xfe, 0xfd, 0xfc]);
        assert!(!looks_like_text(&noise));
    }

    #[test]
    fn test_new_rejects_bad_link_patterns() {
        let config = ExtractorConfig {
            exclude_patterns: vec!["[".to_string()],
            ..ExtractorConfig::default()
        };
        assert!(matches!(Extractor::new(&config), Err(Error::Setup(_))));
    }
}
