use thiserror::Error;

/// Reasons a page could not be turned into a content record
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The input is not an http(s) URL with a host
    #[error("invalid URL '{0}'")]
    InvalidUrl(String),

    /// Connection, timeout, or body transfer failure
    #[error("network failure fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// The body is not markup we can read
    #[error("could not parse content from {url}: {reason}")]
    Parse { url: String, reason: String },
}

impl ExtractError {
    /// Message shown on the console
    pub fn user_message(&self) -> String {
        match self {
            ExtractError::InvalidUrl(_) => {
                "❌ Invalid URL format. Please enter an http:// or https:// address.".to_string()
            }
            ExtractError::Network { source, .. } if source.is_timeout() => {
                "❌ The website took too long to respond.".to_string()
            }
            ExtractError::Network { .. } => {
                "❌ Could not reach the website. Check the address and your connection."
                    .to_string()
            }
            ExtractError::HttpStatus { status, .. } => {
                format!("❌ The website responded with HTTP status {}.", status)
            }
            ExtractError::Parse { reason, .. } => {
                format!("❌ The page could not be read: {}.", reason)
            }
        }
    }
}

/// Failures of a text-generation API call
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("blocked by safety filters: {0}")]
    SafetyRejection(String),

    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected API failure: {0}")]
    Unknown(String),
}

impl ApiError {
    /// Message shown on the console
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Authentication(_) => {
                "Error: Invalid Google Gemini API key. Please check your API key and try again."
                    .to_string()
            }
            ApiError::QuotaExceeded(_) => {
                "Error: API quota exceeded. Please check your Google Cloud account.".to_string()
            }
            ApiError::SafetyRejection(_) => {
                "Error: Content was blocked by safety filters. Please try rephrasing your question."
                    .to_string()
            }
            ApiError::Transport(_) => {
                "Error: Could not reach the Gemini API. Please check your connection and try again."
                    .to_string()
            }
            ApiError::Unknown(detail) => {
                format!("Error: An unexpected error occurred - {}", detail)
            }
        }
    }
}

/// Crate-level error
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("console I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid setup: {0}")]
    Setup(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_name_the_failure_class() {
        let auth = ApiError::Authentication("API key not valid".to_string());
        assert!(auth.user_message().contains("Invalid Google Gemini API key"));

        let quota = ApiError::QuotaExceeded("429".to_string());
        assert!(quota.user_message().contains("quota exceeded"));

        let safety = ApiError::SafetyRejection("SAFETY".to_string());
        assert!(safety.user_message().contains("safety filters"));

        let unknown = ApiError::Unknown("boom".to_string());
        assert!(unknown.user_message().ends_with("boom"));
    }

    #[test]
    fn test_http_status_message_includes_code() {
        let err = ExtractError::HttpStatus {
            url: "https://example.com".to_string(),
            status: 404,
        };
        assert!(err.user_message().contains("404"));
        assert_eq!(err.to_string(), "https://example.com returned HTTP 404");
    }
}
