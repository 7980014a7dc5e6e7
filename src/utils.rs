use crate::error::ExtractError;
use url::Url;

/// Turn user input into an http(s) URL, assuming https when no scheme is given
pub fn normalize_url(input: &str) -> Result<Url, ExtractError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ExtractError::InvalidUrl(input.to_string()));
    }

    let lowered = trimmed.to_ascii_lowercase();
    let candidate = if lowered.starts_with("http://") || lowered.starts_with("https://") {
        trimmed.to_string()
    } else if trimmed.contains("://") {
        // Some other scheme
        return Err(ExtractError::InvalidUrl(input.to_string()));
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&candidate).map_err(|_| ExtractError::InvalidUrl(input.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none_or(str::is_empty) {
        return Err(ExtractError::InvalidUrl(input.to_string()));
    }

    Ok(url)
}

/// Google API keys conventionally start with "AI"
pub fn looks_like_google_api_key(key: &str) -> bool {
    key.starts_with("AI")
}
