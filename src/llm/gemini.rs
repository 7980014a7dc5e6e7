use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::TextGenerator;
use crate::config::ResponderConfig;
use crate::error::{ApiError, Error};

/// Finish reasons that mean the candidate was withheld by content filters
const BLOCKED_FINISH_REASONS: &[&str] = &["SAFETY", "PROHIBITED_CONTENT", "BLOCKLIST", "SPII"];

/// Client for the Gemini `generateContent` endpoint
pub struct GeminiClient {
    api_key: String,
    model: String,
    endpoint: String,
    client: Client,
}

impl GeminiClient {
    pub fn new(api_key: String, config: &ResponderConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Setup(format!("failed to build Gemini HTTP client: {}", e)))?;
        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            config.api_base_url.trim_end_matches('/'),
            config.model
        );
        Ok(Self {
            api_key,
            model: config.model.clone(),
            endpoint,
            client,
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(self.api_key.trim())
                .map_err(|_| ApiError::Authentication("API key contains invalid characters".to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let body = GenerateRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPart { text: prompt }],
            }],
        };

        ::log::debug!("Calling {} with a {} character prompt", self.model, prompt.chars().count());
        let resp = self
            .client
            .post(&self.endpoint)
            .headers(headers)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            ::log::warn!("Gemini returned {}: {}", status, text);
            return Err(classify_error(status, &text));
        }

        let parsed: GenerateResponse = resp.json().await.map_err(|e| {
            if e.is_decode() {
                ApiError::Unknown(format!("failed to parse Gemini response: {}", e))
            } else {
                // The body could not be read
                ApiError::Transport(e)
            }
        })?;
        extract_answer(parsed)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Map a non-success response onto the error taxonomy
fn classify_error(status: StatusCode, body: &str) -> ApiError {
    let (api_status, message) = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => (envelope.error.status, envelope.error.message),
        Err(_) => (String::new(), body.trim().to_string()),
    };
    let lowered = message.to_lowercase();

    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        || matches!(api_status.as_str(), "UNAUTHENTICATED" | "PERMISSION_DENIED")
        || lowered.contains("api key")
        || lowered.contains("authentication")
    {
        ApiError::Authentication(message)
    } else if status == StatusCode::TOO_MANY_REQUESTS
        || api_status == "RESOURCE_EXHAUSTED"
        || lowered.contains("quota")
        || lowered.contains("rate limit")
    {
        ApiError::QuotaExceeded(message)
    } else if lowered.contains("safety") {
        ApiError::SafetyRejection(message)
    } else {
        ApiError::Unknown(format!("HTTP {}: {}", status.as_u16(), message))
    }
}

/// Concatenate the text parts of the first candidate
fn extract_answer(response: GenerateResponse) -> Result<String, ApiError> {
    if let Some(reason) = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
    {
        return Err(ApiError::SafetyRejection(format!("prompt blocked: {}", reason)));
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(ApiError::Unknown("response contained no candidates".to_string()));
    };

    let answer = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default();

    if answer.is_empty() {
        return match candidate.finish_reason.as_deref() {
            Some(reason) if BLOCKED_FINISH_REASONS.contains(&reason) => Err(
                ApiError::SafetyRejection(format!("response blocked: {}", reason)),
            ),
            _ => Err(ApiError::Unknown("response contained no text".to_string())),
        };
    }

    Ok(answer)
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    role: &'a str,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: &str) -> GenerateResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_answer_parts_are_concatenated_verbatim() {
        let parsed = response(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hello "},{"text":"there.\n"}]},"finishReason":"STOP"}]}"#,
        );
        assert_eq!(extract_answer(parsed).unwrap(), "Hello there.\n");
    }

    #[test]
    fn test_blocked_prompt_is_a_safety_rejection() {
        let parsed = response(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#);
        assert!(matches!(extract_answer(parsed), Err(ApiError::SafetyRejection(_))));
    }

    #[test]
    fn test_blocked_candidate_is_a_safety_rejection() {
        let parsed = response(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#);
        assert!(matches!(extract_answer(parsed), Err(ApiError::SafetyRejection(_))));
    }

    #[test]
    fn test_empty_response_is_unknown() {
        let parsed = response(r#"{"candidates":[]}"#);
        assert!(matches!(extract_answer(parsed), Err(ApiError::Unknown(_))));

        let parsed = response(r#"{"candidates":[{"content":{"parts":[]},"finishReason":"STOP"}]}"#);
        assert!(matches!(extract_answer(parsed), Err(ApiError::Unknown(_))));
    }

    #[test]
    fn test_classify_invalid_key() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
        assert!(matches!(
            classify_error(StatusCode::BAD_REQUEST, body),
            ApiError::Authentication(_)
        ));
        assert!(matches!(
            classify_error(StatusCode::FORBIDDEN, "denied"),
            ApiError::Authentication(_)
        ));
    }

    #[test]
    fn test_classify_quota() {
        let body = r#"{"error":{"code":429,"message":"Resource has been exhausted (e.g. check quota).","status":"RESOURCE_EXHAUSTED"}}"#;
        assert!(matches!(
            classify_error(StatusCode::TOO_MANY_REQUESTS, body),
            ApiError::QuotaExceeded(_)
        ));
    }

    #[test]
    fn test_classify_safety_and_unknown() {
        assert!(matches!(
            classify_error(StatusCode::BAD_REQUEST, "Request blocked by safety settings"),
            ApiError::SafetyRejection(_)
        ));

        let err = classify_error(StatusCode::INTERNAL_SERVER_ERROR, "oops");
        match err {
            ApiError::Unknown(detail) => assert_eq!(detail, "HTTP 500: oops"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_endpoint_uses_model_and_base_url() {
        let config = ResponderConfig {
            api_base_url: "http://127.0.0.1:9999/".to_string(),
            model: "gemini-test".to_string(),
            ..ResponderConfig::default()
        };
        let client = GeminiClient::new("AIzaKey".to_string(), &config).unwrap();
        assert_eq!(
            client.endpoint,
            "http://127.0.0.1:9999/v1beta/models/gemini-test:generateContent"
        );
        assert_eq!(client.model(), "gemini-test");
    }
}
