use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Configuration for fetching and extracting a page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Request timeout in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent with the page request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum characters of main text kept before truncation
    #[serde(default = "default_max_main_text_chars")]
    pub max_main_text_chars: usize,

    /// Maximum number of headings collected
    #[serde(default = "default_max_headings")]
    pub max_headings: usize,

    /// Maximum number of links collected
    #[serde(default = "default_max_links")]
    pub max_links: usize,

    /// Regex patterns a link target must match (empty means any)
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Regex patterns that reject a link target, on top of the built-in ones
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

/// Configuration for prompting the text-generation API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponderConfig {
    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the Gemini API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// API request timeout in seconds
    #[serde(default = "default_api_timeout_secs")]
    pub timeout_secs: u64,

    /// Headings included in the prompt context
    #[serde(default = "default_context_headings")]
    pub context_headings: usize,

    /// Links included in the prompt context
    #[serde(default = "default_context_links")]
    pub context_links: usize,

    /// Most recent turns replayed into each prompt
    #[serde(default = "default_history_turns")]
    pub history_turns: usize,

    /// Character budget for replayed turns
    #[serde(default = "default_history_chars")]
    pub history_chars: usize,
}

/// Complete chatbot configuration, loadable from JSON
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatbotConfig {
    #[serde(default)]
    pub extractor: ExtractorConfig,

    #[serde(default)]
    pub responder: ResponderConfig,
}

impl ChatbotConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, Box<dyn Error>> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_fetch_timeout_secs(),
            user_agent: default_user_agent(),
            max_main_text_chars: default_max_main_text_chars(),
            max_headings: default_max_headings(),
            max_links: default_max_links(),
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
        }
    }
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base_url: default_api_base_url(),
            timeout_secs: default_api_timeout_secs(),
            context_headings: default_context_headings(),
            context_links: default_context_links(),
            history_turns: default_history_turns(),
            history_chars: default_history_chars(),
        }
    }
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string()
}

fn default_max_main_text_chars() -> usize {
    5000
}

fn default_max_headings() -> usize {
    20
}

fn default_max_links() -> usize {
    10
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_api_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_api_timeout_secs() -> u64 {
    60
}

fn default_context_headings() -> usize {
    10
}

fn default_context_links() -> usize {
    5
}

fn default_history_turns() -> usize {
    10
}

fn default_history_chars() -> usize {
    4000
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = ChatbotConfig::from_json("{}").unwrap();
        assert_eq!(config.extractor.timeout_secs, 10);
        assert_eq!(config.extractor.max_main_text_chars, 5000);
        assert_eq!(config.extractor.max_headings, 20);
        assert_eq!(config.extractor.max_links, 10);
        assert_eq!(config.responder.model, "gemini-1.5-flash");
        assert_eq!(config.responder.history_turns, 10);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let json = r#"{
            "extractor": { "max_links": 3, "exclude_patterns": ["/login"] },
            "responder": { "model": "gemini-1.5-pro" }
        }"#;
        let config = ChatbotConfig::from_json(json).unwrap();
        assert_eq!(config.extractor.max_links, 3);
        assert_eq!(config.extractor.max_headings, 20);
        assert_eq!(config.extractor.exclude_patterns, vec!["/login".to_string()]);
        assert_eq!(config.responder.model, "gemini-1.5-pro");
        assert_eq!(config.responder.context_links, 5);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "responder": {{ "history_chars": 100 }} }}"#).unwrap();

        let config = ChatbotConfig::from_file(file.path()).unwrap();
        assert_eq!(config.responder.history_chars, 100);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(ChatbotConfig::from_json("{ not json").is_err());
    }
}
