// Re-export modules
pub mod config;
pub mod error;
pub mod extractor;
pub mod filter;
pub mod history;
pub mod llm;
pub mod parsers;
pub mod prompt;
pub mod responder;
pub mod results;
pub mod session;
pub mod utils;

// Re-export commonly used types for convenience
pub use error::{ApiError, Error, ExtractError};
pub use history::{History, Role, Turn};
pub use results::{ContentRecord, Heading, Link};
pub use session::{Command, Session, SessionController};

use config::ChatbotConfig;
use extractor::Extractor;
use llm::{GeminiClient, TextGenerator};
use responder::Responder;
use std::io::{BufRead, Write};

/// Main builder for a website chatbot
pub struct Chatbot {
    api_key: String,
    config: ChatbotConfig,
    generator: Option<Box<dyn TextGenerator>>,
}

impl Chatbot {
    /// Create a new builder for the given Gemini API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            config: ChatbotConfig::default(),
            generator: None,
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: ChatbotConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a file
    pub fn with_config_file(
        self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let config = ChatbotConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Load configuration from a string
    pub fn with_config_str(self, config_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config = ChatbotConfig::from_json(config_str)?;
        Ok(self.with_config(config))
    }

    /// Set the model identifier
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.config.responder.model = model.into();
        self
    }

    /// Point the API client at a different base URL
    pub fn with_api_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.responder.api_base_url = base_url.into();
        self
    }

    /// Set the page fetch timeout
    pub fn with_fetch_timeout(mut self, timeout_seconds: u64) -> Self {
        self.config.extractor.timeout_secs = timeout_seconds;
        self
    }

    /// Use a different text generator instead of the Gemini client
    pub fn with_generator(mut self, generator: Box<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Current configuration
    pub fn config(&self) -> &ChatbotConfig {
        &self.config
    }

    /// Wire everything up over the given console
    pub fn build<R: BufRead, W: Write>(
        self,
        input: R,
        output: W,
    ) -> Result<SessionController<R, W>, Error> {
        let extractor = Extractor::new(&self.config.extractor)?;
        let generator: Box<dyn TextGenerator> = match self.generator {
            Some(generator) => generator,
            None => Box::new(GeminiClient::new(self.api_key, &self.config.responder)?),
        };
        ::log::info!("Using model {}", generator.model());
        let responder = Responder::new(generator, &self.config.responder);

        Ok(SessionController::new(extractor, responder, input, output))
    }
}
