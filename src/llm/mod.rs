use crate::error::ApiError;
use async_trait::async_trait;

mod gemini;

pub use gemini::GeminiClient;

/// Trait implemented by hosted text-generation APIs
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a reply for a single prompt
    async fn generate(&self, prompt: &str) -> Result<String, ApiError>;

    /// Model identifier, for logging
    fn model(&self) -> &str;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::TextGenerator;
    use crate::error::ApiError;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Replays scripted results and records every prompt it receives
    pub(crate) struct ScriptedGenerator {
        replies: Mutex<Vec<Result<String, ApiError>>>,
        prompts: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedGenerator {
        pub(crate) fn new(replies: Vec<Result<String, ApiError>>) -> (Self, Arc<Mutex<Vec<String>>>) {
            let prompts = Arc::new(Mutex::new(Vec::new()));
            let generator = Self {
                replies: Mutex::new(replies.into_iter().rev().collect()),
                prompts: Arc::clone(&prompts),
            };
            (generator, prompts)
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, ApiError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(ApiError::Unknown("script exhausted".to_string())))
        }

        fn model(&self) -> &str {
            "scripted"
        }
    }
}
