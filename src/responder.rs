use crate::config::ResponderConfig;
use crate::error::ApiError;
use crate::history::History;
use crate::llm::TextGenerator;
use crate::prompt::{self, ContextLimits};
use crate::results::ContentRecord;

/// Answers questions about a page through a text-generation API
pub struct Responder {
    generator: Box<dyn TextGenerator>,
    context_limits: ContextLimits,
    history_turns: usize,
    history_chars: usize,
}

impl Responder {
    pub fn new(generator: Box<dyn TextGenerator>, config: &ResponderConfig) -> Self {
        Self {
            generator,
            context_limits: ContextLimits::from(config),
            history_turns: config.history_turns,
            history_chars: config.history_chars,
        }
    }

    /// Ask one question about `record`
    ///
    /// Makes exactly one API call. On success the question and the reply are
    /// appended to `history` and the reply is returned unchanged; on failure
    /// `history` is left as it was.
    pub async fn respond(
        &self,
        record: &ContentRecord,
        history: &mut History,
        user_message: &str,
    ) -> Result<String, ApiError> {
        let context = prompt::render_context(record, self.context_limits);
        let replay = history.replay_window(self.history_turns, self.history_chars);
        let prompt = prompt::build_prompt(&context, replay, user_message);
        ::log::debug!(
            "Prompt for {} replays {} turns ({} characters)",
            self.generator.model(),
            replay.len(),
            prompt.chars().count()
        );

        match self.generator.generate(&prompt).await {
            Ok(answer) => {
                history.push_exchange(user_message, answer.clone());
                Ok(answer)
            }
            Err(e) => {
                ::log::error!("Text generation failed: {}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::ScriptedGenerator;

    fn record() -> ContentRecord {
        ContentRecord::new(
            "https://example.com/".to_string(),
            "Example Domain".to_string(),
            "This domain is for use in illustrative examples in documents.".to_string(),
            Vec::new(),
            Vec::new(),
            String::new(),
        )
    }

    #[tokio::test]
    async fn test_success_returns_reply_and_appends_pair() {
        let (generator, prompts) = ScriptedGenerator::new(vec![Ok(
            "This is a placeholder domain used for examples.".to_string(),
        )]);
        let responder = Responder::new(Box::new(generator), &ResponderConfig::default());
        let mut history = History::new();

        let reply = responder
            .respond(&record(), &mut history, "What is this page about?")
            .await
            .unwrap();

        assert_eq!(reply, "This is a placeholder domain used for examples.");
        assert_eq!(history.len(), 2);
        assert_eq!(history.turns()[0].text, "What is this page about?");
        assert_eq!(history.turns()[1].text, reply);

        let prompts = prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Website Title: Example Domain"));
        assert!(prompts[0].contains("User Question: What is this page about?"));
    }

    #[tokio::test]
    async fn test_failure_leaves_history_untouched() {
        let (generator, _) = ScriptedGenerator::new(vec![
            Ok("first".to_string()),
            Err(ApiError::Authentication("API key not valid".to_string())),
        ]);
        let responder = Responder::new(Box::new(generator), &ResponderConfig::default());
        let mut history = History::new();

        responder.respond(&record(), &mut history, "one").await.unwrap();
        let before = history.clone();

        let err = responder
            .respond(&record(), &mut history, "two")
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Authentication(_)));
        assert_eq!(history, before);
    }

    #[tokio::test]
    async fn test_previous_turns_are_replayed() {
        let (generator, prompts) =
            ScriptedGenerator::new(vec![Ok("IANA.".to_string()), Ok("Since 1999.".to_string())]);
        let responder = Responder::new(Box::new(generator), &ResponderConfig::default());
        let mut history = History::new();

        responder.respond(&record(), &mut history, "Who runs it?").await.unwrap();
        responder.respond(&record(), &mut history, "Since when?").await.unwrap();

        let prompts = prompts.lock().unwrap();
        assert!(!prompts[0].contains("Conversation so far"));
        assert!(prompts[1].contains("User: Who runs it?\nAssistant: IANA.\n"));
        assert_eq!(history.len(), 4);
    }

    #[tokio::test]
    async fn test_replay_respects_turn_cap() {
        let (generator, prompts) = ScriptedGenerator::new(vec![
            Ok("a1".to_string()),
            Ok("a2".to_string()),
            Ok("a3".to_string()),
        ]);
        let config = ResponderConfig {
            history_turns: 2,
            ..ResponderConfig::default()
        };
        let responder = Responder::new(Box::new(generator), &config);
        let mut history = History::new();

        for question in ["q1", "q2", "q3"] {
            responder.respond(&record(), &mut history, question).await.unwrap();
        }

        let prompts = prompts.lock().unwrap();
        assert!(prompts[2].contains("User: q2\nAssistant: a2\n"));
        assert!(!prompts[2].contains("User: q1"));
        // Replay is bounded but the history itself keeps every turn
        assert_eq!(history.len(), 6);
    }
}
