use crate::config::ResponderConfig;
use crate::history::Turn;
use crate::results::ContentRecord;

const PREAMBLE: &str = "You are a helpful assistant that can answer questions about a specific website.\nHere is the website content for context:";

const INSTRUCTIONS: &str = "Please answer user questions based on this website content. If the question cannot be answered from the website content, politely let the user know and provide general helpful information if possible.";

/// Caps applied when rendering a record into prompt context
#[derive(Debug, Clone, Copy)]
pub struct ContextLimits {
    pub headings: usize,
    pub links: usize,
}

impl From<&ResponderConfig> for ContextLimits {
    fn from(config: &ResponderConfig) -> Self {
        Self {
            headings: config.context_headings,
            links: config.context_links,
        }
    }
}

/// Render a content record as the context block of a prompt
pub fn render_context(record: &ContentRecord, limits: ContextLimits) -> String {
    let mut parts = vec![
        format!("Website Title: {}", record.title),
        format!("URL: {}", record.url),
        format!(
            "Meta Description: {}",
            if record.meta_description.is_empty() {
                "(none)"
            } else {
                record.meta_description.as_str()
            }
        ),
    ];

    if !record.headings.is_empty() {
        parts.push("Key Headings:".to_string());
        parts.extend(record.headings.iter().take(limits.headings).map(|h| h.to_string()));
    }

    if !record.main_text.is_empty() {
        parts.push(format!("Main Content: {}", record.main_text));
    }

    if !record.links.is_empty() {
        parts.push("Important Links:".to_string());
        parts.extend(record.links.iter().take(limits.links).map(|l| l.to_string()));
    }

    parts.join("\n")
}

/// Build the full prompt for one user question
pub fn build_prompt(context: &str, history: &[Turn], question: &str) -> String {
    let mut prompt = String::new();
    prompt.push_str(PREAMBLE);
    prompt.push_str("\n\n");
    prompt.push_str(context);
    prompt.push_str("\n\n");
    prompt.push_str(INSTRUCTIONS);
    prompt.push_str("\n\n");

    if !history.is_empty() {
        prompt.push_str("Conversation so far:\n");
        for turn in history {
            prompt.push_str(&format!("{}: {}\n", turn.role, turn.text));
        }
        prompt.push('\n');
    }

    prompt.push_str("User Question: ");
    prompt.push_str(question);
    prompt.push_str("\n\nPlease provide a helpful response:");
    prompt
}
