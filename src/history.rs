use serde::{Deserialize, Serialize};
use std::fmt;

/// Who spoke a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "User"),
            Role::Assistant => write!(f, "Assistant"),
        }
    }
}

/// One message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// Append-only conversation history
///
/// Turns are only ever added as a user/assistant pair; the whole history is
/// dropped when the session moves to a different page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    turns: Vec<Turn>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed exchange
    pub fn push_exchange(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.turns.push(Turn::user(question));
        self.turns.push(Turn::assistant(answer));
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// The most recent turns to replay into a prompt, oldest first
    ///
    /// Whole exchanges are taken from the end while they fit within both
    /// `max_turns` and `max_chars`.
    pub fn replay_window(&self, max_turns: usize, max_chars: usize) -> &[Turn] {
        let mut start = self.turns.len();
        let mut used_chars = 0;

        for pair in self.turns.rchunks(2) {
            let pair_chars = pair.iter().map(|turn| turn.text.chars().count()).sum::<usize>();
            if self.turns.len() - start + pair.len() > max_turns
                || used_chars + pair_chars > max_chars
            {
                break;
            }
            used_chars += pair_chars;
            start -= pair.len();
        }

        &self.turns[start..]
    }
}
