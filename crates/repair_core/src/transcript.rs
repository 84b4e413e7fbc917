//! Conversation transcripts submitted as context to the chat operations

use serde::{Deserialize, Serialize};

/// Who produced a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

/// A single speaker-tagged turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptTurn {
    pub speaker: Speaker,
    pub text: String,
}

impl TranscriptTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text: text.into(),
        }
    }
}

/// An ordered turn history for one conversational flow.
///
/// Two independent instances exist per session: the repair Q&A transcript
/// (cleared whenever the active diagnosis changes) and the app-support
/// transcript (kept for the whole session).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTranscript {
    turns: Vec<TranscriptTurn>,
}

impl ConversationTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.turns.push(TranscriptTurn::user(text));
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.turns.push(TranscriptTurn::assistant(text));
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn turns(&self) -> &[TranscriptTurn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&TranscriptTurn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
