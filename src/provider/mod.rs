//! Remote response provider boundary
//!
//! The core treats response generation as an opaque request/response
//! exchange: it hands over the user message plus the trimmed conversation
//! history and gets back assistant text or a failure. Transport details
//! (HTTP, retries, backoff) live behind the trait.

pub mod mock;

use crate::conversation::{Author, Message};
use crate::Result;
use futures::future::BoxFuture;
use serde::Serialize;

pub use mock::CannedResponder;

/// System prompt establishing the character's persona
pub const SYSTEM_PROMPT: &str = "\
あなたは可愛らしい3Dキャラクターとして会話します。\
自分のことを「ボク」と呼び、「だよ！」「だね！」「かな？」のような\
フレンドリーで親しみやすい口調を使ってください。\
文末は「です・ます」を避け、明るく楽しい雰囲気で会話してください。";

/// History grows to this many entries before trimming kicks in
pub const MAX_HISTORY_LEN: usize = 10;

/// How many recent entries survive a trim (besides the system entry)
pub const RECENT_KEPT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryRole {
    System,
    User,
    Assistant,
}

/// One prior exchange entry sent along with a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub role: HistoryRole,
    pub content: String,
}

impl HistoryEntry {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: HistoryRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: HistoryRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: HistoryRole::Assistant,
            content: content.into(),
        }
    }
}

/// The request body handed to a provider (JSON on the wire upstream)
#[derive(Debug, Clone, Serialize)]
pub struct ResponseRequest {
    pub message: String,
    pub history: Vec<HistoryEntry>,
}

/// Opaque boundary to whatever generates assistant text
pub trait ResponseProvider: Send + Sync {
    /// Fetch a response for the given request
    fn fetch(&self, request: ResponseRequest) -> BoxFuture<'_, Result<String>>;
}

/// Convert the transcript into history entries (system prompt first)
pub fn history_from_messages(messages: &[Message]) -> Vec<HistoryEntry> {
    let mut history = vec![HistoryEntry::system(SYSTEM_PROMPT)];
    history.extend(messages.iter().map(|m| match m.sender {
        Author::User => HistoryEntry::user(&m.text),
        Author::Ai => HistoryEntry::assistant(&m.text),
    }));
    history
}

/// Trim an over-long history down to the system entry plus the most recent
/// entries. Providers apply this before dispatching; the turn controller
/// assumes the history it forwards has already been bounded.
pub fn trim_history(history: Vec<HistoryEntry>) -> Vec<HistoryEntry> {
    if history.len() <= MAX_HISTORY_LEN {
        return history;
    }

    let tail_start = history.len() - RECENT_KEPT;
    let mut trimmed = Vec::with_capacity(1 + RECENT_KEPT);
    trimmed.push(history[0].clone());
    trimmed.extend_from_slice(&history[tail_start..]);
    trimmed
}
