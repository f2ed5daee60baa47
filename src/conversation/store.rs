//! Shared conversation state: transcript plus session flags
//!
//! The store is the single handle every component holds; it is cheap to
//! clone and provides synchronous read-after-write visibility.

use super::types::{Author, Message};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ConversationStore {
    messages: Arc<RwLock<Vec<Message>>>,
    is_listening: Arc<AtomicBool>,
    is_speaking: Arc<AtomicBool>,
    audio_enabled: Arc<AtomicBool>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self {
            messages: Arc::new(RwLock::new(Vec::new())),
            is_listening: Arc::new(AtomicBool::new(false)),
            is_speaking: Arc::new(AtomicBool::new(false)),
            audio_enabled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Append a message, assigning its id and timestamp
    pub fn append(&self, text: impl Into<String>, sender: Author) -> Message {
        let message = Message::new(text, sender);
        self.messages.write().push(message.clone());
        message
    }

    pub fn messages(&self) -> Vec<Message> {
        self.messages.read().clone()
    }

    /// Drop the whole transcript; the only non-append mutation
    pub fn clear(&self) {
        self.messages.write().clear();
    }

    pub fn len(&self) -> usize {
        self.messages.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.read().is_empty()
    }

    pub fn is_listening(&self) -> bool {
        self.is_listening.load(Ordering::SeqCst)
    }

    pub fn set_listening(&self, value: bool) {
        self.is_listening.store(value, Ordering::SeqCst);
    }

    pub fn is_speaking(&self) -> bool {
        self.is_speaking.load(Ordering::SeqCst)
    }

    pub fn set_speaking(&self, value: bool) {
        self.is_speaking.store(value, Ordering::SeqCst);
    }

    pub fn audio_enabled(&self) -> bool {
        self.audio_enabled.load(Ordering::SeqCst)
    }

    pub fn set_audio_enabled(&self, value: bool) {
        self.audio_enabled.store(value, Ordering::SeqCst);
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order() {
        let store = ConversationStore::new();
        store.append("first", Author::User);
        store.append("second", Author::Ai);

        let messages = store.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].text, "first");
        assert_eq!(messages[0].sender, Author::User);
        assert_eq!(messages[1].text, "second");
        assert_eq!(messages[1].sender, Author::Ai);
    }

    #[test]
    fn test_clear_empties_transcript() {
        let store = ConversationStore::new();
        store.append("hello", Author::User);
        assert!(!store.is_empty());

        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_clones_share_state() {
        let store = ConversationStore::new();
        let view = store.clone();

        store.append("hello", Author::User);
        store.set_audio_enabled(true);

        assert_eq!(view.len(), 1);
        assert!(view.audio_enabled());
    }

    #[test]
    fn test_flags_default_off() {
        let store = ConversationStore::new();
        assert!(!store.is_listening());
        assert!(!store.is_speaking());
        assert!(!store.audio_enabled());

        store.set_listening(true);
        store.set_speaking(true);
        assert!(store.is_listening());
        assert!(store.is_speaking());
    }
}
