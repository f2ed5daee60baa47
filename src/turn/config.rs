//! Configuration for the turn controller

/// Assistant message appended when a turn fails anywhere downstream
pub const FALLBACK_RESPONSE: &str = "申し訳ありません。エラーが発生しました。";

/// Configuration for the turn controller
#[derive(Clone, Debug)]
pub struct TurnConfig {
    /// Text of the fixed fallback assistant message
    pub fallback_text: String,

    /// Buffer size of the turn event channel
    pub event_buffer: usize,
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self {
            fallback_text: FALLBACK_RESPONSE.to_string(),
            event_buffer: 100,
        }
    }
}

impl TurnConfig {
    /// Set the fallback message text
    pub fn with_fallback_text(mut self, text: impl Into<String>) -> Self {
        self.fallback_text = text.into();
        self
    }

    /// Set the event channel buffer size
    pub fn with_event_buffer(mut self, size: usize) -> Self {
        self.event_buffer = size;
        self
    }
}
