//! Canned response provider for demos and tests
//!
//! Picks a random reply from a fixed Japanese pool after a simulated
//! network delay, so the full turn pipeline can run without any transport.

use super::{trim_history, ResponseProvider, ResponseRequest};
use crate::Result;
use futures::future::BoxFuture;
use futures::FutureExt;
use rand::Rng;
use std::time::Duration;
use tracing::debug;

const CANNED_RESPONSES: &[&str] = &[
    "はい、どのようなお手伝いができますか？",
    "ご質問承りました。お答えいたしますね。",
    "なるほど、理解いたしました！",
    "もう少し詳しく教えていただけますか？",
    "それは興味深いお話ですね。",
    "お困りの点はございませんか？",
];

/// Provider that answers from a fixed response pool
pub struct CannedResponder {
    responses: Vec<String>,
    delay: Duration,
}

impl CannedResponder {
    pub fn new() -> Self {
        Self {
            responses: CANNED_RESPONSES.iter().map(|s| s.to_string()).collect(),
            delay: Duration::from_millis(1000),
        }
    }

    /// Replace the response pool
    pub fn with_responses(mut self, responses: Vec<String>) -> Self {
        self.responses = responses;
        self
    }

    /// Set the simulated network delay
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Default for CannedResponder {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseProvider for CannedResponder {
    fn fetch(&self, request: ResponseRequest) -> BoxFuture<'_, Result<String>> {
        async move {
            let history = trim_history(request.history);
            debug!(
                "canned fetch for {:?} with {} history entries",
                request.message,
                history.len()
            );

            tokio::time::sleep(self.delay).await;

            let index = rand::thread_rng().gen_range(0..self.responses.len());
            Ok(self.responses[index].clone())
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::HistoryEntry;

    #[tokio::test(start_paused = true)]
    async fn test_canned_response_comes_from_pool() {
        let provider = CannedResponder::new();
        let request = ResponseRequest {
            message: "こんにちは".to_string(),
            history: vec![HistoryEntry::system("prompt")],
        };

        let response = provider.fetch(request).await.unwrap();
        assert!(CANNED_RESPONSES.contains(&response.as_str()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_pool_and_delay() {
        let provider = CannedResponder::new()
            .with_responses(vec!["やあ！".to_string()])
            .with_delay(Duration::from_millis(10));

        let request = ResponseRequest {
            message: "test".to_string(),
            history: Vec::new(),
        };

        assert_eq!(provider.fetch(request).await.unwrap(), "やあ！");
    }
}
