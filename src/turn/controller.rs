//! Turn controller: composes provider, speech player and animation driver
//!
//! Executes one conversational turn under a single-flight guard. A submit
//! arriving while a turn is in flight is dropped silently, never queued.
//! Every downstream failure is converted into one fixed fallback assistant
//! message; nothing propagates to the caller. Cleanup (animation stop,
//! speaking and processing flags) runs on every exit path.
//!
//! No timeout is applied to the provider call: a hung provider stalls the
//! turn with `is_processing` held, preserving upstream behavior.

use crate::animation::AnimationDriver;
use crate::conversation::{Author, ConversationStore};
use crate::provider::{history_from_messages, ResponseProvider, ResponseRequest};
use crate::speech::SpeechPlayer;
use crate::turn::config::TurnConfig;
use crate::Result;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Events emitted over one turn, for UI observation
#[derive(Debug, Clone)]
pub enum TurnEvent {
    /// A turn was accepted and is now in flight
    TurnStarted,

    /// The assistant response was appended to the transcript
    ResponseReceived { response: String },

    /// Speech playback (and animation) began
    PlaybackStarted,

    /// The whole utterance queue finished
    PlaybackComplete,

    /// The turn failed downstream; the fallback message was appended
    TurnFailed { error: String },

    /// The turn finished and the controller is idle again
    TurnComplete,
}

/// Orchestrates one conversational turn at a time
pub struct TurnController {
    store: ConversationStore,
    provider: Arc<dyn ResponseProvider>,
    player: Arc<SpeechPlayer>,
    driver: Arc<AnimationDriver>,
    config: TurnConfig,
    in_flight: AtomicBool,
    event_tx: Sender<TurnEvent>,
    event_rx: Receiver<TurnEvent>,
}

impl TurnController {
    pub fn new(
        store: ConversationStore,
        provider: Arc<dyn ResponseProvider>,
        player: Arc<SpeechPlayer>,
        driver: Arc<AnimationDriver>,
    ) -> Self {
        Self::with_config(store, provider, player, driver, TurnConfig::default())
    }

    pub fn with_config(
        store: ConversationStore,
        provider: Arc<dyn ResponseProvider>,
        player: Arc<SpeechPlayer>,
        driver: Arc<AnimationDriver>,
        config: TurnConfig,
    ) -> Self {
        let (event_tx, event_rx) = bounded(config.event_buffer);
        Self {
            store,
            provider,
            player,
            driver,
            config,
            in_flight: AtomicBool::new(false),
            event_tx,
            event_rx,
        }
    }

    /// Whether a turn is currently in flight
    pub fn is_processing(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Get a receiver for turn events
    pub fn event_receiver(&self) -> Receiver<TurnEvent> {
        self.event_rx.clone()
    }

    /// Try to receive a turn event without blocking
    pub fn try_recv_event(&self) -> Option<TurnEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Execute one conversational turn for the given user text.
    ///
    /// A call arriving while another turn is in flight is a silent no-op:
    /// no message is appended, no event is emitted, no error is surfaced.
    pub async fn submit(&self, text: &str) {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            debug!("turn already in flight, dropping submit");
            return;
        }
        let _ = self.event_tx.try_send(TurnEvent::TurnStarted);

        if let Err(e) = self.run_turn(text).await {
            warn!("turn failed: {}", e);
            self.store
                .append(self.config.fallback_text.as_str(), Author::Ai);
            let _ = self.event_tx.try_send(TurnEvent::TurnFailed {
                error: e.to_string(),
            });
        }

        // Cleanup runs on every exit path, success or failure
        self.driver.stop();
        self.store.set_speaking(false);
        self.in_flight.store(false, Ordering::SeqCst);
        let _ = self.event_tx.try_send(TurnEvent::TurnComplete);
    }

    async fn run_turn(&self, text: &str) -> Result<()> {
        // The user message lands in the transcript before the remote call
        self.store.append(text, Author::User);

        let request = ResponseRequest {
            message: text.to_string(),
            history: history_from_messages(&self.store.messages()),
        };
        let response = self.provider.fetch(request).await?;
        info!("response received ({} chars)", response.chars().count());

        // The transcript shows the response before anything is spoken
        self.store.append(response.as_str(), Author::Ai);
        let _ = self.event_tx.try_send(TurnEvent::ResponseReceived {
            response: response.clone(),
        });

        if self.store.audio_enabled() {
            self.store.set_speaking(true);
            self.driver.start();
            let _ = self.event_tx.try_send(TurnEvent::PlaybackStarted);

            self.player.speak(&response).await?;

            self.driver.stop();
            self.store.set_speaking(false);
            let _ = self.event_tx.try_send(TurnEvent::PlaybackComplete);
        }

        Ok(())
    }
}
