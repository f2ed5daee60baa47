//! Speech player: strictly ordered utterance playback over a platform backend
//!
//! The platform capability is resolved once at construction. Playback is
//! serial: each utterance must be reported complete by the backend before
//! the next one starts, with a fixed settle delay in between. Some host
//! backends silently pause themselves mid-utterance, so a watchdog sized to
//! the segment length nudges them back with `resume()` (best effort only).

use super::segment::{utterances_for, Utterance};
use crate::{OshaberiError, Result};
use futures::future::BoxFuture;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Platform speech-synthesis backend
///
/// `speak` resolves when the platform reports the utterance finished and
/// fails on a platform playback error. `cancel` discards whatever is in
/// flight; `is_paused`/`resume` expose the backend's self-pause quirk.
pub trait SpeechBackend: Send + Sync {
    fn speak(&self, utterance: &Utterance) -> BoxFuture<'static, Result<()>>;

    fn cancel(&self);

    fn is_paused(&self) -> bool;

    fn resume(&self);
}

/// Platform audio capability, probed once at construction
pub enum PlatformAudio {
    Native(Arc<dyn SpeechBackend>),
    Unsupported,
}

/// Configuration for playback pacing and the pause watchdog
#[derive(Clone, Debug)]
pub struct SpeechConfig {
    /// Pause between two consecutive utterances, in milliseconds
    pub settle_delay_ms: u64,

    /// Minimum watchdog delay, in milliseconds
    pub watchdog_floor_ms: u64,

    /// Additional watchdog delay per character of the utterance
    pub watchdog_per_char_ms: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: 300,
            watchdog_floor_ms: 1000,
            watchdog_per_char_ms: 150,
        }
    }
}

impl SpeechConfig {
    /// Set the inter-utterance settle delay
    pub fn with_settle_delay_ms(mut self, ms: u64) -> Self {
        self.settle_delay_ms = ms;
        self
    }

    /// Set the watchdog floor delay
    pub fn with_watchdog_floor_ms(mut self, ms: u64) -> Self {
        self.watchdog_floor_ms = ms;
        self
    }

    /// Set the per-character watchdog delay
    pub fn with_watchdog_per_char_ms(mut self, ms: u64) -> Self {
        self.watchdog_per_char_ms = ms;
        self
    }
}

/// Plays a response as an ordered queue of utterances
pub struct SpeechPlayer {
    audio: PlatformAudio,
    config: SpeechConfig,
    generation: AtomicU64,
}

impl SpeechPlayer {
    pub fn new(audio: PlatformAudio) -> Self {
        Self::with_config(audio, SpeechConfig::default())
    }

    pub fn with_config(audio: PlatformAudio, config: SpeechConfig) -> Self {
        Self {
            audio,
            config,
            generation: AtomicU64::new(0),
        }
    }

    /// Whether the platform supports speech output at all
    pub fn is_supported(&self) -> bool {
        matches!(self.audio, PlatformAudio::Native(_))
    }

    /// Speak the full text, segment by segment, strictly in order.
    ///
    /// Resolves once the whole queue has finished. Any playback already in
    /// flight from a previous call is cancelled first. Fails immediately
    /// with `SpeechUnsupported` when the platform has no speech capability;
    /// a mid-queue backend error aborts the remaining segments.
    pub async fn speak(&self, text: &str) -> Result<()> {
        let backend = match &self.audio {
            PlatformAudio::Native(backend) => Arc::clone(backend),
            PlatformAudio::Unsupported => return Err(OshaberiError::SpeechUnsupported),
        };

        // Supersede any in-flight queue before starting a new one
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        backend.cancel();

        let utterances = utterances_for(text);
        debug!("speaking {} segments", utterances.len());

        for utterance in &utterances {
            if self.generation.load(Ordering::SeqCst) != generation {
                debug!("playback superseded, dropping remaining segments");
                return Ok(());
            }

            let watchdog = spawn_watchdog(&backend, utterance, &self.config);
            let result = backend.speak(utterance).await;
            watchdog.abort();

            if let Err(e) = result {
                warn!("playback failed mid-queue: {}", e);
                return Err(e);
            }

            tokio::time::sleep(Duration::from_millis(self.config.settle_delay_ms)).await;
        }

        Ok(())
    }
}

/// Schedule a resume nudge proportional to the utterance length
fn spawn_watchdog(
    backend: &Arc<dyn SpeechBackend>,
    utterance: &Utterance,
    config: &SpeechConfig,
) -> tokio::task::JoinHandle<()> {
    let backend = Arc::clone(backend);
    let chars = utterance.text.chars().count() as u64;
    let delay = config.watchdog_floor_ms + chars * config.watchdog_per_char_ms;

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(delay)).await;
        if backend.is_paused() {
            debug!("backend self-paused, resuming playback");
            backend.resume();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use parking_lot::Mutex;
    use std::sync::atomic::AtomicBool;
    use tokio::sync::Notify;

    /// Backend that records utterances and can fail at a chosen index
    struct RecordingBackend {
        spoken: Mutex<Vec<Utterance>>,
        cancels: AtomicU64,
        fail_at: Option<usize>,
    }

    impl RecordingBackend {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                spoken: Mutex::new(Vec::new()),
                cancels: AtomicU64::new(0),
                fail_at: None,
            })
        }

        fn failing_at(index: usize) -> Arc<Self> {
            Arc::new(Self {
                spoken: Mutex::new(Vec::new()),
                cancels: AtomicU64::new(0),
                fail_at: Some(index),
            })
        }

        fn spoken_texts(&self) -> Vec<String> {
            self.spoken.lock().iter().map(|u| u.text.clone()).collect()
        }
    }

    impl SpeechBackend for RecordingBackend {
        fn speak(&self, utterance: &Utterance) -> BoxFuture<'static, Result<()>> {
            let index = {
                let mut spoken = self.spoken.lock();
                spoken.push(utterance.clone());
                spoken.len() - 1
            };
            let fail = self.fail_at == Some(index);

            async move {
                if fail {
                    Err(OshaberiError::SpeechPlaybackError("synthesis-failed".into()))
                } else {
                    Ok(())
                }
            }
            .boxed()
        }

        fn cancel(&self) {
            self.cancels.fetch_add(1, Ordering::SeqCst);
        }

        fn is_paused(&self) -> bool {
            false
        }

        fn resume(&self) {}
    }

    /// Backend that pauses itself and only finishes after a resume
    struct StallingBackend {
        paused: AtomicBool,
        resumed: Arc<Notify>,
    }

    impl SpeechBackend for StallingBackend {
        fn speak(&self, _utterance: &Utterance) -> BoxFuture<'static, Result<()>> {
            self.paused.store(true, Ordering::SeqCst);
            let resumed = Arc::clone(&self.resumed);
            async move {
                resumed.notified().await;
                Ok(())
            }
            .boxed()
        }

        fn cancel(&self) {}

        fn is_paused(&self) -> bool {
            self.paused.load(Ordering::SeqCst)
        }

        fn resume(&self) {
            self.paused.store(false, Ordering::SeqCst);
            self.resumed.notify_one();
        }
    }

    #[tokio::test]
    async fn test_unsupported_platform_rejects_immediately() {
        let player = SpeechPlayer::new(PlatformAudio::Unsupported);

        let result = player.speak("こんにちは！").await;
        assert!(matches!(result, Err(OshaberiError::SpeechUnsupported)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_segments_play_in_order() {
        let backend = RecordingBackend::new();
        let player = SpeechPlayer::new(PlatformAudio::Native(backend.clone()));

        player.speak("こんにちは！元気？").await.unwrap();

        assert_eq!(backend.spoken_texts(), vec!["こんにちは！", "元気？"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_prosody_reaches_backend() {
        let backend = RecordingBackend::new();
        let player = SpeechPlayer::new(PlatformAudio::Native(backend.clone()));

        player.speak("こんにちは！元気？").await.unwrap();

        let spoken = backend.spoken.lock();
        assert_eq!(spoken[0].pitch, crate::speech::segment::EXCLAMATION_PITCH);
        assert_eq!(spoken[0].volume, crate::speech::segment::EXCLAMATION_VOLUME);
        assert_eq!(spoken[1].pitch, crate::speech::segment::QUESTION_PITCH);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mid_queue_error_aborts_remaining() {
        let backend = RecordingBackend::failing_at(0);
        let player = SpeechPlayer::new(PlatformAudio::Native(backend.clone()));

        let result = player.speak("こんにちは！元気？").await;

        assert!(matches!(result, Err(OshaberiError::SpeechPlaybackError(_))));
        assert_eq!(backend.spoken_texts(), vec!["こんにちは！"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_speak_cancels_in_flight_playback() {
        let backend = RecordingBackend::new();
        let player = SpeechPlayer::new(PlatformAudio::Native(backend.clone()));

        player.speak("こんにちは。").await.unwrap();
        player.speak("ありがとう。").await.unwrap();

        assert_eq!(backend.cancels.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_watchdog_resumes_paused_backend() {
        let backend = Arc::new(StallingBackend {
            paused: AtomicBool::new(false),
            resumed: Arc::new(Notify::new()),
        });
        let player = SpeechPlayer::new(PlatformAudio::Native(backend.clone()));

        // Completes only because the watchdog fires resume()
        player.speak("こんにちは。").await.unwrap();

        assert!(!backend.is_paused());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_text_is_a_noop() {
        let backend = RecordingBackend::new();
        let player = SpeechPlayer::new(PlatformAudio::Native(backend.clone()));

        player.speak("").await.unwrap();

        assert!(backend.spoken_texts().is_empty());
    }
}
