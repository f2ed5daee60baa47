//! End-to-end turn scenarios
//!
//! These tests drive a full turn through the public API: controller,
//! speech player, animation driver and the shared conversation store.

use futures::future::BoxFuture;
use futures::FutureExt;
use oshaberi::animation::{AnimationDriver, SharedTarget, Transform};
use oshaberi::conversation::{Author, ConversationStore};
use oshaberi::provider::{ResponseProvider, ResponseRequest};
use oshaberi::speech::{PlatformAudio, SpeechBackend, SpeechPlayer, Utterance};
use oshaberi::turn::{TurnController, FALLBACK_RESPONSE};
use oshaberi::{OshaberiError, Result};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

struct ScriptedProvider {
    response: Result<String>,
}

impl ResponseProvider for ScriptedProvider {
    fn fetch(&self, _request: ResponseRequest) -> BoxFuture<'_, Result<String>> {
        async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.response.clone()
        }
        .boxed()
    }
}

struct CountingBackend {
    spoken: Mutex<Vec<String>>,
}

impl SpeechBackend for CountingBackend {
    fn speak(&self, utterance: &Utterance) -> BoxFuture<'static, Result<()>> {
        self.spoken.lock().push(utterance.text.clone());
        async { Ok(()) }.boxed()
    }

    fn cancel(&self) {}

    fn is_paused(&self) -> bool {
        false
    }

    fn resume(&self) {}
}

fn build_turn(
    response: Result<String>,
) -> (
    TurnController,
    ConversationStore,
    Arc<CountingBackend>,
    Arc<AnimationDriver>,
) {
    let store = ConversationStore::new();
    let backend = Arc::new(CountingBackend {
        spoken: Mutex::new(Vec::new()),
    });
    let player = Arc::new(SpeechPlayer::new(PlatformAudio::Native(backend.clone())));

    let driver = Arc::new(AnimationDriver::new());
    let target: SharedTarget = Arc::new(Mutex::new(Transform::default()));
    driver.bind(target);

    let controller = TurnController::new(
        store.clone(),
        Arc::new(ScriptedProvider { response }),
        player,
        Arc::clone(&driver),
    );

    (controller, store, backend, driver)
}

#[tokio::test(start_paused = true)]
async fn test_full_turn_speaks_each_sentence_once() {
    let (controller, store, backend, driver) = build_turn(Ok("やあ！今日も元気？".to_string()));
    store.set_audio_enabled(true);

    controller.submit("こんにちは").await;

    assert_eq!(
        *backend.spoken.lock(),
        vec!["やあ！".to_string(), "今日も元気？".to_string()],
        "Each sentence segment should be spoken exactly once, in order"
    );
    assert_eq!(
        store.len(),
        2,
        "A successful turn should append exactly the user and assistant messages"
    );
    assert!(
        !driver.is_animating(),
        "The animation driver should be Idle once the turn finishes"
    );
}

#[tokio::test(start_paused = true)]
async fn test_busy_submits_never_queue() {
    let (controller, store, _backend, _driver) = build_turn(Ok("わかったよ！".to_string()));

    tokio::join!(
        controller.submit("一つ目"),
        controller.submit("二つ目"),
        controller.submit("三つ目")
    );

    let messages = store.messages();
    assert_eq!(
        messages.len(),
        2,
        "Submits arriving mid-turn should be dropped, not queued"
    );
    assert_eq!(
        messages[0].text, "一つ目",
        "Only the first submit should reach the transcript"
    );
}

#[tokio::test(start_paused = true)]
async fn test_audio_disabled_turn_is_text_only() {
    let (controller, store, backend, driver) = build_turn(Ok("わかったよ！".to_string()));
    assert!(!store.audio_enabled());

    controller.submit("こんにちは").await;

    assert_eq!(store.len(), 2, "The transcript still gains both messages");
    assert!(
        backend.spoken.lock().is_empty(),
        "Nothing should be spoken while audio is disabled"
    );
    assert!(
        !driver.is_animating(),
        "The animation driver should never leave Idle while audio is disabled"
    );
}

#[tokio::test(start_paused = true)]
async fn test_provider_failure_yields_single_fallback_message() {
    let (controller, store, backend, driver) = build_turn(Err(OshaberiError::ProviderError(
        "upstream unavailable".into(),
    )));
    store.set_audio_enabled(true);

    controller.submit("test").await;

    let messages = store.messages();
    let ai_messages: Vec<_> = messages.iter().filter(|m| m.sender == Author::Ai).collect();
    assert_eq!(
        ai_messages.len(),
        1,
        "A failed turn should append exactly one assistant message"
    );
    assert_eq!(
        ai_messages[0].text, FALLBACK_RESPONSE,
        "The assistant message should be the fixed fallback text"
    );
    assert!(
        backend.spoken.lock().is_empty(),
        "The fallback is shown, not spoken"
    );
    assert!(!controller.is_processing(), "The turn mutex must be released");
    assert!(!store.is_speaking(), "The speaking flag must be reset");
    assert!(!driver.is_animating(), "The animation driver must end Idle");
}
