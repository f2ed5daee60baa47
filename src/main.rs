use anyhow::Result;
use futures::future::BoxFuture;
use futures::FutureExt;
use oshaberi::animation::{AnimationDriver, SharedTarget, Transform};
use oshaberi::conversation::ConversationStore;
use oshaberi::provider::CannedResponder;
use oshaberi::speech::{PlatformAudio, SpeechBackend, SpeechPlayer, Utterance};
use oshaberi::turn::TurnController;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Backend that narrates utterances to the log instead of a speaker
struct ConsoleBackend;

impl SpeechBackend for ConsoleBackend {
    fn speak(&self, utterance: &Utterance) -> BoxFuture<'static, oshaberi::Result<()>> {
        let text = utterance.text.clone();
        let duration = Duration::from_millis(40 * text.chars().count() as u64);
        info!(
            "speaking {:?} (pitch {:.1}, rate {:.1}, volume {:.2})",
            text, utterance.pitch, utterance.rate, utterance.volume
        );
        async move {
            tokio::time::sleep(duration).await;
            Ok(())
        }
        .boxed()
    }

    fn cancel(&self) {}

    fn is_paused(&self) -> bool {
        false
    }

    fn resume(&self) {}
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "oshaberi=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting oshaberi demo turn loop");

    let store = ConversationStore::new();
    store.set_audio_enabled(true);

    let provider = Arc::new(CannedResponder::new().with_delay(Duration::from_millis(300)));
    let player = Arc::new(SpeechPlayer::new(PlatformAudio::Native(Arc::new(
        ConsoleBackend,
    ))));

    let driver = Arc::new(AnimationDriver::new());
    let target: SharedTarget = Arc::new(Mutex::new(Transform::default()));
    driver.bind(target);

    let controller = TurnController::new(store.clone(), provider, player, driver);

    controller.submit("こんにちは！").await;
    controller.submit("今日は何して遊ぶ？").await;

    info!(
        "transcript: {}",
        serde_json::to_string_pretty(&store.messages())?
    );

    Ok(())
}
