//! Speech playback: sentence segmentation, prosody derivation, and the
//! serially-ordered utterance queue

pub mod player;
pub mod segment;

pub use player::{PlatformAudio, SpeechBackend, SpeechConfig, SpeechPlayer};
pub use segment::{derive_utterance, segment_sentences, utterances_for, Utterance};
