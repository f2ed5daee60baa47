//! Sentence segmentation and prosody derivation
//!
//! Response text is split on Japanese sentence-terminal punctuation into
//! utterances, each carrying pitch/rate/volume derived from how the
//! sentence ends. Questions get a higher pitch, exclamations get full
//! volume and a raised pitch.

/// Sentence-terminal punctuation that closes a segment
pub const TERMINATORS: [char; 3] = ['。', '！', '？'];

/// Baseline prosody for every utterance
pub const BASE_PITCH: f32 = 1.5;
pub const BASE_RATE: f32 = 1.1;
pub const BASE_VOLUME: f32 = 0.85;

/// Question boost: sentences ending with ？
pub const QUESTION_PITCH: f32 = 1.7;

/// Exclamation boost: sentences ending with ！
pub const EXCLAMATION_PITCH: f32 = 1.6;
pub const EXCLAMATION_VOLUME: f32 = 1.0;

/// One synthesizable speech segment with derived prosody
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub pitch: f32,
    pub rate: f32,
    pub volume: f32,
}

/// Split text into sentence segments, each retaining its terminator.
///
/// A terminator with no preceding content is dropped. When no terminated
/// segment exists, the entire input is returned as one segment; trailing
/// text after the last terminator is discarded otherwise.
pub fn segment_sentences(text: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();

    for c in text.chars() {
        if TERMINATORS.contains(&c) {
            if !current.is_empty() {
                current.push(c);
                segments.push(std::mem::take(&mut current));
            }
        } else {
            current.push(c);
        }
    }

    if segments.is_empty() && !text.is_empty() {
        return vec![text.to_string()];
    }

    segments
}

/// Derive prosody for one segment from its final character
pub fn derive_utterance(segment: &str) -> Utterance {
    let mut pitch = BASE_PITCH;
    let mut volume = BASE_VOLUME;

    if segment.ends_with('？') {
        pitch = QUESTION_PITCH;
    } else if segment.ends_with('！') {
        pitch = EXCLAMATION_PITCH;
        volume = EXCLAMATION_VOLUME;
    }

    Utterance {
        text: segment.to_string(),
        pitch,
        rate: BASE_RATE,
        volume,
    }
}

/// Segment text and derive prosody for each segment, in playback order
pub fn utterances_for(text: &str) -> Vec<Utterance> {
    segment_sentences(text)
        .iter()
        .map(|s| derive_utterance(s))
        .collect()
}
