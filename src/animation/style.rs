//! Motion style profiles for the talking animation
//!
//! Five procedural profiles, each a set of sinusoids over elapsed time with
//! its own frequency and amplitude. A new profile is drawn uniformly at a
//! fixed cadence while the character is speaking.

use parking_lot::Mutex;
use rand::Rng;
use std::time::Duration;

/// Number of selectable motion styles
pub const STYLE_COUNT: usize = 5;

/// Elapsed-time scale applied before the sinusoids
const TIME_SCALE: f64 = 0.003;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationStyle {
    /// Gentle idle sway
    Sway,
    /// Energetic bobbing with vertical travel
    Lively,
    /// Slow, wide movement
    Drift,
    /// Layered composite of slow and fast terms
    Blend,
    /// Rhythmic pulsing on the positive half-wave
    Rhythm,
}

impl AnimationStyle {
    /// Map an index draw onto a style (wraps past the last profile)
    pub fn from_index(index: usize) -> Self {
        match index % STYLE_COUNT {
            0 => AnimationStyle::Sway,
            1 => AnimationStyle::Lively,
            2 => AnimationStyle::Drift,
            3 => AnimationStyle::Blend,
            _ => AnimationStyle::Rhythm,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            AnimationStyle::Sway => 0,
            AnimationStyle::Lively => 1,
            AnimationStyle::Drift => 2,
            AnimationStyle::Blend => 3,
            AnimationStyle::Rhythm => 4,
        }
    }

    /// Evaluate the profile at the given elapsed time
    pub fn sample(&self, elapsed: Duration) -> MotionSample {
        let t = elapsed.as_millis() as f64 * TIME_SCALE;

        let (rotation_x, rotation_z, scale_delta, offset_y) = match self {
            AnimationStyle::Sway => (
                (t * 2.0).sin() * 0.02,
                (t * 1.5).cos() * 0.01,
                (t * 4.0).sin() * 0.02,
                0.0,
            ),
            AnimationStyle::Lively => (
                (t * 3.0).sin() * 0.03,
                (t * 2.5).cos() * 0.02,
                (t * 5.0).sin() * 0.03,
                (t * 3.0).sin() * 0.1,
            ),
            AnimationStyle::Drift => (
                t.sin() * 0.04,
                (t * 0.8).cos() * 0.03,
                (t * 2.0).sin() * 0.04,
                0.0,
            ),
            AnimationStyle::Blend => (
                (t * 2.0).sin() * 0.02 + t.cos() * 0.01,
                (t * 1.5).cos() * 0.015 + (t * 0.5).sin() * 0.01,
                (t * 3.0).sin() * 0.02 + (t * 2.0).cos() * 0.01,
                (t * 2.0).sin() * 0.05,
            ),
            AnimationStyle::Rhythm => (
                (t * 4.0).sin() * 0.015,
                (t * 3.0).cos() * 0.01,
                (t * 6.0).sin().abs() * 0.02,
                (t * 4.0).sin().abs() * 0.08,
            ),
        };

        MotionSample {
            rotation_x: rotation_x as f32,
            rotation_z: rotation_z as f32,
            scale_delta: scale_delta as f32,
            offset_y: offset_y as f32,
        }
    }
}

/// One frame of motion, relative to the bound target's baseline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSample {
    pub rotation_x: f32,
    pub rotation_z: f32,
    pub scale_delta: f32,
    pub offset_y: f32,
}

/// Source of style draws, injected so tests can script the sequence
pub trait StyleSource: Send + Sync {
    fn draw(&self) -> AnimationStyle;
}

/// Uniform random draw over all styles
pub struct RandomStyles;

impl StyleSource for RandomStyles {
    fn draw(&self) -> AnimationStyle {
        AnimationStyle::from_index(rand::thread_rng().gen_range(0..STYLE_COUNT))
    }
}

/// Cycles through a fixed sequence of styles
pub struct ScriptedStyles {
    sequence: Vec<AnimationStyle>,
    cursor: Mutex<usize>,
}

impl ScriptedStyles {
    pub fn new(sequence: Vec<AnimationStyle>) -> Self {
        Self {
            sequence,
            cursor: Mutex::new(0),
        }
    }
}

impl StyleSource for ScriptedStyles {
    fn draw(&self) -> AnimationStyle {
        let mut cursor = self.cursor.lock();
        let style = self.sequence[*cursor % self.sequence.len()];
        *cursor += 1;
        style
    }
}

/// Tracks which style is active and rotates it at a fixed cadence
pub struct StyleRotation {
    styles: std::sync::Arc<dyn StyleSource>,
    interval: Duration,
    current: AnimationStyle,
    last_change: Duration,
}

impl StyleRotation {
    pub fn new(styles: std::sync::Arc<dyn StyleSource>, interval: Duration) -> Self {
        let current = styles.draw();
        Self {
            styles,
            interval,
            current,
            last_change: Duration::ZERO,
        }
    }

    /// Return the style active at `elapsed`, drawing a new one when the
    /// rotation interval has passed
    pub fn advance(&mut self, elapsed: Duration) -> AnimationStyle {
        if elapsed.saturating_sub(self.last_change) >= self.interval {
            self.current = self.styles.draw();
            self.last_change = elapsed;
        }
        self.current
    }
}
