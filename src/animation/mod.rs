//! Procedural talking animation: motion styles and the frame driver

pub mod driver;
pub mod style;

pub use driver::{AnimationConfig, AnimationDriver, MotionTarget, Pose, SharedTarget, Transform};
pub use style::{
    AnimationStyle, MotionSample, RandomStyles, ScriptedStyles, StyleSource, STYLE_COUNT,
};
