//! Animation driver: a free-running frame task bound to a mutable transform
//!
//! Two states only, Idle and Animating. `start()` spawns a periodic frame
//! task that writes procedural motion onto the bound target; `stop()`
//! cancels it and restores the pose captured at bind time. Binding
//! failures are no-ops, never errors: starting unbound simply does
//! nothing.

use super::style::{RandomStyles, StyleRotation, StyleSource};
use crate::util::{Clock, SystemClock};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Full transform state of an animation target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub rotation_x: f32,
    pub rotation_y: f32,
    pub rotation_z: f32,
    pub scale: f32,
    pub position_y: f32,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            rotation_x: 0.0,
            rotation_y: 0.0,
            rotation_z: 0.0,
            scale: 1.0,
            position_y: 0.0,
        }
    }
}

/// Anything with a mutable pose the driver can animate
pub trait MotionTarget: Send {
    fn pose(&self) -> Pose;

    fn set_pose(&mut self, pose: Pose);
}

/// Plain in-memory motion target
#[derive(Debug, Clone, Default)]
pub struct Transform {
    pose: Pose,
}

impl Transform {
    pub fn new(pose: Pose) -> Self {
        Self { pose }
    }
}

impl MotionTarget for Transform {
    fn pose(&self) -> Pose {
        self.pose
    }

    fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }
}

pub type SharedTarget = Arc<Mutex<dyn MotionTarget>>;

/// Frame cadence and style rotation cadence
#[derive(Clone, Debug)]
pub struct AnimationConfig {
    /// Milliseconds between frame updates
    pub frame_interval_ms: u64,

    /// Milliseconds between style re-draws
    pub style_interval_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 16,
            style_interval_ms: 3000,
        }
    }
}

impl AnimationConfig {
    /// Set the frame interval
    pub fn with_frame_interval_ms(mut self, ms: u64) -> Self {
        self.frame_interval_ms = ms;
        self
    }

    /// Set the style rotation interval
    pub fn with_style_interval_ms(mut self, ms: u64) -> Self {
        self.style_interval_ms = ms;
        self
    }
}

struct DriverInner {
    target: Option<SharedTarget>,
    baseline: Option<Pose>,
    frame_task: Option<JoinHandle<()>>,
}

/// Drives the talking animation of a bound target
pub struct AnimationDriver {
    config: AnimationConfig,
    clock: Arc<dyn Clock>,
    styles: Arc<dyn StyleSource>,
    inner: Mutex<DriverInner>,
}

impl AnimationDriver {
    pub fn new() -> Self {
        Self::with_parts(
            AnimationConfig::default(),
            Arc::new(SystemClock::new()),
            Arc::new(RandomStyles),
        )
    }

    /// Create a driver with explicit time and randomness sources
    pub fn with_parts(
        config: AnimationConfig,
        clock: Arc<dyn Clock>,
        styles: Arc<dyn StyleSource>,
    ) -> Self {
        Self {
            config,
            clock,
            styles,
            inner: Mutex::new(DriverInner {
                target: None,
                baseline: None,
                frame_task: None,
            }),
        }
    }

    /// Bind the animation target, snapshotting its pose as the baseline.
    ///
    /// Rebinding overwrites the previous binding without resetting the old
    /// target's transform.
    pub fn bind(&self, target: SharedTarget) {
        let baseline = target.lock().pose();
        let mut inner = self.inner.lock();
        inner.target = Some(target);
        inner.baseline = Some(baseline);
    }

    pub fn is_animating(&self) -> bool {
        self.inner.lock().frame_task.is_some()
    }

    /// Begin animating. No-op when already animating or unbound.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) {
        let mut inner = self.inner.lock();
        if inner.frame_task.is_some() {
            return;
        }

        let (target, baseline) = match (&inner.target, inner.baseline) {
            (Some(target), Some(baseline)) => (Arc::clone(target), baseline),
            _ => {
                debug!("animation start requested with no bound target");
                return;
            }
        };

        let start = self.clock.elapsed();
        let clock = Arc::clone(&self.clock);
        let styles = Arc::clone(&self.styles);
        let config = self.config.clone();

        inner.frame_task = Some(tokio::spawn(frame_loop(
            target, baseline, clock, styles, config, start,
        )));
        debug!("animation started");
    }

    /// Cancel the frame task and restore the bind-time baseline.
    ///
    /// The non-animated rotation axis keeps its current value. Stopping
    /// while Idle is a safe no-op.
    pub fn stop(&self) {
        let mut inner = self.inner.lock();
        let Some(task) = inner.frame_task.take() else {
            return;
        };
        task.abort();

        if let (Some(target), Some(baseline)) = (&inner.target, inner.baseline) {
            let mut target = target.lock();
            let mut pose = target.pose();
            pose.rotation_x = baseline.rotation_x;
            pose.rotation_z = baseline.rotation_z;
            pose.scale = baseline.scale;
            pose.position_y = baseline.position_y;
            target.set_pose(pose);
        }
        debug!("animation stopped");
    }
}

impl Default for AnimationDriver {
    fn default() -> Self {
        Self::new()
    }
}

async fn frame_loop(
    target: SharedTarget,
    baseline: Pose,
    clock: Arc<dyn Clock>,
    styles: Arc<dyn StyleSource>,
    config: AnimationConfig,
    start: Duration,
) {
    let mut rotation = StyleRotation::new(styles, Duration::from_millis(config.style_interval_ms));
    let mut frames = tokio::time::interval(Duration::from_millis(config.frame_interval_ms));

    loop {
        frames.tick().await;

        let elapsed = clock.elapsed().saturating_sub(start);
        let style = rotation.advance(elapsed);
        let sample = style.sample(elapsed);

        {
            let mut target = target.lock();
            let mut pose = target.pose();
            pose.rotation_x = baseline.rotation_x + sample.rotation_x;
            pose.rotation_z = baseline.rotation_z + sample.rotation_z;
            pose.scale = baseline.scale + sample.scale_delta;
            pose.position_y = baseline.position_y + sample.offset_y;
            target.set_pose(pose);
        }
    }
}
