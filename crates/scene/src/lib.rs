//! Scene state and the per-frame updater.
//!
//! Everything here is renderer-independent and driven by an explicit elapsed
//! time, so the whole frame loop can run headless.
//!
//! # Invariants
//! - The floating object is only read or animated once its slot is `Ready`.
//! - Orbit limits are applied exactly once, when the intro animation ends.
//! - User input is ignored until the camera is interactive.

mod camera;
mod clock;
mod easing;
mod floating;
mod intro;
mod orbit;
mod state;
mod tween;
mod viewport;

pub use camera::PerspectiveCamera;
pub use clock::Clock;
pub use easing::Ease;
pub use floating::{BOB_DURATION, BALL_SCALE, FloatingObject, SINK_DEPTH, bob_target};
pub use intro::{CameraPhase, IntroAnimation, IntroConfig};
pub use orbit::{OrbitControls, OrbitSettings, Spherical};
pub use state::{FrameReport, ModelSlot, SceneState};
pub use tween::{Lerp, Tween};
pub use viewport::{MAX_PIXEL_RATIO, Viewport};
