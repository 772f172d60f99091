use crate::easing::Ease;
use crate::tween::Tween;
use seaside_common::Pose;
use seaside_waves::{WaveParams, elevation};

/// Length of each per-frame ease toward the bobbing target, in seconds.
pub const BOB_DURATION: f32 = 1.0;
/// Uniform scale of the beach ball model.
pub const BALL_SCALE: f32 = 0.8;
/// How far below the sampled elevation the ball's origin sits.
pub const SINK_DEPTH: f32 = 0.2;

/// Pose the floating object should head toward for `elevation` at time `t`.
///
/// Only position and the x/z rotation axes are driven; yaw and scale are
/// carried over from `current`.
pub fn bob_target(current: &Pose, elevation: f32, t: f32) -> Pose {
    let sway = t.sin();
    let half = elevation / 2.0;
    let mut target = *current;
    target.position.x = elevation - half + sway;
    target.position.y = elevation - SINK_DEPTH;
    target.position.z = -elevation - half + sway;
    target.rotation.z = elevation + sway * 0.5;
    target.rotation.x = -elevation + sway * 0.5;
    target
}

/// An object riding the wave surface.
///
/// Every frame starts a new [`BOB_DURATION`] ease from the current pose to a
/// freshly computed target, replacing the previous ease. There is no
/// velocity state: the pose chases a moving target.
#[derive(Debug, Clone)]
pub struct FloatingObject {
    pose: Pose,
    tween: Option<Tween<Pose>>,
    ease: Ease,
}

impl FloatingObject {
    pub fn new(pose: Pose) -> Self {
        Self {
            pose,
            tween: None,
            ease: Ease::Power2Out,
        }
    }

    /// Beach ball at the origin with its model scale.
    pub fn beach_ball() -> Self {
        Self::new(Pose::uniform_scale(BALL_SCALE))
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    /// Current target of the active ease, if any.
    pub fn target(&self) -> Option<Pose> {
        self.tween.map(|tween| tween.to())
    }

    /// Advance the running ease to `now`, sample the wave under the object
    /// and start a new ease toward the resulting target. Returns the sampled
    /// elevation.
    pub fn follow_waves(&mut self, now: f32, params: &WaveParams) -> f32 {
        if let Some(tween) = &self.tween {
            self.pose = tween.sample(now);
        }
        let e = elevation(self.pose.position.x, self.pose.position.z, now, params);
        let target = bob_target(&self.pose, e, now);
        self.tween = Some(Tween::new(self.pose, target, now, BOB_DURATION, self.ease));
        e
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn target_formula() {
        let current = Pose::uniform_scale(BALL_SCALE);
        let t = 0.5_f32;
        let e = 0.4_f32;
        let target = bob_target(&current, e, t);
        assert!((target.position.x - (0.2 + t.sin())).abs() < 1e-6);
        assert!((target.position.y - 0.2).abs() < 1e-6);
        assert!((target.position.z - (-0.6 + t.sin())).abs() < 1e-6);
        assert!((target.rotation.z - (0.4 + 0.5 * t.sin())).abs() < 1e-6);
        assert!((target.rotation.x - (-0.4 + 0.5 * t.sin())).abs() < 1e-6);
        assert_eq!(target.rotation.y, 0.0);
        assert_eq!(target.scale, Vec3::splat(BALL_SCALE));
    }

    #[test]
    fn first_frame_only_sets_target() {
        let mut ball = FloatingObject::beach_ball();
        let params = WaveParams::default();
        let e = ball.follow_waves(0.0, &params);
        assert_eq!(*ball.pose(), Pose::uniform_scale(BALL_SCALE));
        let target = ball.target().unwrap();
        assert!((target.position.y - (e - SINK_DEPTH)).abs() < 1e-6);
    }

    #[test]
    fn pose_moves_toward_target_over_frames() {
        let mut ball = FloatingObject::beach_ball();
        let params = WaveParams::default();
        ball.follow_waves(0.0, &params);
        let first_target = ball.target().unwrap();
        let start = *ball.pose();
        ball.follow_waves(1.0 / 60.0, &params);
        let moved = *ball.pose();
        assert_ne!(moved, start);
        assert!(
            moved.position.distance(first_target.position)
                < start.position.distance(first_target.position)
        );
    }

    #[test]
    fn pose_stays_finite_over_a_long_run() {
        let mut ball = FloatingObject::beach_ball();
        let params = WaveParams::default();
        for frame in 0..3600 {
            ball.follow_waves(frame as f32 / 60.0, &params);
        }
        let p = ball.pose();
        assert!(p.position.is_finite());
        assert!(p.rotation.is_finite());
        assert!(p.position.length() < 10.0);
    }
}
