use crate::easing::Ease;
use glam::Vec3;
use seaside_common::Pose;

/// Values that can be blended by a [`Tween`].
pub trait Lerp: Copy {
    fn lerp(self, to: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for Vec3 {
    fn lerp(self, to: Self, t: f32) -> Self {
        Vec3::lerp(self, to, t)
    }
}

impl Lerp for Pose {
    fn lerp(self, to: Self, t: f32) -> Self {
        Pose::lerp(&self, &to, t)
    }
}

/// A fixed-duration eased transition between two values on the scene clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween<T> {
    from: T,
    to: T,
    start: f32,
    duration: f32,
    ease: Ease,
}

impl<T: Lerp> Tween<T> {
    /// Start a tween at scene time `start`. Negative durations act as zero.
    pub fn new(from: T, to: T, start: f32, duration: f32, ease: Ease) -> Self {
        Self {
            from,
            to,
            start,
            duration: duration.max(0.0),
            ease,
        }
    }

    /// Linear progress in `0.0..=1.0` at scene time `now`.
    pub fn progress(&self, now: f32) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.start) / self.duration).clamp(0.0, 1.0)
    }

    /// Value at scene time `now`. Returns `to` exactly once finished.
    pub fn sample(&self, now: f32) -> T {
        if self.is_finished(now) {
            return self.to;
        }
        let t = self.ease.apply(self.progress(now));
        self.from.lerp(self.to, t)
    }

    pub fn is_finished(&self, now: f32) -> bool {
        self.progress(now) >= 1.0
    }

    pub fn from(&self) -> T {
        self.from
    }

    pub fn to(&self) -> T {
        self.to
    }

    pub fn end_time(&self) -> f32 {
        self.start + self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_from_and_ends_at_to() {
        let tween = Tween::new(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 1.0, 2.0, Ease::Power2Out);
        assert_eq!(tween.sample(0.0), Vec3::ZERO);
        assert_eq!(tween.sample(1.0), Vec3::ZERO);
        assert_eq!(tween.sample(3.0), Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(tween.sample(100.0), Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn midpoint_uses_easing() {
        let tween = Tween::new(0.0_f32, 8.0, 0.0, 1.0, Ease::Power2Out);
        assert!((tween.sample(0.5) - 7.0).abs() < 1e-5);
        let linear = Tween::new(0.0_f32, 8.0, 0.0, 1.0, Ease::Linear);
        assert!((linear.sample(0.5) - 4.0).abs() < 1e-5);
    }

    #[test]
    fn zero_duration_is_finished_immediately() {
        let tween = Tween::new(1.0_f32, 2.0, 5.0, 0.0, Ease::Linear);
        assert!(tween.is_finished(5.0));
        assert_eq!(tween.sample(0.0), 2.0);
    }

    #[test]
    fn pose_tween_blends_every_component() {
        let from = Pose::default();
        let to = Pose {
            position: Vec3::new(0.0, 2.0, 0.0),
            rotation: Vec3::new(1.0, 0.0, 0.0),
            scale: Vec3::ONE,
        };
        let tween = Tween::new(from, to, 0.0, 1.0, Ease::Linear);
        let mid = tween.sample(0.5);
        assert!((mid.position.y - 1.0).abs() < 1e-6);
        assert!((mid.rotation.x - 0.5).abs() < 1e-6);
        assert_eq!(tween.end_time(), 1.0);
    }
}
