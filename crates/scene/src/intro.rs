use crate::camera::PerspectiveCamera;
use crate::easing::Ease;
use crate::orbit::{OrbitControls, OrbitSettings};
use crate::tween::Tween;
use glam::Vec3;

/// Camera mode: flying in, or under user control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraPhase {
    Intro,
    Interactive,
}

/// Fly-in parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntroConfig {
    pub from: Vec3,
    pub to: Vec3,
    /// Scene time the fly-in starts at, in seconds.
    pub start: f32,
    pub duration: f32,
    pub ease: Ease,
    /// Orbit configuration applied on completion.
    pub settings: OrbitSettings,
}

impl Default for IntroConfig {
    fn default() -> Self {
        Self {
            from: Vec3::new(50.0, 20.0, 10.0),
            to: Vec3::new(1.0, 5.0, 9.0),
            start: 0.0,
            duration: 2.0,
            ease: Ease::Power2Out,
            settings: OrbitSettings::default(),
        }
    }
}

/// One-shot camera fly-in that hands over to the orbit controls.
#[derive(Debug, Clone)]
pub struct IntroAnimation {
    tween: Tween<Vec3>,
    settings: OrbitSettings,
    phase: CameraPhase,
}

impl IntroAnimation {
    pub fn new(config: IntroConfig) -> Self {
        Self {
            tween: Tween::new(config.from, config.to, config.start, config.duration, config.ease),
            settings: config.settings,
            phase: CameraPhase::Intro,
        }
    }

    pub fn phase(&self) -> CameraPhase {
        self.phase
    }

    pub fn resting_position(&self) -> Vec3 {
        self.tween.to()
    }

    /// Place the camera at the off-screen start.
    pub fn begin(&self, camera: &mut PerspectiveCamera, controls: &OrbitControls) {
        camera.position = self.tween.from();
        camera.target = controls.target;
    }

    /// Advance the fly-in. Returns `true` on the single frame the camera
    /// becomes interactive.
    pub fn update(
        &mut self,
        now: f32,
        camera: &mut PerspectiveCamera,
        controls: &mut OrbitControls,
    ) -> bool {
        if self.phase == CameraPhase::Interactive {
            return false;
        }
        camera.target = controls.target;
        if !self.tween.is_finished(now) {
            camera.position = self.tween.sample(now);
            return false;
        }

        camera.position = self.tween.to();
        controls.configure(&self.settings);
        self.phase = CameraPhase::Interactive;
        tracing::info!(
            x = camera.position.x,
            y = camera.position.y,
            z = camera.position.z,
            "intro finished, orbit controls enabled"
        );
        true
    }
}

impl Default for IntroAnimation {
    fn default() -> Self {
        Self::new(IntroConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (IntroAnimation, PerspectiveCamera, OrbitControls) {
        let intro = IntroAnimation::default();
        let controls = OrbitControls::default();
        let mut camera = PerspectiveCamera::default();
        intro.begin(&mut camera, &controls);
        (intro, camera, controls)
    }

    #[test]
    fn begins_off_screen() {
        let (intro, camera, _) = setup();
        assert_eq!(camera.position, Vec3::new(50.0, 20.0, 10.0));
        assert_eq!(intro.phase(), CameraPhase::Intro);
    }

    #[test]
    fn ends_exactly_at_rest_regardless_of_frame_timing() {
        for step in [0.016_f32, 0.1, 0.7, 1.9, 5.0] {
            let (mut intro, mut camera, mut controls) = setup();
            let mut t = 0.0;
            while intro.phase() == CameraPhase::Intro {
                t += step;
                intro.update(t, &mut camera, &mut controls);
            }
            assert_eq!(camera.position, Vec3::new(1.0, 5.0, 9.0), "step {step}");
        }
    }

    #[test]
    fn limits_applied_exactly_once_after_completion() {
        let (mut intro, mut camera, mut controls) = setup();
        let defaults = OrbitControls::default();

        let mut completions = 0;
        for frame in 0..300 {
            let t = frame as f32 / 60.0;
            if intro.update(t, &mut camera, &mut controls) {
                completions += 1;
                assert!(t >= 2.0);
            }
            if t < 2.0 {
                assert_eq!(controls.enable_pan, defaults.enable_pan);
                assert_eq!(controls.max_distance, defaults.max_distance);
                assert!(!controls.enable_damping);
            }
        }
        assert_eq!(completions, 1);
        assert!(!controls.enable_pan);
        assert!(controls.enable_damping);
        assert_eq!(controls.min_distance, 6.0);
        assert_eq!(controls.max_distance, 11.0);
        assert_eq!(controls.zoom_speed, 0.1);
        assert_eq!(controls.rotate_speed, 0.2);
    }

    #[test]
    fn later_updates_leave_camera_alone() {
        let (mut intro, mut camera, mut controls) = setup();
        intro.update(3.0, &mut camera, &mut controls);
        camera.position = Vec3::new(0.0, 7.0, 7.0);
        assert!(!intro.update(4.0, &mut camera, &mut controls));
        assert_eq!(camera.position, Vec3::new(0.0, 7.0, 7.0));
    }

    #[test]
    fn camera_moves_toward_rest_during_intro() {
        let (mut intro, mut camera, mut controls) = setup();
        intro.update(1.0, &mut camera, &mut controls);
        let rest = Vec3::new(1.0, 5.0, 9.0);
        assert!(camera.position.distance(rest) < Vec3::new(50.0, 20.0, 10.0).distance(rest));
        assert_eq!(camera.target, Vec3::ZERO);
    }
}
