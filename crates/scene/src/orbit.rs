use crate::camera::PerspectiveCamera;
use glam::{Vec2, Vec3};
use std::f32::consts::{PI, TAU};

const EPS: f32 = 1e-6;

/// Spherical coordinates around the orbit target.
///
/// `phi` is the polar angle from +Y, `theta` the azimuth around Y measured
/// from +Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub phi: f32,
    pub theta: f32,
}

impl Spherical {
    pub fn from_offset(v: Vec3) -> Self {
        let radius = v.length();
        if radius < EPS {
            return Self {
                radius: 0.0,
                phi: 0.0,
                theta: 0.0,
            };
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    pub fn to_offset(&self) -> Vec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }

    /// Keep phi away from the poles where the view basis degenerates.
    fn make_safe(&mut self) {
        self.phi = self.phi.clamp(EPS, PI - EPS);
    }
}

/// Orbit configuration applied when the camera becomes interactive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitSettings {
    pub enable_pan: bool,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub zoom_speed: f32,
    pub rotate_speed: f32,
    pub enable_damping: bool,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            enable_pan: false,
            min_distance: 6.0,
            max_distance: 11.0,
            min_polar_angle: PI / 3.5,
            max_polar_angle: PI / 2.5,
            zoom_speed: 0.1,
            rotate_speed: 0.2,
            enable_damping: true,
        }
    }
}

/// Orbit camera controls: rotate, zoom (dolly) and pan around a target, with
/// optional velocity damping.
///
/// Input methods only accumulate deltas; [`OrbitControls::update`] applies
/// them to the camera once per frame. With damping enabled each update
/// applies `damping_factor` of the pending delta and keeps the rest, so the
/// camera glides to a stop over several frames.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enabled: bool,
    pub enable_rotate: bool,
    pub enable_zoom: bool,
    pub enable_pan: bool,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    /// Pending (theta, phi) rotation.
    spherical_delta: Vec2,
    scale: f32,
    pan_offset: Vec3,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            enabled: true,
            enable_rotate: true,
            enable_zoom: true,
            enable_pan: true,
            enable_damping: false,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            spherical_delta: Vec2::ZERO,
            scale: 1.0,
            pan_offset: Vec3::ZERO,
        }
    }
}

impl OrbitControls {
    pub fn new(target: Vec3) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    /// Apply an interactive configuration.
    pub fn configure(&mut self, settings: &OrbitSettings) {
        self.enable_pan = settings.enable_pan;
        self.min_distance = settings.min_distance;
        self.max_distance = settings.max_distance;
        self.min_polar_angle = settings.min_polar_angle;
        self.max_polar_angle = settings.max_polar_angle;
        self.zoom_speed = settings.zoom_speed;
        self.rotate_speed = settings.rotate_speed;
        self.enable_damping = settings.enable_damping;
        if !self.enable_pan {
            self.pan_offset = Vec3::ZERO;
        }
    }

    /// Queue a rotation from a pointer drag of `(dx, dy)` pixels on a
    /// viewport `viewport_height` pixels tall. A full-height drag turns
    /// `TAU * rotate_speed` radians.
    pub fn rotate(&mut self, dx: f32, dy: f32, viewport_height: f32) -> bool {
        if !self.enabled || !self.enable_rotate {
            return false;
        }
        let h = viewport_height.max(1.0);
        self.spherical_delta.x -= TAU * dx / h * self.rotate_speed;
        self.spherical_delta.y -= TAU * dy / h * self.rotate_speed;
        true
    }

    /// Queue a dolly from `lines` scroll steps; positive moves closer.
    pub fn zoom(&mut self, lines: f32) -> bool {
        if !self.enabled || !self.enable_zoom || lines == 0.0 {
            return false;
        }
        let step = 0.95_f32.powf(self.zoom_speed * lines.abs());
        if lines > 0.0 {
            self.scale *= step;
        } else {
            self.scale /= step;
        }
        true
    }

    /// Queue a pan from a pointer drag, scaled so the target tracks the
    /// pointer at the target's depth.
    pub fn pan(&mut self, dx: f32, dy: f32, viewport_height: f32, camera: &PerspectiveCamera) -> bool {
        if !self.enabled || !self.enable_pan {
            return false;
        }
        let h = viewport_height.max(1.0);
        let offset = camera.position - self.target;
        let target_distance = offset.length() * (camera.fov / 2.0).tan();
        let left = -camera.right() * (2.0 * dx * self.pan_speed * target_distance / h);
        let up = camera.up() * (2.0 * dy * self.pan_speed * target_distance / h);
        self.pan_offset += left + up;
        true
    }

    /// Apply pending deltas and limits to the camera. Returns whether the
    /// camera moved noticeably.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let before = camera.position;
        let mut spherical = Spherical::from_offset(camera.position - self.target);

        let applied = if self.enable_damping {
            self.spherical_delta * self.damping_factor
        } else {
            self.spherical_delta
        };
        spherical.theta += applied.x;
        spherical.phi += applied.y;
        spherical.phi = spherical.phi.clamp(self.min_polar_angle, self.max_polar_angle);
        spherical.make_safe();

        spherical.radius = (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);

        if self.enable_damping {
            self.target += self.pan_offset * self.damping_factor;
        } else {
            self.target += self.pan_offset;
        }

        camera.position = self.target + spherical.to_offset();
        camera.target = self.target;

        if self.enable_damping {
            self.spherical_delta *= 1.0 - self.damping_factor;
            self.pan_offset *= 1.0 - self.damping_factor;
        } else {
            self.spherical_delta = Vec2::ZERO;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        before.distance_squared(camera.position) > EPS
    }

    /// Whether any damped motion is still pending.
    pub fn is_settling(&self) -> bool {
        self.spherical_delta.length_squared() > EPS * EPS || self.pan_offset.length_squared() > EPS * EPS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interactive() -> (OrbitControls, PerspectiveCamera) {
        let mut controls = OrbitControls::default();
        controls.configure(&OrbitSettings::default());
        (controls, PerspectiveCamera::default())
    }

    #[test]
    fn spherical_round_trip_of_rest_position() {
        let v = Vec3::new(1.0, 5.0, 9.0);
        let s = Spherical::from_offset(v);
        assert!((s.to_offset() - v).length() < 1e-4);
    }

    #[test]
    fn update_without_input_keeps_rest_position() {
        let (mut controls, mut camera) = interactive();
        let moved = controls.update(&mut camera);
        assert!(!moved);
        assert!((camera.position - Vec3::new(1.0, 5.0, 9.0)).length() < 1e-4);
    }

    #[test]
    fn zoom_is_clamped_to_distance_limits() {
        let (mut controls, mut camera) = interactive();
        for _ in 0..500 {
            controls.zoom(10.0);
            controls.update(&mut camera);
        }
        assert!((camera.distance_to_target() - 6.0).abs() < 1e-3);
        for _ in 0..500 {
            controls.zoom(-10.0);
            controls.update(&mut camera);
        }
        assert!((camera.distance_to_target() - 11.0).abs() < 1e-3);
    }

    #[test]
    fn polar_angle_is_clamped() {
        let (mut controls, mut camera) = interactive();
        for _ in 0..200 {
            controls.rotate(0.0, -500.0, 720.0);
            controls.update(&mut camera);
        }
        let s = Spherical::from_offset(camera.position - controls.target);
        assert!(s.phi >= PI / 3.5 - 1e-4);
        assert!(s.phi <= PI / 2.5 + 1e-4);
    }

    #[test]
    fn damping_spreads_rotation_over_frames() {
        let (mut controls, mut camera) = interactive();
        let start = Spherical::from_offset(camera.position);
        controls.rotate(100.0, 0.0, 720.0);
        controls.update(&mut camera);
        let first = Spherical::from_offset(camera.position);
        assert!(controls.is_settling());
        controls.update(&mut camera);
        let second = Spherical::from_offset(camera.position);
        let step1 = (first.theta - start.theta).abs();
        let step2 = (second.theta - first.theta).abs();
        assert!(step1 > 0.0);
        assert!(step2 < step1);
    }

    #[test]
    fn undamped_rotation_applies_at_once() {
        let mut controls = OrbitControls::default();
        let mut camera = PerspectiveCamera::default();
        let start = Spherical::from_offset(camera.position);
        controls.rotate(72.0, 0.0, 720.0);
        controls.update(&mut camera);
        let after = Spherical::from_offset(camera.position);
        assert!(((start.theta - after.theta) - TAU * 0.1).abs() < 1e-4);
        assert!(!controls.is_settling());
    }

    #[test]
    fn pan_disabled_when_interactive() {
        let (mut controls, camera) = interactive();
        assert!(!controls.pan(50.0, 50.0, 720.0, &camera));
        assert_eq!(controls.target, Vec3::ZERO);
    }

    #[test]
    fn pan_moves_target_when_enabled() {
        let mut controls = OrbitControls::default();
        let mut camera = PerspectiveCamera::default();
        assert!(controls.pan(100.0, 0.0, 720.0, &camera));
        controls.update(&mut camera);
        assert!(controls.target.length() > 0.0);
        assert_eq!(camera.target, controls.target);
    }

    #[test]
    fn disabled_controls_ignore_input() {
        let mut controls = OrbitControls {
            enabled: false,
            ..OrbitControls::default()
        };
        assert!(!controls.rotate(10.0, 10.0, 100.0));
        assert!(!controls.zoom(1.0));
    }
}
