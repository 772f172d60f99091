use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Spatial pose of a scene object: position, Euler rotation, scale.
///
/// Rotation is stored as XYZ Euler angles in radians so that each axis can be
/// eased independently, the same way the per-frame bobbing animation targets
/// `rotation.x` and `rotation.z` separately.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Pose {
    /// Identity pose with a uniform scale.
    pub fn uniform_scale(scale: f32) -> Self {
        Self {
            scale: Vec3::splat(scale),
            ..Self::default()
        }
    }

    pub fn quat(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }

    /// Model matrix (scale, then rotate, then translate).
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quat(), self.position)
    }

    /// Component-wise linear blend between two poses.
    pub fn lerp(&self, other: &Pose, t: f32) -> Pose {
        Pose {
            position: self.position.lerp(other.position, t),
            rotation: self.rotation.lerp(other.rotation, t),
            scale: self.scale.lerp(other.scale, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pose_default_is_identity() {
        let p = Pose::default();
        assert_eq!(p.position, Vec3::ZERO);
        assert_eq!(p.rotation, Vec3::ZERO);
        assert_eq!(p.scale, Vec3::ONE);
        assert_eq!(p.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = Pose::default();
        let b = Pose {
            position: Vec3::new(2.0, 4.0, -6.0),
            rotation: Vec3::new(1.0, 0.0, -1.0),
            scale: Vec3::splat(3.0),
        };
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
        let mid = a.lerp(&b, 0.5);
        assert!((mid.position - Vec3::new(1.0, 2.0, -3.0)).length() < 1e-6);
        assert!((mid.scale - Vec3::splat(2.0)).length() < 1e-6);
    }

    #[test]
    fn matrix_applies_translation_and_scale() {
        let p = Pose {
            position: Vec3::new(1.0, 2.0, 3.0),
            ..Pose::uniform_scale(0.8)
        };
        let v = p.matrix().transform_point3(Vec3::X);
        assert!((v - Vec3::new(1.8, 2.0, 3.0)).length() < 1e-6);
    }
}
