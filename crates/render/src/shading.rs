use glam::Vec3;
use seaside_common::Rgb;
use seaside_waves::WaveParams;
use std::f32::consts::PI;

/// A light infinitely far away, shining from `position` toward `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: Rgb,
    pub intensity: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl DirectionalLight {
    /// Unit vector from a lit surface toward the light.
    pub fn direction(&self) -> Vec3 {
        (self.position - self.target).normalize_or(Vec3::Y)
    }

    /// Linear color scaled by intensity.
    pub fn radiance(&self) -> [f32; 3] {
        self.color.to_linear().map(|c| c * self.intensity)
    }
}

/// The scene's light rig: one sun plus flat ambient fill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub sun: DirectionalLight,
    pub ambient: Rgb,
    pub ambient_intensity: f32,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            sun: DirectionalLight {
                color: Rgb::WHITE,
                intensity: 2.0,
                position: Vec3::new(0.25, 3.0, -2.25),
                target: Vec3::ZERO,
            },
            ambient: Rgb::WHITE,
            ambient_intensity: 1.0,
        }
    }
}

impl Lighting {
    pub fn ambient_radiance(&self) -> [f32; 3] {
        self.ambient.to_linear().map(|c| c * self.ambient_intensity)
    }
}

/// Lambert shading of a linear `albedo`. Mirrors the model fragment shader.
pub fn lambert(albedo: [f32; 3], normal: Vec3, lighting: &Lighting) -> [f32; 3] {
    let n_dot_l = normal.normalize_or_zero().dot(lighting.sun.direction()).max(0.0);
    let sun = lighting.sun.radiance();
    let ambient = lighting.ambient_radiance();
    std::array::from_fn(|i| albedo[i] / PI * (sun[i] * n_dot_l + ambient[i]))
}

/// Linear water color at elevation `e`. Mirrors the water fragment shader:
/// depth and surface colors mixed by `(e + offset) * multiplier`. The mix
/// is not clamped; the result is clamped the way a color target would.
pub fn water_color(params: &WaveParams, e: f32) -> [f32; 3] {
    let depth = params.depth_color().to_linear();
    let surface = params.surface_color().to_linear();
    let strength = (e + params.color_offset()) * params.color_multiplier();
    std::array::from_fn(|i| (depth[i] + (surface[i] - depth[i]) * strength).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use seaside_waves::WaveParam;

    fn close(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn default_sun_points_up_and_back() {
        let dir = Lighting::default().sun.direction();
        assert!(dir.y > 0.7);
        assert!(dir.z < 0.0);
        assert!((dir.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn back_faces_get_only_ambient() {
        let lighting = Lighting::default();
        let away = -lighting.sun.direction();
        let lit = lambert([1.0, 1.0, 1.0], away, &lighting);
        assert!(close(lit, [1.0 / PI; 3]));
    }

    #[test]
    fn facing_the_sun_adds_intensity() {
        let lighting = Lighting::default();
        let lit = lambert([0.5, 0.5, 0.5], lighting.sun.direction(), &lighting);
        assert!(close(lit, [0.5 * 3.0 / PI; 3]));
    }

    #[test]
    fn water_color_endpoints() {
        let mut params = WaveParams::default();
        params.set(WaveParam::ColorOffset, 0.0).unwrap();
        params.set(WaveParam::ColorMultiplier, 1.0).unwrap();
        assert!(close(water_color(&params, 0.0), params.depth_color().to_linear()));
        assert!(close(water_color(&params, 1.0), params.surface_color().to_linear()));
    }

    #[test]
    fn water_color_is_clamped() {
        let mut params = WaveParams::default();
        params.set(WaveParam::ColorMultiplier, 1.0).unwrap();
        for c in water_color(&params, 50.0) {
            assert!((0.0..=1.0).contains(&c));
        }
        for c in water_color(&params, -50.0) {
            assert!((0.0..=1.0).contains(&c));
        }
    }

    #[test]
    fn zero_multiplier_is_pure_depth_color() {
        let mut params = WaveParams::default();
        params.set(WaveParam::ColorMultiplier, 0.0).unwrap();
        assert!(close(water_color(&params, 0.7), params.depth_color().to_linear()));
    }
}
