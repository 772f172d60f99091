use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4};
use seaside_common::Pose;
use seaside_render::Lighting;
use seaside_scene::PerspectiveCamera;
use seaside_waves::WaveParams;

fn vec4(v: [f32; 3], w: f32) -> [f32; 4] {
    [v[0], v[1], v[2], w]
}

/// Per-frame camera and light data, bind group 0 of every pipeline.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct GlobalUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_position: [f32; 4],
    /// Unit vector toward the sun.
    pub light_direction: [f32; 4],
    pub light_radiance: [f32; 4],
    pub ambient_radiance: [f32; 4],
}

impl GlobalUniforms {
    pub fn new(camera: &PerspectiveCamera, lighting: &Lighting) -> Self {
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            camera_position: camera.position.extend(1.0).to_array(),
            light_direction: lighting.sun.direction().extend(0.0).to_array(),
            light_radiance: vec4(lighting.sun.radiance(), 1.0),
            ambient_radiance: vec4(lighting.ambient_radiance(), 1.0),
        }
    }
}

/// Water shader uniforms. Field order follows WGSL alignment: the vec2
/// leads, scalars fill to 48 bytes, the two colors are vec4 aligned.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct WaterUniforms {
    pub big_waves_frequency: [f32; 2],
    pub time: f32,
    pub big_waves_elevation: f32,
    pub big_waves_speed: f32,
    pub small_waves_elevation: f32,
    pub small_waves_frequency: f32,
    pub small_waves_speed: f32,
    pub small_waves_iterations: u32,
    pub color_offset: f32,
    pub color_multiplier: f32,
    pub _pad: f32,
    /// Linear depth color.
    pub depth_color: [f32; 4],
    /// Linear surface color.
    pub surface_color: [f32; 4],
}

impl WaterUniforms {
    pub fn new(params: &WaveParams, time: f32) -> Self {
        Self {
            big_waves_frequency: params.big_waves_frequency().to_array(),
            time,
            big_waves_elevation: params.big_waves_elevation(),
            big_waves_speed: params.big_waves_speed(),
            small_waves_elevation: params.small_waves_elevation(),
            small_waves_frequency: params.small_waves_frequency(),
            small_waves_speed: params.small_waves_speed(),
            small_waves_iterations: params.small_waves_iterations(),
            color_offset: params.color_offset(),
            color_multiplier: params.color_multiplier(),
            _pad: 0.0,
            depth_color: vec4(params.depth_color().to_linear(), 1.0),
            surface_color: vec4(params.surface_color().to_linear(), 1.0),
        }
    }
}

/// Model and normal matrix for one drawn object.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ObjectUniforms {
    pub model: [[f32; 4]; 4],
    /// Inverse transpose of the model's upper 3x3, padded to a mat4.
    pub normal: [[f32; 4]; 4],
}

impl ObjectUniforms {
    pub fn from_matrix(model: Mat4) -> Self {
        let normal = Mat3::from_mat4(model).inverse().transpose();
        Self {
            model: model.to_cols_array_2d(),
            normal: Mat4::from_mat3(normal).to_cols_array_2d(),
        }
    }

    pub fn from_pose(pose: &Pose) -> Self {
        Self::from_matrix(pose.matrix())
    }
}

/// Material factors, next to the texture in bind group 1.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MaterialUniforms {
    /// Linear RGBA multiplier applied to the texture sample.
    pub base_color: [f32; 4],
}

impl MaterialUniforms {
    pub fn new(base_color: [f32; 4]) -> Self {
        Self { base_color }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use seaside_waves::WaveParam;
    use seaside_common::Rgb;
    use std::mem::size_of;

    #[test]
    fn color_edits_reach_the_water_block() {
        let mut params = WaveParams::default();
        let before = WaterUniforms::new(&params, 0.0);

        params.set_depth_color(Rgb::from_srgb8([255, 0, 0]));
        let after = WaterUniforms::new(&params, 0.0);
        assert_ne!(after.depth_color, before.depth_color);
        assert!((after.depth_color[0] - 1.0).abs() < 1e-5);
        assert!(after.depth_color[1].abs() < 1e-5 && after.depth_color[2].abs() < 1e-5);
        assert_eq!(after.surface_color, before.surface_color);

        params.set_surface_color(Rgb::BLACK);
        let after = WaterUniforms::new(&params, 0.0);
        assert_eq!(&after.surface_color[..3], &[0.0, 0.0, 0.0]);
    }

    fn transform_normal(uniforms: &ObjectUniforms, n: Vec3) -> Vec3 {
        Mat4::from_cols_array_2d(&uniforms.normal)
            .transform_vector3(n)
            .normalize_or_zero()
    }

    #[test]
    fn uniform_sizes_match_wgsl() {
        assert_eq!(size_of::<GlobalUniforms>(), 128);
        assert_eq!(size_of::<WaterUniforms>(), 80);
        assert_eq!(size_of::<ObjectUniforms>(), 128);
        assert_eq!(size_of::<MaterialUniforms>(), 16);
    }

    #[test]
    fn water_uniforms_follow_params() {
        let mut params = WaveParams::default();
        params.set(WaveParam::SmallWavesIterations, 2.0).unwrap();
        let u = WaterUniforms::new(&params, 3.5);
        assert_eq!(u.time, 3.5);
        assert_eq!(u.small_waves_iterations, 2);
        assert_eq!(u.big_waves_elevation, params.big_waves_elevation());
        assert_eq!(u.big_waves_frequency, params.big_waves_frequency().to_array());
        assert!(u.surface_color.iter().all(|c| (c - 1.0).abs() < 1e-5));
        // #0f5e9c in linear light is darker than its sRGB value
        assert!(u.depth_color[2] < 0x9c as f32 / 255.0);
    }

    #[test]
    fn globals_carry_camera_and_light() {
        let camera = PerspectiveCamera::default();
        let g = GlobalUniforms::new(&camera, &Lighting::default());
        assert_eq!(g.camera_position, [1.0, 5.0, 9.0, 1.0]);
        assert_eq!(g.light_direction[3], 0.0);
        assert!(g.light_radiance[..3].iter().all(|c| (c - 2.0).abs() < 1e-5));
        assert!(g.ambient_radiance[..3].iter().all(|c| (c - 1.0).abs() < 1e-5));
    }

    #[test]
    fn normal_matrix_undoes_nonuniform_scale() {
        let u = ObjectUniforms::from_matrix(Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0)));
        // a 45 degree normal tilts toward the squashed axis after scaling x by 2
        let n = transform_normal(&u, Vec3::new(1.0, 1.0, 0.0).normalize());
        assert!(n.x < n.y);
        assert!((n.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn pose_scale_reaches_model_matrix() {
        let u = ObjectUniforms::from_pose(&Pose::uniform_scale(0.8));
        assert!((u.model[0][0] - 0.8).abs() < 1e-6);
        assert!((u.model[3][3] - 1.0).abs() < 1e-6);
    }
}
