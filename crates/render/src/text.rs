use glam::Vec3;
use seaside_scene::{ModelSlot, PerspectiveCamera, SceneState};
use std::fmt;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self::from(&PerspectiveCamera::default())
    }
}

impl From<&PerspectiveCamera> for RenderView {
    fn from(camera: &PerspectiveCamera) -> Self {
        Self {
            eye: camera.position,
            target: camera.target,
            fov_degrees: camera.fov.to_degrees(),
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads the scene and a view and produces output. It never
/// mutates the scene.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame of `scene` as seen from `view`.
    fn render(&self, scene: &SceneState, view: &RenderView) -> Self::Output;
}

/// Human-readable dump of the scene state, for the CLI and logs.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

fn vec3(v: Vec3) -> String {
    format!("({:.2}, {:.2}, {:.2})", v.x, v.y, v.z)
}

/// One scene dump, written line by line.
struct SceneDump<'a> {
    scene: &'a SceneState,
    view: &'a RenderView,
}

impl fmt::Display for SceneDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (scene, view) = (self.scene, self.view);
        let p = &scene.params;
        let viewport = scene.viewport();
        let (dw, dh) = viewport.drawable_size();
        let freq = p.big_waves_frequency();

        writeln!(
            f,
            "=== Scene (frame={}, t={:.3}s, camera={:?}) ===",
            scene.frame(),
            scene.time(),
            scene.phase()
        )?;
        writeln!(
            f,
            "Camera: eye={} target={} fov={:.0}",
            vec3(view.eye),
            vec3(view.target),
            view.fov_degrees
        )?;
        writeln!(
            f,
            "Viewport: {}x{} @{:.2} (drawable {dw}x{dh})",
            viewport.width,
            viewport.height,
            viewport.pixel_ratio()
        )?;
        writeln!(
            f,
            "Big waves: elevation={:.3} frequency=({:.3}, {:.3}) speed={:.3}",
            p.big_waves_elevation(),
            freq.x,
            freq.y,
            p.big_waves_speed()
        )?;
        writeln!(
            f,
            "Small waves: elevation={:.3} frequency={:.3} speed={:.3} iterations={}",
            p.small_waves_elevation(),
            p.small_waves_frequency(),
            p.small_waves_speed(),
            p.small_waves_iterations()
        )?;
        writeln!(
            f,
            "Colors: depth={} surface={} offset={:.3} multiplier={:.3}",
            p.depth_color(),
            p.surface_color(),
            p.color_offset(),
            p.color_multiplier()
        )?;
        match scene.model() {
            ModelSlot::Loading => writeln!(f, "Model: loading"),
            ModelSlot::Failed(reason) => writeln!(f, "Model: failed ({reason})"),
            ModelSlot::Ready(object) => {
                let pose = object.pose();
                writeln!(
                    f,
                    "Model: pos={} rot={}",
                    vec3(pose.position),
                    vec3(pose.rotation)
                )
            }
        }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &SceneState, view: &RenderView) -> String {
        SceneDump { scene, view }.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seaside_scene::Viewport;

    #[test]
    fn render_view_from_camera() {
        let view = RenderView::default();
        assert!((view.fov_degrees - 75.0).abs() < 1e-4);
        assert_eq!(view.target, Vec3::ZERO);
        assert_eq!(view.eye, Vec3::new(1.0, 5.0, 9.0));
    }

    #[test]
    fn fresh_scene_dump() {
        let scene = SceneState::new(Viewport::default());
        let out = DebugTextRenderer::new().render(&scene, &RenderView::from(&scene.camera));
        assert!(out.contains("frame=0"));
        assert!(out.contains("camera=Intro"));
        assert!(out.contains("depth=#0f5e9c"));
        assert!(out.contains("iterations=4"));
        assert!(out.contains("Model: loading"));
    }

    #[test]
    fn ready_and_failed_models() {
        let mut scene = SceneState::new(Viewport::default());
        scene.model_loaded();
        scene.advance(0.5);
        let out = DebugTextRenderer::new().render(&scene, &RenderView::default());
        assert!(out.contains("Model: pos="));

        scene.model_failed("bad file");
        let out = DebugTextRenderer::new().render(&scene, &RenderView::default());
        assert!(out.contains("Model: failed (bad file)"));
    }
}
