use crate::camera::PerspectiveCamera;
use crate::floating::FloatingObject;
use crate::intro::{CameraPhase, IntroAnimation, IntroConfig};
use crate::orbit::OrbitControls;
use crate::viewport::Viewport;
use seaside_input::Action;
use seaside_waves::WaveParams;

/// Lifecycle of the floating model.
#[derive(Debug, Clone)]
pub enum ModelSlot {
    /// Background load still running.
    Loading,
    /// Loaded and animating.
    Ready(FloatingObject),
    /// Load failed; the object stays absent.
    Failed(String),
}

impl ModelSlot {
    pub fn ready(&self) -> Option<&FloatingObject> {
        match self {
            ModelSlot::Ready(object) => Some(object),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ModelSlot::Ready(_))
    }
}

/// What happened during one call to [`SceneState::advance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    pub time: f32,
    /// Wave elevation under the floating object, when it is ready.
    pub elevation: Option<f32>,
    /// Set on the one frame the intro hands over to the orbit controls.
    pub intro_finished: bool,
    pub camera_moved: bool,
}

/// All mutable scene state, owned in one place and advanced once per frame.
#[derive(Debug, Clone)]
pub struct SceneState {
    /// Wave uniforms. The renderer reads these every frame.
    pub params: WaveParams,
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
    intro: IntroAnimation,
    viewport: Viewport,
    model: ModelSlot,
    time: f32,
    frame: u64,
}

impl SceneState {
    pub fn new(viewport: Viewport) -> Self {
        Self::with_intro(viewport, IntroConfig::default())
    }

    pub fn with_intro(viewport: Viewport, intro: IntroConfig) -> Self {
        let controls = OrbitControls::default();
        let mut camera = PerspectiveCamera {
            aspect: viewport.aspect(),
            ..PerspectiveCamera::default()
        };
        let intro = IntroAnimation::new(intro);
        intro.begin(&mut camera, &controls);
        Self {
            params: WaveParams::default(),
            camera,
            controls,
            intro,
            viewport,
            model: ModelSlot::Loading,
            time: 0.0,
            frame: 0,
        }
    }

    /// Seconds since scene start, as of the last frame. This is the value of
    /// the wave time uniform.
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn phase(&self) -> CameraPhase {
        self.intro.phase()
    }

    pub fn model(&self) -> &ModelSlot {
        &self.model
    }

    /// The floating object, once its model is ready.
    pub fn floating(&self) -> Option<&FloatingObject> {
        self.model.ready()
    }

    /// Mark the model loaded; the object starts bobbing next frame.
    pub fn model_loaded(&mut self) {
        if self.model.is_ready() {
            return;
        }
        tracing::info!("floating object ready");
        self.model = ModelSlot::Ready(FloatingObject::beach_ball());
    }

    /// Mark the model as permanently failed.
    pub fn model_failed(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::warn!(%reason, "floating object will stay absent");
        self.model = ModelSlot::Failed(reason);
    }

    /// Viewport changed: update the camera's aspect ratio.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.camera.aspect = viewport.aspect();
        let (w, h) = viewport.drawable_size();
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            drawable_width = w,
            drawable_height = h,
            "viewport resized"
        );
    }

    /// Route an input action to the orbit controls. Camera input is ignored
    /// until the intro has finished. Returns whether the action was used.
    pub fn apply(&mut self, action: &Action) -> bool {
        if action.is_camera() && self.phase() == CameraPhase::Intro {
            return false;
        }
        match *action {
            Action::Orbit {
                dx,
                dy,
                viewport_height,
            } => self.controls.rotate(dx, dy, viewport_height),
            Action::Pan {
                dx,
                dy,
                viewport_height,
            } => self.controls.pan(dx, dy, viewport_height, &self.camera),
            Action::Zoom(lines) => self.controls.zoom(lines),
            Action::ToggleTweakPanel | Action::Noop => false,
        }
    }

    /// Run one frame of the scene at `elapsed` seconds since start.
    ///
    /// Order: store the time (the wave time uniform), animate the floating
    /// object if ready, then advance the intro or the orbit controls.
    /// Rendering and scheduling the next frame belong to the caller.
    pub fn advance(&mut self, elapsed: f32) -> FrameReport {
        self.time = elapsed.max(self.time);
        self.frame += 1;

        let elevation = match &mut self.model {
            ModelSlot::Ready(object) => Some(object.follow_waves(self.time, &self.params)),
            ModelSlot::Loading | ModelSlot::Failed(_) => None,
        };

        let before = self.camera.position;
        let intro_finished = match self.intro.phase() {
            CameraPhase::Intro => {
                self.intro
                    .update(self.time, &mut self.camera, &mut self.controls)
            }
            CameraPhase::Interactive => {
                self.controls.update(&mut self.camera);
                false
            }
        };

        FrameReport {
            frame: self.frame,
            time: self.time,
            elevation,
            intro_finished,
            camera_moved: before != self.camera.position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn run(scene: &mut SceneState, from_frame: u32, to_frame: u32) -> Vec<FrameReport> {
        (from_frame..to_frame)
            .map(|f| scene.advance(f as f32 / 60.0))
            .collect()
    }

    #[test]
    fn new_scene_is_loading_and_in_intro() {
        let scene = SceneState::new(Viewport::default());
        assert!(matches!(scene.model(), ModelSlot::Loading));
        assert_eq!(scene.phase(), CameraPhase::Intro);
        assert_eq!(scene.camera.position, Vec3::new(50.0, 20.0, 10.0));
    }

    #[test]
    fn object_is_not_touched_before_load() {
        let mut scene = SceneState::new(Viewport::default());
        for report in run(&mut scene, 0, 120) {
            assert!(report.elevation.is_none());
        }
        assert!(scene.floating().is_none());
    }

    #[test]
    fn object_bobs_once_loaded() {
        let mut scene = SceneState::new(Viewport::default());
        run(&mut scene, 0, 30);
        scene.model_loaded();
        let reports = run(&mut scene, 30, 90);
        assert!(reports.iter().all(|r| r.elevation.is_some()));
        let pose = scene.floating().unwrap().pose();
        assert_ne!(pose.position, Vec3::ZERO);
    }

    #[test]
    fn failed_load_keeps_object_absent() {
        let mut scene = SceneState::new(Viewport::default());
        scene.model_failed("file not found");
        let reports = run(&mut scene, 0, 60);
        assert!(reports.iter().all(|r| r.elevation.is_none()));
        assert!(matches!(scene.model(), ModelSlot::Failed(r) if r == "file not found"));
    }

    #[test]
    fn time_uniform_tracks_elapsed() {
        let mut scene = SceneState::new(Viewport::default());
        scene.advance(1.25);
        assert_eq!(scene.time(), 1.25);
        // a clock hiccup never moves time backwards
        scene.advance(1.0);
        assert_eq!(scene.time(), 1.25);
        assert_eq!(scene.frame(), 2);
    }

    #[test]
    fn intro_hands_over_exactly_once() {
        let mut scene = SceneState::new(Viewport::default());
        let reports = run(&mut scene, 0, 300);
        let finished: Vec<_> = reports.iter().filter(|r| r.intro_finished).collect();
        assert_eq!(finished.len(), 1);
        assert!(finished[0].time >= 2.0);
        assert_eq!(scene.phase(), CameraPhase::Interactive);
        assert!((scene.camera.position - Vec3::new(1.0, 5.0, 9.0)).length() < 1e-4);
    }

    #[test]
    fn input_ignored_during_intro() {
        let mut scene = SceneState::new(Viewport::default());
        scene.advance(0.5);
        assert!(!scene.apply(&Action::Zoom(3.0)));
        assert!(!scene.apply(&Action::Orbit {
            dx: 10.0,
            dy: 0.0,
            viewport_height: 720.0
        }));
    }

    #[test]
    fn orbit_input_moves_camera_when_interactive() {
        let mut scene = SceneState::new(Viewport::default());
        run(&mut scene, 0, 130);
        let rest = scene.camera.position;
        assert!(scene.apply(&Action::Orbit {
            dx: 200.0,
            dy: 0.0,
            viewport_height: 720.0
        }));
        let report = scene.advance(130.0 / 60.0);
        assert!(report.camera_moved);
        assert_ne!(scene.camera.position, rest);
        assert!(!scene.apply(&Action::Pan {
            dx: 5.0,
            dy: 5.0,
            viewport_height: 720.0
        }));
    }

    #[test]
    fn resize_updates_aspect() {
        let mut scene = SceneState::new(Viewport::default());
        scene.resize(Viewport::new(500.0, 1000.0, 3.0));
        assert!((scene.camera.aspect - 0.5).abs() < 1e-6);
        assert_eq!(scene.viewport().drawable_size(), (1000, 2000));
    }

    #[test]
    fn edited_params_reach_the_floating_object() {
        use seaside_waves::WaveParam;
        let mut calm = SceneState::new(Viewport::default());
        let mut rough = SceneState::new(Viewport::default());
        rough.params.set(WaveParam::BigWavesElevation, 2.0).unwrap();
        calm.model_loaded();
        rough.model_loaded();
        let a = run(&mut calm, 0, 10);
        let b = run(&mut rough, 0, 10);
        assert_ne!(a.last().unwrap().elevation, b.last().unwrap().elevation);
    }
}
