use seaside_common::Rgb;
use seaside_waves::{TweakError, WaveParam, WaveParams};

/// Default width of the panel in logical pixels.
pub const PANEL_WIDTH: f32 = 340.0;

/// What the user changed during one frame of the panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TweakOutcome {
    /// Parameters whose new value was accepted.
    pub edited: Vec<WaveParam>,
    /// Edits the setters refused.
    pub rejected: Vec<TweakError>,
    pub colors_changed: bool,
}

impl TweakOutcome {
    pub fn is_empty(&self) -> bool {
        self.edited.is_empty() && self.rejected.is_empty() && !self.colors_changed
    }

    /// Route one slider value through the validating setter.
    fn commit(&mut self, params: &mut WaveParams, param: WaveParam, value: f32) {
        match params.set(param, value) {
            Ok(_) => self.edited.push(param),
            Err(e) => {
                tracing::warn!(error = %e, "tweak rejected");
                self.rejected.push(e);
            }
        }
    }
}

/// Floating egui window with sliders and color pickers.
#[derive(Debug, Clone)]
pub struct TweakPanel {
    visible: bool,
    start_expanded: bool,
}

impl Default for TweakPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl TweakPanel {
    pub fn new() -> Self {
        Self {
            visible: true,
            start_expanded: false,
        }
    }

    /// Start with the window expanded instead of collapsed.
    pub fn expanded(mut self, expanded: bool) -> Self {
        self.start_expanded = expanded;
        self
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn toggle_visible(&mut self) {
        self.visible = !self.visible;
        tracing::debug!(visible = self.visible, "tweak panel toggled");
    }

    /// Draw the panel for this frame and apply any edits to `params`.
    pub fn show(&mut self, ctx: &egui::Context, params: &mut WaveParams) -> TweakOutcome {
        let mut outcome = TweakOutcome::default();
        if !self.visible {
            return outcome;
        }

        egui::Window::new("Tweaks")
            .default_open(self.start_expanded)
            .default_width(PANEL_WIDTH)
            .anchor(egui::Align2::RIGHT_TOP, [-8.0, 8.0])
            .resizable(false)
            .show(ctx, |ui| {
                for param in WaveParam::ALL {
                    let range = param.range();
                    let mut value = params.get(param);
                    let mut slider = egui::Slider::new(&mut value, range.min..=range.max)
                        .step_by(range.step as f64)
                        .text(param.label());
                    if param == WaveParam::SmallWavesIterations {
                        slider = slider.fixed_decimals(0);
                    }
                    if ui.add(slider).changed() {
                        outcome.commit(params, param, value);
                    }
                }

                ui.separator();
                let mut depth = params.depth_color().to_srgb8();
                let mut surface = params.surface_color().to_srgb8();
                ui.horizontal(|ui| {
                    if ui.color_edit_button_srgb(&mut depth).changed() {
                        params.set_depth_color(Rgb::from_srgb8(depth));
                        outcome.colors_changed = true;
                    }
                    ui.label("depth color");
                });
                ui.horizontal(|ui| {
                    if ui.color_edit_button_srgb(&mut surface).changed() {
                        params.set_surface_color(Rgb::from_srgb8(surface));
                        outcome.colors_changed = true;
                    }
                    ui.label("surface color");
                });
            });

        outcome
    }
}
