use glam::Vec2;
use seaside_common::Rgb;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive tuning range and step size for one scalar wave parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl ParamRange {
    pub const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    pub fn contains(&self, value: f32) -> bool {
        // Half a step of slack so values already on the grid never fail on
        // float noise at the ends.
        let slack = self.step * 0.5;
        value >= self.min - slack && value <= self.max + slack
    }

    /// Snap a value to the nearest step measured from `min`, then clamp.
    pub fn snap(&self, value: f32) -> f32 {
        let steps = ((value - self.min) / self.step).round();
        (self.min + steps * self.step).clamp(self.min, self.max)
    }
}

/// One scalar, tweakable wave parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaveParam {
    BigWavesElevation,
    BigWavesFrequencyX,
    BigWavesFrequencyY,
    BigWavesSpeed,
    ColorOffset,
    ColorMultiplier,
    SmallWavesElevation,
    SmallWavesFrequency,
    SmallWavesSpeed,
    SmallWavesIterations,
}

impl WaveParam {
    /// Every parameter, in tweak panel order.
    pub const ALL: [WaveParam; 10] = [
        WaveParam::BigWavesElevation,
        WaveParam::BigWavesFrequencyX,
        WaveParam::BigWavesFrequencyY,
        WaveParam::BigWavesSpeed,
        WaveParam::ColorOffset,
        WaveParam::ColorMultiplier,
        WaveParam::SmallWavesElevation,
        WaveParam::SmallWavesFrequency,
        WaveParam::SmallWavesSpeed,
        WaveParam::SmallWavesIterations,
    ];

    pub fn range(self) -> ParamRange {
        match self {
            WaveParam::BigWavesElevation => ParamRange::new(0.0, 2.0, 0.001),
            WaveParam::BigWavesFrequencyX | WaveParam::BigWavesFrequencyY => {
                ParamRange::new(0.0, 1.5, 0.001)
            }
            WaveParam::BigWavesSpeed => ParamRange::new(0.0, 4.0, 0.001),
            WaveParam::ColorOffset => ParamRange::new(-0.5, 0.5, 0.001),
            WaveParam::ColorMultiplier => ParamRange::new(0.0, 1.0, 0.001),
            WaveParam::SmallWavesElevation => ParamRange::new(0.0, 1.0, 0.001),
            WaveParam::SmallWavesFrequency => ParamRange::new(0.0, 1.0, 0.001),
            WaveParam::SmallWavesSpeed => ParamRange::new(0.0, 4.0, 0.001),
            WaveParam::SmallWavesIterations => ParamRange::new(0.0, 5.0, 1.0),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WaveParam::BigWavesElevation => "big waves elevation",
            WaveParam::BigWavesFrequencyX => "big waves frequency x",
            WaveParam::BigWavesFrequencyY => "big waves frequency y",
            WaveParam::BigWavesSpeed => "big waves speed",
            WaveParam::ColorOffset => "color offset",
            WaveParam::ColorMultiplier => "color multiplier",
            WaveParam::SmallWavesElevation => "small waves elevation",
            WaveParam::SmallWavesFrequency => "small waves frequency",
            WaveParam::SmallWavesSpeed => "small waves speed",
            WaveParam::SmallWavesIterations => "small waves iterations",
        }
    }
}

impl fmt::Display for WaveParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rejected parameter edits.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TweakError {
    #[error("{param} must be finite, got {value}")]
    NotFinite { param: WaveParam, value: f32 },
    #[error("{param} = {value} is outside {min}..={max}")]
    OutOfRange {
        param: WaveParam,
        value: f32,
        min: f32,
        max: f32,
    },
}

/// The wave uniform bundle shared by the elevation model and the water shader.
///
/// Fields are private; edits go through [`WaveParams::set`] and the color
/// setters so that every stored value stays inside its range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveParams {
    big_waves_elevation: f32,
    big_waves_frequency: Vec2,
    big_waves_speed: f32,
    small_waves_elevation: f32,
    small_waves_frequency: f32,
    small_waves_speed: f32,
    small_waves_iterations: u32,
    depth_color: Rgb,
    surface_color: Rgb,
    color_offset: f32,
    color_multiplier: f32,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            big_waves_elevation: 0.755,
            big_waves_frequency: Vec2::new(0.743, 0.279),
            big_waves_speed: 1.101,
            small_waves_elevation: 1.0,
            small_waves_frequency: 0.275,
            small_waves_speed: 0.668,
            small_waves_iterations: 4,
            depth_color: Rgb::new(0x0f as f32 / 255.0, 0x5e as f32 / 255.0, 0x9c as f32 / 255.0),
            surface_color: Rgb::WHITE,
            color_offset: -0.093,
            color_multiplier: 0.391,
        }
    }
}

impl WaveParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a scalar parameter.
    pub fn get(&self, param: WaveParam) -> f32 {
        match param {
            WaveParam::BigWavesElevation => self.big_waves_elevation,
            WaveParam::BigWavesFrequencyX => self.big_waves_frequency.x,
            WaveParam::BigWavesFrequencyY => self.big_waves_frequency.y,
            WaveParam::BigWavesSpeed => self.big_waves_speed,
            WaveParam::ColorOffset => self.color_offset,
            WaveParam::ColorMultiplier => self.color_multiplier,
            WaveParam::SmallWavesElevation => self.small_waves_elevation,
            WaveParam::SmallWavesFrequency => self.small_waves_frequency,
            WaveParam::SmallWavesSpeed => self.small_waves_speed,
            WaveParam::SmallWavesIterations => self.small_waves_iterations as f32,
        }
    }

    /// Validate, snap to the parameter's step, and store a scalar parameter.
    ///
    /// Returns the value actually stored.
    pub fn set(&mut self, param: WaveParam, value: f32) -> Result<f32, TweakError> {
        if !value.is_finite() {
            return Err(TweakError::NotFinite { param, value });
        }
        let range = param.range();
        if !range.contains(value) {
            return Err(TweakError::OutOfRange {
                param,
                value,
                min: range.min,
                max: range.max,
            });
        }
        let snapped = range.snap(value);
        match param {
            WaveParam::BigWavesElevation => self.big_waves_elevation = snapped,
            WaveParam::BigWavesFrequencyX => self.big_waves_frequency.x = snapped,
            WaveParam::BigWavesFrequencyY => self.big_waves_frequency.y = snapped,
            WaveParam::BigWavesSpeed => self.big_waves_speed = snapped,
            WaveParam::ColorOffset => self.color_offset = snapped,
            WaveParam::ColorMultiplier => self.color_multiplier = snapped,
            WaveParam::SmallWavesElevation => self.small_waves_elevation = snapped,
            WaveParam::SmallWavesFrequency => self.small_waves_frequency = snapped,
            WaveParam::SmallWavesSpeed => self.small_waves_speed = snapped,
            WaveParam::SmallWavesIterations => self.small_waves_iterations = snapped as u32,
        }
        tracing::debug!(%param, value = snapped, "wave parameter updated");
        Ok(snapped)
    }

    /// Builder-style [`WaveParams::set`].
    pub fn with(mut self, param: WaveParam, value: f32) -> Result<Self, TweakError> {
        self.set(param, value)?;
        Ok(self)
    }

    pub fn set_depth_color(&mut self, color: Rgb) {
        tracing::debug!(color = %color, "depth color updated");
        self.depth_color = color;
    }

    pub fn set_surface_color(&mut self, color: Rgb) {
        tracing::debug!(color = %color, "surface color updated");
        self.surface_color = color;
    }

    pub fn big_waves_elevation(&self) -> f32 {
        self.big_waves_elevation
    }

    pub fn big_waves_frequency(&self) -> Vec2 {
        self.big_waves_frequency
    }

    pub fn big_waves_speed(&self) -> f32 {
        self.big_waves_speed
    }

    pub fn small_waves_elevation(&self) -> f32 {
        self.small_waves_elevation
    }

    pub fn small_waves_frequency(&self) -> f32 {
        self.small_waves_frequency
    }

    pub fn small_waves_speed(&self) -> f32 {
        self.small_waves_speed
    }

    pub fn small_waves_iterations(&self) -> u32 {
        self.small_waves_iterations
    }

    pub fn depth_color(&self) -> Rgb {
        self.depth_color
    }

    pub fn surface_color(&self) -> Rgb {
        self.surface_color
    }

    pub fn color_offset(&self) -> f32 {
        self.color_offset
    }

    pub fn color_multiplier(&self) -> f32 {
        self.color_multiplier
    }
}
