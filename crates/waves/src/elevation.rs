use crate::params::WaveParams;

/// The two additive terms of the elevation model, kept apart for inspection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveTerms {
    /// `freq.y * sin(f)`, driven only by the travelling phase.
    pub warp: f32,
    /// Product of the two big-wave sines, scaled by the elevation amplitude.
    pub swell: f32,
}

impl WaveTerms {
    pub fn total(&self) -> f32 {
        self.warp + self.swell
    }
}

/// Compute both elevation terms at `(x, z)` and time `t`.
///
/// The x coordinate is warped by `freq.x * cos(f)` before the swell term is
/// evaluated. Small-wave parameters do not take part; the water shader adds
/// its ripple on top of this on the GPU only.
pub fn wave_terms(x: f32, z: f32, t: f32, params: &WaveParams) -> WaveTerms {
    let freq = params.big_waves_frequency();
    let speed = params.big_waves_speed();

    let phase = x - speed * t;
    let warped_x = x + freq.x * phase.cos();
    let warp = freq.y * phase.sin();

    let swell = ((warped_x * freq.x + t * speed) * 0.5).sin()
        * (z * freq.y + t * speed).sin()
        * params.big_waves_elevation();

    WaveTerms { warp, swell }
}

/// Wave surface elevation at horizontal position `(x, z)` and time `t`.
pub fn elevation(x: f32, z: f32, t: f32, params: &WaveParams) -> f32 {
    wave_terms(x, z, t, params).total()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::WaveParam;

    fn still_params() -> WaveParams {
        WaveParams::default()
            .with(WaveParam::BigWavesFrequencyX, 0.0)
            .and_then(|p| p.with(WaveParam::BigWavesFrequencyY, 0.0))
            .unwrap()
    }

    #[test]
    fn origin_with_zero_frequency_is_flat() {
        let params = still_params();
        assert_eq!(elevation(0.0, 0.0, 0.0, &params), 0.0);
    }

    #[test]
    fn deterministic() {
        let params = WaveParams::default();
        for &(x, z, t) in &[(0.3, -1.2, 0.0), (5.0, 5.0, 12.5), (-7.1, 2.2, 300.0)] {
            let a = elevation(x, z, t, &params);
            let b = elevation(x, z, t, &params);
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn elevation_amplitude_scales_swell_only() {
        let base = WaveParams::default();
        let doubled = base
            .clone()
            .with(WaveParam::BigWavesElevation, base.big_waves_elevation() * 2.0)
            .unwrap();
        for &(x, z, t) in &[(0.5, 1.5, 0.25), (-3.0, 2.0, 4.0), (1.0, -1.0, 10.0)] {
            let a = wave_terms(x, z, t, &base);
            let b = wave_terms(x, z, t, &doubled);
            assert_eq!(a.warp, b.warp);
            assert!((b.swell - 2.0 * a.swell).abs() < 1e-5);
        }
    }

    #[test]
    fn zero_amplitude_leaves_warp_term() {
        let params = WaveParams::default()
            .with(WaveParam::BigWavesElevation, 0.0)
            .unwrap();
        let (x, z, t) = (1.3, 0.4, 2.0);
        let expected = params.big_waves_frequency().y * (x - params.big_waves_speed() * t).sin();
        assert!((elevation(x, z, t, &params) - expected).abs() < 1e-6);
    }

    #[test]
    fn matches_hand_computed_value() {
        let params = WaveParams::default();
        let (x, z, t) = (0.0_f32, 0.0_f32, 1.0_f32);
        let f = x - 1.101 * t;
        let wx = x + 0.743 * f.cos();
        let expected = 0.279 * f.sin()
            + ((wx * 0.743 + t * 1.101) * 0.5).sin() * (z * 0.279 + t * 1.101).sin() * 0.755;
        assert!((elevation(x, z, t, &params) - expected).abs() < 1e-5);
    }

    #[test]
    fn small_wave_parameters_do_not_change_elevation() {
        let base = WaveParams::default();
        let rippled = base
            .clone()
            .with(WaveParam::SmallWavesIterations, 0.0)
            .and_then(|p| p.with(WaveParam::SmallWavesElevation, 0.2))
            .unwrap();
        assert_eq!(
            elevation(2.0, 3.0, 1.5, &base),
            elevation(2.0, 3.0, 1.5, &rippled)
        );
    }

    #[test]
    fn continuous_in_time() {
        let params = WaveParams::default();
        let a = elevation(1.0, 1.0, 5.0, &params);
        let b = elevation(1.0, 1.0, 5.0 + 1e-4, &params);
        assert!((a - b).abs() < 1e-2);
    }
}
