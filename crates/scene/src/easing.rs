/// Easing curves for tweens.
///
/// `Power2*` follow the usual animation-library naming where power2 is the
/// cubic curve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Ease {
    /// Constant speed.
    Linear,
    /// Slow start, fast end.
    Power2In,
    /// Fast start, slow end.
    #[default]
    Power2Out,
    /// Slow start and end.
    Power2InOut,
}

impl Ease {
    /// Map linear progress (clamped to `0.0..=1.0`) to eased progress.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power2In => t * t * t,
            Ease::Power2Out => 1.0 - (1.0 - t).powi(3),
            Ease::Power2InOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}
