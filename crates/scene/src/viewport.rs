/// Highest device pixel ratio the draw buffer is allowed to use.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Window size in logical pixels plus the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub device_pixel_ratio: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0, 1.0)
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32, device_pixel_ratio: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
            device_pixel_ratio: if device_pixel_ratio > 0.0 {
                device_pixel_ratio
            } else {
                1.0
            },
        }
    }

    /// Build from a physical window size and its scale factor.
    pub fn from_physical(width: u32, height: u32, scale_factor: f64) -> Self {
        let scale = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        Self::new(
            (width as f64 / scale) as f32,
            (height as f64 / scale) as f32,
            scale as f32,
        )
    }

    /// Effective pixel ratio of the draw buffer.
    pub fn pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio.min(MAX_PIXEL_RATIO)
    }

    /// Draw buffer size in pixels (never zero).
    pub fn drawable_size(&self) -> (u32, u32) {
        let ratio = self.pixel_ratio();
        (
            ((self.width * ratio).round() as u32).max(1),
            ((self.height * ratio).round() as u32).max(1),
        )
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drawable_matches_logical_size_at_ratio_one() {
        let vp = Viewport::new(800.0, 600.0, 1.0);
        assert_eq!(vp.drawable_size(), (800, 600));
        assert!((vp.aspect() - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn pixel_ratio_is_capped_at_two() {
        let vp = Viewport::new(800.0, 600.0, 3.0);
        assert_eq!(vp.pixel_ratio(), 2.0);
        assert_eq!(vp.drawable_size(), (1600, 1200));
    }

    #[test]
    fn fractional_ratio_passes_through() {
        let vp = Viewport::new(1000.0, 500.0, 1.5);
        assert_eq!(vp.drawable_size(), (1500, 750));
    }

    #[test]
    fn from_physical_recovers_logical_size() {
        let vp = Viewport::from_physical(2560, 1440, 2.0);
        assert_eq!(vp.width, 1280.0);
        assert_eq!(vp.height, 720.0);
        assert_eq!(vp.drawable_size(), (2560, 1440));

        let hi_dpi = Viewport::from_physical(3000, 1500, 3.0);
        assert_eq!(hi_dpi.drawable_size(), (2000, 1000));
    }

    #[test]
    fn degenerate_sizes_are_clamped() {
        let vp = Viewport::new(0.0, 0.0, 0.0);
        assert_eq!(vp.drawable_size(), (1, 1));
        assert!(vp.aspect().is_finite());
    }
}
