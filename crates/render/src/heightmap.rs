use crate::text::{RenderView, Renderer};
use seaside_scene::SceneState;
use seaside_waves::{WaveParams, elevation};

/// Characters from deep water to foam.
const RAMP: &[u8] = b" .:-=+*#%@";
const BALL: char = 'O';

/// Sample the big-wave elevation on a `columns` x `rows` grid spanning
/// `-half_extent..half_extent` in x and z, at cell centers.
///
/// Row-major, row 0 at the most negative z.
pub fn sample_grid(
    params: &WaveParams,
    t: f32,
    half_extent: f32,
    columns: usize,
    rows: usize,
) -> Vec<f32> {
    let cell = |i: usize, n: usize| -half_extent + (i as f32 + 0.5) * (2.0 * half_extent / n as f32);
    let mut out = Vec::with_capacity(columns * rows);
    for row in 0..rows {
        let z = cell(row, rows);
        for col in 0..columns {
            out.push(elevation(cell(col, columns), z, t, params));
        }
    }
    out
}

/// Top-down ASCII view of the ocean. Shading follows the water color mix,
/// so the characters brighten exactly where the shader turns to surface
/// color. The floating object is drawn as `O`.
#[derive(Debug, Clone, Copy)]
pub struct HeightmapRenderer {
    pub columns: usize,
    pub rows: usize,
    /// Half the side length of the sampled square.
    pub half_extent: f32,
}

impl Default for HeightmapRenderer {
    fn default() -> Self {
        Self {
            columns: 64,
            rows: 24,
            half_extent: 10.0,
        }
    }
}

impl HeightmapRenderer {
    fn shade(params: &WaveParams, e: f32) -> char {
        let strength = ((e + params.color_offset()) * params.color_multiplier()).clamp(0.0, 1.0);
        let i = (strength * (RAMP.len() - 1) as f32).round() as usize;
        RAMP[i.min(RAMP.len() - 1)] as char
    }

    fn cell_of(&self, coord: f32, n: usize) -> Option<usize> {
        let f = (coord + self.half_extent) / (2.0 * self.half_extent) * n as f32;
        (f >= 0.0 && f < n as f32).then_some(f as usize)
    }
}

impl Renderer for HeightmapRenderer {
    type Output = String;

    fn render(&self, scene: &SceneState, _view: &RenderView) -> String {
        if self.columns == 0 || self.rows == 0 {
            tracing::debug!(columns = self.columns, rows = self.rows, "empty heightmap requested");
            return String::new();
        }
        let params = &scene.params;
        let grid = sample_grid(params, scene.time(), self.half_extent, self.columns, self.rows);

        let ball = scene.floating().and_then(|object| {
            let p = object.pose().position;
            Some((self.cell_of(p.x, self.columns)?, self.cell_of(p.z, self.rows)?))
        });

        let mut out = String::with_capacity((self.columns + 1) * self.rows);
        for (row, line) in grid.chunks(self.columns).enumerate() {
            for (col, &e) in line.iter().enumerate() {
                if ball == Some((col, row)) {
                    out.push(BALL);
                } else {
                    out.push(Self::shade(params, e));
                }
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seaside_scene::Viewport;
    use seaside_waves::WaveParam;

    #[test]
    fn grid_dimensions() {
        let grid = sample_grid(&WaveParams::default(), 0.0, 10.0, 8, 3);
        assert_eq!(grid.len(), 24);
    }

    #[test]
    fn flat_sea_renders_uniformly() {
        let mut scene = SceneState::new(Viewport::default());
        scene.params.set(WaveParam::BigWavesElevation, 0.0).unwrap();
        let renderer = HeightmapRenderer {
            columns: 10,
            rows: 4,
            half_extent: 10.0,
        };
        let out = renderer.render(&scene, &RenderView::from(&scene.camera));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        let first = lines[0].chars().next().unwrap();
        assert!(lines.iter().all(|l| l.len() == 10 && l.chars().all(|c| c == first)));
    }

    #[test]
    fn floating_object_is_marked() {
        let mut scene = SceneState::new(Viewport::default());
        scene.model_loaded();
        scene.advance(0.0);
        let out = HeightmapRenderer::default().render(&scene, &RenderView::from(&scene.camera));
        assert_eq!(out.matches(BALL).count(), 1);
    }

    #[test]
    fn empty_grid_renders_nothing() {
        let scene = SceneState::new(Viewport::default());
        let renderer = HeightmapRenderer {
            columns: 0,
            ..HeightmapRenderer::default()
        };
        assert!(renderer.render(&scene, &RenderView::from(&scene.camera)).is_empty());
    }

    #[test]
    fn shading_spans_ramp() {
        let mut params = WaveParams::default();
        params.set(WaveParam::ColorOffset, 0.0).unwrap();
        params.set(WaveParam::ColorMultiplier, 1.0).unwrap();
        assert_eq!(HeightmapRenderer::shade(&params, -1.0), ' ');
        assert_eq!(HeightmapRenderer::shade(&params, 2.0), '@');
    }
}
