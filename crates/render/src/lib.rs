//! Rendering adapter: the renderer-agnostic interface plus everything about
//! shading that does not need a GPU.
//!
//! # Invariants
//! - Renderers read [`SceneState`](seaside_scene::SceneState); they never
//!   mutate it.
//! - The CPU shading helpers use the same formulas as the WGSL shaders, so
//!   headless output matches what the window shows.

mod heightmap;
mod shading;
mod text;

pub use heightmap::{HeightmapRenderer, sample_grid};
pub use shading::{DirectionalLight, Lighting, lambert, water_color};
pub use text::{DebugTextRenderer, RenderView, Renderer};
