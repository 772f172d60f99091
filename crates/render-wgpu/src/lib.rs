//! wgpu render backend for the ocean scene.
//!
//! Draws the vertex-displaced water plane and the floating model into a
//! multisampled offscreen target sized by the capped pixel ratio, then
//! blits the result to the window surface.
//!
//! # Invariants
//! - The renderer never mutates scene state.
//! - Wave uniforms are rewritten every frame from `SceneState::params`, so
//!   tweak panel edits show up on the next frame.
//! - The model is only drawn once it is uploaded and the scene reports the
//!   floating object as ready.

mod blit;
mod gpu;
mod mesh;
mod shaders;
mod targets;
mod uniforms;

pub use gpu::SceneRenderer;
pub use mesh::{OCEAN_SEGMENTS, OCEAN_SIZE, PlaneVertex, plane_mesh};
pub use targets::{DEPTH_FORMAT, SAMPLE_COUNT, SCENE_COLOR_FORMAT};
pub use uniforms::{GlobalUniforms, MaterialUniforms, ObjectUniforms, WaterUniforms};
