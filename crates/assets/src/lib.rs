//! Model assets: glTF 2.0 import, a procedural beach ball, and a one-shot
//! background loader.
//!
//! Models are identified by a content hash of their source bytes. The
//! renderer consumes [`ModelData`], never file paths.

mod gltf;
mod loader;
mod model;
mod procedural;

pub use gltf::parse_model;
pub use loader::{ModelLoader, ModelSource, load_model};
pub use model::{AssetId, ModelData, ModelMaterial, ModelMesh, ModelVertex, TextureData};
pub use procedural::beach_ball;

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid GLB container: {0}")]
    Glb(String),
    #[error("glTF parse error: {0}")]
    GltfParse(String),
    #[error("unsupported glTF feature: {0}")]
    Unsupported(String),
    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),
    #[error("model contains no drawable triangles")]
    Empty,
    #[error("model loader stopped without a result")]
    LoaderDisconnected,
    #[error("timed out waiting for model")]
    Timeout,
}
