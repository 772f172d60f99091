//! One-shot background model loading.
//!
//! The render loop never blocks on disk or decode work: a loader thread does
//! the work and hands the result back over a bounded channel, which the frame
//! loop polls.

use crate::model::ModelData;
use crate::{AssetError, beach_ball, parse_model};
use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError, bounded};
use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Where the floating model comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// A `.glb` or `.gltf` file.
    File(PathBuf),
    /// The built-in striped sphere.
    ProceduralBall,
}

impl fmt::Display for ModelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelSource::File(path) => write!(f, "{}", path.display()),
            ModelSource::ProceduralBall => f.write_str("procedural beach ball"),
        }
    }
}

/// Load a model synchronously on the calling thread.
pub fn load_model(source: &ModelSource) -> Result<ModelData, AssetError> {
    match source {
        ModelSource::File(path) => {
            let bytes = std::fs::read(path)?;
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "model".into());
            parse_model(&bytes, &name, path.parent())
        }
        ModelSource::ProceduralBall => Ok(beach_ball(1.0, 48, 24)),
    }
}

/// A model load running on its own thread.
pub struct ModelLoader {
    source: ModelSource,
    result_receiver: Receiver<Result<ModelData, AssetError>>,
    delivered: bool,
}

impl ModelLoader {
    /// Start loading `source` in the background.
    pub fn spawn(source: ModelSource) -> Result<Self, AssetError> {
        let (result_sender, result_receiver) = bounded(1);
        let job = source.clone();
        std::thread::Builder::new()
            .name("model-loader".into())
            .spawn(move || {
                let start = Instant::now();
                let result = load_model(&job);
                let elapsed_ms = start.elapsed().as_millis() as u64;
                match &result {
                    Ok(model) => tracing::info!(
                        source = %job,
                        id = %model.id,
                        triangles = model.triangle_count(),
                        elapsed_ms,
                        "model loaded"
                    ),
                    Err(e) => tracing::warn!(source = %job, error = %e, elapsed_ms, "model load failed"),
                }
                // the receiver may already be gone if the app is shutting down
                let _ = result_sender.send(result);
            })?;
        tracing::debug!(%source, "model load started");
        Ok(Self {
            source,
            result_receiver,
            delivered: false,
        })
    }

    pub fn source(&self) -> &ModelSource {
        &self.source
    }

    /// Whether the result has already been handed out by [`poll`](Self::poll).
    pub fn is_finished(&self) -> bool {
        self.delivered
    }

    /// Non-blocking check for the result. Yields `Some` exactly once.
    pub fn poll(&mut self) -> Option<Result<ModelData, AssetError>> {
        if self.delivered {
            return None;
        }
        let result = match self.result_receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(AssetError::LoaderDisconnected),
        };
        self.delivered = true;
        Some(result)
    }

    /// Block until the result arrives or `timeout` passes.
    pub fn wait(self, timeout: Duration) -> Result<ModelData, AssetError> {
        if self.delivered {
            return Err(AssetError::LoaderDisconnected);
        }
        match self.result_receiver.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(AssetError::Timeout),
            Err(RecvTimeoutError::Disconnected) => Err(AssetError::LoaderDisconnected),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gltf::tests::triangle_glb;

    const PATIENCE: Duration = Duration::from_secs(10);

    #[test]
    fn procedural_ball_loads_in_background() {
        let mut loader = ModelLoader::spawn(ModelSource::ProceduralBall).unwrap();
        let deadline = Instant::now() + PATIENCE;
        let model = loop {
            if let Some(result) = loader.poll() {
                break result.unwrap();
            }
            assert!(Instant::now() < deadline, "loader never finished");
            std::thread::sleep(Duration::from_millis(5));
        };
        assert_eq!(model.name, "beach_ball");
        assert!(loader.is_finished());
        assert!(loader.poll().is_none());
    }

    #[test]
    fn glb_file_loads_with_stem_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("buoy.glb");
        std::fs::write(&path, triangle_glb()).unwrap();
        let loader = ModelLoader::spawn(ModelSource::File(path)).unwrap();
        let model = loader.wait(PATIENCE).unwrap();
        assert_eq!(model.name, "buoy");
        assert_eq!(model.triangle_count(), 1);
    }

    #[test]
    fn missing_file_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = ModelSource::File(dir.path().join("missing.glb"));
        let loader = ModelLoader::spawn(source.clone()).unwrap();
        assert_eq!(loader.source(), &source);
        assert!(matches!(loader.wait(PATIENCE), Err(AssetError::Io(_))));
    }

    #[test]
    fn sync_load_matches_procedural() {
        let model = load_model(&ModelSource::ProceduralBall).unwrap();
        assert_eq!(model, beach_ball(1.0, 48, 24));
        assert_eq!(ModelSource::ProceduralBall.to_string(), "procedural beach ball");
    }
}
