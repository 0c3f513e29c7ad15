// Detection adapters
// Normalize external vision/model backends into a DetectionRecord or direct model scores.

pub mod custom_model;
pub mod process;
pub mod record;
pub mod vision;

use std::time::Duration;
use thiserror::Error;

pub use custom_model::{calibrate_raw_score, ModelScores, ProcessModelScorer};
pub use record::{
    BoundingBox, CoordinateSpace, DetectedObject, DetectionRecord, DominantColor, Face,
    ImageSize, Label, Vertex,
};
pub use vision::CloudVisionBackend;

/// Image handed to a backend. The display name is only used for logging.
#[derive(Debug, Clone)]
pub struct ImageInput {
    pub bytes: Vec<u8>,
    pub display_name: String,
    pub dimensions: Option<ImageSize>,
}

impl ImageInput {
    pub fn new(bytes: Vec<u8>, display_name: impl Into<String>) -> Self {
        Self {
            bytes,
            display_name: display_name.into(),
            dimensions: None,
        }
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.dimensions = Some(ImageSize { width, height });
        self
    }

    /// File extension of the display name, if any (used for temp file suffixes)
    pub fn extension(&self) -> Option<&str> {
        std::path::Path::new(&self.display_name)
            .extension()
            .and_then(|e| e.to_str())
    }
}

/// Why a backend could not produce a result
#[derive(Error, Debug)]
pub enum DetectionFailure {
    #[error("No detection backend configured")]
    NotConfigured,

    #[error("Backend request failed: {0}")]
    Request(String),

    #[error("Backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed backend output: {0}")]
    Malformed(String),

    #[error("Evaluator exited with code {code}: {stderr}")]
    ProcessExit { code: i32, stderr: String },

    #[error("Model reported an error: {0}")]
    ModelError(String),

    #[error("Backend timed out after {0:?}")]
    Timeout(Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DetectionFailure {
    pub fn is_timeout(&self) -> bool {
        matches!(self, DetectionFailure::Timeout(_))
    }
}

/// Backend producing raw detections (faces, objects, labels, colors, logos)
pub trait DetectionBackend: Send + Sync {
    fn name(&self) -> &'static str;

    fn detect(&self, image: &ImageInput, timeout: Duration)
        -> Result<DetectionRecord, DetectionFailure>;
}

/// Backend producing the four sub-scores directly
pub trait ModelScorer: Send + Sync {
    fn name(&self) -> &'static str;

    fn evaluate(&self, image: &ImageInput, timeout: Duration)
        -> Result<ModelScores, DetectionFailure>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_input_extension() {
        let input = ImageInput::new(vec![1, 2, 3], "holiday/beach.JPG");
        assert_eq!(input.extension(), Some("JPG"));
        assert!(input.dimensions.is_none());

        let input = ImageInput::new(Vec::new(), "upload").with_dimensions(640, 480);
        assert_eq!(input.extension(), None);
        assert_eq!(input.dimensions, Some(ImageSize { width: 640, height: 480 }));
    }

    #[test]
    fn test_timeout_classification() {
        assert!(DetectionFailure::Timeout(Duration::from_secs(15)).is_timeout());
        assert!(!DetectionFailure::NotConfigured.is_timeout());
    }
}
