// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("failed to open video source {path:?}")]
    VideoOpen { path: PathBuf },

    #[error("failed to create output video {path:?}")]
    OutputOpen { path: PathBuf },

    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("frame {frame_index}: {source}")]
    FrameProcessing {
        frame_index: u64,
        #[source]
        source: Box<DetectorError>,
    },

    #[error("dimension mismatch: expected {expected_width}x{expected_height}, got {actual_width}x{actual_height}")]
    DimensionMismatch {
        expected_width: i32,
        expected_height: i32,
        actual_width: i32,
        actual_height: i32,
    },

    #[error("empty frame")]
    EmptyFrame,

    #[error("ROI not initialised: preprocess a frame first")]
    RoiNotInitialized,

    #[error(transparent)]
    OpenCv(#[from] opencv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl DetectorError {
    /// Attach the frame index to an error raised inside the per-frame pipeline.
    pub fn at_frame(self, frame_index: u64) -> Self {
        match self {
            err @ DetectorError::FrameProcessing { .. } => err,
            other => DetectorError::FrameProcessing {
                frame_index,
                source: Box::new(other),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, DetectorError>;
