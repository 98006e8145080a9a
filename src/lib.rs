// src/lib.rs

pub mod config;
pub mod error;
pub mod line_crossing;
pub mod motion;
pub mod overlay;
pub mod pipeline;
pub mod preprocessing;
pub mod types;
pub mod video_processor;
pub mod wagon_detector;

pub use error::{DetectorError, Result};
pub use types::{Config, CountEvent, FailurePolicy, ObjectKey, SegmenterKind};
pub use video_processor::{
    count_wagons, process_video, process_video_with_options, FrameSink, ProcessOptions, RunReport,
    VideoProcessor,
};
pub use wagon_detector::{FrameOutput, WagonDetector};
