// src/types.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub preprocess: PreprocessConfig,
    pub background: BackgroundConfig,
    pub counting: CountingConfig,
    pub roi: RoiConfig,
    pub video: VideoConfig,
    pub logging: LoggingConfig,
    pub failure_policy: FailurePolicy,
    pub segmenter: SegmenterKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    pub resize_width: i32,
    pub resize_height: i32,
    /// Gaussian kernel side, must be odd
    pub blur_kernel_size: i32,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            resize_width: 1920,
            resize_height: 1080,
            blur_kernel_size: 21,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    pub history: i32,
    pub var_threshold: f64,
    pub detect_shadows: bool,
    /// Binary threshold used by the frame-difference segmenter
    pub diff_threshold: f64,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            history: 500,
            var_threshold: 16.0,
            detect_shadows: false,
            diff_threshold: 25.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CountingConfig {
    /// Blobs with contour area at or below this are ignored
    pub min_area: f64,
    /// Counting line height as a fraction of the processed frame height
    pub line_position: f64,
    /// Max vertical distance (px, exclusive) between centroid and line
    pub line_threshold: i32,
    /// Global cooldown between two count events
    pub min_frames_between_counts: u64,
    /// Capacity of the recent-object window. Diagnostic only, the counting
    /// decision does not read it.
    pub tracker_length: usize,
}

impl Default for CountingConfig {
    fn default() -> Self {
        Self {
            min_area: 3000.0,
            line_position: 0.4,
            line_threshold: 10,
            min_frames_between_counts: 15,
            tracker_length: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoiConfig {
    /// Quadrilateral corners as (x, y) fractions of the processed frame,
    /// clockwise from top-left.
    pub corners: [[f64; 2]; 4],
    /// Pixel shift added to every corner and to the counting line.
    pub offset: [i32; 2],
}

impl Default for RoiConfig {
    fn default() -> Self {
        Self {
            corners: [[0.10, 0.40], [0.90, 0.40], [0.95, 0.80], [0.05, 0.80]],
            offset: [400, 400],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Batch mode writes `processed_<name>` files here
    pub output_dir: String,
    pub save_annotated: bool,
    pub fourcc: String,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            output_dir: "videos".to_string(),
            save_annotated: true,
            fourcc: "mp4v".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// What the driver does when a single frame fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop the run and return the count accumulated so far
    #[default]
    Abort,
    /// Log, drop the frame and keep going
    Skip,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmenterKind {
    #[default]
    Mog2,
    FrameDifference,
}

/// Identity of a counted blob: its integer centroid at the moment it crossed.
///
/// This is a positional snapshot, not a track. Two frames of the same wagon
/// produce different keys as soon as the centroid moves by one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectKey {
    pub x: i32,
    pub y: i32,
}

/// A confirmed crossing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountEvent {
    pub frame_index: u64,
    /// Running count after this event
    pub count: u64,
    pub key: ObjectKey,
    pub area: f64,
    pub distance_to_line: i32,
}
