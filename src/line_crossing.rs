// src/line_crossing.rs
//
// Line-crossing counter.
//
// Every frame the foreground mask is split into external contours. A contour
// becomes a blob when its area is above `min_area`, its moments have mass,
// and its centroid sits inside the ROI polygon. A blob produces a count event
// when all of these hold:
//
//   - |cy - line_y| < line_threshold
//   - frame_index - last_count_frame >= min_frames_between_counts
//   - the centroid (cx, cy) was never counted before
//
// The cooldown is global, not per object. The de-duplication key is the
// instantaneous centroid, so it only blocks a second count at the exact same
// pixel. Real suppression of re-counts comes from the cooldown.
//
// All mutable state lives in `CounterState`, which the caller owns and passes
// in. `LineCrossingCounter` itself is immutable.

use crate::error::{DetectorError, Result};
use crate::preprocessing::Roi;
use crate::types::{CountEvent, CountingConfig, ObjectKey, RoiConfig};
use opencv::{
    core::{Mat, Point, Rect, Vector},
    imgproc,
    prelude::*,
};
use std::collections::{HashSet, VecDeque};
use tracing::{debug, info};

// ============================================================================
// GEOMETRY
// ============================================================================

/// Horizontal counting line in processed-frame coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountingLine {
    pub y: i32,
    pub x_start: i32,
    pub x_end: i32,
}

impl CountingLine {
    /// The line spans the x extent of the ROI's two top corners and is
    /// shifted by the same pixel offset as the ROI. Unlike the ROI it is not
    /// clamped.
    pub fn from_frame_size(
        width: i32,
        height: i32,
        counting: &CountingConfig,
        roi: &RoiConfig,
    ) -> Self {
        let [off_x, off_y] = roi.offset;
        Self {
            y: (height as f64 * counting.line_position) as i32 + off_y,
            x_start: (width as f64 * roi.corners[0][0]) as i32 + off_x,
            x_end: (width as f64 * roi.corners[1][0]) as i32 + off_x,
        }
    }

    pub fn distance(&self, y: i32) -> i32 {
        (y - self.y).abs()
    }
}

/// A foreground region that survived area, mass and ROI filtering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blob {
    pub centroid: Point,
    pub bbox: Rect,
    pub area: f64,
}

impl Blob {
    pub fn key(&self) -> ObjectKey {
        ObjectKey {
            x: self.centroid.x,
            y: self.centroid.y,
        }
    }
}

/// External contours of `mask` with area strictly greater than `min_area`.
/// Centroids are truncated toward zero. Contours without mass are dropped.
pub fn find_blobs(mask: &Mat, min_area: f64) -> Result<Vec<Blob>> {
    let mut contours: Vector<Vector<Point>> = Vector::new();
    imgproc::find_contours(
        mask,
        &mut contours,
        imgproc::RETR_EXTERNAL,
        imgproc::CHAIN_APPROX_SIMPLE,
        Point::new(0, 0),
    )?;

    let mut blobs = Vec::new();
    for contour in contours.iter() {
        let area = imgproc::contour_area(&contour, false)?;
        if area <= min_area {
            continue;
        }

        let m = imgproc::moments(&contour, false)?;
        if m.m00 == 0.0 {
            continue;
        }
        let cx = (m.m10 / m.m00) as i32;
        let cy = (m.m01 / m.m00) as i32;

        blobs.push(Blob {
            centroid: Point::new(cx, cy),
            bbox: imgproc::bounding_rect(&contour)?,
            area,
        });
    }

    Ok(blobs)
}

/// Fails unless `mask` is single-channel and `expected_width`×`expected_height`.
pub fn check_mask_dimensions(mask: &Mat, expected_width: i32, expected_height: i32) -> Result<()> {
    if mask.cols() != expected_width || mask.rows() != expected_height || mask.channels() != 1 {
        return Err(DetectorError::DimensionMismatch {
            expected_width,
            expected_height,
            actual_width: mask.cols(),
            actual_height: mask.rows(),
        });
    }
    Ok(())
}

// ============================================================================
// STATE
// ============================================================================

/// Running count plus everything needed to decide the next count.
#[derive(Debug, Clone)]
pub struct CounterState {
    wagon_count: u64,
    counted: HashSet<ObjectKey>,
    last_count_frame: u64,
    recent: VecDeque<ObjectKey>,
    recent_capacity: usize,
}

impl CounterState {
    pub fn new(recent_capacity: usize) -> Self {
        Self {
            wagon_count: 0,
            counted: HashSet::new(),
            last_count_frame: 0,
            recent: VecDeque::with_capacity(recent_capacity),
            recent_capacity,
        }
    }

    pub fn wagon_count(&self) -> u64 {
        self.wagon_count
    }

    pub fn registry_len(&self) -> usize {
        self.counted.len()
    }

    pub fn has_counted(&self, key: &ObjectKey) -> bool {
        self.counted.contains(key)
    }

    pub fn last_count_frame(&self) -> u64 {
        self.last_count_frame
    }

    /// Most recently counted keys, oldest first. Bounded by `tracker_length`.
    /// Nothing in the counting decision reads this window.
    pub fn recent_objects(&self) -> impl Iterator<Item = &ObjectKey> {
        self.recent.iter()
    }

    /// Returns false when the key was already counted.
    fn record(&mut self, key: ObjectKey, frame_index: u64) -> bool {
        if !self.counted.insert(key) {
            return false;
        }
        self.wagon_count += 1;
        self.last_count_frame = frame_index;

        if self.recent_capacity > 0 {
            if self.recent.len() == self.recent_capacity {
                self.recent.pop_front();
            }
            self.recent.push_back(key);
        }
        true
    }
}

// ============================================================================
// COUNTER
// ============================================================================

/// Blobs accepted on one frame and the counts they produced.
#[derive(Debug, Clone, Default)]
pub struct FrameDetections {
    pub blobs: Vec<Blob>,
    pub events: Vec<CountEvent>,
}

#[derive(Debug, Clone)]
pub struct LineCrossingCounter {
    min_area: f64,
    line_threshold: i32,
    min_frames_between_counts: u64,
}

impl LineCrossingCounter {
    pub fn new(config: &CountingConfig) -> Self {
        Self {
            min_area: config.min_area,
            line_threshold: config.line_threshold,
            min_frames_between_counts: config.min_frames_between_counts,
        }
    }

    /// Strict: a centroid exactly `line_threshold` away is a miss.
    pub fn is_near_line(&self, line: &CountingLine, cy: i32) -> bool {
        line.distance(cy) < self.line_threshold
    }

    pub fn cooldown_elapsed(&self, state: &CounterState, frame_index: u64) -> bool {
        frame_index.saturating_sub(state.last_count_frame) >= self.min_frames_between_counts
    }

    /// Runs the crossing test for one blob and updates `state` on success.
    pub fn register_crossing(
        &self,
        state: &mut CounterState,
        blob: &Blob,
        line: &CountingLine,
        frame_index: u64,
    ) -> Option<CountEvent> {
        let cy = blob.centroid.y;
        if !self.is_near_line(line, cy) || !self.cooldown_elapsed(state, frame_index) {
            return None;
        }

        let key = blob.key();
        if !state.record(key, frame_index) {
            debug!(
                "Frame {}: centroid ({}, {}) already counted",
                frame_index, key.x, key.y
            );
            return None;
        }

        let event = CountEvent {
            frame_index,
            count: state.wagon_count,
            key,
            area: blob.area,
            distance_to_line: line.distance(cy),
        };
        info!(
            frame = frame_index,
            count = event.count,
            cx = key.x,
            cy = key.y,
            "🚆 Wagon detected! Count: {}",
            event.count
        );
        Some(event)
    }

    /// Full per-frame step: contour extraction, filtering, crossing tests.
    pub fn evaluate(
        &self,
        state: &mut CounterState,
        mask: &Mat,
        roi: &Roi,
        line: &CountingLine,
        frame_index: u64,
    ) -> Result<FrameDetections> {
        check_mask_dimensions(mask, roi.width(), roi.height())?;

        let mut detections = FrameDetections::default();
        for blob in find_blobs(mask, self.min_area)? {
            if !roi.contains(blob.centroid)? {
                continue;
            }
            if let Some(event) = self.register_crossing(state, &blob, line, frame_index) {
                detections.events.push(event);
            }
            detections.blobs.push(blob);
        }

        Ok(detections)
    }
}
