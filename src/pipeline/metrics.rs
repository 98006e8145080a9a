// src/pipeline/metrics.rs
//
// Per-frame latency and throughput for one run. Single-threaded, so plain
// counters rather than atomics.

use serde::Serialize;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct PipelineMetrics {
    frames: u64,
    total_processing: Duration,
    max_processing: Duration,
    started_at: Instant,
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self {
            frames: 0,
            total_processing: Duration::ZERO,
            max_processing: Duration::ZERO,
            started_at: Instant::now(),
        }
    }

    pub fn record(&mut self, processing: Duration) {
        self.frames += 1;
        self.total_processing += processing;
        self.max_processing = self.max_processing.max(processing);
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Mean per-frame processing time in seconds, 0 when nothing was timed.
    pub fn avg_processing_secs(&self) -> f64 {
        if self.frames == 0 {
            return 0.0;
        }
        self.total_processing.as_secs_f64() / self.frames as f64
    }

    /// Frames per second derived from the mean processing time.
    pub fn avg_fps(&self) -> f64 {
        let avg = self.avg_processing_secs();
        if avg > 0.0 {
            1.0 / avg
        } else {
            0.0
        }
    }

    pub fn summary(&self) -> PerformanceSummary {
        PerformanceSummary {
            frames_timed: self.frames,
            avg_processing_secs: self.avg_processing_secs(),
            max_processing_secs: self.max_processing.as_secs_f64(),
            avg_fps: self.avg_fps(),
            wall_clock_secs: self.started_at.elapsed().as_secs_f64(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerformanceSummary {
    pub frames_timed: u64,
    pub avg_processing_secs: f64,
    pub max_processing_secs: f64,
    pub avg_fps: f64,
    pub wall_clock_secs: f64,
}
