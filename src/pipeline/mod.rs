// src/pipeline/mod.rs

pub mod event_log;
pub mod metrics;

pub use event_log::CountEventLog;
pub use metrics::{PerformanceSummary, PipelineMetrics};
