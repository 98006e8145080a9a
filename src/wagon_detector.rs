// src/wagon_detector.rs

use crate::error::{DetectorError, Result};
use crate::line_crossing::{check_mask_dimensions, CounterState, CountingLine, LineCrossingCounter};
use crate::motion::{build_segmenter, MotionSegmenter};
use crate::overlay;
use crate::preprocessing::{FramePreprocessor, Roi};
use crate::types::{Config, CountEvent};
use opencv::{core::Mat, prelude::*};
use tracing::{info_span, Span};

/// Result of pushing one frame through the detector.
pub struct FrameOutput {
    /// Input-resolution frame with the overlay drawn on it
    pub annotated: Mat,
    pub events: Vec<CountEvent>,
    /// Blobs that passed area and ROI filtering
    pub blobs: usize,
}

/// Preprocessor → segmenter → counter for a single video.
///
/// Holds the ROI, background model and counter state for the lifetime of one
/// video. Frames must be fed in order; build a new detector per video.
pub struct WagonDetector {
    config: Config,
    preprocessor: FramePreprocessor,
    segmenter: Box<dyn MotionSegmenter>,
    counter: LineCrossingCounter,
    state: CounterState,
    line: Option<CountingLine>,
    span: Span,
}

impl WagonDetector {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let segmenter = build_segmenter(config.segmenter, &config.background)?;
        Ok(Self::assemble(config, segmenter))
    }

    /// Same as [`WagonDetector::new`] with a caller-provided segmenter.
    pub fn with_segmenter(config: Config, segmenter: Box<dyn MotionSegmenter>) -> Result<Self> {
        config.validate()?;
        Ok(Self::assemble(config, segmenter))
    }

    /// `config` must already be validated.
    fn assemble(config: Config, segmenter: Box<dyn MotionSegmenter>) -> Self {
        let span = info_span!("wagon_detector", segmenter = segmenter.name());
        Self {
            preprocessor: FramePreprocessor::new(config.preprocess.clone(), config.roi.clone()),
            counter: LineCrossingCounter::new(&config.counting),
            state: CounterState::new(config.counting.tracker_length),
            line: None,
            segmenter,
            span,
            config,
        }
    }

    /// Tag every log line of this detector with `source`.
    pub fn with_source(mut self, source: &str) -> Self {
        self.span = info_span!(
            "wagon_detector",
            source = source,
            segmenter = self.segmenter.name()
        );
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn wagon_count(&self) -> u64 {
        self.state.wagon_count()
    }

    pub fn state(&self) -> &CounterState {
        &self.state
    }

    pub fn roi(&self) -> Option<&Roi> {
        self.preprocessor.roi()
    }

    pub fn counting_line(&self) -> Option<CountingLine> {
        self.line
    }

    pub fn preprocess(&mut self, frame: &Mat) -> Result<Mat> {
        self.preprocessor.preprocess(frame)
    }

    pub fn segment(&mut self, preprocessed: &Mat) -> Result<Mat> {
        self.segmenter.observe_and_classify(preprocessed)
    }

    /// Counts crossings found in `mask` and draws the overlay onto `frame`.
    /// `preprocessed` and `mask` must come from this detector for the same
    /// frame.
    pub fn count_and_annotate(
        &mut self,
        frame: &Mat,
        preprocessed: &Mat,
        mask: &Mat,
        frame_index: u64,
    ) -> Result<FrameOutput> {
        check_mask_dimensions(mask, preprocessed.cols(), preprocessed.rows())?;

        let roi = self.preprocessor.roi().ok_or(DetectorError::RoiNotInitialized)?;
        let line = *self.line.get_or_insert_with(|| {
            CountingLine::from_frame_size(
                roi.width(),
                roi.height(),
                &self.config.counting,
                &self.config.roi,
            )
        });

        let detections = self
            .counter
            .evaluate(&mut self.state, mask, roi, &line, frame_index)?;
        let annotated = overlay::annotate(
            frame,
            roi,
            &line,
            &detections.blobs,
            self.state.wagon_count(),
        )?;

        Ok(FrameOutput {
            annotated,
            blobs: detections.blobs.len(),
            events: detections.events,
        })
    }

    /// Full pipeline for one frame. `frame_index` is zero-based and must
    /// increase by one per call.
    pub fn process_frame(&mut self, frame: &Mat, frame_index: u64) -> Result<FrameOutput> {
        let span = self.span.clone();
        let _enter = span.enter();

        let processed = self.preprocess(frame)?;
        let mask = self.segment(&processed)?;
        self.count_and_annotate(frame, &processed, &mask, frame_index)
    }
}
