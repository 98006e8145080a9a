// src/motion.rs
//
// Motion segmentation. Each segmenter owns a model of the static scene that
// is updated by every call, so frames must arrive in order and one segmenter
// must never be shared between two videos.

use crate::error::Result;
use crate::types::{BackgroundConfig, SegmenterKind};
use opencv::{
    core::{self, Mat, Point, Ptr, Size, BORDER_CONSTANT},
    imgproc,
    prelude::*,
    video::{self, BackgroundSubtractorMOG2, BackgroundSubtractorTrait},
};
use tracing::debug;

/// Side of the square structuring element used to clean masks.
const MORPH_KERNEL_SIZE: i32 = 5;

pub trait MotionSegmenter {
    /// Feed one preprocessed frame into the scene model and return a binary
    /// (0 / 255) single-channel foreground mask of the same size.
    fn observe_and_classify(&mut self, frame: &Mat) -> Result<Mat>;

    fn name(&self) -> &'static str;
}

pub fn build_segmenter(
    kind: SegmenterKind,
    config: &BackgroundConfig,
) -> Result<Box<dyn MotionSegmenter>> {
    let segmenter: Box<dyn MotionSegmenter> = match kind {
        SegmenterKind::Mog2 => Box::new(Mog2Segmenter::new(config)?),
        SegmenterKind::FrameDifference => Box::new(FrameDifferenceSegmenter::new(config)?),
    };
    debug!("Motion segmenter: {}", segmenter.name());
    Ok(segmenter)
}

// ============================================================================
// MOG2
// ============================================================================

/// Adaptive Gaussian-mixture background model.
///
/// The first frame only seeds the model and always yields an empty mask.
/// MOG2 itself reports the whole first frame as foreground, which would
/// otherwise produce one frame-sized blob when the cooldown is zero.
pub struct Mog2Segmenter {
    mog2: Ptr<BackgroundSubtractorMOG2>,
    kernel: Mat,
    frames_seen: u64,
}

impl Mog2Segmenter {
    pub fn new(config: &BackgroundConfig) -> Result<Self> {
        let mog2 = video::create_background_subtractor_mog2(
            config.history,
            config.var_threshold,
            config.detect_shadows,
        )?;
        Ok(Self {
            mog2,
            kernel: square_kernel()?,
            frames_seen: 0,
        })
    }

    pub fn frames_seen(&self) -> u64 {
        self.frames_seen
    }
}

impl MotionSegmenter for Mog2Segmenter {
    fn observe_and_classify(&mut self, frame: &Mat) -> Result<Mat> {
        let mut fg_mask = Mat::default();
        // Negative learning rate lets the model pick 1/min(2n, history)
        BackgroundSubtractorTrait::apply(&mut self.mog2, frame, &mut fg_mask, -1.0)?;
        self.frames_seen += 1;

        if self.frames_seen == 1 {
            return Ok(Mat::zeros(fg_mask.rows(), fg_mask.cols(), core::CV_8UC1)?.to_mat()?);
        }
        clean_mask(&fg_mask, &self.kernel)
    }

    fn name(&self) -> &'static str {
        "mog2"
    }
}

// ============================================================================
// FRAME DIFFERENCE
// ============================================================================

/// Thresholded absolute difference against the previous frame.
pub struct FrameDifferenceSegmenter {
    threshold: f64,
    kernel: Mat,
    previous: Option<Mat>,
}

impl FrameDifferenceSegmenter {
    pub fn new(config: &BackgroundConfig) -> Result<Self> {
        Ok(Self {
            threshold: config.diff_threshold,
            kernel: square_kernel()?,
            previous: None,
        })
    }
}

impl MotionSegmenter for FrameDifferenceSegmenter {
    fn observe_and_classify(&mut self, frame: &Mat) -> Result<Mat> {
        let gray = to_gray(frame)?;

        let mask = match &self.previous {
            None => Mat::zeros(gray.rows(), gray.cols(), core::CV_8UC1)?.to_mat()?,
            Some(prev) => {
                let mut diff = Mat::default();
                core::absdiff(&gray, prev, &mut diff)?;
                let mut binary = Mat::default();
                imgproc::threshold(
                    &diff,
                    &mut binary,
                    self.threshold,
                    255.0,
                    imgproc::THRESH_BINARY,
                )?;
                clean_mask(&binary, &self.kernel)?
            }
        };

        self.previous = Some(gray);
        Ok(mask)
    }

    fn name(&self) -> &'static str {
        "frame_difference"
    }
}

fn to_gray(frame: &Mat) -> Result<Mat> {
    if frame.channels() == 1 {
        return Ok(frame.try_clone()?);
    }
    let mut gray = Mat::default();
    imgproc::cvt_color_def(frame, &mut gray, imgproc::COLOR_BGR2GRAY)?;
    Ok(gray)
}

fn square_kernel() -> Result<Mat> {
    Ok(imgproc::get_structuring_element(
        imgproc::MORPH_RECT,
        Size::new(MORPH_KERNEL_SIZE, MORPH_KERNEL_SIZE),
        Point::new(-1, -1),
    )?)
}

/// Opening removes speckles, closing then fills small gaps inside blobs.
pub fn clean_mask(mask: &Mat, kernel: &Mat) -> Result<Mat> {
    let border = imgproc::morphology_default_border_value()?;

    let mut opened = Mat::default();
    imgproc::morphology_ex(
        mask,
        &mut opened,
        imgproc::MORPH_OPEN,
        kernel,
        Point::new(-1, -1),
        1,
        BORDER_CONSTANT,
        border,
    )?;

    let mut closed = Mat::default();
    imgproc::morphology_ex(
        &opened,
        &mut closed,
        imgproc::MORPH_CLOSE,
        kernel,
        Point::new(-1, -1),
        1,
        BORDER_CONSTANT,
        border,
    )?;

    Ok(closed)
}
