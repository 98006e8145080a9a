// src/preprocessing.rs
//
// Canonical-resolution resize, ROI gating and blur. The ROI is derived from
// the first frame that goes through the preprocessor and then reused for the
// life of the detector.

use crate::error::{DetectorError, Result};
use crate::types::{PreprocessConfig, RoiConfig};
use opencv::{
    core::{self, Mat, Point, Point2f, Scalar, Size, Vector},
    imgproc,
    prelude::*,
};
use tracing::debug;

/// Polygonal region of interest in processed-frame coordinates.
#[derive(Debug, Clone)]
pub struct Roi {
    points: Vector<Point>,
    mask: Mat,
    width: i32,
    height: i32,
}

impl Roi {
    /// Corner `i` lands at `(int(w * fx) + offset_x, int(h * fy) + offset_y)`,
    /// then gets clamped into the frame.
    pub fn from_frame_size(width: i32, height: i32, config: &RoiConfig) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(DetectorError::Configuration(format!(
                "cannot build ROI for a {}x{} frame",
                width, height
            )));
        }

        let [off_x, off_y] = config.offset;
        let points: Vector<Point> = config
            .corners
            .iter()
            .map(|[fx, fy]| {
                let x = (width as f64 * fx) as i32 + off_x;
                let y = (height as f64 * fy) as i32 + off_y;
                Point::new(x.clamp(0, width - 1), y.clamp(0, height - 1))
            })
            .collect();

        let mut mask =
            Mat::new_rows_cols_with_default(height, width, core::CV_8UC1, Scalar::all(0.0))?;
        let mut polys = Vector::<Vector<Point>>::new();
        polys.push(points.clone());
        imgproc::fill_poly(
            &mut mask,
            &polys,
            Scalar::all(255.0),
            imgproc::LINE_8,
            0,
            Point::new(0, 0),
        )?;

        debug!("ROI polygon {:?} on {}x{}", points.to_vec(), width, height);

        Ok(Self {
            points,
            mask,
            width,
            height,
        })
    }

    pub fn points(&self) -> &Vector<Point> {
        &self.points
    }

    pub fn mask(&self) -> &Mat {
        &self.mask
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Points on the polygon edge count as inside.
    pub fn contains(&self, point: Point) -> Result<bool> {
        let dist = imgproc::point_polygon_test(
            &self.points,
            Point2f::new(point.x as f32, point.y as f32),
            false,
        )?;
        Ok(dist >= 0.0)
    }
}

pub struct FramePreprocessor {
    config: PreprocessConfig,
    roi_config: RoiConfig,
    roi: Option<Roi>,
}

impl FramePreprocessor {
    pub fn new(config: PreprocessConfig, roi_config: RoiConfig) -> Self {
        Self {
            config,
            roi_config,
            roi: None,
        }
    }

    /// `None` until the first frame has been preprocessed.
    pub fn roi(&self) -> Option<&Roi> {
        self.roi.as_ref()
    }

    pub fn target_size(&self) -> Size {
        Size::new(self.config.resize_width, self.config.resize_height)
    }

    /// Resize, zero everything outside the ROI, blur.
    pub fn preprocess(&mut self, frame: &Mat) -> Result<Mat> {
        if frame.empty() {
            return Err(DetectorError::EmptyFrame);
        }

        let mut resized = Mat::default();
        imgproc::resize(
            frame,
            &mut resized,
            self.target_size(),
            0.0,
            0.0,
            imgproc::INTER_LINEAR,
        )?;

        if self.roi.is_none() {
            self.roi = Some(Roi::from_frame_size(
                resized.cols(),
                resized.rows(),
                &self.roi_config,
            )?);
        }
        let Some(roi) = self.roi.as_ref() else {
            return Err(DetectorError::RoiNotInitialized);
        };

        let mut masked = Mat::default();
        core::bitwise_and(&resized, &resized, &mut masked, roi.mask())?;

        let k = self.config.blur_kernel_size;
        let mut blurred = Mat::default();
        imgproc::gaussian_blur_def(&masked, &mut blurred, Size::new(k, k), 0.0)?;

        Ok(blurred)
    }
}
