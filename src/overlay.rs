// src/overlay.rs
//
// Draws detector state onto the native-resolution frame. Geometry lives in
// processed-frame coordinates and is scaled to the frame before drawing, so
// the annotated frame always keeps the input's size.

use crate::error::Result;
use crate::line_crossing::{Blob, CountingLine};
use crate::preprocessing::Roi;
use opencv::{
    core::{Mat, Point, Rect, Vector},
    imgproc,
    prelude::*,
};

pub mod colors {
    use opencv::core::Scalar;

    // BGR
    pub const ROI_OUTLINE: Scalar = Scalar::new(0.0, 255.0, 255.0, 0.0);
    pub const COUNTING_LINE: Scalar = Scalar::new(0.0, 255.0, 0.0, 0.0);
    pub const CENTROID: Scalar = Scalar::new(0.0, 0.0, 255.0, 0.0);
    pub const BLOB_BOX: Scalar = Scalar::new(0.0, 255.0, 0.0, 0.0);
    pub const COUNT_TEXT: Scalar = Scalar::new(0.0, 255.0, 0.0, 0.0);
}

const LINE_THICKNESS: i32 = 2;
const CENTROID_RADIUS: i32 = 5;

/// Maps processed-frame coordinates onto the output frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub sx: f64,
    pub sy: f64,
}

impl Scale {
    pub fn between(from_width: i32, from_height: i32, to_width: i32, to_height: i32) -> Self {
        Self {
            sx: to_width as f64 / from_width.max(1) as f64,
            sy: to_height as f64 / from_height.max(1) as f64,
        }
    }

    pub fn point(&self, p: Point) -> Point {
        Point::new(
            (p.x as f64 * self.sx).round() as i32,
            (p.y as f64 * self.sy).round() as i32,
        )
    }

    pub fn rect(&self, r: Rect) -> Rect {
        let tl = self.point(Point::new(r.x, r.y));
        let br = self.point(Point::new(r.x + r.width, r.y + r.height));
        Rect::new(tl.x, tl.y, br.x - tl.x, br.y - tl.y)
    }
}

/// Copy of `frame` with the ROI, counting line, accepted blobs and the
/// running count drawn on it.
pub fn annotate(
    frame: &Mat,
    roi: &Roi,
    line: &CountingLine,
    blobs: &[Blob],
    wagon_count: u64,
) -> Result<Mat> {
    let mut output = frame.try_clone()?;
    let scale = Scale::between(roi.width(), roi.height(), frame.cols(), frame.rows());

    draw_roi(&mut output, roi, &scale)?;
    draw_counting_line(&mut output, line, &scale)?;
    for blob in blobs {
        draw_blob(&mut output, blob, &scale)?;
    }
    draw_count(&mut output, wagon_count)?;

    Ok(output)
}

fn draw_roi(output: &mut Mat, roi: &Roi, scale: &Scale) -> Result<()> {
    let scaled: Vector<Point> = roi.points().iter().map(|p| scale.point(p)).collect();
    let mut polys = Vector::<Vector<Point>>::new();
    polys.push(scaled);
    imgproc::polylines(
        output,
        &polys,
        true,
        colors::ROI_OUTLINE,
        LINE_THICKNESS,
        imgproc::LINE_8,
        0,
    )?;
    Ok(())
}

fn draw_counting_line(output: &mut Mat, line: &CountingLine, scale: &Scale) -> Result<()> {
    imgproc::line(
        output,
        scale.point(Point::new(line.x_start, line.y)),
        scale.point(Point::new(line.x_end, line.y)),
        colors::COUNTING_LINE,
        LINE_THICKNESS,
        imgproc::LINE_8,
        0,
    )?;
    Ok(())
}

fn draw_blob(output: &mut Mat, blob: &Blob, scale: &Scale) -> Result<()> {
    imgproc::circle(
        output,
        scale.point(blob.centroid),
        CENTROID_RADIUS,
        colors::CENTROID,
        -1,
        imgproc::LINE_8,
        0,
    )?;
    imgproc::rectangle(
        output,
        scale.rect(blob.bbox),
        colors::BLOB_BOX,
        LINE_THICKNESS,
        imgproc::LINE_8,
        0,
    )?;
    Ok(())
}

fn draw_count(output: &mut Mat, wagon_count: u64) -> Result<()> {
    imgproc::put_text(
        output,
        &format!("Wagon Count: {}", wagon_count),
        Point::new(10, 30),
        imgproc::FONT_HERSHEY_SIMPLEX,
        1.0,
        colors::COUNT_TEXT,
        LINE_THICKNESS,
        imgproc::LINE_8,
        false,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CountingConfig, RoiConfig};
    use opencv::core;

    #[test]
    fn test_scale_maps_points_and_rects() {
        let scale = Scale::between(320, 240, 640, 480);
        assert_eq!(scale.point(Point::new(10, 20)), Point::new(20, 40));
        assert_eq!(
            scale.rect(Rect::new(10, 10, 5, 5)),
            Rect::new(20, 20, 10, 10)
        );
        let identity = Scale::between(320, 240, 320, 240);
        assert_eq!(identity.point(Point::new(7, 9)), Point::new(7, 9));
    }

    #[test]
    fn test_annotate_keeps_frame_size_and_draws() {
        let roi_config = RoiConfig {
            offset: [0, 0],
            ..RoiConfig::default()
        };
        let counting = CountingConfig {
            line_position: 0.5,
            ..CountingConfig::default()
        };
        let roi = Roi::from_frame_size(320, 240, &roi_config).unwrap();
        let line = CountingLine::from_frame_size(320, 240, &counting, &roi_config);
        let blob = Blob {
            centroid: Point::new(160, 150),
            bbox: Rect::new(140, 130, 40, 40),
            area: 1600.0,
        };

        let frame =
            Mat::new_rows_cols_with_default(480, 640, core::CV_8UC3, core::Scalar::all(0.0))
                .unwrap();
        let out = annotate(&frame, &roi, &line, &[blob], 3).unwrap();

        assert_eq!(out.cols(), 640);
        assert_eq!(out.rows(), 480);
        // Input untouched
        assert_eq!(frame.at_2d::<core::Vec3b>(240, 320).unwrap()[1], 0);

        // Counting line at y = 120 * 2, midway along its span
        let on_line = out.at_2d::<core::Vec3b>(240, 320).unwrap();
        assert_eq!(on_line[1], 255);
        // Centroid marker at (160, 150) * 2
        let marker = out.at_2d::<core::Vec3b>(300, 320).unwrap();
        assert_eq!(marker[2], 255);
    }
}
