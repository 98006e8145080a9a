use crate::error::{DetectorError, Result};
use crate::types::Config;
use std::fs;
use std::path::Path;

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects tunables the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        let p = &self.preprocess;
        if p.resize_width <= 0 || p.resize_height <= 0 {
            return Err(invalid(format!(
                "resize dimensions must be positive, got {}x{}",
                p.resize_width, p.resize_height
            )));
        }
        if p.blur_kernel_size <= 0 || p.blur_kernel_size % 2 == 0 {
            return Err(invalid(format!(
                "blur_kernel_size must be odd and positive, got {}",
                p.blur_kernel_size
            )));
        }

        let b = &self.background;
        if b.history <= 0 {
            return Err(invalid(format!("history must be positive, got {}", b.history)));
        }
        if !b.var_threshold.is_finite() || b.var_threshold <= 0.0 {
            return Err(invalid(format!(
                "var_threshold must be positive, got {}",
                b.var_threshold
            )));
        }
        if !b.diff_threshold.is_finite() || b.diff_threshold <= 0.0 || b.diff_threshold > 255.0 {
            return Err(invalid(format!(
                "diff_threshold must be in (0, 255], got {}",
                b.diff_threshold
            )));
        }

        let c = &self.counting;
        if !c.min_area.is_finite() || c.min_area <= 0.0 {
            return Err(invalid(format!("min_area must be positive, got {}", c.min_area)));
        }
        if c.line_position.is_nan() || c.line_position <= 0.0 || c.line_position >= 1.0 {
            return Err(invalid(format!(
                "line_position must be in (0, 1), got {}",
                c.line_position
            )));
        }
        if c.line_threshold <= 0 {
            return Err(invalid(format!(
                "line_threshold must be positive, got {}",
                c.line_threshold
            )));
        }

        for (i, [fx, fy]) in self.roi.corners.iter().enumerate() {
            if !(0.0..=1.0).contains(fx) || !(0.0..=1.0).contains(fy) {
                return Err(invalid(format!(
                    "roi corner {} must be fractions in [0, 1], got ({}, {})",
                    i, fx, fy
                )));
            }
        }

        if self.video.fourcc.chars().count() != 4 {
            return Err(invalid(format!(
                "fourcc must be four characters, got {:?}",
                self.video.fourcc
            )));
        }

        Ok(())
    }
}

fn invalid(msg: String) -> DetectorError {
    DetectorError::Configuration(msg)
}
