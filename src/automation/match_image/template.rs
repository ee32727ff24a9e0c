//! Reference template loading and scaling.

use image::GrayImage;
use image::imageops::FilterType;
use std::path::Path;

/// The reference button image, loaded once at startup and held in
/// grayscale for correlation.
#[derive(Debug, Clone)]
pub struct Template {
    gray: GrayImage,
}

impl Template {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|e| format!("Failed to load template {}: {e}", path.display()))?;
        Ok(Self {
            gray: image.to_luma8(),
        })
    }

    pub fn from_gray(gray: GrayImage) -> Self {
        Self { gray }
    }

    pub fn width(&self) -> u32 {
        self.gray.width()
    }

    pub fn height(&self) -> u32 {
        self.gray.height()
    }

    /// Resized copy at `factor`, or None when either resulting dimension
    /// falls below `min_dim`.
    pub fn scaled(&self, factor: f32, min_dim: u32) -> Option<GrayImage> {
        let width = (self.gray.width() as f32 * factor).round() as u32;
        let height = (self.gray.height() as f32 * factor).round() as u32;
        if width < min_dim || height < min_dim {
            return None;
        }

        if (factor - 1.0).abs() < 0.01 {
            return Some(self.gray.clone());
        }

        Some(image::imageops::resize(
            &self.gray,
            width,
            height,
            FilterType::Lanczos3,
        ))
    }
}
