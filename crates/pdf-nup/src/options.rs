use crate::constants::*;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Raster fallback configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RasterOptions {
    /// Resolution used when a page has to be rasterized
    pub target_dpi: f32,
    /// Cap on page-to-bitmap scale, bounds memory for huge pages
    pub max_render_scale: f32,
    /// Resolution of PNG sheet previews
    pub preview_dpi: f32,
    /// JPEG quality (1-100) for embedded raster images
    pub jpeg_quality: u8,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            target_dpi: DEFAULT_TARGET_DPI,
            max_render_scale: DEFAULT_MAX_RENDER_SCALE,
            preview_dpi: DEFAULT_PREVIEW_DPI,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl RasterOptions {
    /// Pixels per point at the target DPI
    pub fn pixel_ratio(&self) -> f32 {
        pixel_ratio(self.target_dpi)
    }
}

/// Merge job configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MergeOptions {
    pub paper_size: PaperSize,
    pub layout: LayoutOrientation,
    pub items_per_sheet: ItemsPerSheet,

    // Grid spacing in points
    pub margin_pt: f32,
    pub gap_pt: f32,

    pub raster: RasterOptions,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            layout: LayoutOrientation::Vertical,
            items_per_sheet: ItemsPerSheet::default(),
            margin_pt: DEFAULT_MARGIN_PT,
            gap_pt: DEFAULT_GAP_PT,
            raster: RasterOptions::default(),
        }
    }
}

impl MergeOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options: Self = serde_json::from_slice(&bytes)
            .map_err(|e| NupError::Config(format!("Failed to parse config: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| NupError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Sheet dimensions in points for the configured paper and layout
    pub fn sheet_dimensions(&self) -> crate::layout::SheetDimensions {
        crate::layout::resolve_dimensions(self.paper_size, self.layout)
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if !self.margin_pt.is_finite() || self.margin_pt < 0.0 {
            return Err(NupError::InvalidArgument(format!(
                "margin must be a non-negative number of points, got {}",
                self.margin_pt
            )));
        }
        if !self.gap_pt.is_finite() || self.gap_pt < 0.0 {
            return Err(NupError::InvalidArgument(format!(
                "gap must be a non-negative number of points, got {}",
                self.gap_pt
            )));
        }

        let raster = &self.raster;
        if !(raster.target_dpi.is_finite() && raster.target_dpi > 0.0) {
            return Err(NupError::InvalidArgument(format!(
                "target DPI must be positive, got {}",
                raster.target_dpi
            )));
        }
        if !(raster.preview_dpi.is_finite() && raster.preview_dpi > 0.0) {
            return Err(NupError::InvalidArgument(format!(
                "preview DPI must be positive, got {}",
                raster.preview_dpi
            )));
        }
        if !(raster.max_render_scale.is_finite() && raster.max_render_scale > 0.0) {
            return Err(NupError::InvalidArgument(format!(
                "maximum render scale must be a positive finite number, got {}",
                raster.max_render_scale
            )));
        }
        if !(1..=100).contains(&raster.jpeg_quality) {
            return Err(NupError::InvalidArgument(format!(
                "JPEG quality must be between 1 and 100, got {}",
                raster.jpeg_quality
            )));
        }

        // Reject geometry that leaves no room for slots before any rendering starts
        crate::layout::plan_slots(
            self.sheet_dimensions(),
            self.items_per_sheet,
            self.margin_pt,
            self.gap_pt,
        )?;

        Ok(())
    }
}
