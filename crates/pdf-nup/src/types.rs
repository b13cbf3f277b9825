use crate::constants::{
    A3_SIZE_PT, A4_SIZE_PT, CUSTOM_ITEMS_PER_SHEET_FALLBACK, DEFAULT_ITEMS_PER_SHEET,
    LEGAL_SIZE_PT, LETTER_SIZE_PT, MAX_ITEMS_PER_SHEET, MIN_ITEMS_PER_SHEET,
};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NupError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Unsupported format for {name}: {reason}")]
    UnsupportedFormat { name: String, reason: String },
    #[error("Render error: {0}")]
    Render(String),
    #[error("Output finalization failed: {0}")]
    OutputFinalization(String),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, NupError>;

/// Orientation preference for output sheets.
///
/// This is a preference, not an exact size: it decides which of the paper's
/// two dimensions becomes the sheet width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LayoutOrientation {
    /// Landscape sheets: the larger dimension is the width
    Horizontal,
    /// Portrait sheets: the smaller dimension is the width
    #[default]
    Vertical,
}

impl LayoutOrientation {
    pub fn name(self) -> &'static str {
        match self {
            LayoutOrientation::Horizontal => "horizontal",
            LayoutOrientation::Vertical => "vertical",
        }
    }
}

impl fmt::Display for LayoutOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LayoutOrientation {
    type Err = NupError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "horizontal" => Ok(LayoutOrientation::Horizontal),
            "vertical" => Ok(LayoutOrientation::Vertical),
            other => Err(NupError::InvalidArgument(format!(
                "unknown layout '{other}' (expected horizontal or vertical)"
            ))),
        }
    }
}

/// Standard paper sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PaperSize {
    #[default]
    A4,
    Letter,
    Legal,
    A3,
}

impl PaperSize {
    pub const ALL: [PaperSize; 4] = [
        PaperSize::A4,
        PaperSize::Letter,
        PaperSize::Legal,
        PaperSize::A3,
    ];

    /// Base dimensions in points, portrait (width < height)
    pub fn dimensions_pt(self) -> (f32, f32) {
        match self {
            PaperSize::A4 => A4_SIZE_PT,
            PaperSize::Letter => LETTER_SIZE_PT,
            PaperSize::Legal => LEGAL_SIZE_PT,
            PaperSize::A3 => A3_SIZE_PT,
        }
    }

    /// Dimensions with the orientation preference applied
    pub fn dimensions_with_orientation(self, orientation: LayoutOrientation) -> (f32, f32) {
        let (w, h) = self.dimensions_pt();
        let (short, long) = (w.min(h), w.max(h));
        match orientation {
            LayoutOrientation::Horizontal => (long, short),
            LayoutOrientation::Vertical => (short, long),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PaperSize::A4 => "a4",
            PaperSize::Letter => "letter",
            PaperSize::Legal => "legal",
            PaperSize::A3 => "a3",
        }
    }
}

impl fmt::Display for PaperSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PaperSize {
    type Err = NupError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        PaperSize::ALL
            .into_iter()
            .find(|size| size.name() == wanted)
            .ok_or_else(|| NupError::InvalidArgument(format!("unknown paper size '{s}'")))
    }
}

/// Number of source items placed on each output sheet (1..=20).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
pub struct ItemsPerSheet(u8);

impl ItemsPerSheet {
    pub fn new(count: u32) -> Result<Self> {
        if (MIN_ITEMS_PER_SHEET..=MAX_ITEMS_PER_SHEET).contains(&count) {
            Ok(Self(count as u8))
        } else {
            Err(NupError::InvalidArgument(format!(
                "items per sheet must be between {MIN_ITEMS_PER_SHEET} and {MAX_ITEMS_PER_SHEET}, got {count}"
            )))
        }
    }

    /// Interpret a free-form custom value, falling back to 8 when it is out of range.
    pub fn from_custom(count: i64) -> Self {
        u32::try_from(count)
            .ok()
            .and_then(|c| Self::new(c).ok())
            .unwrap_or(Self(CUSTOM_ITEMS_PER_SHEET_FALLBACK as u8))
    }

    pub fn get(self) -> usize {
        self.0 as usize
    }
}

impl Default for ItemsPerSheet {
    fn default() -> Self {
        Self(DEFAULT_ITEMS_PER_SHEET as u8)
    }
}

impl TryFrom<u32> for ItemsPerSheet {
    type Error = NupError;

    fn try_from(value: u32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ItemsPerSheet> for u32 {
    fn from(value: ItemsPerSheet) -> Self {
        value.0 as u32
    }
}

impl fmt::Display for ItemsPerSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Statistics about a merge job
#[derive(Debug, Clone, PartialEq)]
pub struct MergeStatistics {
    /// Number of source items
    pub items: usize,
    /// Number of output sheets
    pub sheets: usize,
    pub items_per_sheet: usize,
    /// Grid rows per sheet
    pub rows: usize,
    /// Grid columns per sheet
    pub cols: usize,
    /// Items placed on the final sheet
    pub items_on_last_sheet: usize,
    /// Planned slots left unpopulated on the final sheet
    pub empty_slots: usize,
}
