//! Layout data types for sheet composition
//!
//! These types represent the intermediate layout calculations between
//! pagination and PDF rendering.

/// Width and height of an output sheet in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetDimensions {
    pub width: f32,
    pub height: f32,
}

impl SheetDimensions {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }
}

/// Position within the grid (row, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPosition {
    /// Row index (0 = top row)
    pub row: usize,
    /// Column index (0 = leftmost column)
    pub col: usize,
}

impl GridPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// A rectangular area in points.
///
/// Whether `y` is measured from the top or the bottom of the sheet depends on
/// where the rect came from: slots use a top-left origin, placements converted
/// with [`Rect::flip_y`] use the PDF bottom-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Far edge y coordinate (bottom for top-left rects, top for PDF rects)
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// True if the two rects share interior area (touching edges don't count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Mirror the rect vertically inside a sheet of the given height,
    /// converting between top-left and bottom-left origins.
    pub fn flip_y(&self, sheet_height: f32) -> Rect {
        Rect::new(
            self.x,
            sheet_height - (self.y + self.height),
            self.width,
            self.height,
        )
    }
}

/// One placement region on a sheet, top-left origin.
///
/// Slots depend only on sheet geometry and items-per-sheet, never on content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub position: GridPosition,
    pub rect: Rect,
}

impl Slot {
    pub fn x(&self) -> f32 {
        self.rect.x
    }

    pub fn y(&self) -> f32 {
        self.rect.y
    }

    pub fn width(&self) -> f32 {
        self.rect.width
    }

    pub fn height(&self) -> f32 {
        self.rect.height
    }
}
