//! Source documents and first-page access
//!
//! A [`SourceItem`] is an opaque, immutable reference to one input document.
//! Only its first page is ever used.

use crate::constants::{DEFAULT_PAGE_DIMENSIONS, MAX_PAGE_TREE_DEPTH};
use crate::layout::Rect;
use crate::types::{NupError, Result};
use lopdf::{Document, Object, ObjectId};
use std::fmt;
use std::sync::Arc;

/// PDF files may carry up to this many bytes of junk before the header
const HEADER_SEARCH_WINDOW: usize = 1024;

/// One input document: a display name plus its raw bytes.
#[derive(Clone)]
pub struct SourceItem {
    name: String,
    bytes: Arc<[u8]>,
}

impl SourceItem {
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether the bytes carry a PDF header
    pub fn looks_like_pdf(&self) -> bool {
        let window = &self.bytes[..self.bytes.len().min(HEADER_SEARCH_WINDOW)];
        window.windows(5).any(|w| w == b"%PDF-")
    }

    pub(crate) fn unsupported(&self, reason: impl Into<String>) -> NupError {
        NupError::UnsupportedFormat {
            name: self.name.clone(),
            reason: reason.into(),
        }
    }
}

impl fmt::Debug for SourceItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceItem")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// The parsed first page of a source item.
#[derive(Debug, Clone)]
pub struct SourcePage {
    pub document: Document,
    pub page_id: ObjectId,
    /// Visible page area in the page's own user space (CropBox, else MediaBox)
    pub page_box: Rect,
    /// Clockwise display rotation in degrees: 0, 90, 180 or 270
    pub rotation: u16,
}

impl SourcePage {
    /// Displayed width, after rotation
    pub fn width(&self) -> f32 {
        rotated_size(self.page_box, self.rotation).0
    }

    /// Displayed height, after rotation
    pub fn height(&self) -> f32 {
        rotated_size(self.page_box, self.rotation).1
    }
}

/// Size of a page box as displayed with the given rotation
pub(crate) fn rotated_size(page_box: Rect, rotation: u16) -> (f32, f32) {
    match rotation {
        90 | 270 => (page_box.height, page_box.width),
        _ => (page_box.width, page_box.height),
    }
}

/// Parses raw document bytes and exposes the first page.
pub trait DocumentSource: Send + Sync {
    /// Fails with [`NupError::UnsupportedFormat`] when the bytes are not a usable document.
    fn first_page(&self, item: &SourceItem) -> Result<SourcePage>;
}

/// [`DocumentSource`] backed by lopdf.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfSource;

impl LopdfSource {
    /// Size of the first page in points
    pub fn page_size(&self, item: &SourceItem) -> Result<(f32, f32)> {
        let page = self.first_page(item)?;
        Ok((page.width(), page.height()))
    }
}

impl DocumentSource for LopdfSource {
    fn first_page(&self, item: &SourceItem) -> Result<SourcePage> {
        if !item.looks_like_pdf() {
            return Err(item.unsupported("missing %PDF- header"));
        }

        let document = Document::load_mem(item.bytes())
            .map_err(|e| item.unsupported(format!("failed to parse: {e}")))?;

        let page_id = document
            .get_pages()
            .values()
            .next()
            .copied()
            .ok_or_else(|| item.unsupported("document has no pages"))?;

        let page_box = page_box(&document, page_id);
        let rotation = page_rotation(&document, page_id);

        Ok(SourcePage {
            document,
            page_id,
            page_box,
            rotation,
        })
    }
}

// =============================================================================
// Page Attributes
// =============================================================================

/// Look up a page attribute, following the `Parent` chain for inherited keys.
pub(crate) fn inherited_attribute(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut current = page_id;
    for _ in 0..MAX_PAGE_TREE_DEPTH {
        let dict = doc.get_dictionary(current).ok()?;
        if let Ok(value) = dict.get(key) {
            return Some(value.clone());
        }
        current = dict.get(b"Parent").and_then(Object::as_reference).ok()?;
    }
    None
}

/// Visible page box: CropBox if present and valid, else MediaBox, else US Letter.
pub(crate) fn page_box(doc: &Document, page_id: ObjectId) -> Rect {
    [b"CropBox".as_slice(), b"MediaBox".as_slice()]
        .into_iter()
        .filter_map(|key| inherited_attribute(doc, page_id, key))
        .find_map(|obj| parse_box(doc, &obj))
        .unwrap_or_else(|| {
            Rect::new(0.0, 0.0, DEFAULT_PAGE_DIMENSIONS.0, DEFAULT_PAGE_DIMENSIONS.1)
        })
}

/// Inherited `/Rotate`, normalized to 0..360. Values that are not a multiple of 90 are ignored.
pub(crate) fn page_rotation(doc: &Document, page_id: ObjectId) -> u16 {
    let degrees = inherited_attribute(doc, page_id, b"Rotate")
        .and_then(|obj| resolve(doc, &obj).as_i64().ok())
        .unwrap_or(0);
    if degrees % 90 != 0 {
        return 0;
    }
    degrees.rem_euclid(360) as u16
}

fn parse_box(doc: &Document, obj: &Object) -> Option<Rect> {
    let values = resolve(doc, obj).as_array().ok()?;
    if values.len() != 4 {
        return None;
    }

    let mut coords = [0.0f32; 4];
    for (slot, value) in coords.iter_mut().zip(values) {
        *slot = extract_number(resolve(doc, value))?;
    }

    let [x0, y0, x1, y1] = coords;
    let rect = Rect::new(x0.min(x1), y0.min(y1), (x1 - x0).abs(), (y1 - y0).abs());
    (rect.width > 0.0 && rect.height > 0.0).then_some(rect)
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Extract numeric value from a PDF object
fn extract_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
