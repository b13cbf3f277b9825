//! Append-only output document
//!
//! Sheets are added one at a time and receive drawing operations in order.
//! Nothing is written to the underlying lopdf document's page tree until
//! [`OutputDocument::finalize`] seals it and returns the serialized bytes.

use crate::constants::DEFAULT_JPEG_QUALITY;
use crate::layout::{Placement, Rect, SheetDimensions};
use crate::source::rotated_size;
use crate::types::{NupError, Result};
use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// Handle to a sheet that has been appended to an [`OutputDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SheetId(usize);

impl SheetId {
    /// Zero-based position of the sheet in the document
    pub fn index(self) -> usize {
        self.0
    }
}

/// A source page embedded as a Form XObject, ready to be drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmbeddedPage {
    pub id: ObjectId,
    /// Form bounding box in the source page's user space
    pub bbox: Rect,
    /// Clockwise display rotation of the source page: 0, 90, 180 or 270
    pub rotation: u16,
}

impl EmbeddedPage {
    /// Displayed width, after rotation
    pub fn width(&self) -> f32 {
        rotated_size(self.bbox, self.rotation).0
    }

    /// Displayed height, after rotation
    pub fn height(&self) -> f32 {
        rotated_size(self.bbox, self.rotation).1
    }

    /// `cm` operands mapping the form's BBox onto `placement.rect`.
    ///
    /// The box is moved to the origin, turned clockwise by `rotation`, scaled,
    /// then translated to the placement's lower-left corner.
    pub fn matrix(&self, placement: &Placement) -> [f32; 6] {
        let Rect {
            x: x0,
            y: y0,
            width: w,
            height: h,
        } = self.bbox;
        // (a, b, c, d, e, f) for the rotation of a w x h box sitting at the origin
        let (a, b, c, d, e, f) = match self.rotation {
            90 => (0.0, -1.0, 1.0, 0.0, 0.0, w),
            180 => (-1.0, 0.0, 0.0, -1.0, w, h),
            270 => (0.0, 1.0, -1.0, 0.0, h, 0.0),
            _ => (1.0, 0.0, 0.0, 1.0, 0.0, 0.0),
        };
        let s = placement.scale;
        [
            s * a,
            s * b,
            s * c,
            s * d,
            s * (e - a * x0 - c * y0) + placement.rect.x,
            s * (f - b * x0 - d * y0) + placement.rect.y,
        ]
    }
}

#[derive(Debug)]
struct SheetBuilder {
    dimensions: SheetDimensions,
    content_ops: Vec<String>,
    xobjects: Dictionary,
    next_name: usize,
}

impl SheetBuilder {
    fn register(&mut self, prefix: &str, id: ObjectId) -> String {
        let name = format!("{}{}", prefix, self.next_name);
        self.next_name += 1;
        self.xobjects.set(name.as_bytes(), Object::Reference(id));
        name
    }
}

/// Output PDF under construction.
#[derive(Debug)]
pub struct OutputDocument {
    doc: Document,
    pages_tree_id: ObjectId,
    sheets: Vec<SheetBuilder>,
    jpeg_quality: u8,
    sealed: bool,
}

impl Default for OutputDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputDocument {
    pub fn new() -> Self {
        Self::with_jpeg_quality(DEFAULT_JPEG_QUALITY)
    }

    pub fn with_jpeg_quality(jpeg_quality: u8) -> Self {
        let mut doc = Document::with_version("1.7");
        let pages_tree_id = doc.new_object_id();
        Self {
            doc,
            pages_tree_id,
            sheets: Vec::new(),
            jpeg_quality: jpeg_quality.clamp(1, 100),
            sealed: false,
        }
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_finalized(&self) -> bool {
        self.sealed
    }

    fn ensure_open(&self) -> Result<()> {
        if self.sealed {
            return Err(NupError::OutputFinalization(
                "document has already been finalized".to_string(),
            ));
        }
        Ok(())
    }

    fn sheet_mut(&mut self, sheet: SheetId) -> Result<&mut SheetBuilder> {
        self.sheets.get_mut(sheet.0).ok_or_else(|| {
            NupError::InvalidArgument(format!("sheet {} does not exist", sheet.0))
        })
    }

    /// Mutable access to the underlying document, for embedders that copy objects in.
    pub fn document_mut(&mut self) -> Result<&mut Document> {
        self.ensure_open()?;
        Ok(&mut self.doc)
    }

    /// Append a new, empty sheet.
    pub fn new_page(&mut self, dimensions: SheetDimensions) -> Result<SheetId> {
        self.ensure_open()?;
        self.sheets.push(SheetBuilder {
            dimensions,
            content_ops: Vec::new(),
            xobjects: Dictionary::new(),
            next_name: 0,
        });
        Ok(SheetId(self.sheets.len() - 1))
    }

    /// Fill the whole sheet with white.
    pub fn fill_background(&mut self, sheet: SheetId) -> Result<()> {
        self.ensure_open()?;
        let builder = self.sheet_mut(sheet)?;
        let SheetDimensions { width, height } = builder.dimensions;
        builder
            .content_ops
            .push(format!("q 1 g 0 0 {} {} re f Q\n", width, height));
        Ok(())
    }

    /// Draw an embedded page using a placement computed in PDF space.
    pub fn draw_xobject(
        &mut self,
        sheet: SheetId,
        page: &EmbeddedPage,
        placement: &Placement,
    ) -> Result<()> {
        self.ensure_open()?;
        let builder = self.sheet_mut(sheet)?;
        let name = builder.register("Fm", page.id);

        let [a, b, c, d, e, f] = page.matrix(placement);
        builder.content_ops.push(format!(
            "q {} {} {} {} {} {} cm /{} Do Q\n",
            a, b, c, d, e, f, name
        ));
        Ok(())
    }

    /// Embed a bitmap as a JPEG image and draw it into `rect` (PDF space).
    pub fn draw_image(&mut self, sheet: SheetId, image: &RgbImage, rect: Rect) -> Result<()> {
        self.ensure_open()?;
        // Check the sheet before adding any objects
        self.sheet_mut(sheet)?;

        let mut jpeg = Vec::new();
        image.write_with_encoder(JpegEncoder::new_with_quality(&mut jpeg, self.jpeg_quality))?;

        let image_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"XObject".to_vec())),
            ("Subtype", Object::Name(b"Image".to_vec())),
            ("Width", Object::Integer(image.width() as i64)),
            ("Height", Object::Integer(image.height() as i64)),
            ("ColorSpace", Object::Name(b"DeviceRGB".to_vec())),
            ("BitsPerComponent", Object::Integer(8)),
            ("Filter", Object::Name(b"DCTDecode".to_vec())),
        ]);
        let image_id = self
            .doc
            .add_object(Stream::new(image_dict, jpeg).with_compression(false));

        let builder = self.sheet_mut(sheet)?;
        let name = builder.register("Im", image_id);
        builder.content_ops.push(format!(
            "q {} 0 0 {} {} {} cm /{} Do Q\n",
            rect.width, rect.height, rect.x, rect.y, name
        ));
        Ok(())
    }

    /// Write the page tree, seal the document and serialize it.
    ///
    /// A second call fails with [`NupError::OutputFinalization`].
    pub fn finalize(&mut self) -> Result<Vec<u8>> {
        self.ensure_open()?;
        self.sealed = true;

        let sheets = std::mem::take(&mut self.sheets);
        let mut page_refs = Vec::with_capacity(sheets.len());

        for sheet in sheets {
            let content = sheet.content_ops.join("");
            let content_id = self
                .doc
                .add_object(Stream::new(Dictionary::new(), content.into_bytes()));

            let mut resources = Dictionary::new();
            resources.set("XObject", Object::Dictionary(sheet.xobjects));

            let page_dict = Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Page".to_vec())),
                ("Parent", Object::Reference(self.pages_tree_id)),
                (
                    "MediaBox",
                    Object::Array(vec![
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Real(sheet.dimensions.width),
                        Object::Real(sheet.dimensions.height),
                    ]),
                ),
                ("Resources", Object::Dictionary(resources)),
                ("Contents", Object::Reference(content_id)),
            ]);
            page_refs.push(Object::Reference(self.doc.add_object(page_dict)));
        }

        // Create pages tree
        let count = page_refs.len() as i64;
        let pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(page_refs)),
            ("Count", Object::Integer(count)),
        ]);
        self.doc
            .objects
            .insert(self.pages_tree_id, Object::Dictionary(pages_dict));

        // Create catalog
        let catalog_id = self.doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(self.pages_tree_id)),
        ]));
        self.doc.trailer.set("Root", catalog_id);

        // Objects copied in by failed embeds are unreachable
        self.doc.prune_objects();
        self.doc.compress();

        let mut bytes = Vec::new();
        self.doc
            .save_to(&mut bytes)
            .map_err(|e| NupError::OutputFinalization(format!("failed to serialize: {e}")))?;
        Ok(bytes)
    }
}
