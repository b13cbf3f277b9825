#![allow(dead_code)]

use image::{Rgb, RgbImage};
use lopdf::{Dictionary, Document, Object, Stream};
use pdf_nup::render::{LopdfEmbedder, Rasterizer, VectorEmbedder};
use pdf_nup::*;
use std::sync::Arc;

pub const FILL: Rgb<u8> = Rgb([200, 30, 30]);

/// Single-page PDF with a filled rectangle and a font resource
pub fn create_test_pdf(width: i64, height: i64) -> Document {
    let mut doc = Document::with_version("1.7");

    // Create page tree root ID
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
    ]));
    let content = b"q 0.8 0.1 0.1 rg 10 10 50 50 re f Q BT /F1 12 Tf 20 20 Td (x) Tj ET".to_vec();
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content));

    let resources = Dictionary::from_iter(vec![(
        "Font",
        Object::Dictionary(Dictionary::from_iter(vec![("F1", Object::Reference(font_id))])),
    )]);

    let page_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(pages_id)),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(width),
                Object::Integer(height),
            ]),
        ),
        ("Resources", Object::Dictionary(resources)),
        ("Contents", Object::Reference(content_id)),
    ]));

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(vec![Object::Reference(page_id)])),
        ("Count", Object::Integer(1)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    doc
}

pub fn pdf_bytes(width: i64, height: i64) -> Vec<u8> {
    let mut writer = Vec::new();
    create_test_pdf(width, height).save_to(&mut writer).unwrap();
    writer
}

/// Like [`pdf_bytes`], with `/Rotate` set on the page
pub fn rotated_pdf_bytes(width: i64, height: i64, rotate: i64) -> Vec<u8> {
    let mut doc = create_test_pdf(width, height);
    let page_id = *doc.get_pages().values().next().unwrap();
    doc.get_dictionary_mut(page_id)
        .unwrap()
        .set("Rotate", Object::Integer(rotate));

    let mut writer = Vec::new();
    doc.save_to(&mut writer).unwrap();
    writer
}

pub fn letter_item(name: &str) -> SourceItem {
    SourceItem::from_bytes(name, pdf_bytes(612, 792))
}

pub fn letter_items(count: usize) -> Vec<SourceItem> {
    (0..count)
        .map(|i| letter_item(&format!("item-{i}.pdf")))
        .collect()
}

/// Rasterizer that paints a solid colour, failing on one named item
#[derive(Default)]
pub struct SolidRasterizer {
    pub fail_on: Option<String>,
}

impl Rasterizer for SolidRasterizer {
    fn page_size(&self, item: &SourceItem) -> pdf_nup::Result<(f32, f32)> {
        LopdfSource.page_size(item)
    }

    fn render(&self, item: &SourceItem, width_px: u32, height_px: u32) -> pdf_nup::Result<RgbImage> {
        if self.fail_on.as_deref() == Some(item.name()) {
            return Err(NupError::Render(format!("simulated failure on {}", item.name())));
        }
        Ok(RgbImage::from_pixel(width_px, height_px, FILL))
    }
}

/// lopdf embedder that refuses one named item
pub struct FlakyEmbedder {
    pub fail_on: String,
}

impl VectorEmbedder for FlakyEmbedder {
    fn embed(&self, output: &mut OutputDocument, item: &SourceItem) -> pdf_nup::Result<EmbeddedPage> {
        if item.name() == self.fail_on {
            return Err(NupError::Render(format!("simulated embed failure on {}", item.name())));
        }
        LopdfEmbedder::new().embed(output, item)
    }
}

pub fn fallback_pipeline(fail_embed_on: Option<&str>) -> Pipeline {
    let embedder: Arc<dyn VectorEmbedder> = match fail_embed_on {
        Some(name) => Arc::new(FlakyEmbedder {
            fail_on: name.to_string(),
        }),
        None => Arc::new(LopdfEmbedder::new()),
    };
    Pipeline::new(
        Some(embedder),
        Some(Arc::new(SolidRasterizer::default())),
        &RasterOptions::default(),
    )
    .unwrap()
}

pub fn number(obj: &Object) -> f32 {
    match obj {
        Object::Integer(i) => *i as f32,
        Object::Real(r) => *r,
        other => panic!("expected a number, got {other:?}"),
    }
}

/// MediaBox of every page of a serialized document
pub fn page_sizes(bytes: &[u8]) -> Vec<(f32, f32)> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .values()
        .map(|&id| {
            let page = doc.get_dictionary(id).unwrap();
            let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
            (number(&media_box[2]), number(&media_box[3]))
        })
        .collect()
}

/// Count image XObjects in a serialized document
pub fn image_count(bytes: &[u8]) -> usize {
    let doc = Document::load_mem(bytes).unwrap();
    doc.objects
        .values()
        .filter_map(|obj| obj.as_stream().ok())
        .filter(|stream| {
            stream
                .dict
                .get(b"Subtype")
                .and_then(Object::as_name)
                .is_ok_and(|name| name == b"Image")
        })
        .count()
}

/// Decoded content stream of every page of a serialized document
pub fn page_contents(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .values()
        .map(|&id| String::from_utf8(doc.get_page_content(id).unwrap()).unwrap())
        .collect()
}
