mod common;

use common::*;
use pdf_nup::layout::{Rect, SheetDimensions};
use pdf_nup::render::{LopdfEmbedder, Rasterizer, VectorEmbedder};
use pdf_nup::*;
use std::sync::Arc;

fn letter_vertical(per_sheet: u32) -> MergeOptions {
    MergeOptions {
        paper_size: PaperSize::Letter,
        layout: LayoutOrientation::Vertical,
        items_per_sheet: ItemsPerSheet::new(per_sheet).unwrap(),
        ..Default::default()
    }
}

fn assert_close(a: f32, b: f32) {
    assert!((a - b).abs() < 0.01, "{a} != {b}");
}

#[tokio::test]
async fn test_five_items_two_per_sheet_on_letter() {
    let items = letter_items(5);
    let options = letter_vertical(2);

    let result = merge(&fallback_pipeline(None), &items, &options)
        .await
        .unwrap();

    assert_eq!(result.sheet_count(), 3);
    let per_sheet: Vec<usize> = result.sheets.iter().map(|s| s.slots.len()).collect();
    assert_eq!(per_sheet, vec![2, 2, 1]);

    // Order is preserved across sheets
    let names: Vec<&str> = result
        .sheets
        .iter()
        .flat_map(|s| s.slots.iter().map(|slot| slot.item.as_str()))
        .collect();
    assert_eq!(
        names,
        vec!["item-0.pdf", "item-1.pdf", "item-2.pdf", "item-3.pdf", "item-4.pdf"]
    );

    // Full sheets share the same geometry
    let rects = |i: usize| -> Vec<Option<Rect>> {
        result.sheets[i].slots.iter().map(|s| s.rect).collect()
    };
    assert_eq!(rects(0), rects(1));
    assert_eq!(rects(2)[0], rects(0)[0]);

    assert!(result
        .sheets
        .iter()
        .flat_map(|s| &s.slots)
        .all(|s| s.outcome == ItemOutcome::Vector));

    assert_eq!(page_sizes(&result.bytes), vec![(612.0, 792.0); 3]);
    assert_eq!(image_count(&result.bytes), 0);
}

#[tokio::test]
async fn test_two_up_placement_geometry() {
    let items = letter_items(2);
    let result = merge(&fallback_pipeline(None), &items, &letter_vertical(2))
        .await
        .unwrap();

    // 612x792 into a 281x752 slot: width-limited, centered vertically
    let scale = 281.0 / 612.0;
    let drawn_height = 792.0 * scale;
    let left = result.sheets[0].slots[0].rect.unwrap();
    let right = result.sheets[0].slots[1].rect.unwrap();

    assert_close(left.x, 20.0);
    assert_close(right.x, 311.0);
    assert_close(left.width, 281.0);
    assert_close(left.height, drawn_height);
    assert_close(left.y, 792.0 - (20.0 + (752.0 - drawn_height) / 2.0 + drawn_height));
    assert_close(left.y, right.y);
}

#[tokio::test]
async fn test_merge_refuses_single_item() {
    let items = letter_items(1);
    let result = merge(&fallback_pipeline(None), &items, &letter_vertical(1)).await;
    match result {
        Err(NupError::InvalidArgument(msg)) => assert!(msg.contains("at least 2")),
        other => panic!("Expected InvalidArgument, got {other:?}"),
    }
}

#[tokio::test]
async fn test_preview_accepts_single_item_centered() {
    let items = letter_items(1);
    let result = generate_preview(&fallback_pipeline(None), &items, &letter_vertical(1))
        .await
        .unwrap();

    assert_eq!(result.sheet_count(), 1);
    let rect = result.sheets[0].slots[0].rect.unwrap();

    // Slot is (20, 20, 572, 752) on a 612x792 sheet
    assert_close(rect.center_x(), 306.0);
    assert_close(rect.center_y(), 396.0);
    assert_close(rect.width, 572.0);
    assert!(rect.height <= 752.0);
}

#[tokio::test]
async fn test_embed_failure_falls_back_to_raster() {
    let items = vec![
        letter_item("a.pdf"),
        letter_item("b.pdf"),
        letter_item("c.pdf"),
    ];
    let result = merge(&fallback_pipeline(Some("b.pdf")), &items, &letter_vertical(3))
        .await
        .unwrap();

    assert_eq!(result.sheet_count(), 1);
    assert_eq!(
        result.sheets[0].outcomes(),
        vec![&ItemOutcome::Vector, &ItemOutcome::Raster, &ItemOutcome::Vector]
    );
    assert_eq!(image_count(&result.bytes), 1);

    // The rasterized item is still fit inside its slot
    let raster_rect = result.sheets[0].slots[1].rect.unwrap();
    let vector_rect = result.sheets[0].slots[0].rect.unwrap();
    assert!((raster_rect.width - vector_rect.width).abs() < 1.0);
}

#[tokio::test]
async fn test_unreadable_item_leaves_blank_slot() {
    let items = vec![
        letter_item("good.pdf"),
        SourceItem::from_bytes("broken.pdf", b"%PDF-1.7 this is not a document".to_vec()),
        letter_item("also-good.pdf"),
    ];
    let result = merge(&fallback_pipeline(None), &items, &letter_vertical(2))
        .await
        .unwrap();

    assert_eq!(result.sheet_count(), 2);
    assert_eq!(result.blank_count(), 1);
    let broken = &result.sheets[0].slots[1];
    assert!(broken.outcome.is_blank());
    assert!(broken.rect.is_none());
    assert_eq!(result.sheets[1].slots[0].outcome, ItemOutcome::Vector);
}

#[tokio::test]
async fn test_vector_only_pipeline_blanks_failures() {
    let embedder: Arc<dyn VectorEmbedder> = Arc::new(FlakyEmbedder {
        fail_on: "b.pdf".to_string(),
    });
    let pipeline = Pipeline::new(Some(embedder), None, &RasterOptions::default()).unwrap();
    let items = vec![letter_item("a.pdf"), letter_item("b.pdf")];

    let result = merge(&pipeline, &items, &letter_vertical(2)).await.unwrap();
    let outcomes = result.sheets[0].outcomes();
    assert_eq!(outcomes[0], &ItemOutcome::Vector);
    match outcomes[1] {
        ItemOutcome::Blank { reason } => assert!(reason.contains("simulated")),
        other => panic!("Expected a blank slot, got {other:?}"),
    }
}

#[tokio::test]
async fn test_raster_only_pipeline() {
    let rasterizer: Arc<dyn Rasterizer> = Arc::new(SolidRasterizer::default());
    let pipeline = Pipeline::new(None, Some(rasterizer), &RasterOptions::default()).unwrap();
    let items = letter_items(4);

    let result = merge(&pipeline, &items, &letter_vertical(4)).await.unwrap();
    assert!(result.sheets[0]
        .slots
        .iter()
        .all(|s| s.outcome == ItemOutcome::Raster));
    assert_eq!(image_count(&result.bytes), 4);
}

#[test]
fn test_pipeline_requires_a_strategy() {
    let result = Pipeline::new(None, None, &RasterOptions::default());
    assert!(matches!(result, Err(NupError::InvalidArgument(_))));
    assert!(Pipeline::lopdf(&RasterOptions::default()).is_ok());
}

#[tokio::test]
async fn test_horizontal_a4_sheets() {
    let items = letter_items(7);
    let options = MergeOptions {
        paper_size: PaperSize::A4,
        layout: LayoutOrientation::Horizontal,
        items_per_sheet: ItemsPerSheet::new(6).unwrap(),
        ..Default::default()
    };

    let result = merge(&fallback_pipeline(None), &items, &options).await.unwrap();
    assert_eq!(result.sheet_count(), 2);
    for (width, height) in page_sizes(&result.bytes) {
        assert_close(width, 841.89);
        assert_close(height, 595.28);
    }
}

#[test]
fn test_compose_sync_matches_slot_plan() {
    let items = letter_items(3);
    let options = letter_vertical(3);
    let result = compose_sync(&fallback_pipeline(None), &items, &options).unwrap();

    let dims = options.sheet_dimensions();
    assert_eq!(dims, SheetDimensions::new(612.0, 792.0));
    let slots =
        pdf_nup::layout::plan_slots(dims, options.items_per_sheet, options.margin_pt, options.gap_pt)
            .unwrap();

    for (report, slot) in result.sheets[0].slots.iter().zip(&slots) {
        assert_eq!(report.position, slot.position);
        let rect = report.rect.unwrap();
        // Drawn rect (PDF space) stays within the slot (top-left space, flipped)
        let slot_pdf = slot.rect.flip_y(dims.height);
        assert!(rect.x >= slot_pdf.x - 0.01);
        assert!(rect.right() <= slot_pdf.right() + 0.01);
        assert!(rect.y >= slot_pdf.y - 0.01);
        assert!(rect.y + rect.height <= slot_pdf.y + slot_pdf.height + 0.01);
    }
}

#[test]
fn test_rotated_item_is_placed_as_displayed() {
    // Portrait MediaBox turned a quarter turn: displayed as 792x612 landscape
    let item = SourceItem::from_bytes("rotated.pdf", rotated_pdf_bytes(612, 792, 90));
    let options = MergeOptions {
        paper_size: PaperSize::Letter,
        layout: LayoutOrientation::Horizontal,
        items_per_sheet: ItemsPerSheet::new(1).unwrap(),
        ..Default::default()
    };

    let vector = compose_sync(&fallback_pipeline(None), std::slice::from_ref(&item), &options)
        .unwrap();
    assert_eq!(vector.sheets[0].slots[0].outcome, ItemOutcome::Vector);
    let rect = vector.sheets[0].slots[0].rect.unwrap();

    // 792x612 into a 752x572 slot is height-limited
    let scale = 572.0 / 612.0;
    assert_close(rect.height, 572.0);
    assert_close(rect.width, 792.0 * scale);
    assert_close(rect.x, 20.0 + (752.0 - 792.0 * scale) / 2.0);
    assert_close(rect.y, 20.0);

    // The form is drawn with a clockwise quarter turn
    let content = &page_contents(&vector.bytes)[0];
    let draw = content.lines().find(|line| line.contains("/Fm0 Do")).unwrap();
    let operands: Vec<f32> = draw
        .split_whitespace()
        .skip(1)
        .take(6)
        .map(|v| v.parse().unwrap())
        .collect();
    assert_close(operands[0], 0.0);
    assert_close(operands[1], -scale);
    assert_close(operands[2], scale);
    assert_close(operands[3], 0.0);

    // The raster path sees the same displayed size
    let rasterizer: Arc<dyn Rasterizer> = Arc::new(SolidRasterizer::default());
    let pipeline = Pipeline::new(None, Some(rasterizer), &RasterOptions::default()).unwrap();
    let raster = compose_sync(&pipeline, std::slice::from_ref(&item), &options).unwrap();
    let raster_rect = raster.sheets[0].slots[0].rect.unwrap();
    assert!((raster_rect.width - rect.width).abs() < 1.0);
    assert!((raster_rect.height - rect.height).abs() < 1.0);
}

#[test]
fn test_group_larger_than_sheet_is_rejected() {
    let items = letter_items(3);
    let dims = SheetDimensions::new(612.0, 792.0);
    let per_sheet = ItemsPerSheet::new(2).unwrap();
    let compositor = PageCompositor::new(fallback_pipeline(None).renderer());

    let assembler = OutputAssembler::new(compositor.clone(), 20.0, 10.0, 85);
    let groups: Vec<&[SourceItem]> = vec![&items[..2], &items[..3]];
    assert!(matches!(
        assembler.assemble(&groups, dims, per_sheet),
        Err(NupError::InvalidArgument(_))
    ));

    let slots = pdf_nup::layout::plan_slots(dims, per_sheet, 20.0, 10.0).unwrap();
    let mut output = OutputDocument::new();
    let plan = SheetPlan {
        index: 0,
        dimensions: dims,
        items: &items,
        slots: &slots,
    };
    assert!(matches!(
        compositor.compose(&mut output, &plan),
        Err(NupError::InvalidArgument(_))
    ));
    assert_eq!(output.sheet_count(), 0);
}

#[tokio::test]
async fn test_every_sheet_starts_with_white_fill() {
    let items = letter_items(3);
    let result = merge(&fallback_pipeline(Some("item-1.pdf")), &items, &letter_vertical(2))
        .await
        .unwrap();

    let contents = page_contents(&result.bytes);
    assert_eq!(contents.len(), 2);
    for content in &contents {
        assert!(
            content.starts_with("q 1 g 0 0 612 792 re f Q"),
            "sheet content starts with {:?}",
            &content[..content.len().min(40)]
        );
        assert_eq!(content.matches(" re f Q").count(), 1);
    }
    assert_eq!(contents[0].matches(" Do Q").count(), 2);
}

/// Embedder that reports the output document as already sealed
struct SealedEmbedder;

impl VectorEmbedder for SealedEmbedder {
    fn embed(&self, _output: &mut OutputDocument, _item: &SourceItem) -> pdf_nup::Result<EmbeddedPage> {
        Err(NupError::OutputFinalization("document has already been finalized".to_string()))
    }
}

#[test]
fn test_compose_propagates_finalization_errors() {
    let items = letter_items(2);
    let dims = SheetDimensions::new(612.0, 792.0);
    let per_sheet = ItemsPerSheet::new(2).unwrap();
    let slots = pdf_nup::layout::plan_slots(dims, per_sheet, 20.0, 10.0).unwrap();
    let plan = SheetPlan {
        index: 0,
        dimensions: dims,
        items: &items,
        slots: &slots,
    };

    // A finalized document refuses the new sheet
    let compositor = PageCompositor::new(fallback_pipeline(None).renderer());
    let mut output = OutputDocument::new();
    output.finalize().unwrap();
    assert!(matches!(
        compositor.compose(&mut output, &plan),
        Err(NupError::OutputFinalization(_))
    ));

    // A finalization error from an item is not turned into a blank slot or rasterized
    let embedder: Arc<dyn VectorEmbedder> = Arc::new(SealedEmbedder);
    let rasterizer: Arc<dyn Rasterizer> = Arc::new(SolidRasterizer::default());
    let pipeline = Pipeline::new(Some(embedder), Some(rasterizer), &RasterOptions::default()).unwrap();
    let compositor = PageCompositor::new(pipeline.renderer());
    let mut output = OutputDocument::new();
    assert!(matches!(
        compositor.compose(&mut output, &plan),
        Err(NupError::OutputFinalization(_))
    ));
}

#[test]
fn test_output_document_rejects_second_finalize() {
    let mut output = OutputDocument::new();
    let sheet = output.new_page(SheetDimensions::new(612.0, 792.0)).unwrap();
    output.fill_background(sheet).unwrap();

    let embedded = LopdfEmbedder::new()
        .embed(&mut output, &letter_item("a.pdf"))
        .unwrap();
    assert_eq!(embedded.width(), 612.0);

    let bytes = output.finalize().unwrap();
    assert_eq!(page_sizes(&bytes).len(), 1);
    assert!(matches!(
        output.finalize(),
        Err(NupError::OutputFinalization(_))
    ));
}

#[tokio::test]
async fn test_session_merge_and_save() {
    let mut session = MergeSession::new(letter_vertical(2));
    for item in letter_items(3) {
        session.add(item);
    }
    session.move_item(2, 0).unwrap();
    assert!(session.can_merge());
    assert_eq!(session.stats().unwrap().sheets, 2);

    let result = session.merge(&fallback_pipeline(None)).await.unwrap();
    assert_eq!(result.sheets[0].slots[0].item, "item-2.pdf");

    let dir = tempfile::tempdir().unwrap();
    let name = artifact_file_name(&session.options, result.sheet_count(), "2025-01-02T03-04-05");
    assert_eq!(name, "merged-letter-vertical-2per-2pages-2025-01-02T03-04-05.pdf");

    let path = dir.path().join(name);
    save_pdf(&result.bytes, &path).await.unwrap();

    let loaded = load_source(&path).await.unwrap();
    assert_eq!(LopdfSource.page_size(&loaded).unwrap(), (612.0, 792.0));
}

#[tokio::test]
async fn test_load_sources_rejects_non_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("one.pdf");
    let text = dir.path().join("notes.txt");
    std::fs::write(&pdf, pdf_bytes(300, 300)).unwrap();
    std::fs::write(&text, b"hello").unwrap();

    let items = load_sources(&[&pdf]).await.unwrap();
    assert_eq!(items[0].name(), "one.pdf");

    match load_sources(&[&pdf, &text]).await {
        Err(NupError::UnsupportedFormat { name, .. }) => assert_eq!(name, "notes.txt"),
        other => panic!("Expected UnsupportedFormat, got {other:?}"),
    }
}
