use crate::assemble::AssembledDocument;
use crate::constants::pixel_ratio;
use crate::layout::{center_in_slot, plan_slots, raster_scale};
use crate::merge::{Pipeline, run};
use crate::options::MergeOptions;
use crate::paginate::paginate;
use crate::render::Rasterizer;
use crate::source::SourceItem;
use crate::types::*;
use image::{Rgb, RgbImage, imageops};
use log::{debug, warn};
use std::sync::Arc;

/// Compose the output document for preview.
///
/// Same pipeline as [`crate::merge`], but a single item is enough.
pub async fn generate_preview(
    pipeline: &Pipeline,
    items: &[SourceItem],
    options: &MergeOptions,
) -> Result<AssembledDocument> {
    run(pipeline, items, options).await
}

/// Render every sheet to a bitmap at the preview DPI.
pub async fn render_preview_images(
    rasterizer: Arc<dyn Rasterizer>,
    items: &[SourceItem],
    options: &MergeOptions,
) -> Result<Vec<RgbImage>> {
    if items.is_empty() {
        return Err(NupError::InvalidArgument(
            "no PDF files to preview".to_string(),
        ));
    }
    options.validate()?;

    let items = items.to_vec();
    let options = options.clone();

    tokio::task::spawn_blocking(move || preview_images_sync(rasterizer.as_ref(), &items, &options))
        .await?
}

/// Synchronous sheet preview rendering.
///
/// Each sheet is white, and every item is fit and centered in its slot.
/// Items that fail to render are skipped.
pub fn preview_images_sync(
    rasterizer: &dyn Rasterizer,
    items: &[SourceItem],
    options: &MergeOptions,
) -> Result<Vec<RgbImage>> {
    let dimensions = options.sheet_dimensions();
    let slots = plan_slots(
        dimensions,
        options.items_per_sheet,
        options.margin_pt,
        options.gap_pt,
    )?;

    let ratio = pixel_ratio(options.raster.preview_dpi);
    let canvas_width = ((dimensions.width * ratio).round() as u32).max(1);
    let canvas_height = ((dimensions.height * ratio).round() as u32).max(1);

    let mut sheets = Vec::new();
    for (index, group) in paginate(items, options.items_per_sheet).into_iter().enumerate() {
        let mut canvas = RgbImage::from_pixel(canvas_width, canvas_height, Rgb([255, 255, 255]));

        for (item, slot) in group.iter().zip(&slots) {
            let bitmap = match render_item(rasterizer, item, slot, ratio, options) {
                Ok(bitmap) => bitmap,
                Err(e) => {
                    warn!("Skipping '{}' in preview: {}", item.name(), e);
                    continue;
                }
            };

            let drawn = center_in_slot(
                slot,
                bitmap.width() as f32 / ratio,
                bitmap.height() as f32 / ratio,
            );
            let x = (drawn.x * ratio).round() as i64;
            let y = (drawn.y * ratio).round() as i64;
            imageops::overlay(&mut canvas, &bitmap, x, y);
        }

        debug!(
            "Preview sheet {} rendered at {}x{}px",
            index + 1,
            canvas_width,
            canvas_height
        );
        sheets.push(canvas);
    }

    Ok(sheets)
}

fn render_item(
    rasterizer: &dyn Rasterizer,
    item: &SourceItem,
    slot: &crate::layout::Slot,
    ratio: f32,
    options: &MergeOptions,
) -> Result<RgbImage> {
    let (width, height) = rasterizer.page_size(item)?;
    if !(width > 0.0 && height > 0.0) {
        return Err(NupError::Render(format!("empty page ({width}x{height}pt)")));
    }

    let scale = raster_scale(
        width,
        height,
        slot.width() * ratio,
        slot.height() * ratio,
        options.raster.max_render_scale,
    );
    let width_px = ((width * scale).floor() as u32).max(1);
    let height_px = ((height * scale).floor() as u32).max(1);

    rasterizer.render(item, width_px, height_px)
}
