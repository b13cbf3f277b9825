//! N-up merging - placing several documents onto shared sheets
//!
//! This module orchestrates a merge job:
//! 1. Resolve sheet dimensions
//! 2. Paginate items into sheet-sized groups
//! 3. Compose each group onto a sheet
//! 4. Finalize the output document

use crate::assemble::{AssembledDocument, OutputAssembler};
use crate::compose::PageCompositor;
use crate::constants::MIN_MERGE_ITEMS;
use crate::options::{MergeOptions, RasterOptions};
use crate::paginate::paginate;
use crate::render::{
    FallbackRenderer, LopdfEmbedder, PageRenderer, RasterRenderer, Rasterizer, VectorEmbedder,
    VectorRenderer,
};
use crate::source::SourceItem;
use crate::types::*;
use log::info;
use std::sync::Arc;

/// The rendering capabilities a job runs with.
#[derive(Clone)]
pub struct Pipeline {
    renderer: Arc<dyn PageRenderer>,
    rasterizer: Option<Arc<dyn Rasterizer>>,
}

impl Pipeline {
    /// Pick a strategy from the available capabilities.
    ///
    /// Both present: vector with raster fallback. One present: that one alone.
    /// Neither: `InvalidArgument`.
    pub fn new(
        embedder: Option<Arc<dyn VectorEmbedder>>,
        rasterizer: Option<Arc<dyn Rasterizer>>,
        raster_options: &RasterOptions,
    ) -> Result<Self> {
        let renderer: Arc<dyn PageRenderer> = match (embedder, rasterizer.clone()) {
            (Some(embedder), Some(rasterizer)) => Arc::new(FallbackRenderer::new(
                VectorRenderer::new(embedder),
                RasterRenderer::new(rasterizer, *raster_options),
            )),
            (Some(embedder), None) => Arc::new(VectorRenderer::new(embedder)),
            (None, Some(rasterizer)) => {
                Arc::new(RasterRenderer::new(rasterizer, *raster_options))
            }
            (None, None) => {
                return Err(NupError::InvalidArgument(
                    "no rendering strategy available: need a vector embedder or a rasterizer"
                        .to_string(),
                ));
            }
        };

        Ok(Self {
            renderer,
            rasterizer,
        })
    }

    /// lopdf vector embedding, plus pdfium rasterization when it can be bound.
    pub fn lopdf(raster_options: &RasterOptions) -> Result<Self> {
        Self::new(
            Some(Arc::new(LopdfEmbedder::new())),
            default_rasterizer(),
            raster_options,
        )
    }

    pub fn renderer(&self) -> Arc<dyn PageRenderer> {
        self.renderer.clone()
    }

    pub fn rasterizer(&self) -> Option<Arc<dyn Rasterizer>> {
        self.rasterizer.clone()
    }
}

#[cfg(feature = "pdfium")]
fn default_rasterizer() -> Option<Arc<dyn Rasterizer>> {
    match crate::render::PdfiumRasterizer::new() {
        Ok(rasterizer) => Some(Arc::new(rasterizer)),
        Err(e) => {
            log::warn!("{e}; items that cannot be embedded will be left blank");
            None
        }
    }
}

#[cfg(not(feature = "pdfium"))]
fn default_rasterizer() -> Option<Arc<dyn Rasterizer>> {
    None
}

/// Merge at least two items onto n-up sheets.
pub async fn merge(
    pipeline: &Pipeline,
    items: &[SourceItem],
    options: &MergeOptions,
) -> Result<AssembledDocument> {
    if items.len() < MIN_MERGE_ITEMS {
        return Err(NupError::InvalidArgument(format!(
            "at least {MIN_MERGE_ITEMS} PDF files are required to merge, got {}",
            items.len()
        )));
    }
    run(pipeline, items, options).await
}

/// Run the pipeline on a blocking thread; requires at least one item.
pub(crate) async fn run(
    pipeline: &Pipeline,
    items: &[SourceItem],
    options: &MergeOptions,
) -> Result<AssembledDocument> {
    if items.is_empty() {
        return Err(NupError::InvalidArgument(
            "no PDF files to compose".to_string(),
        ));
    }
    options.validate()?;

    let pipeline = pipeline.clone();
    let items = items.to_vec();
    let options = options.clone();

    tokio::task::spawn_blocking(move || compose_sync(&pipeline, &items, &options)).await?
}

/// Synchronous merge pipeline.
pub fn compose_sync(
    pipeline: &Pipeline,
    items: &[SourceItem],
    options: &MergeOptions,
) -> Result<AssembledDocument> {
    let dimensions = options.sheet_dimensions();
    let groups = paginate(items, options.items_per_sheet);
    info!(
        "Composing {} item(s) onto {} {} {} sheet(s), {} per sheet",
        items.len(),
        groups.len(),
        options.paper_size,
        options.layout,
        options.items_per_sheet
    );

    let assembler = OutputAssembler::new(
        PageCompositor::new(pipeline.renderer()),
        options.margin_pt,
        options.gap_pt,
        options.raster.jpeg_quality,
    );
    assembler.assemble(&groups, dimensions, options.items_per_sheet)
}
