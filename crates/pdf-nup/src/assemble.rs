//! Assembly of all sheets into the final document

use crate::compose::{PageCompositor, SheetPlan, SheetReport};
use crate::layout::{SheetDimensions, plan_slots};
use crate::output::OutputDocument;
use crate::source::SourceItem;
use crate::types::{ItemsPerSheet, NupError, Result};
use log::{debug, info};

/// Serialized output plus what happened on each sheet.
#[derive(Debug, Clone)]
pub struct AssembledDocument {
    pub bytes: Vec<u8>,
    pub sheets: Vec<SheetReport>,
}

impl AssembledDocument {
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn blank_count(&self) -> usize {
        self.sheets.iter().map(SheetReport::blank_count).sum()
    }
}

/// Builds one output document from paginated groups.
pub struct OutputAssembler {
    compositor: PageCompositor,
    margin: f32,
    gap: f32,
    jpeg_quality: u8,
}

impl OutputAssembler {
    pub fn new(compositor: PageCompositor, margin: f32, gap: f32, jpeg_quality: u8) -> Self {
        Self {
            compositor,
            margin,
            gap,
            jpeg_quality,
        }
    }

    /// Compose every group in order, one sheet each, then finalize.
    ///
    /// Sheet 1 holds the first group. Finalization errors are fatal, and a
    /// group larger than `items_per_sheet` is rejected before anything is drawn.
    pub fn assemble(
        &self,
        groups: &[&[SourceItem]],
        dimensions: SheetDimensions,
        items_per_sheet: ItemsPerSheet,
    ) -> Result<AssembledDocument> {
        if let Some((index, group)) = groups
            .iter()
            .enumerate()
            .find(|(_, group)| group.len() > items_per_sheet.get())
        {
            return Err(NupError::InvalidArgument(format!(
                "group {} has {} item(s), more than {} per sheet",
                index + 1,
                group.len(),
                items_per_sheet
            )));
        }

        // Every sheet shares one geometry
        let slots = plan_slots(dimensions, items_per_sheet, self.margin, self.gap)?;
        debug!(
            "Planned {} slot(s) for a {}x{}pt sheet",
            slots.len(),
            dimensions.width,
            dimensions.height
        );
        let mut output = OutputDocument::with_jpeg_quality(self.jpeg_quality);
        let mut sheets = Vec::with_capacity(groups.len());

        for (index, &items) in groups.iter().enumerate() {
            let plan = SheetPlan {
                index,
                dimensions,
                items,
                slots: &slots,
            };
            sheets.push(self.compositor.compose(&mut output, &plan)?);
        }

        let bytes = output.finalize()?;
        info!(
            "Assembled {} sheet(s), {} bytes",
            sheets.len(),
            bytes.len()
        );

        Ok(AssembledDocument { bytes, sheets })
    }
}
