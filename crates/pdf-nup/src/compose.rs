//! Composition of a single output sheet

use crate::layout::{GridPosition, Rect, SheetDimensions, Slot};
use crate::output::OutputDocument;
use crate::render::{PageRenderer, RenderStrategy};
use crate::source::SourceItem;
use crate::types::{NupError, Result};
use log::{debug, error};
use std::sync::Arc;

/// The items of one group paired with that sheet's slots.
#[derive(Debug, Clone, Copy)]
pub struct SheetPlan<'a> {
    /// Zero-based sheet index in the output
    pub index: usize,
    pub dimensions: SheetDimensions,
    pub items: &'a [SourceItem],
    pub slots: &'a [Slot],
}

impl<'a> SheetPlan<'a> {
    /// Items in order, each with the slot it is drawn into
    pub fn entries(&self) -> impl Iterator<Item = (&'a SourceItem, &'a Slot)> + 'a {
        self.items.iter().zip(self.slots.iter())
    }
}

/// What happened to one item
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    Vector,
    Raster,
    /// Every strategy failed; the slot was left white
    Blank { reason: String },
}

impl ItemOutcome {
    pub fn is_blank(&self) -> bool {
        matches!(self, ItemOutcome::Blank { .. })
    }
}

impl From<RenderStrategy> for ItemOutcome {
    fn from(strategy: RenderStrategy) -> Self {
        match strategy {
            RenderStrategy::Vector => ItemOutcome::Vector,
            RenderStrategy::Raster => ItemOutcome::Raster,
        }
    }
}

/// Outcome for one populated slot.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotReport {
    pub item: String,
    pub position: GridPosition,
    pub outcome: ItemOutcome,
    /// Drawn rectangle in PDF space, `None` for blank slots
    pub rect: Option<Rect>,
}

/// Outcome for one sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetReport {
    pub index: usize,
    pub slots: Vec<SlotReport>,
}

impl SheetReport {
    pub fn outcomes(&self) -> Vec<&ItemOutcome> {
        self.slots.iter().map(|s| &s.outcome).collect()
    }

    pub fn blank_count(&self) -> usize {
        self.slots.iter().filter(|s| s.outcome.is_blank()).count()
    }
}

/// Draws a [`SheetPlan`] onto a new sheet of the output document.
#[derive(Clone)]
pub struct PageCompositor {
    renderer: Arc<dyn PageRenderer>,
}

impl PageCompositor {
    pub fn new(renderer: Arc<dyn PageRenderer>) -> Self {
        Self { renderer }
    }

    /// Append one sheet, white-filled, with every item of the plan in slot order.
    ///
    /// Per-item failures are absorbed into [`ItemOutcome::Blank`]. Only errors
    /// from the output document itself are returned, plus
    /// [`NupError::InvalidArgument`] when the plan has more items than slots.
    pub fn compose(&self, output: &mut OutputDocument, plan: &SheetPlan<'_>) -> Result<SheetReport> {
        if plan.items.len() > plan.slots.len() {
            return Err(NupError::InvalidArgument(format!(
                "sheet {} has {} item(s) but only {} slot(s)",
                plan.index + 1,
                plan.items.len(),
                plan.slots.len()
            )));
        }

        let sheet = output.new_page(plan.dimensions)?;
        output.fill_background(sheet)?;
        debug!(
            "Composing sheet {} with {} item(s)",
            plan.index + 1,
            plan.items.len()
        );

        let mut slots = Vec::with_capacity(plan.items.len());
        for (item, slot) in plan.entries() {
            let report = match self
                .renderer
                .render(output, sheet, item, slot, plan.dimensions)
            {
                Ok(rendered) => {
                    debug!(
                        "  '{}' -> slot ({}, {}) as {}",
                        item.name(),
                        slot.position.row,
                        slot.position.col,
                        rendered.strategy
                    );
                    SlotReport {
                        item: item.name().to_string(),
                        position: slot.position,
                        outcome: rendered.strategy.into(),
                        rect: Some(rendered.rect),
                    }
                }
                Err(e @ NupError::OutputFinalization(_)) => return Err(e),
                Err(e) => {
                    error!(
                        "Could not render '{}' on sheet {}, leaving its slot blank: {}",
                        item.name(),
                        plan.index + 1,
                        e
                    );
                    SlotReport {
                        item: item.name().to_string(),
                        position: slot.position,
                        outcome: ItemOutcome::Blank {
                            reason: e.to_string(),
                        },
                        rect: None,
                    }
                }
            };
            slots.push(report);
        }

        Ok(SheetReport {
            index: plan.index,
            slots,
        })
    }
}
