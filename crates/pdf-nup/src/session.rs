//! Ordered selection of source items plus the options to merge them with

use crate::assemble::AssembledDocument;
use crate::constants::MIN_MERGE_ITEMS;
use crate::merge::{Pipeline, merge};
use crate::options::MergeOptions;
use crate::preview::generate_preview;
use crate::source::SourceItem;
use crate::stats::calculate_statistics;
use crate::types::*;

/// State for one merge request.
#[derive(Debug, Clone, Default)]
pub struct MergeSession {
    items: Vec<SourceItem>,
    pub options: MergeOptions,
}

impl MergeSession {
    pub fn new(options: MergeOptions) -> Self {
        Self {
            items: Vec::new(),
            options,
        }
    }

    pub fn items(&self) -> &[SourceItem] {
        &self.items
    }

    pub fn add(&mut self, item: SourceItem) {
        self.items.push(item);
    }

    pub fn remove(&mut self, index: usize) -> Option<SourceItem> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Move the item at `from` so it ends up at `to`
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.items.len();
        if from >= len || to >= len {
            return Err(NupError::InvalidArgument(format!(
                "cannot move item {from} to {to} in a list of {len}"
            )));
        }
        let item = self.items.remove(from);
        self.items.insert(to, item);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn can_merge(&self) -> bool {
        self.items.len() >= MIN_MERGE_ITEMS
    }

    pub fn stats(&self) -> Result<MergeStatistics> {
        calculate_statistics(self.items.len(), &self.options)
    }

    pub async fn preview(&self, pipeline: &Pipeline) -> Result<AssembledDocument> {
        generate_preview(pipeline, &self.items, &self.options).await
    }

    pub async fn merge(&self, pipeline: &Pipeline) -> Result<AssembledDocument> {
        merge(pipeline, &self.items, &self.options).await
    }
}
