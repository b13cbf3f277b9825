use crate::layout::grid_dimensions;
use crate::options::MergeOptions;
use crate::paginate::sheet_count;
use crate::types::*;

/// Calculate statistics for a merge of `item_count` items
pub fn calculate_statistics(item_count: usize, options: &MergeOptions) -> Result<MergeStatistics> {
    if item_count == 0 {
        return Err(NupError::InvalidArgument("no PDF files selected".to_string()));
    }

    let per_sheet = options.items_per_sheet.get();
    let (rows, cols) = grid_dimensions(per_sheet);
    let sheets = sheet_count(item_count, options.items_per_sheet);

    let items_on_last_sheet = match item_count % per_sheet {
        0 => per_sheet,
        rest => rest,
    };

    Ok(MergeStatistics {
        items: item_count,
        sheets,
        items_per_sheet: per_sheet,
        rows,
        cols,
        items_on_last_sheet,
        empty_slots: per_sheet - items_on_last_sheet,
    })
}
