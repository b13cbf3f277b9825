//! Document I/O operations

use crate::options::MergeOptions;
use crate::source::SourceItem;
use crate::types::*;
use std::path::Path;

/// Load a single PDF file as a source item.
///
/// Files without a PDF header are rejected with [`NupError::UnsupportedFormat`].
pub async fn load_source(path: impl AsRef<Path>) -> Result<SourceItem> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let item = SourceItem::from_bytes(name, bytes);
    if !item.looks_like_pdf() {
        return Err(item.unsupported("not a PDF file"));
    }
    Ok(item)
}

/// Load multiple PDF files, preserving order
pub async fn load_sources(paths: &[impl AsRef<Path>]) -> Result<Vec<SourceItem>> {
    let mut items = Vec::with_capacity(paths.len());
    for path in paths {
        items.push(load_source(path).await?);
    }
    Ok(items)
}

/// Save the composed document
pub async fn save_pdf(bytes: &[u8], path: impl AsRef<Path>) -> Result<()> {
    tokio::fs::write(path, bytes).await?;
    Ok(())
}

/// Output file name, e.g. `merged-a4-vertical-2per-3pages-2024-01-01T12-00-00.pdf`
pub fn artifact_file_name(options: &MergeOptions, sheets: usize, timestamp: &str) -> String {
    format!(
        "merged-{}-{}-{}per-{}pages-{}.pdf",
        options.paper_size, options.layout, options.items_per_sheet, sheets, timestamp
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ItemsPerSheet, LayoutOrientation, PaperSize};

    #[test]
    fn test_artifact_file_name() {
        let options = MergeOptions {
            paper_size: PaperSize::Letter,
            layout: LayoutOrientation::Horizontal,
            items_per_sheet: ItemsPerSheet::new(4).unwrap(),
            ..Default::default()
        };
        assert_eq!(
            artifact_file_name(&options, 3, "2025-03-09T08-15-42"),
            "merged-letter-horizontal-4per-3pages-2025-03-09T08-15-42.pdf"
        );
    }
}
