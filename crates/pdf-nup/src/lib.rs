mod assemble;
mod compose;
pub mod constants;
mod io;
pub mod layout;
mod merge;
mod options;
mod output;
mod paginate;
mod preview;
pub mod render;
mod session;
mod source;
mod stats;
mod types;

pub use assemble::{AssembledDocument, OutputAssembler};
pub use compose::{ItemOutcome, PageCompositor, SheetPlan, SheetReport, SlotReport};
pub use io::{artifact_file_name, load_source, load_sources, save_pdf};
pub use merge::{Pipeline, compose_sync, merge};
pub use options::*;
pub use output::{EmbeddedPage, OutputDocument, SheetId};
pub use paginate::{paginate, sheet_count};
pub use preview::{generate_preview, preview_images_sync, render_preview_images};
pub use session::MergeSession;
pub use source::{DocumentSource, LopdfSource, SourceItem, SourcePage};
pub use stats::calculate_statistics;
pub use types::*;
