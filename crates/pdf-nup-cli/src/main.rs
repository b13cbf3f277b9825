mod logger;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{info, warn};
use logger::CliLogger;
use pdf_nup::{ItemsPerSheet, MergeOptions, MergeStatistics, Pipeline};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pdfnup", about = "Place several PDFs onto shared sheets", version)]
struct Cli {
    /// Load options from a JSON file; flags override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge two or more PDFs onto n-up sheets
    Merge {
        /// Input PDF files, in placement order
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Output PDF file, or directory for a generated name
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        layout: LayoutArgs,

        /// Show statistics only, don't generate PDF
        #[arg(long)]
        stats_only: bool,
    },

    /// Compose a preview from one or more PDFs
    Preview {
        /// Input PDF files, in placement order
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Directory for the preview files
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Also write one PNG per sheet
        #[arg(long)]
        png: bool,

        #[command(flatten)]
        layout: LayoutArgs,
    },
}

#[derive(Args)]
struct LayoutArgs {
    /// Output paper size
    #[arg(long, value_enum)]
    paper: Option<PaperArg>,

    /// Sheet orientation
    #[arg(long, value_enum)]
    layout: Option<LayoutArg>,

    /// Items per sheet (1-20); out-of-range values become 8
    #[arg(long, allow_negative_numbers = true)]
    per_sheet: Option<i64>,

    /// Margin around the grid in points
    #[arg(long)]
    margin: Option<f32>,

    /// Gap between slots in points
    #[arg(long)]
    gap: Option<f32>,

    /// Resolution for rasterized items
    #[arg(long)]
    dpi: Option<f32>,

    /// Upper bound on raster render scale
    #[arg(long)]
    max_scale: Option<f32>,
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A4,
    Letter,
    Legal,
    A3,
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    Horizontal,
    Vertical,
}

impl From<PaperArg> for pdf_nup::PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A4 => Self::A4,
            PaperArg::Letter => Self::Letter,
            PaperArg::Legal => Self::Legal,
            PaperArg::A3 => Self::A3,
        }
    }
}

impl From<LayoutArg> for pdf_nup::LayoutOrientation {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Horizontal => Self::Horizontal,
            LayoutArg::Vertical => Self::Vertical,
        }
    }
}

impl LayoutArgs {
    /// Apply flags on top of loaded or default options
    fn apply(&self, options: &mut MergeOptions) {
        if let Some(paper) = self.paper {
            options.paper_size = paper.into();
        }
        if let Some(layout) = self.layout {
            options.layout = layout.into();
        }
        if let Some(per_sheet) = self.per_sheet {
            let items_per_sheet = ItemsPerSheet::from_custom(per_sheet);
            if items_per_sheet.get() as i64 != per_sheet {
                warn!(
                    "Items per sheet must be between 1 and 20, using {} instead of {}",
                    items_per_sheet, per_sheet
                );
            }
            options.items_per_sheet = items_per_sheet;
        }
        if let Some(margin) = self.margin {
            options.margin_pt = margin;
        }
        if let Some(gap) = self.gap {
            options.gap_pt = gap;
        }
        if let Some(dpi) = self.dpi {
            options.raster.target_dpi = dpi;
        }
        if let Some(max_scale) = self.max_scale {
            options.raster.max_render_scale = max_scale;
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = CliLogger::for_verbosity(cli.verbose).init() {
        eprintln!("Could not install logger: {e}");
    }

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut options = match &cli.config {
        Some(path) => MergeOptions::load(path)
            .await
            .with_context(|| format!("loading {}", path.display()))?,
        None => MergeOptions::default(),
    };

    match cli.command {
        Commands::Merge {
            input,
            output,
            layout,
            stats_only,
        } => {
            layout.apply(&mut options);
            options.validate()?;

            let items = pdf_nup::load_sources(&input).await?;

            let stats = pdf_nup::calculate_statistics(items.len(), &options)?;
            print_statistics(&stats);

            if stats_only {
                return Ok(());
            }

            let pipeline = Pipeline::lopdf(&options.raster)?;
            let result = pdf_nup::merge(&pipeline, &items, &options).await?;
            if result.blank_count() > 0 {
                warn!("{} item(s) could not be rendered", result.blank_count());
            }

            let path = output_path(output.as_deref(), &options, result.sheet_count());
            pdf_nup::save_pdf(&result.bytes, &path).await?;
            println!("{}", success_message(result.sheet_count()));
            println!("Saved to {}", path.display());
        }

        Commands::Preview {
            input,
            out_dir,
            png,
            layout,
        } => {
            layout.apply(&mut options);
            options.validate()?;

            let items = pdf_nup::load_sources(&input).await?;
            let pipeline = Pipeline::lopdf(&options.raster)?;

            let result = pdf_nup::generate_preview(&pipeline, &items, &options).await?;
            let name = format!(
                "preview-{}",
                pdf_nup::artifact_file_name(&options, result.sheet_count(), &timestamp())
            );
            let path = out_dir.join(name);
            pdf_nup::save_pdf(&result.bytes, &path).await?;
            println!("Preview → {}", path.display());

            if png {
                let Some(rasterizer) = pipeline.rasterizer() else {
                    bail!("PNG previews need a rasterizer; build with the `pdfium` feature");
                };
                let sheets = pdf_nup::render_preview_images(rasterizer, &items, &options).await?;
                for (index, sheet) in sheets.iter().enumerate() {
                    let png_path = out_dir.join(format!("preview-sheet-{}.png", index + 1));
                    sheet
                        .save(&png_path)
                        .with_context(|| format!("writing {}", png_path.display()))?;
                    info!("Wrote {}", png_path.display());
                }
                println!("Wrote {} PNG preview(s)", sheets.len());
            }
        }
    }

    Ok(())
}

fn print_statistics(stats: &MergeStatistics) {
    println!("Merge Statistics:");
    println!("  Source files: {}", stats.items);
    println!("  Output pages: {}", stats.sheets);
    println!(
        "  Grid: {} x {} ({} per page)",
        stats.rows, stats.cols, stats.items_per_sheet
    );
    println!("  Files on last page: {}", stats.items_on_last_sheet);
    println!("  Empty slots on last page: {}", stats.empty_slots);
}

fn success_message(sheets: usize) -> String {
    format!("PDF successfully created with {sheets} page(s)")
}

/// ISO-8601 UTC time, filesystem safe
fn timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string()
}

/// An explicit `.pdf` path is used as-is; otherwise a generated name goes into the directory.
fn output_path(output: Option<&Path>, options: &MergeOptions, sheets: usize) -> PathBuf {
    let name = pdf_nup::artifact_file_name(options, sheets, &timestamp());
    match output {
        Some(path) if !path.is_dir() && path.extension().is_some_and(|ext| ext == "pdf") => {
            path.to_path_buf()
        }
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}
