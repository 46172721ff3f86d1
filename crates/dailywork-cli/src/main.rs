//! dailywork: command-line client for the daily-work RFI workflow.
//!
//! Works on a JSON snapshot of the daily-works page props. Set DAILYWORK_API_URL
//! (or API_URL) and optionally DAILYWORK_API_TOKEN for Bearer auth.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use dailywork_api_client::ApiClient;
use dailywork_cli::{format_table, init_tracing, load_snapshot, save_snapshot};
use dailywork_core::models::{FieldChange, WorkId, WorkStatus};
use dailywork_core::{DailyWorksPage, SharedStore, WorkStore, WorkflowConfig, WorkflowError};
use dailywork_processing::{DocumentSource, PageSize, PathSource, PdfAssembler, PromptSource};
use dailywork_services::{DailyWorkService, DocumentPipeline, Notice};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "dailywork", about = "Daily-work RFI workflow CLI")]
struct Cli {
    /// Daily-works page snapshot (JSON page props)
    #[arg(long, global = true, default_value = "daily_works.json")]
    snapshot: PathBuf,

    /// PDF page box: each page sized to its image, or all pages to the first image
    #[arg(long, global = true, value_enum, default_value_t = PageSizeArg::Each)]
    page_size: PageSizeArg,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum PageSizeArg {
    Each,
    First,
}

impl From<PageSizeArg> for PageSize {
    fn from(arg: PageSizeArg) -> Self {
        match arg {
            PageSizeArg::Each => PageSize::MatchEach,
            PageSizeArg::First => PageSize::MatchFirst,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List the daily works in the snapshot
    Show {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Change the status of a daily work. Completing non-structure work needs images.
    Status {
        /// Daily work id
        id: WorkId,
        /// new, resubmission, completed or emergency
        status: WorkStatus,
        /// Image for the RFI document (repeat for more pages, in order)
        #[arg(long = "image")]
        images: Vec<PathBuf>,
        /// Ask for image paths interactively instead
        #[arg(long, conflicts_with = "images")]
        prompt: bool,
    },
    /// Update any inline-editable field (status, assigned, incharge, completion_time,
    /// rfi_submission_date, inspection_details). Use "null" or "" to clear.
    Update {
        /// Daily work id
        id: WorkId,
        /// Field key
        field: String,
        /// New value
        value: String,
        /// Image for the RFI document when the update completes the work
        #[arg(long = "image")]
        images: Vec<PathBuf>,
    },
    /// Upload an RFI document for a daily work without changing its status
    Attach {
        /// Daily work id
        id: WorkId,
        /// Images, one page each, in order
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },
    /// Build an RFI PDF locally without contacting the backend
    Assemble {
        /// Daily work number used for the file name
        #[arg(long)]
        number: String,
        /// Output directory or file path
        #[arg(long, default_value = ".")]
        out: PathBuf,
        /// Images, one page each, in order
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

fn pipeline(config: &WorkflowConfig, page_size: PageSizeArg) -> DocumentPipeline {
    let assembler = PdfAssembler::new(config.jpeg_quality)
        .with_page_size(page_size.into());
    DocumentPipeline::from_config(config)
        .with_encoder(Arc::new(assembler))
}

fn document_source(images: Vec<PathBuf>, prompt: bool) -> Box<dyn DocumentSource> {
    if prompt {
        Box::new(PromptSource::new(
            tokio::io::BufReader::new(tokio::io::stdin()),
            tokio::io::stderr(),
            "RFI images (comma separated, blank to cancel): ",
        ))
    } else {
        Box::new(PathSource::new(images))
    }
}

/// Print the outcome of a change and persist the store when something was committed.
fn settle(
    result: Result<Notice, WorkflowError>,
    snapshot: &Path,
    service: &DailyWorkService,
    page: &DailyWorksPage,
) -> anyhow::Result<()> {
    // A successful upload can be merged even when the later update fails.
    save_snapshot(snapshot, page, &service.snapshot())?;

    match result {
        Ok(notice) => print_json(&notice),
        Err(err) => match Notice::for_error(&err) {
            Some(notice) => {
                print_json(&notice)?;
                Err(anyhow::Error::new(err))
            }
            None => {
                tracing::debug!(reason = %err, "Nothing was changed");
                Ok(())
            }
        },
    }
}

fn open_service(
    config: &WorkflowConfig,
    snapshot: &Path,
    page_size: PageSizeArg,
) -> anyhow::Result<(DailyWorkService, DailyWorksPage)> {
    let page = load_snapshot(snapshot)?;
    let client = ApiClient::from_config(config)
        .context("Failed to create API client. Check DAILYWORK_API_URL (or API_URL)")?;
    let service = DailyWorkService::new(
        SharedStore::new(WorkStore::from_page(&page)),
        Arc::new(client),
        pipeline(config, page_size),
    );
    Ok((service, page))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = WorkflowConfig::from_env().context("Invalid configuration")?;

    match cli.command {
        Commands::Show { json } => {
            let (service, page) = open_service(&config, &cli.snapshot, cli.page_size)?;
            let store = service.snapshot();
            if json {
                print_json(&store.to_vec())?;
            } else {
                print!("{}", format_table(&page, &store));
            }
        }
        Commands::Status {
            id,
            status,
            images,
            prompt,
        } => {
            let (service, page) = open_service(&config, &cli.snapshot, cli.page_size)?;
            let source = document_source(images, prompt);
            let result = service.change_status(id, status, source.as_ref()).await;
            settle(result, &cli.snapshot, &service, &page)?;
        }
        Commands::Update {
            id,
            field,
            value,
            images,
        } => {
            let change = FieldChange::parse(&field, &value)?;
            let (service, page) = open_service(&config, &cli.snapshot, cli.page_size)?;
            let source = document_source(images, false);
            let result = service.change_field(id, change, source.as_ref()).await;
            settle(result, &cli.snapshot, &service, &page)?;
        }
        Commands::Attach { id, images } => {
            let (service, page) = open_service(&config, &cli.snapshot, cli.page_size)?;
            let source = PathSource::new(images);
            let result = service.attach_document(id, &source).await;
            settle(result, &cli.snapshot, &service, &page)?;
        }
        Commands::Assemble {
            number,
            out,
            images,
        } => {
            let document = pipeline(&config, cli.page_size)
                .build_document(&PathSource::new(images), &number)
                .await?;
            let target = if out.is_dir() {
                out.join(&document.file_name)
            } else {
                out
            };
            tokio::fs::write(&target, &document.data)
                .await
                .with_context(|| format!("Failed to write {}", target.display()))?;
            print_json(&serde_json::json!({
                "file": target.display().to_string(),
                "bytes": document.len(),
            }))?;
        }
    }

    Ok(())
}
