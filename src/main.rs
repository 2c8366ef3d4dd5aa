use chrono::Local;
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use unitable::config::Config;
use unitable::error::{config_error, Error};
use unitable::extract::{extract_each, GeminiExtractor, ScheduleDocument};
use unitable::store::{FileStore, UsageStore};
use unitable::timetable::{filter, ics, merge, parser, sheet};

/// Generate a personalized weekly timetable from AI-extracted schedule text
#[derive(Parser, Debug)]
#[command(name = "unitable", version, about)]
struct Cli {
    /// Comma-separated course codes to keep (e.g. "PE302, HU302, E1")
    #[arg(short, long)]
    courses: String,

    /// Lab/practical group identifier (e.g. "G3")
    #[arg(short, long)]
    group: String,

    /// Timetable images to run through AI extraction (repeatable)
    #[arg(short, long)]
    image: Vec<PathBuf>,

    /// Pre-extracted text or JSON file, used instead of (or alongside) images
    #[arg(short, long)]
    text: Option<PathBuf>,

    /// Directory the exports are written into
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    init_logging()?;

    let cli = Cli::parse();
    let config = Config::load()?;

    // Usage bookkeeping lives outside the pipeline
    let store = FileStore::open(&config.state_file)?;
    let visits = store.record_visit().await?;
    if !store.first_visit_seen().await? {
        info!("Welcome! Exports will land in {}", cli.out_dir.display());
        store.mark_first_visit_seen().await?;
    }
    debug!("Run number {}", visits);

    // Gather raw extraction text from the given file and/or the AI service
    let mut raw_texts = Vec::new();
    if let Some(path) = &cli.text {
        raw_texts.push(std::fs::read_to_string(path).map_err(Error::from)?);
    }
    if !cli.image.is_empty() {
        let extractor = GeminiExtractor::from_config(&config)?;
        let docs = cli
            .image
            .iter()
            .map(ScheduleDocument::from_path)
            .collect::<Result<Vec<_>, _>>()?;
        raw_texts.extend(extract_each(&extractor, &docs).await);
    }
    if raw_texts.is_empty() {
        return Err(config_error("No input: pass --text and/or --image").into());
    }

    // Parse, filter, merge
    let mut slots = Vec::new();
    for text in &raw_texts {
        slots.extend(parser::parse(text));
    }
    info!("Extracted {} raw time slots", slots.len());

    let grid = filter::filter_timetable(&slots, &cli.courses, &cli.group);
    if grid.is_empty() {
        warn!("No classes matched the given courses and group");
    } else {
        info!("Kept {} occupied grid cells", grid.occupied_cells());
    }
    let blocks = merge::merge_grid(&grid);

    // Write exports
    if !cli.out_dir.exists() {
        std::fs::create_dir_all(&cli.out_dir).map_err(Error::from)?;
    }

    let calendar = ics::build_calendar(&blocks, Local::now().naive_local(), &cli.courses);
    let ics_path = cli.out_dir.join(sheet::calendar_filename(&cli.group));
    std::fs::write(&ics_path, calendar).map_err(Error::from)?;
    info!("Wrote {}", ics_path.display());

    let rows = sheet::to_rows(&grid);
    let csv_path = cli
        .out_dir
        .join(format!("Timetable_{}.csv", cli.group.trim().to_uppercase()));
    sheet::write_csv(&rows, &csv_path)?;
    info!("Wrote {}", csv_path.display());

    Ok(())
}

/// Initialize logging with environment-based configuration
fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}
