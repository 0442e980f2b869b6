use anyhow::Context;
use clap::Parser;
use fuzzyjoin::{join_datasets, Dataset, JoinConfig};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Approximate equi-joins over tabular datasets
#[derive(Parser, Debug)]
#[command(name = "fuzzyjoin")]
#[command(about = "Join two tabular datasets on approximately matching columns", long_about = None)]
struct Args {
    /// Left dataset (JSON)
    #[arg(long)]
    left: PathBuf,

    /// Right dataset (JSON)
    #[arg(long)]
    right: PathBuf,

    /// Join parameters (JSON)
    #[arg(short, long)]
    config: PathBuf,

    /// Resource id of the left table; defaults to the main resource
    #[arg(long)]
    left_resource: Option<String>,

    /// Resource id of the right table; defaults to the main resource
    #[arg(long)]
    right_resource: Option<String>,

    /// Output file; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Serialize)]
struct Output<'a> {
    resource_id: &'a str,
    vector_columns: &'a [String],
    dataset: &'a Dataset,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Logs go to stderr so the joined dataset can be piped from stdout
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting fuzzyjoin v{}", env!("CARGO_PKG_VERSION"));

    let left = Dataset::from_path(&args.left)
        .with_context(|| format!("loading left dataset {:?}", args.left))?;
    let right = Dataset::from_path(&args.right)
        .with_context(|| format!("loading right dataset {:?}", args.right))?;

    let config_text = std::fs::read_to_string(&args.config)
        .with_context(|| format!("reading join config {:?}", args.config))?;
    let config: JoinConfig = serde_json::from_str(&config_text)?;
    let spec = config.validate()?;

    let joined = join_datasets(
        &left,
        args.left_resource.as_deref(),
        &right,
        args.right_resource.as_deref(),
        &spec,
    )?;

    let output = Output {
        resource_id: &joined.resource_id,
        vector_columns: &joined.vector_columns,
        dataset: &joined.dataset,
    };
    let json = serde_json::to_string_pretty(&output)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("writing output {:?}", path))?;
            info!("Joined dataset written to {:?}", path);
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", json)?;
        }
    }

    Ok(())
}
