use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use telenorm::{config, pipeline};
use tokio::io::{AsyncBufRead, BufReader, BufWriter};

#[derive(Parser)]
#[command(name = "telenorm", about = "Normalize vendor security telemetry into canonical JSON events")]
struct Cli {
    /// Source identifier of the input records (e.g. hashcast, misp).
    #[arg(long, required_unless_present = "list_sources")]
    source: Option<String>,

    /// Operator rule file layered over the built-in tables.
    /// Defaults to $XDG_CONFIG_HOME/telenorm/rules.toml when it exists.
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Read JSON lines from this file instead of stdin.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Records normalized concurrently. Defaults to the available parallelism.
    #[arg(long)]
    workers: Option<usize>,

    /// Exit with an error if any record was dropped.
    #[arg(long)]
    strict: bool,

    /// Print the configured sources and their revisions, then exit.
    #[arg(long)]
    list_sources: bool,

    /// Log at debug level to stderr (RUST_LOG still takes precedence).
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let overlay = cli.rules.clone().or_else(config::default_overlay_path);
    let engine = telenorm::engine(overlay.as_deref()).context("failed to load rule sets")?;

    if cli.list_sources {
        for id in engine.source_ids() {
            let set = engine.rule_set(id)?;
            println!("{id}\t{}\t{} rules", set.revision(), set.rules().len());
        }
        return Ok(());
    }

    let source = cli.source.context("--source is required")?;
    let workers = cli
        .workers
        .unwrap_or_else(|| std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1));

    let reader: Box<dyn AsyncBufRead + Unpin + Send> = match &cli.input {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("failed to open {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };
    let writer = BufWriter::new(tokio::io::stdout());

    let summary = pipeline::run(Arc::new(engine), &source, reader, writer, workers).await?;
    tracing::info!(
        read = summary.read,
        emitted = summary.emitted,
        not_json = summary.dropped_not_json,
        missing_required = summary.dropped_missing_required,
        "done"
    );

    if cli.strict && summary.dropped() > 0 {
        anyhow::bail!("{} of {} records dropped", summary.dropped(), summary.read);
    }
    Ok(())
}
