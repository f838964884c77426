use bloomscope::prelude::*;
use bloomscope::{Command, DatasetCatalog, VisibleStats};
use bloomscope_cli::{DatasetSource, TokioScheduler, load_config, load_records};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON or TOML engine configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Named dataset from the configuration
    #[arg(short, long, conflicts_with_all = ["file", "url"])]
    dataset: Option<String>,

    /// Local GeoJSON file
    #[arg(short, long, conflicts_with = "url")]
    file: Option<PathBuf>,

    /// GeoJSON URL
    #[arg(short, long)]
    url: Option<String>,

    /// Start playback in this direction after loading
    #[arg(long, value_enum)]
    play: Option<PlayArg>,

    /// Override the playback period in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Restrict to these families
    #[arg(long = "family")]
    families: Vec<String>,

    /// Restrict to these genera
    #[arg(long = "genus")]
    genera: Vec<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PlayArg {
    Forward,
    Backward,
}

impl From<PlayArg> for Direction {
    fn from(arg: PlayArg) -> Self {
        match arg {
            PlayArg::Forward => Direction::Forward,
            PlayArg::Backward => Direction::Backward,
        }
    }
}

impl Args {
    fn dataset_source(&self) -> DatasetSource {
        if let Some(path) = &self.file {
            DatasetSource::File(path.clone())
        } else if let Some(url) = &self.url {
            DatasetSource::Url(url.clone())
        } else {
            let name = self
                .dataset
                .clone()
                .unwrap_or_else(|| "flowering_sites".to_string());
            DatasetSource::Named(name)
        }
    }
}

fn log_frame(frame: &RenderFrame) {
    let indicator = if frame.is_prediction_set { " (predictions)" } else { "" };
    info!(
        "{}{}: {} points, mode {:?}",
        frame.controls.label.as_deref().unwrap_or("no data"),
        indicator,
        frame.points.len(),
        frame.display_mode
    );
}

fn log_stats(_: &[Record], stats: &VisibleStats) {
    if stats.is_empty() {
        return;
    }
    let top: Vec<String> = stats
        .per_family
        .iter()
        .take(3)
        .map(|(family, count)| format!("{family}={count}"))
        .collect();
    info!(
        "{} records, {} families, {} genera, top: {}",
        stats.record_count,
        stats.family_count,
        stats.genus_count,
        top.join(", ")
    );
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bloomscope=info,bloomscope_cli=info,info".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    if let Some(ms) = args.interval_ms {
        anyhow::ensure!(ms > 0, "--interval-ms must be greater than zero");
        config = config.with_playback_interval(Duration::from_millis(ms));
    }
    info!(
        "Datasets available: {:?}",
        DatasetCatalog::from_config(&config).names().collect::<Vec<_>>()
    );

    let (scheduler, mut ticks) = TokioScheduler::new();
    let mut session = SessionBuilder::new()
        .config(config.clone())
        .renderer(log_frame)
        .metrics_sink(log_stats)
        .build(scheduler)?;

    let source = args.dataset_source();
    let records = match load_records(&source, &config).await {
        Ok(ingested) => ingested.into_dataset(),
        Err(e) => {
            warn!("Failed to load {:?}: {}", source, e);
            return Ok(());
        }
    };
    match records.and_then(|records| session.load_dataset(records)) {
        Ok(count) => info!("Loaded {} records from {:?}", count, source),
        Err(e) => {
            warn!("Dataset {:?} is not usable: {}", source, e);
            return Ok(());
        }
    }

    if !args.families.is_empty() {
        session.dispatch(Command::SelectFamilies(args.families.clone()))?;
    }
    if !args.genera.is_empty() {
        session.dispatch(Command::SelectGenera(args.genera.clone()))?;
    }

    let Some(direction) = args.play.map(Direction::from) else {
        return Ok(());
    };
    session.dispatch(Command::Play(direction))?;

    while session.timeline().is_playing() {
        tokio::select! {
            tick = ticks.recv() => match tick {
                Some(timer) => {
                    session.dispatch(Command::Tick(timer))?;
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                session.dispatch(Command::Pause)?;
            }
        }
    }

    let view = session.view();
    info!(
        "Playback finished at {} after {} views",
        view.controls().label.as_deref().unwrap_or("-"),
        view.revision
    );
    Ok(())
}
