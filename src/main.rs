use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{eyre, Result, WrapErr};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

use wearcal::components::{ComplicationData, ComplicationKind};
use wearcal::config::Config;
use wearcal::{App, BroadcastNotifier, DataEvent, Surface, SYNC_PATH};

const LISTENER_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Parser)]
#[command(name = "wearcal", about = "Watch-side calendar sync and surfaces")]
struct Cli {
    /// Override the configured data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Deliver a sync payload (JSON file, or - for stdin)
    Ingest { file: PathBuf },
    /// Show the tile
    Tile,
    /// Show the complication
    Complication {
        #[arg(long, value_enum, default_value_t = Kind::ShortText)]
        kind: Kind,
        /// Show the editor preview instead of live data
        #[arg(long)]
        preview: bool,
    },
    /// Show the full agenda
    Agenda,
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    ShortText,
    RangedValue,
    Other,
}

impl From<Kind> for ComplicationKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::ShortText => ComplicationKind::ShortText,
            Kind::RangedValue => ComplicationKind::RangedValue,
            Kind::Other => ComplicationKind::Other,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_env("WEARCAL_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::load().unwrap_or_default();
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    let app = Arc::new(App::open(config));

    match cli.command {
        Command::Ingest { file } => ingest(app, &file).await?,
        Command::Tile => print!("{}", app.tile()),
        Command::Complication { kind, preview } => {
            let data = if preview {
                ComplicationData::preview(kind.into())
                    .ok_or_else(|| eyre!("no preview for this complication type"))?
            } else {
                app.complication(kind.into())
            };
            println!("{}", data.text());
        }
        Command::Agenda => print!("{}", app.agenda()),
    }

    Ok(())
}

/// Deliver one payload the way the transport would, and redraw each surface
/// as its refresh signal arrives.
async fn ingest(app: Arc<App>, file: &Path) -> Result<()> {
    let raw = read_payload(file)?;
    let payload: serde_json::Value =
        serde_json::from_str(&raw).wrap_err("payload is not valid JSON")?;

    let notifier = Arc::new(BroadcastNotifier::new(16));
    let mut rx = notifier.subscribe();
    let service = app.sync_service(notifier.clone());

    let listener = {
        let app = Arc::clone(&app);
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(Surface::Tile) => print!("{}", app.tile()),
                    Ok(Surface::Complication) => println!(
                        "complication: {}",
                        app.complication(ComplicationKind::ShortText).text()
                    ),
                    Err(RecvError::Lagged(n)) => tracing::warn!("missed {n} refresh signals"),
                    Err(RecvError::Closed) => break,
                }
            }
        })
    };

    // The store does blocking file I/O; keep it off the runtime thread the
    // listener is polled on. `service` drops with the closure.
    let ingested = tokio::task::spawn_blocking(move || {
        service.on_data_changed(&[DataEvent::changed(SYNC_PATH, payload)])
    })
    .await
    .wrap_err("sync ingestion panicked")?;
    drop(notifier);

    tokio::time::timeout(LISTENER_TIMEOUT, listener)
        .await
        .wrap_err("refresh listener did not finish")??;

    if ingested == 0 {
        eprintln!("Payload rejected; stored data unchanged.");
    }
    Ok(())
}

fn read_payload(file: &Path) -> Result<String> {
    if file.as_os_str() == "-" {
        let mut raw = String::new();
        std::io::stdin().read_to_string(&mut raw)?;
        return Ok(raw);
    }
    std::fs::read_to_string(file).wrap_err_with(|| format!("failed to read {}", file.display()))
}
