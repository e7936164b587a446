mod config;

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use shared::domain::{FilterKind, PointId, SortKind};
use tracing::info;
use tracing_subscriber::EnvFilter;
use trip_core::{HttpGateway, MemoryGateway, RemoteGateway, Snapshot};
use trip_presenter::{DomTree, Phase, TripPresenter};

use crate::config::{load_settings, Settings, DEFAULT_CONFIG_PATH};

#[derive(Parser, Debug)]
#[command(name = "planner", about = "Inspect and edit a trip's route points")]
struct Args {
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    authorization: Option<String>,
    /// JSON snapshot served by `--offline`.
    #[arg(long)]
    snapshot: Option<PathBuf>,
    #[arg(long)]
    offline: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the trip page.
    List {
        #[arg(long, default_value = "everything")]
        filter: FilterKind,
        #[arg(long, default_value = "day")]
        sort: SortKind,
    },
    /// Flip the favorite flag of a point.
    Favorite { id: String },
    Delete { id: String },
}

fn offline_gateway(snapshot_path: Option<&Path>) -> Result<MemoryGateway> {
    let snapshot = match snapshot_path {
        Some(path) => Snapshot::from_json_file(path)?,
        None => Snapshot::default(),
    };
    info!(points = snapshot.points.len(), "using in-memory points");
    Ok(MemoryGateway::new(snapshot))
}

fn gateway_for(settings: &Settings, offline: bool) -> Result<Arc<dyn RemoteGateway>> {
    if offline {
        let gateway = offline_gateway(settings.snapshot_path.as_deref())?;
        return Ok(Arc::new(gateway));
    }
    let url = settings.server_url()?;
    info!(%url, "using points api");
    Ok(Arc::new(HttpGateway::new(url, settings.authorization.clone())))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(&args.config)?;
    settings.apply_overrides(args.server_url, args.authorization, args.snapshot);

    let gateway = gateway_for(&settings, args.offline)?;

    let mut trip = TripPresenter::new(DomTree::new(), gateway);
    trip.init().await?;
    if trip.phase() == Phase::Error {
        print!("{}", trip.surface().render_text());
        bail!("could not load the trip");
    }

    match args.command {
        Command::List { filter, sort } => {
            trip.change_filter(filter)?;
            trip.change_sort(sort);
        }
        Command::Favorite { id } => trip.toggle_favorite(&PointId::new(id)).await?,
        Command::Delete { id } => trip.delete_point(&PointId::new(id)).await?,
    }

    print!("{}", trip.surface().render_text());
    Ok(())
}
