//! Plan a hybrid truck and drone delivery trip.
//!
//! Usage:
//!   hybrid-trip plan --request request.json [--fleet fleet.json] [--commit] [--offline]
//!   hybrid-trip replan [--index N] [--commit] [--offline]

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use hybrid_cli::report::{render_no_plan, render_trip};
use hybrid_cli::{plan_trip, Collaborators, Config, TripRequest};
use hybrid_services::{CommittedTrip, FleetRegistry, TripCommitter, TripLog};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Hybrid truck and drone trip planner")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan a trip from a request file
    Plan {
        /// Request JSON with deliveries and optional depot and drones
        #[arg(long)]
        request: PathBuf,

        #[command(flatten)]
        run: RunArgs,
    },
    /// Re-plan a committed trip from the trip log with the current fleet
    Replan {
        /// Trip log entry, 1 = oldest (default: most recent)
        #[arg(long)]
        index: Option<usize>,

        #[command(flatten)]
        run: RunArgs,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Fleet JSON file (overrides FLEET_FILE)
    #[arg(long)]
    fleet: Option<PathBuf>,

    /// Trip log file (overrides TRIP_LOG_FILE)
    #[arg(long)]
    trip_log: Option<PathBuf>,

    /// Commit the planned trip
    #[arg(long, default_value_t = false)]
    commit: bool,

    /// Skip every remote lookup
    #[arg(long, default_value_t = false)]
    offline: bool,

    /// Print the planned trip as JSON instead of a report
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // LOG_FORMAT=json switches stderr logs to JSON lines.
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json");
    tracing_subscriber::registry()
        .with(json_logs.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hybrid_cli=info".parse()?)
                .add_directive("hybrid_services=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Command::Plan { request, run } => {
            let request = TripRequest::load(&request)?;
            run_plan(&config, request, run).await
        }
        Command::Replan { index, run } => {
            let log = TripLog::new(trip_log_path(&config, &run));
            let trip = match index {
                Some(0) => anyhow::bail!("trip indexes start at 1"),
                Some(n) => log.get(n - 1).await?,
                None => log.latest().await?,
            };
            tracing::info!(
                "Re-planning trip committed at {}",
                trip.committed_at.to_rfc3339()
            );
            let deliveries = trip.plan.deliveries_for_edit();
            let request = TripRequest::from_deliveries(&deliveries, trip.plan.depot);
            run_plan(&config, request, run).await
        }
    }
}

fn trip_log_path(config: &Config, run: &RunArgs) -> PathBuf {
    run.trip_log
        .clone()
        .unwrap_or_else(|| config.trip_log_file.clone())
}

async fn run_plan(config: &Config, request: TripRequest, run: RunArgs) -> Result<()> {
    let deliveries = request.deliveries().context("invalid delivery input")?;
    let depot = request.depot_or(config.depot)?;
    let fleet_path = run.fleet.clone().unwrap_or_else(|| config.fleet_file.clone());

    // Drones listed in the request are planned against but never written back.
    let fleet = match request.drones {
        Some(drones) => FleetRegistry::from_drones(drones).context("invalid drone list")?,
        None => FleetRegistry::load(&fleet_path).await?,
    };
    let snapshot = fleet.snapshot();
    tracing::info!(
        "Planning {} deliveries against {} drones",
        deliveries.len(),
        snapshot.len()
    );

    let collaborators = if run.offline {
        Collaborators::offline()
    } else {
        Collaborators::from_config(config)
    };

    let Some(trip) = plan_trip(&deliveries, &snapshot, depot, &collaborators).await else {
        print!("{}", render_no_plan(&deliveries));
        return Ok(());
    };

    if run.json {
        let body = serde_json::json!({
            "plan": &trip.plan,
            "layout": &trip.layout,
            "prediction": &trip.prediction,
            "wind_speed_mps": trip.wind_speed_mps,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        print!("{}", render_trip(&trip));
    }

    if run.commit {
        let trips_url = if run.offline {
            None
        } else {
            config.trips_api_url.clone()
        };
        let committer = TripCommitter::new(trips_url)
            .with_client(hybrid_services::http_client(config.http_timeout));
        let log = TripLog::new(trip_log_path(config, &run));
        let suggested = trip.prediction.as_ref().and_then(|p| p.drone_id.clone());
        let record = CommittedTrip::new(trip.plan, &trip.layout, suggested);
        let index = committer
            .commit(record, &log, &fleet)
            .await
            .context("failed to commit trip")?;
        println!("\nTrip committed as entry {} in {}", index + 1, log.path().display());
        if fleet.backing_path().is_none() {
            println!("Drone list came from the request; fleet file left unchanged");
        }
    }

    Ok(())
}
