use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use meet::actions::{Action, OverwriteStore};
use meet::services::{ResultsType, bar_load_for, get_all_results, lifting_order_for};
use meet::{GlobalState, SnapshotRepository};
use replica::{
    ConnectionEvent, ConnectionManager, ConnectionState, ReplicaConfig, ReplicaHandle,
    WebSocketConnector,
};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "meetctl")]
#[command(about = "Replica client for a live powerlifting meet", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "MEET_URL", default_value = "ws://127.0.0.1:8080/socket")]
    url: String,

    /// Fixed delay between reconnect attempts.
    #[arg(long, default_value_t = 2)]
    reconnect_secs: u64,

    /// How long one-shot commands wait for the first resynchronization.
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Follow the platform: print the lifter and bar load after every update.
    Watch,
    /// Send one action, e.g. `dispatch SET_MEET_NAME '{"name":"Open"}'`.
    Dispatch {
        method: String,
        #[arg(default_value = "{}")]
        params: String,
    },
    /// Write the authority's current snapshot to a save file.
    Save { file: PathBuf },
    /// Replace the authority's meet with a save file.
    Load {
        file: PathBuf,

        #[arg(long)]
        validate_only: bool,
    },
    /// Print placings for every category.
    Results {
        #[arg(long)]
        projected: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("meetctl={},replica={}", log_level, log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Commands::Load {
        file,
        validate_only: true,
    } = &cli.command
    {
        let state = read_save_file(file).await?;
        tracing::info!(
            "✓ {} is valid ({} entries)",
            file.display(),
            state.registration.entries.len()
        );
        return Ok(());
    }

    let config = ReplicaConfig {
        url: cli.url.clone(),
        reconnect_delay: Duration::from_secs(cli.reconnect_secs),
    };
    let (replica, task) =
        ConnectionManager::spawn(WebSocketConnector::new(config.url.clone()), config);

    let result = match cli.command {
        Commands::Watch => watch(&replica).await,
        command => {
            wait_connected(&replica, Duration::from_secs(cli.timeout_secs), &cli.url).await?;
            run_once(&replica, command).await
        }
    };

    replica.shutdown().await;
    task.await.context("Replica task failed")?;
    result
}

async fn wait_connected(
    replica: &ReplicaHandle,
    timeout: Duration,
    url: &str,
) -> anyhow::Result<()> {
    tokio::time::timeout(timeout, replica.wait_for(ConnectionState::Connected))
        .await
        .with_context(|| format!("Timed out connecting to {}", url))??;
    Ok(())
}

async fn run_once(replica: &ReplicaHandle, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Dispatch { method, params } => {
            let params = serde_json::from_str(&params).context("PARAMS must be a JSON object")?;
            let action = Action::from_call(&method, params)?;
            replica.dispatch(action).await?;
            tracing::info!("✓ {} applied", method);
        }
        Commands::Save { file } => {
            let state = replica.fetch_state().await?;
            SnapshotRepository::new(&file)
                .save(&state)
                .await
                .with_context(|| format!("Failed to write {}", file.display()))?;
            tracing::info!(
                "✓ Saved {} entries to {}",
                state.registration.entries.len(),
                file.display()
            );
        }
        Commands::Load { file, .. } => {
            let state = read_save_file(&file).await?;
            let entries = state.registration.entries.len();
            replica
                .dispatch(Action::OverwriteStore(OverwriteStore {
                    store: Box::new(state),
                }))
                .await?;
            tracing::info!("✓ Loaded {} entries from {}", entries, file.display());
        }
        Commands::Results { projected } => {
            let results_type = if projected {
                ResultsType::Projected
            } else {
                ResultsType::Final
            };
            print_results(&replica.snapshot(), results_type);
        }
        Commands::Watch => bail!("watch is not a one-shot command"),
    }
    Ok(())
}

async fn read_save_file(file: &Path) -> anyhow::Result<GlobalState> {
    let (state, report) = SnapshotRepository::new(file)
        .load()
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    report.log_warnings();
    Ok(state)
}

async fn watch(replica: &ReplicaHandle) -> anyhow::Result<()> {
    let mut events = replica.subscribe();
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(ConnectionEvent::Connected) | Ok(ConnectionEvent::Updated) => {
                    print_platform(&replica.snapshot());
                }
                Ok(ConnectionEvent::Disconnected) => {
                    tracing::warn!("Disconnected; showing last known state");
                }
                Err(RecvError::Lagged(_)) => print_platform(&replica.snapshot()),
                Err(RecvError::Closed) => return Ok(()),
            },
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for ctrl-c")?;
                return Ok(());
            }
        }
    }
}

fn print_platform(state: &GlobalState) {
    let lifting = &state.lifting;
    let order = lifting_order_for(state);
    let header = format!(
        "Day {} Platform {} Flight {} {}",
        lifting.day, lifting.platform, lifting.flight, lifting.lift
    );

    let Some(current) = order
        .current_entry_id
        .and_then(|id| state.registration.get(id))
    else {
        println!("{}: flight complete", header);
        return;
    };

    let weight_kg = current
        .attempts(lifting.lift)
        .get(usize::from(order.attempt_one_indexed).saturating_sub(1))
        .map(|a| a.weight_kg)
        .unwrap_or_default();
    let load = bar_load_for(&state.meet, lifting.lift, weight_kg);
    let plates: Vec<String> = load.plates.iter().map(|p| p.weight_any.to_string()).collect();

    println!(
        "{}: attempt {} {} {}kg [{}]",
        header,
        order.attempt_one_indexed,
        current.name,
        weight_kg,
        plates.join(" ")
    );
    if !load.is_exact() {
        println!("  cannot load {}kg per side", load.residual_kg);
    }
    if let Some(next) = order.next_entry_id.and_then(|id| state.registration.get(id)) {
        println!("  next: {}", next.name);
    }
}

fn print_results(state: &GlobalState, results_type: ResultsType) {
    for category in get_all_results(&state.registration.entries, &state.meet, results_type) {
        println!("{}", category.category);
        for (idx, entry) in category.ordered_entries.iter().enumerate() {
            println!(
                "  {}. {} {}kg",
                idx + 1,
                entry.name,
                results_type.total_kg(entry, category.category.event)
            );
        }
    }
}
