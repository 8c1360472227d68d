use anyhow::Context;
use axum::Router;
use meet::{GlobalState, SnapshotRepository};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod authority;
mod config;
mod dto;
mod error;
mod features;
mod socket;

use authority::{Authority, AuthorityHandle};
use config::Config;
use features::{lifting, results, state};

#[derive(OpenApi)]
#[openapi(
    paths(
        state::handlers::health,
        state::handlers::get_state,
        state::handlers::load_state,
        state::handlers::dispatch_action,
        lifting::handlers::get_lifting_order,
        lifting::handlers::get_bar_load,
        results::handlers::get_results,
    ),
    components(
        schemas(
            dto::state::HealthResponse,
            dto::state::LoadSummary,
            dto::state::ActionRequest,
            dto::state::ActionResponse,
            dto::lifting::LifterInfo,
            dto::lifting::LiftingOrderResponse,
            dto::lifting::PlateInfo,
            dto::lifting::BarLoadResponse,
            dto::results::PlacedEntry,
            dto::results::CategoryResultsResponse,
            dto::results::ResultsResponse,
        )
    ),
    tags(
        (name = "state", description = "Whole-meet snapshot and action endpoints"),
        (name = "lifting", description = "Platform views derived from the current group"),
        (name = "results", description = "Placings by category"),
    )
)]
struct ApiDoc;

fn app(authority: AuthorityHandle) -> Router {
    Router::new()
        .merge(state::routes::health_routes())
        .merge(socket::routes())
        .nest("/api", state::routes::routes())
        .nest("/api/lifting", lifting::routes::routes())
        .nest("/api/results", results::routes::routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(authority)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting meet authority");

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded successfully");

    let repository = config.snapshot_path.clone().map(SnapshotRepository::new);
    let initial = match &repository {
        Some(repo) if repo.exists().await.context("Failed to inspect save file")? => {
            tracing::info!("Loading meet from {}", repo.path().display());
            let (state, report) = repo
                .load()
                .await
                .with_context(|| format!("Failed to load {}", repo.path().display()))?;
            report.log_warnings();
            tracing::info!(
                "Loaded meet '{}' with {} entries",
                state.meet.name,
                state.registration.entries.len()
            );
            state
        }
        Some(repo) => {
            tracing::info!("No save file at {}, starting empty", repo.path().display());
            GlobalState::default()
        }
        None => {
            tracing::warn!("SNAPSHOT_PATH is not set; the meet will not be saved");
            GlobalState::default()
        }
    };

    let (authority, authority_task) =
        Authority::spawn(initial, repository, config.broadcast_capacity);

    let bind_address = config.bind_address();
    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!("Replicas connect to ws://{}/socket", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    axum::serve(listener, app(authority))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    authority_task.abort();
    Ok(())
}
