use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rvstats_core::config::{Settings, StatsOptions};
use rvstats_core::domain::stats::{PopularWindows, RecentPurchase, SpendingSeries, StockEvent};
use rvstats_core::service;
use rvstats_core::storage::postgres::PgStatsStore;
use rvstats_core::storage::StatsStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let opts = StatsOptions::from_env()?;

    let store: Option<Arc<dyn StatsStore>> = match settings.require_database_url() {
        Ok(db_url) => match PgStatsStore::connect(db_url).await {
            Ok(store) => {
                tracing::info!(store = store.store_name(), "stats store connected");
                Some(Arc::new(store))
            }
            Err(e) => {
                sentry_anyhow::capture_anyhow(&e);
                tracing::error!(error = %e, "db connect failed; starting API in degraded mode");
                None
            }
        },
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %e, "DATABASE_URL missing; starting API in degraded mode");
            None
        }
    };

    let app = router(AppState {
        store,
        opts: Arc::new(opts),
    });

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/spending", get(get_spending))
        .route("/api/popular", get(get_popular))
        .route("/api/recent", get(get_recent))
        .route("/api/stocked", get(get_stocked))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Clone)]
struct AppState {
    store: Option<Arc<dyn StatsStore>>,
    opts: Arc<StatsOptions>,
}

impl AppState {
    fn store(&self) -> Result<&dyn StatsStore, StatusCode> {
        self.store
            .as_deref()
            .ok_or(StatusCode::SERVICE_UNAVAILABLE)
    }
}

fn query_failed(view: &'static str) -> impl FnOnce(anyhow::Error) -> StatusCode {
    move |e| {
        sentry_anyhow::capture_anyhow(&e);
        tracing::error!(view, error = %e, "stats query failed");
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

async fn get_spending(State(state): State<AppState>) -> Result<Json<SpendingSeries>, StatusCode> {
    let store = state.store()?;
    let series = service::spending(store, &state.opts)
        .await
        .map_err(query_failed("spending"))?;
    Ok(Json(series))
}

async fn get_popular(State(state): State<AppState>) -> Result<Json<PopularWindows>, StatusCode> {
    let store = state.store()?;
    let windows = service::popular(store, &state.opts)
        .await
        .map_err(query_failed("popular"))?;
    Ok(Json(windows))
}

async fn get_recent(
    State(state): State<AppState>,
) -> Result<Json<Vec<RecentPurchase>>, StatusCode> {
    let store = state.store()?;
    let purchases = service::recent(store, &state.opts)
        .await
        .map_err(query_failed("recent"))?;
    Ok(Json(purchases))
}

async fn get_stocked(State(state): State<AppState>) -> Result<Json<Vec<StockEvent>>, StatusCode> {
    let store = state.store()?;
    let events = service::stocked(store, &state.opts)
        .await
        .map_err(query_failed("stocked"))?;
    Ok(Json(events))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
