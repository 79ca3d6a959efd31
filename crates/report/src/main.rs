use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rvstats_core::config::{Settings, StatsOptions};
use rvstats_core::service;
use rvstats_core::storage::postgres::PgStatsStore;
use rvstats_core::storage::StatsStore;
use rvstats_core::time::window::Window;

mod render;

#[derive(Debug, Parser)]
#[command(name = "rvstats_report")]
struct Args {
    /// Print the raw view payload as JSON instead of a text rendering.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    view: View,
}

#[derive(Debug, Subcommand)]
enum View {
    /// Purchases per hour.
    Spending {
        /// Number of most recent days to render (text output only).
        #[arg(long, default_value_t = 5)]
        days: usize,
    },
    /// Most popular items of one window.
    Popular {
        #[arg(long, default_value = "week")]
        window: Window,
    },
    /// Most recent public purchases.
    Recent,
    /// Most recently restocked items.
    Stocked,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    let opts = StatsOptions::from_env()?;

    let store = PgStatsStore::connect(settings.require_database_url()?).await?;
    tracing::debug!(store = store.store_name(), view = ?args.view, "running report");

    match run(&store, &opts, &args).await {
        Ok(out) => {
            println!("{out}");
            Ok(())
        }
        Err(err) => {
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(error = %err, "report failed");
            Err(err)
        }
    }
}

async fn run(store: &dyn StatsStore, opts: &StatsOptions, args: &Args) -> anyhow::Result<String> {
    let out = match &args.view {
        View::Spending { days } => {
            let series = service::spending(store, opts).await?;
            if args.json {
                serde_json::to_string_pretty(&series)?
            } else {
                render::spending(&series, *days)
            }
        }
        View::Popular { window } => {
            let now = store.now().await?;
            let entries = service::popular_window(store, opts, *window, now).await?;
            if args.json {
                serde_json::to_string_pretty(&entries)?
            } else {
                render::popular(*window, &entries)
            }
        }
        View::Recent => {
            let purchases = service::recent(store, opts).await?;
            if args.json {
                serde_json::to_string_pretty(&purchases)?
            } else {
                render::recent(&purchases)
            }
        }
        View::Stocked => {
            let now = store.now().await?;
            let events = service::stocked(store, opts).await?;
            if args.json {
                serde_json::to_string_pretty(&events)?
            } else {
                render::stocked(&events, now)
            }
        }
    };
    Ok(out)
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
