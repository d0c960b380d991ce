mod cli;

use anyhow::Context;
use cli::Args;
use riskwatch::adapters::inbound::http::{build_router, AppState};
use riskwatch::adapters::outbound::filesystem::SnapshotStore;
use riskwatch::adapters::outbound::memory::InMemoryStore;
use riskwatch::adapters::outbound::network::{
    CachingIpReputationProvider, IpQualityScoreClient, OfflineIpReputationProvider,
};
use riskwatch::config::{self, ConfigFile, Settings};
use riskwatch::ports::outbound::IpReputationProvider;
use riskwatch::risk_assessment::policies::DeviceRiskPolicy;
use riskwatch::shared::error::ExitCode;
use riskwatch::shared::Result;
use std::process;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("\n❌ An error occurred:\n");
        eprintln!("{}", e);

        for cause in e.chain().skip(1) {
            eprintln!("\nCaused by: {}", cause);
        }

        eprintln!();
        process::exit(ExitCode::ApplicationError.as_i32());
    }
}

async fn run() -> Result<()> {
    let args = Args::parse_args();

    let config = load_config(&args)?;
    let settings = Settings::resolve(config, args.overrides())?;
    init_tracing(&settings)?;

    let snapshot_store = settings.snapshot_path.clone().map(SnapshotStore::new);
    let store = Arc::new(match &snapshot_store {
        Some(snapshots) => match snapshots.load()? {
            Some(snapshot) => {
                tracing::info!(
                    path = %snapshots.path().display(),
                    users = snapshot.users.len(),
                    companies = snapshot.companies.len(),
                    breach_events = snapshot.breach_events.len(),
                    devices = snapshot.devices.len(),
                    "Snapshot loaded"
                );
                InMemoryStore::from_snapshot(snapshot)
            }
            None => {
                tracing::info!(path = %snapshots.path().display(), "No snapshot yet, starting empty");
                InMemoryStore::new()
            }
        },
        None => InMemoryStore::new(),
    });

    let storage = match &snapshot_store {
        Some(snapshots) => format!("in-memory, snapshot at {}", snapshots.path().display()),
        None => "in-memory".to_string(),
    };

    let state = AppState::new(
        store.clone(),
        reputation_provider(&settings)?,
        settings.weights,
        DeviceRiskPolicy::new(settings.suspicious_threshold),
        storage,
    );
    let app = build_router(state, &settings.base_path);

    let bind_address = settings.bind_address();
    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    tracing::info!(
        address = %listener.local_addr().map(|a| a.to_string()).unwrap_or(bind_address),
        base_path = %settings.base_path,
        "riskwatch listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .context("HTTP server failed")?;

    if let Some(snapshots) = &snapshot_store {
        snapshots.save(&store.snapshot())?;
        tracing::info!(path = %snapshots.path().display(), "Snapshot saved");
    }
    tracing::info!("riskwatch stopped");
    Ok(())
}

/// Explicit `--config` must exist; otherwise the working directory is searched.
fn load_config(args: &Args) -> Result<ConfigFile> {
    match &args.config {
        Some(path) => config::load_config_from_path(path),
        None => {
            let cwd = std::env::current_dir().context("Failed to read current directory")?;
            Ok(config::discover_config(&cwd)?.unwrap_or_default())
        }
    }
}

fn init_tracing(settings: &Settings) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&settings.log_filter)
            .with_context(|| format!("Invalid log filter '{}'", settings.log_filter))?,
    };
    let registry = tracing_subscriber::registry().with(filter);

    let initialised = if settings.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };
    initialised.context("Failed to initialise logging")
}

fn reputation_provider(settings: &Settings) -> Result<Arc<dyn IpReputationProvider>> {
    match &settings.ipqs_api_key {
        Some(key) => {
            let client = IpQualityScoreClient::new(
                key.clone(),
                settings.ipqs_timeout,
                settings.ipqs_max_retries,
            )?;
            tracing::info!("IP reputation lookups enabled (IPQualityScore)");
            Ok(Arc::new(CachingIpReputationProvider::new(client)))
        }
        None => {
            tracing::warn!(
                "No IPQualityScore API key configured, device reputations will be UNKNOWN"
            );
            Ok(Arc::new(OfflineIpReputationProvider))
        }
    }
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = tokio::signal::ctrl_c() => {}
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Cannot listen for SIGTERM, waiting for Ctrl-C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    tracing::info!("Shutdown signal received");
}
