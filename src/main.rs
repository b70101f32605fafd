use anyhow::Context;
use drivetunes::api::{router, AppState};
use drivetunes::dashboard::Dashboard;
use drivetunes::poll::{source_for, spawn_poller};
use drivetunes::storage::{GpsStore, MemStorage};
use drivetunes::utils::{config::AppConfig, logging};
use drivetunes::vehicle::HttpVehicleClient;
use log::{info, warn};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let config = AppConfig::load().context("loading configuration")?;
    info!("DriveTunes starting on {}", config.bind_address);
    if config.vehicle.client_id.is_none() {
        warn!("DIMO_CLIENT_ID not set, shared vehicle listing is disabled");
    }
    if config.music.client_id.is_none() {
        warn!("SPOTIFY_CLIENT_ID not set, music connection is disabled");
    }

    let store: Arc<dyn GpsStore> = Arc::new(MemStorage::new());
    let (dashboard, dashboard_task) = Dashboard::new().spawn();

    let poller = config.poll.interval().map(|interval| {
        let source = source_for(config.poll.source, Arc::clone(&store));
        spawn_poller(source, dashboard.signals().clone(), interval)
    });

    let vehicles = HttpVehicleClient::new(&config.vehicle).context("building vehicle client")?;
    let bind_address = config.bind_address.clone();
    let state = AppState::new(config, store, dashboard, vehicles).context("building application state")?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("binding {}", bind_address))?;
    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown requested");
        })
        .await
        .context("serving HTTP")?;

    // Dropping the router released every signal sender except the poller's
    if let Some(poller) = poller {
        poller.abort();
    }
    let _ = dashboard_task.await;
    info!("DriveTunes stopped");
    Ok(())
}
