use anyhow::{Context, Result};
use dotenv::dotenv;
use std::sync::{mpsc, Arc, Mutex};
use tokio::sync::oneshot;
use tracing::{error, info};

use rtanks_leaderboard_scraper::{
    logging,
    scheduler::{LogPublisher, Scheduler, SnapshotStore},
    web::{self, AppState},
    LeaderboardScraper, ScraperConfig,
};

fn main() -> Result<()> {
    dotenv().ok();
    logging::init();

    let config = ScraperConfig::from_env();
    info!(
        "Scraping {} every {}s",
        config.scraping.base_url, config.publish.scrape_interval_secs
    );

    let snapshots = SnapshotStore::new();
    let scraper = LeaderboardScraper::new(config.clone())?;
    let (stop_tx, stop_rx) = mpsc::channel();
    let scheduler = Scheduler::new(scraper)
        .with_publisher(snapshots.clone())
        .with_publisher(LogPublisher)
        .spawn(stop_rx);

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let shutdown_tx = Mutex::new(Some(shutdown_tx));
    ctrlc::set_handler(move || {
        info!("Shutting down");
        let _ = stop_tx.send(());
        if let Some(tx) = shutdown_tx.lock().ok().and_then(|mut tx| tx.take()) {
            let _ = tx.send(());
        }
    })
    .context("Failed to install Ctrl-C handler")?;

    let state = AppState {
        snapshots,
        config: Arc::new(config),
    };
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(web::serve(state, shutdown_rx))?;

    // The scrape thread exits after its current cycle.
    if scheduler.join().is_err() {
        error!("Scheduler thread panicked");
    }
    Ok(())
}
