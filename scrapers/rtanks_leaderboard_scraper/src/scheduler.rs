use std::{
    sync::{
        mpsc::{Receiver, RecvTimeoutError},
        Arc, Mutex, PoisonError,
    },
    thread::{self, JoinHandle},
    time::Duration,
};
use tracing::{info, warn};

use crate::{
    config::ScraperConfig,
    fetcher::HtmlFetcher,
    leaderboard_scraper::LeaderboardScraper,
    pagination::{page, render_page},
    types::{Category, LeaderboardSnapshot},
};

/// Somewhere a finished scrape gets posted to.
pub trait Publisher: Send {
    fn publish(&self, snapshot: &LeaderboardSnapshot, config: &ScraperConfig);
}

/// Latest snapshot, shared between the scrape thread and the web server.
#[derive(Clone, Default)]
pub struct SnapshotStore {
    latest: Arc<Mutex<Option<LeaderboardSnapshot>>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self) -> Option<LeaderboardSnapshot> {
        self.latest.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn replace(&self, snapshot: LeaderboardSnapshot) {
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = Some(snapshot);
    }
}

impl Publisher for SnapshotStore {
    fn publish(&self, snapshot: &LeaderboardSnapshot, _config: &ScraperConfig) {
        self.replace(snapshot.clone());
    }
}

/// Posts the first page of every board to the log, tagged with the
/// configured channel.
pub struct LogPublisher;

impl Publisher for LogPublisher {
    fn publish(&self, snapshot: &LeaderboardSnapshot, config: &ScraperConfig) {
        for (category, category_config) in &config.categories {
            let records = snapshot.records(*category);
            if let Some(first) = page(records, *category, 1, config.publish.players_per_page) {
                let message = render_page(&first, category_config, snapshot.countdown.as_deref());
                info!(channel_id = config.publish.channel_id, "\n{}", message);
            }
        }
    }
}

pub struct Scheduler<F: HtmlFetcher> {
    scraper: LeaderboardScraper<F>,
    interval: Duration,
    publishers: Vec<Box<dyn Publisher>>,
}

impl<F: HtmlFetcher> Scheduler<F> {
    pub fn new(scraper: LeaderboardScraper<F>) -> Self {
        let interval = Duration::from_secs(scraper.config().publish.scrape_interval_secs);
        Self {
            scraper,
            interval,
            publishers: Vec::new(),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_publisher(mut self, publisher: impl Publisher + 'static) -> Self {
        self.publishers.push(Box::new(publisher));
        self
    }

    /// One scrape, handed to every publisher.
    pub fn run_cycle(&self) -> LeaderboardSnapshot {
        let snapshot = self.scraper.scrape_snapshot();
        let empty: Vec<Category> = snapshot
            .categories
            .iter()
            .filter(|(_, records)| records.is_empty())
            .map(|(category, _)| *category)
            .collect();
        if !empty.is_empty() {
            warn!("Scrape returned no players for {:?}", empty);
        }
        info!("Scraped {} players across {} leaderboards", snapshot.total_players(), snapshot.categories.len());

        for publisher in &self.publishers {
            publisher.publish(&snapshot, self.scraper.config());
        }
        snapshot
    }

    /// Scrapes immediately, then once per interval until `stop` fires or its
    /// sender is dropped. A scrape in progress always runs to completion.
    pub fn run(&self, stop: &Receiver<()>) {
        loop {
            self.run_cycle();
            match stop.recv_timeout(self.interval) {
                Err(RecvTimeoutError::Timeout) => continue,
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                    info!("Scheduler stopping");
                    break;
                }
            }
        }
    }
}

impl<F: HtmlFetcher + Send + 'static> Scheduler<F> {
    pub fn spawn(self, stop: Receiver<()>) -> JoinHandle<()> {
        thread::spawn(move || self.run(&stop))
    }
}
