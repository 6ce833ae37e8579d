use anyhow::Result;
use chrono::Utc;
use scraper::Html;
use std::collections::BTreeMap;
use tracing::{error, info, warn};

use crate::{
    config::ScraperConfig,
    countdown::extract_countdown,
    error::ScrapeError,
    fetcher::{HtmlFetcher, HttpFetcher},
    player_row::PlayerRowParser,
    section::{count_sections, locate_section},
    types::{Category, LeaderboardSnapshot, PlayerRecord},
};

/// Scrapes the ratings page.
///
/// None of the public methods fail: every problem is logged and comes back
/// as an empty (or shorter) list, or `None` for the countdown.
pub struct LeaderboardScraper<F: HtmlFetcher = HttpFetcher> {
    config: ScraperConfig,
    fetcher: F,
    rows: PlayerRowParser,
}

impl LeaderboardScraper<HttpFetcher> {
    pub fn new(config: ScraperConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config.scraping)?;
        Ok(Self::with_fetcher(config, fetcher))
    }
}

impl<F: HtmlFetcher> LeaderboardScraper<F> {
    pub fn with_fetcher(config: ScraperConfig, fetcher: F) -> Self {
        let rows = PlayerRowParser::new(&config.scraping.base_url);
        Self {
            config,
            fetcher,
            rows,
        }
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    pub fn scrape_category(&self, category_id: &str) -> Vec<PlayerRecord> {
        let category = match self.resolve_category(category_id) {
            Ok(category) => category,
            Err(e) => {
                error!("{}", e);
                return Vec::new();
            }
        };

        info!("Scraping {} leaderboard from: {}", category, self.config.scraping.base_url);
        let Some(document) = self.fetch_document() else {
            return Vec::new();
        };

        let players = self.parse_category(&document, category);
        info!("Successfully scraped {} players for {}", players.len(), category);
        players
    }

    /// Scrapes every configured category from one fetch of the page.
    pub fn scrape_all_categories(&self) -> BTreeMap<Category, Vec<PlayerRecord>> {
        info!("Scraping all leaderboards from: {}", self.config.scraping.base_url);
        match self.fetch_document() {
            Some(document) => self.parse_all_categories(&document),
            None => self.config.categories.keys().map(|c| (*c, Vec::new())).collect(),
        }
    }

    pub fn get_reset_countdown(&self) -> Option<String> {
        let document = self.fetch_document()?;
        let countdown = extract_countdown(&document);
        if countdown.is_none() {
            warn!("No reset countdown found on {}", self.config.scraping.base_url);
        }
        countdown
    }

    /// Every category plus the countdown, all from the same fetch.
    pub fn scrape_snapshot(&self) -> LeaderboardSnapshot {
        let scraped_at = Utc::now();
        match self.fetch_document() {
            Some(document) => LeaderboardSnapshot {
                categories: self.parse_all_categories(&document),
                countdown: extract_countdown(&document),
                scraped_at,
            },
            None => LeaderboardSnapshot {
                categories: self.config.categories.keys().map(|c| (*c, Vec::new())).collect(),
                countdown: None,
                scraped_at,
            },
        }
    }

    /// Pulls one category's records out of an already parsed page.
    pub fn parse_category(&self, document: &Html, category: Category) -> Vec<PlayerRecord> {
        let Some(category_config) = self.config.category(category) else {
            error!("{}", ScrapeError::UnknownCategory(category.to_string()));
            return Vec::new();
        };

        let Some(section) = locate_section(document, category_config) else {
            let e = ScrapeError::SectionNotFound {
                category: category.to_string(),
                section_index: category_config.section_index,
            };
            error!("{} (page has {} tables)", e, count_sections(document));
            return Vec::new();
        };

        let players = self
            .rows
            .extract_rows(section, category, self.config.scraping.max_players);
        if players.is_empty() {
            warn!("Table for {} had no player rows", category);
        }
        players
    }

    fn parse_all_categories(&self, document: &Html) -> BTreeMap<Category, Vec<PlayerRecord>> {
        self.config
            .categories
            .keys()
            .map(|category| {
                let players = self.parse_category(document, *category);
                info!("Successfully scraped {} players for {}", players.len(), category);
                (*category, players)
            })
            .collect()
    }

    fn resolve_category(&self, category_id: &str) -> Result<Category, ScrapeError> {
        let category: Category = category_id.parse()?;
        if self.config.category(category).is_none() {
            return Err(ScrapeError::UnknownCategory(category_id.to_string()));
        }
        Ok(category)
    }

    fn fetch_document(&self) -> Option<Html> {
        let url = &self.config.scraping.base_url;
        match self.fetcher.fetch_html(url) {
            Ok(body) => Some(Html::parse_document(&body)),
            Err(e @ ScrapeError::Transport { .. }) => {
                error!("Request error: {}", e);
                None
            }
            Err(e) => {
                error!("Failed to fetch leaderboard page: {}", e);
                None
            }
        }
    }
}
