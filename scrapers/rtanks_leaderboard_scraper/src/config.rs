use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, env, str::FromStr};
use tracing::warn;

use crate::types::Category;

pub const DEFAULT_BASE_URL: &str = "https://ratings.ranked-rtanks.online";
pub const MAX_PLAYERS: usize = 100;
pub const PLAYERS_PER_PAGE: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryConfig {
    pub display_name: String,
    pub description: String,
    /// Position of this category's table among all tables on the page.
    pub section_index: usize,
}

impl CategoryConfig {
    fn new(display_name: &str, description: &str, section_index: usize) -> Self {
        Self {
            display_name: display_name.to_string(),
            description: description.to_string(),
            section_index,
        }
    }
}

pub type CategoryTable = BTreeMap<Category, CategoryConfig>;

pub fn default_categories() -> CategoryTable {
    BTreeMap::from([
        (
            Category::Experience,
            CategoryConfig::new("Experience Leaderboard", "Top-100 players by earned experience", 0),
        ),
        (
            Category::Crystals,
            CategoryConfig::new("Crystals Leaderboard", "Top-100 players by earned crystals", 1),
        ),
        (
            Category::Golds,
            CategoryConfig::new("Golds Leaderboard", "Top-100 players by caught golds", 2),
        ),
        (
            Category::Kills,
            CategoryConfig::new("Kills Leaderboard", "Top-100 players by kills", 3),
        ),
    ])
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScrapingConfig {
    pub base_url: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub max_players: usize,
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string(),
            request_timeout_secs: 10,
            max_players: MAX_PLAYERS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublishConfig {
    pub channel_id: u64,
    pub scrape_interval_secs: u64,
    pub players_per_page: usize,
    pub port: u16,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            channel_id: 0,
            scrape_interval_secs: 3600,
            players_per_page: PLAYERS_PER_PAGE,
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScraperConfig {
    pub scraping: ScrapingConfig,
    pub publish: PublishConfig,
    pub categories: CategoryTable,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            scraping: ScrapingConfig::default(),
            publish: PublishConfig::default(),
            categories: default_categories(),
        }
    }
}

impl ScraperConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(base_url) = env::var("RTANKS_BASE_URL") {
            config.scraping.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Ok(user_agent) = env::var("SCRAPER_USER_AGENT") {
            config.scraping.user_agent = user_agent;
        }
        if let Some(timeout) = parse_env("SCRAPER_TIMEOUT_SECS") {
            config.scraping.request_timeout_secs = timeout;
        }
        if let Some(max_players) = parse_env("MAX_PLAYERS") {
            config.scraping.max_players = max_players;
        }
        if let Some(channel_id) = parse_env("CHANNEL_ID") {
            config.publish.channel_id = channel_id;
        }
        if let Some(interval) = parse_env("SCRAPE_INTERVAL_SECS") {
            config.publish.scrape_interval_secs = interval;
        }
        if let Some(per_page) = parse_env::<usize>("PLAYERS_PER_PAGE") {
            if per_page > 0 {
                config.publish.players_per_page = per_page;
            } else {
                warn!("Ignoring PLAYERS_PER_PAGE=0");
            }
        }
        if let Some(port) = parse_env("PORT") {
            config.publish.port = port;
        }

        for (category, category_config) in config.categories.iter_mut() {
            let key = format!("LEADERBOARD_SECTION_{}", category.as_str().to_uppercase());
            if let Some(index) = parse_env(&key) {
                category_config.section_index = index;
            }
        }

        config
    }

    pub fn category(&self, category: Category) -> Option<&CategoryConfig> {
        self.categories.get(&category)
    }
}

fn parse_env<T: FromStr>(key: &str) -> Option<T> {
    let value = env::var(key).ok()?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("Ignoring unparseable {}={:?}", key, value);
            None
        }
    }
}
