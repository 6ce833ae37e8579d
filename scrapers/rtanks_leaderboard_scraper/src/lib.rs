pub mod bot;
pub mod config;
pub mod countdown;
pub mod error;
pub mod fetcher;
pub mod leaderboard_scraper;
pub mod logging;
pub mod pagination;
pub mod player_row;
pub mod scheduler;
pub mod section;
pub mod types;
pub mod utils;
pub mod web;

pub use config::ScraperConfig;
pub use error::ScrapeError;
pub use leaderboard_scraper::LeaderboardScraper;
pub use types::{Category, LeaderboardSnapshot, PlayerRecord};
