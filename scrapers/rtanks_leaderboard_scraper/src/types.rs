use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};

use crate::error::ScrapeError;

/// One of the four ranked metrics published on the ratings page.
///
/// Declaration order is the order categories appear on the page and the
/// order they are published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Experience,
    Crystals,
    Golds,
    Kills,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Experience,
        Category::Crystals,
        Category::Golds,
        Category::Kills,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Experience => "experience",
            Category::Crystals => "crystals",
            Category::Golds => "golds",
            Category::Kills => "kills",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ScrapeError;

    /// Exact, lowercase ids only.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ScrapeError::UnknownCategory(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub rank: u32,
    pub name: String,
    pub score: u64,
    pub score_formatted: String,
    pub rank_icon: Option<String>,
    pub category: Category,
}

/// Result of one scrape cycle: every configured category from a single fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardSnapshot {
    pub categories: BTreeMap<Category, Vec<PlayerRecord>>,
    pub countdown: Option<String>,
    pub scraped_at: DateTime<Utc>,
}

impl LeaderboardSnapshot {
    pub fn records(&self, category: Category) -> &[PlayerRecord] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn total_players(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_str() {
        assert_eq!("kills".parse::<Category>().unwrap(), Category::Kills);
        assert!(" crystals ".parse::<Category>().is_err());
        assert!("KILLS".parse::<Category>().is_err());
        assert!(matches!(
            "deaths".parse::<Category>(),
            Err(ScrapeError::UnknownCategory(id)) if id == "deaths"
        ));
    }

    #[test]
    fn test_category_order_matches_page_order() {
        let mut sorted = Category::ALL;
        sorted.sort();
        assert_eq!(sorted, Category::ALL);
    }

    #[test]
    fn test_record_serializes_category_as_id() {
        let record = PlayerRecord {
            rank: 1,
            name: "Tanker".to_string(),
            score: 12345,
            score_formatted: "12 345".to_string(),
            rank_icon: None,
            category: Category::Golds,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["category"], "golds");
        assert_eq!(json["score"], 12345);
    }
}
