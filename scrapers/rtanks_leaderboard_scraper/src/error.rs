use thiserror::Error;

/// Everything that can go wrong while scraping.
///
/// These never reach callers of the scraper: each one is logged where it
/// happens and turned into an empty or partial result.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("no table found for {category} at index {section_index}")]
    SectionNotFound {
        category: String,
        section_index: usize,
    },

    #[error("malformed row: {0}")]
    MalformedRow(String),

    #[error("could not parse score: {0:?}")]
    UnparseableScore(String),
}

/// Why a chat message couldn't be turned into a [`crate::bot::BotCommand`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("not a bot command")]
    NotACommand,

    #[error("unknown category `{0}`, expected one of: experience, crystals, golds, kills")]
    UnknownCategory(String),

    #[error("`{0}` is not a page number")]
    InvalidPage(String),
}
