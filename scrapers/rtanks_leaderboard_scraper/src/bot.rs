use std::str::FromStr;
use tracing::info;

use crate::{
    error::CommandError,
    fetcher::HtmlFetcher,
    leaderboard_scraper::LeaderboardScraper,
    pagination::{page, render_page, total_pages},
    types::Category,
};

pub const COMMAND_PREFIX: &str = "!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    /// `!leaderboard [category] [page]`; no category means every board.
    Leaderboard {
        category: Option<Category>,
        page: usize,
    },
    Countdown,
    Help,
}

impl FromStr for BotCommand {
    type Err = CommandError;

    fn from_str(message: &str) -> Result<Self, Self::Err> {
        let body = message
            .trim()
            .strip_prefix(COMMAND_PREFIX)
            .ok_or(CommandError::NotACommand)?;
        let mut words = body.split_whitespace();
        let name = words.next().ok_or(CommandError::NotACommand)?.to_lowercase();

        match name.as_str() {
            "leaderboard" | "lb" | "top" => {
                let mut category = None;
                let mut page = 1;
                for word in words {
                    if let Ok(number) = word.parse::<usize>() {
                        page = number;
                    } else if category.is_none() {
                        category = Some(
                            word.to_lowercase()
                                .parse::<Category>()
                                .map_err(|_| CommandError::UnknownCategory(word.to_string()))?,
                        );
                    } else {
                        return Err(CommandError::InvalidPage(word.to_string()));
                    }
                }
                if page == 0 {
                    return Err(CommandError::InvalidPage("0".to_string()));
                }
                Ok(BotCommand::Leaderboard { category, page })
            }
            "countdown" | "reset" => Ok(BotCommand::Countdown),
            "help" => Ok(BotCommand::Help),
            _ => Err(CommandError::NotACommand),
        }
    }
}

pub fn help_text() -> String {
    [
        "Commands:",
        "`!leaderboard [category] [page]` - show a leaderboard page (categories: experience, crystals, golds, kills)",
        "`!countdown` - time until the ratings reset",
        "`!help` - this message",
    ]
    .join("\n")
}

/// Runs a command against the scraper and returns the messages to post.
pub fn execute<F: HtmlFetcher>(scraper: &LeaderboardScraper<F>, command: &BotCommand) -> Vec<String> {
    match command {
        BotCommand::Help => vec![help_text()],
        BotCommand::Countdown => match scraper.get_reset_countdown() {
            Some(countdown) => vec![format!("Ratings reset in {}", countdown)],
            None => vec!["Reset countdown is unavailable right now.".to_string()],
        },
        BotCommand::Leaderboard { category, page: page_number } => {
            let config = scraper.config();
            let per_page = config.publish.players_per_page;
            let all = scraper.scrape_all_categories();

            all.iter()
                .filter(|(c, _)| category.map_or(true, |wanted| wanted == **c))
                .filter_map(|(c, records)| {
                    let category_config = config.category(*c)?;
                    let message = match page(records, *c, *page_number, per_page) {
                        Some(p) => render_page(&p, category_config, None),
                        None => format!(
                            "{} only has {} page(s).",
                            category_config.display_name,
                            total_pages(records.len(), per_page)
                        ),
                    };
                    Some(message)
                })
                .collect()
        }
    }
}

/// Handles one incoming chat message. Messages that aren't commands get no
/// reply; malformed commands get the error back.
pub fn respond<F: HtmlFetcher>(scraper: &LeaderboardScraper<F>, message: &str) -> Vec<String> {
    match message.parse::<BotCommand>() {
        Ok(command) => {
            info!("Running command {:?}", command);
            execute(scraper, &command)
        }
        Err(CommandError::NotACommand) => Vec::new(),
        Err(e) => vec![e.to_string()],
    }
}
