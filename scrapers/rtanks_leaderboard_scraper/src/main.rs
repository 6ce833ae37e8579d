use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;

use rtanks_leaderboard_scraper::{
    bot, logging,
    pagination::{page, render_page, total_pages},
    Category, LeaderboardScraper, ScraperConfig,
};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape one leaderboard and print it as JSON
    Category {
        /// experience, crystals, golds or kills
        category: String,
    },
    /// Scrape every leaderboard and print them as JSON
    All,
    /// Print the time until the ratings reset
    Countdown,
    /// Print one page of a leaderboard the way the bot posts it
    Page {
        category: Category,
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Answer a chat command such as "!leaderboard kills 2"
    Command {
        message: String,
    },
}

fn main() -> Result<()> {
    dotenv().ok();
    logging::init();

    let cli = Cli::parse();
    let config = ScraperConfig::from_env();
    let scraper = LeaderboardScraper::new(config)?;

    match cli.command {
        Commands::Category { category } => {
            let players = scraper.scrape_category(&category);
            println!("{}", serde_json::to_string_pretty(&players)?);
        }
        Commands::All => {
            let all = scraper.scrape_all_categories();
            println!("{}", serde_json::to_string_pretty(&all)?);
        }
        Commands::Countdown => match scraper.get_reset_countdown() {
            Some(countdown) => println!("{}", countdown),
            None => println!("Countdown unavailable"),
        },
        Commands::Page { category, page: page_number } => {
            let config = scraper.config();
            let category_config = config
                .category(category)
                .with_context(|| format!("{} is not configured", category))?;
            let per_page = config.publish.players_per_page;
            let players = scraper.scrape_category(category.as_str());
            match page(&players, category, page_number, per_page) {
                Some(p) => println!("{}", render_page(&p, category_config, None)),
                None => anyhow::bail!(
                    "Page {} out of range (1-{})",
                    page_number,
                    total_pages(players.len(), per_page)
                ),
            }
        }
        Commands::Command { message } => {
            for reply in bot::respond(&scraper, &message) {
                println!("{}\n", reply);
            }
        }
    }

    Ok(())
}
