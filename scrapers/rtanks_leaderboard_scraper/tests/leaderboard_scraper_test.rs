use pretty_assertions::assert_eq;

use rtanks_leaderboard_scraper::{
    config::ScrapingConfig, Category, LeaderboardScraper, PlayerRecord, ScraperConfig,
};

const LEADERBOARD_PAGE: &str = include_str!("fixtures/leaderboard.html");

fn serve_page(server: &mut mockito::Server, status: usize, body: &str) -> mockito::Mock {
    server
        .mock("GET", "/")
        .with_status(status)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(body)
        .create()
}

fn scraper_for(server: &mockito::Server) -> LeaderboardScraper {
    let config = ScraperConfig {
        scraping: ScrapingConfig {
            base_url: server.url(),
            ..ScrapingConfig::default()
        },
        ..ScraperConfig::default()
    };
    LeaderboardScraper::new(config).unwrap()
}

#[test_log::test]
fn test_experience_leaderboard() {
    let mut server = mockito::Server::new();
    let mock = serve_page(&mut server, 200, LEADERBOARD_PAGE);
    let scraper = scraper_for(&server);

    let players = scraper.scrape_category("experience");
    mock.assert();

    assert_eq!(
        players,
        vec![
            PlayerRecord {
                rank: 1,
                name: "Destroyer".to_string(),
                score: 1_254_300,
                score_formatted: "1 254 300".to_string(),
                rank_icon: Some(format!("{}/ranks/30.png", server.url())),
                category: Category::Experience,
            },
            PlayerRecord {
                rank: 2,
                name: "Viking".to_string(),
                score: 987_654,
                score_formatted: "987 654".to_string(),
                rank_icon: Some("https://cdn.ranked-rtanks.online/ranks/29.png".to_string()),
                category: Category::Experience,
            },
            PlayerRecord {
                rank: 3,
                name: "Hornet".to_string(),
                score: 912_000,
                score_formatted: "912 000".to_string(),
                rank_icon: Some("https://static.example.org/ranks/28.png".to_string()),
                category: Category::Experience,
            },
            PlayerRecord {
                rank: 4,
                name: "Titan".to_string(),
                score: 850_001,
                score_formatted: "850 001".to_string(),
                rank_icon: None,
                category: Category::Experience,
            },
        ]
    );
}

#[test_log::test]
fn test_malformed_rows_are_skipped() {
    let mut server = mockito::Server::new();
    let _mock = serve_page(&mut server, 200, LEADERBOARD_PAGE);
    let scraper = scraper_for(&server);

    let crystals = scraper.scrape_category("crystals");
    let ranks: Vec<u32> = crystals.iter().map(|p| p.rank).collect();
    assert_eq!(ranks, vec![1, 3]);

    let golds = scraper.scrape_category("golds");
    assert_eq!(golds.len(), 3);
    assert_eq!(golds[1].name, "Lonely Tank");
    assert_eq!(golds[1].score, 0);
    assert_eq!(golds[1].score_formatted, "—");
}

#[test_log::test]
fn test_kills_capped_at_one_hundred() {
    let mut server = mockito::Server::new();
    let _mock = serve_page(&mut server, 200, LEADERBOARD_PAGE);
    let scraper = scraper_for(&server);

    let kills = scraper.scrape_category("kills");
    assert_eq!(kills.len(), 100);
    assert_eq!(kills[0].name, "Sniper1");
    assert_eq!(kills[99].rank, 100);
    assert_eq!(kills[0].score, 3887);
    assert_eq!(kills[0].score_formatted, "3 887");
    assert!(kills.windows(2).all(|w| w[0].rank < w[1].rank));
}

#[test_log::test]
fn test_scrape_all_categories_single_request() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/")
        .with_status(200)
        .with_body(LEADERBOARD_PAGE)
        .expect(1)
        .create();
    let scraper = scraper_for(&server);

    let all = scraper.scrape_all_categories();
    mock.assert();

    let counts: Vec<(Category, usize)> = all.iter().map(|(c, p)| (*c, p.len())).collect();
    assert_eq!(
        counts,
        vec![
            (Category::Experience, 4),
            (Category::Crystals, 2),
            (Category::Golds, 3),
            (Category::Kills, 100),
        ]
    );
}

#[test_log::test]
fn test_reset_countdown() {
    let mut server = mockito::Server::new();
    let _mock = serve_page(&mut server, 200, LEADERBOARD_PAGE);
    let scraper = scraper_for(&server);

    assert_eq!(scraper.get_reset_countdown().as_deref(), Some("2д 4ч 2м"));

    let snapshot = scraper.scrape_snapshot();
    assert_eq!(snapshot.countdown.as_deref(), Some("2д 4ч 2м"));
    assert_eq!(snapshot.total_players(), 109);
}

#[test_log::test]
fn test_server_error_yields_nothing() {
    let mut server = mockito::Server::new();
    let _mock = serve_page(&mut server, 500, "oops");
    let scraper = scraper_for(&server);

    assert!(scraper.scrape_category("experience").is_empty());
    assert!(scraper.scrape_all_categories().values().all(Vec::is_empty));
    assert_eq!(scraper.get_reset_countdown(), None);
}

#[test_log::test]
fn test_unknown_category_skips_request() {
    let mut server = mockito::Server::new();
    let mock = server.mock("GET", "/").expect(0).create();
    let scraper = scraper_for(&server);

    assert!(scraper.scrape_category("deaths").is_empty());
    mock.assert();
}

#[test_log::test]
fn test_shifted_section_index() {
    let mut server = mockito::Server::new();
    let _mock = serve_page(&mut server, 200, LEADERBOARD_PAGE);
    let mut config = ScraperConfig {
        scraping: ScrapingConfig {
            base_url: server.url(),
            ..ScrapingConfig::default()
        },
        ..ScraperConfig::default()
    };
    config.categories.get_mut(&Category::Kills).unwrap().section_index = 9;
    let scraper = LeaderboardScraper::new(config).unwrap();

    assert!(scraper.scrape_category("kills").is_empty());
    assert_eq!(scraper.scrape_category("golds").len(), 3);
}
