use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::{
    error::ScrapeError,
    types::{Category, PlayerRecord},
    utils::{normalize_score, resolve_icon_url, stripped_text},
};

static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").unwrap());
static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());
static IMAGE: Lazy<Selector> = Lazy::new(|| Selector::parse("img").unwrap());

/// Turns `<tr>` rows of a leaderboard table into [`PlayerRecord`]s.
///
/// Rows are laid out as `rank | icon + name | score`; anything after the
/// third cell is ignored.
pub struct PlayerRowParser {
    base_url: String,
}

impl PlayerRowParser {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
        }
    }

    /// Extracts up to `max_players` records from a section, in row order.
    ///
    /// Rows that don't parse are skipped, as are rows repeating a rank
    /// already seen in this section. Stops pulling rows once `max_players`
    /// records have been accepted.
    pub fn extract_rows(
        &self,
        section: ElementRef,
        category: Category,
        max_players: usize,
    ) -> Vec<PlayerRecord> {
        let mut seen_ranks = HashSet::new();

        section
            .select(&ROW)
            .filter_map(|row| self.extract_row(row, category))
            .filter(|record| {
                let fresh = seen_ranks.insert(record.rank);
                if !fresh {
                    warn!(
                        "Dropping {} from {}: rank {} already taken",
                        record.name, category, record.rank
                    );
                }
                fresh
            })
            .take(max_players)
            .collect()
    }

    /// Returns `None` for header rows, short rows and rows that fail to parse.
    pub fn extract_row(&self, row: ElementRef, category: Category) -> Option<PlayerRecord> {
        let cells: Vec<_> = row.select(&CELL).collect();
        if cells.len() < 3 {
            return None;
        }

        match self.parse_cells(&cells, category) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!("Error parsing {} row: {}", category, e);
                None
            }
        }
    }

    fn parse_cells(&self, cells: &[ElementRef], category: Category) -> Result<PlayerRecord, ScrapeError> {
        let rank = self.extract_rank(&cells[0])?;

        let name_cell = &cells[1];
        let name = self.extract_player_name(name_cell);
        if name.is_empty() {
            return Err(ScrapeError::MalformedRow(format!("rank {} has no player name", rank)));
        }
        let rank_icon = self.extract_rank_icon(name_cell);

        let score_formatted = stripped_text(&cells[2]);
        let score = normalize_score(&score_formatted);

        Ok(PlayerRecord {
            rank,
            name,
            score,
            score_formatted,
            rank_icon,
            category,
        })
    }

    fn extract_rank(&self, cell: &ElementRef) -> Result<u32, ScrapeError> {
        let rank_text = stripped_text(cell);
        if rank_text.is_empty() || !rank_text.chars().all(|c| c.is_ascii_digit()) {
            return Err(ScrapeError::MalformedRow(format!("rank {:?} is not a number", rank_text)));
        }
        rank_text
            .parse()
            .map_err(|_| ScrapeError::MalformedRow(format!("rank {:?} is out of range", rank_text)))
    }

    /// Prefers the profile link's text, which leaves out status suffixes
    /// that sit next to it in the cell.
    fn extract_player_name(&self, cell: &ElementRef) -> String {
        match cell.select(&LINK).next() {
            Some(link) => stripped_text(&link),
            None => stripped_text(cell),
        }
    }

    fn extract_rank_icon(&self, cell: &ElementRef) -> Option<String> {
        cell.select(&IMAGE)
            .next()
            .and_then(|img| img.value().attr("src"))
            .filter(|src| !src.is_empty())
            .map(|src| resolve_icon_url(src, &self.base_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scraper::Html;

    const BASE_URL: &str = "https://site";

    fn table(rows: &str) -> Html {
        Html::parse_document(&format!("<html><body><table>{}</table></body></html>", rows))
    }

    fn first_row(document: &Html) -> ElementRef<'_> {
        document.select(&ROW).next().unwrap()
    }

    fn section(document: &Html) -> ElementRef<'_> {
        document.select(&Selector::parse("table").unwrap()).next().unwrap()
    }

    #[test]
    fn test_extract_row_full() {
        let document = table(
            r#"<tr><td>1</td><td><img src="/ranks/30.png"><a href="/user/Tanker">Tanker</a></td><td>1 234 567</td></tr>"#,
        );
        let parser = PlayerRowParser::new(BASE_URL);
        let record = parser.extract_row(first_row(&document), Category::Experience).unwrap();

        assert_eq!(
            record,
            PlayerRecord {
                rank: 1,
                name: "Tanker".to_string(),
                score: 1234567,
                score_formatted: "1 234 567".to_string(),
                rank_icon: Some("https://site/ranks/30.png".to_string()),
                category: Category::Experience,
            }
        );
    }

    #[test]
    fn test_extract_row_too_few_cells() {
        let document = table("<tr><td>1</td><td>Tanker</td></tr>");
        let parser = PlayerRowParser::new(BASE_URL);
        assert!(parser.extract_row(first_row(&document), Category::Kills).is_none());
    }

    #[test]
    fn test_extract_row_header_row_skipped() {
        let document = table("<tr><th>#</th><th>Player</th><th>Score</th></tr>");
        let parser = PlayerRowParser::new(BASE_URL);
        assert!(parser.extract_row(first_row(&document), Category::Kills).is_none());

        let document = table("<tr><td>#</td><td>Player</td><td>Score</td></tr>");
        assert!(parser.extract_row(first_row(&document), Category::Kills).is_none());
    }

    #[test]
    fn test_extract_row_prefers_link_text() {
        let document = table("<tr><td>2</td><td><a>PlayerX</a> (inactive)</td><td>10</td></tr>");
        let parser = PlayerRowParser::new(BASE_URL);
        let record = parser.extract_row(first_row(&document), Category::Golds).unwrap();
        assert_eq!(record.name, "PlayerX");
        assert_eq!(record.rank_icon, None);
    }

    #[test]
    fn test_extract_row_name_without_link() {
        let document = table("<tr><td>3</td><td>  Lonely Tank  </td><td>abc</td></tr>");
        let parser = PlayerRowParser::new(BASE_URL);
        let record = parser.extract_row(first_row(&document), Category::Crystals).unwrap();
        assert_eq!(record.name, "Lonely Tank");
        assert_eq!(record.score, 0);
        assert_eq!(record.score_formatted, "abc");
    }

    #[test]
    fn test_extract_row_protocol_relative_icon() {
        let document = table(
            r#"<tr><td>4</td><td><img src="//cdn.x/i.png"><a>Ace</a></td><td>5</td></tr>"#,
        );
        let parser = PlayerRowParser::new(BASE_URL);
        let record = parser.extract_row(first_row(&document), Category::Kills).unwrap();
        assert_eq!(record.rank_icon.as_deref(), Some("https://cdn.x/i.png"));
    }

    #[test]
    fn test_extract_row_empty_name_is_malformed() {
        let document = table(r#"<tr><td>5</td><td><img src="/r.png"></td><td>5</td></tr>"#);
        let parser = PlayerRowParser::new(BASE_URL);
        assert!(parser.extract_row(first_row(&document), Category::Kills).is_none());
    }

    #[test]
    fn test_extract_rows_skips_malformed_row() {
        let document = table(
            "<tr><td>1</td><td><a>First</a></td><td>300</td></tr>\
             <tr><td>??</td><td><a>Broken</a></td><td>200</td></tr>\
             <tr><td>3</td><td><a>Third</a></td><td>100</td></tr>",
        );
        let parser = PlayerRowParser::new(BASE_URL);
        let records = parser.extract_rows(section(&document), Category::Golds, 100);

        let ranks: Vec<u32> = records.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 3]);
    }

    #[test]
    fn test_extract_rows_caps_at_max_players() {
        let rows: String = (1..=500)
            .map(|i| format!("<tr><td>{i}</td><td><a>Player{i}</a></td><td>{}</td></tr>", 1000 - i))
            .collect();
        let document = table(&rows);
        let parser = PlayerRowParser::new(BASE_URL);
        let records = parser.extract_rows(section(&document), Category::Experience, 100);

        assert_eq!(records.len(), 100);
        assert_eq!(records.first().unwrap().rank, 1);
        assert_eq!(records.last().unwrap().rank, 100);
    }

    #[test]
    fn test_extract_rows_drops_duplicate_ranks() {
        let document = table(
            "<tr><td>1</td><td><a>A</a></td><td>3</td></tr>\
             <tr><td>1</td><td><a>B</a></td><td>2</td></tr>\
             <tr><td>2</td><td><a>C</a></td><td>1</td></tr>",
        );
        let parser = PlayerRowParser::new(BASE_URL);
        let names: Vec<String> = parser
            .extract_rows(section(&document), Category::Kills, 100)
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[test_log::test]
    fn test_extract_rows_keeps_first_of_repeated_rank() {
        let document = table(
            "<tr><td>1</td><td><a>A</a></td><td>30</td></tr>\
             <tr><td>2</td><td><a>B</a></td><td>20</td></tr>\
             <tr><td>2</td><td><a>Impostor</a></td><td>10</td></tr>",
        );
        let parser = PlayerRowParser::new(BASE_URL);
        let names: Vec<String> = parser
            .extract_rows(section(&document), Category::Kills, 100)
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }
}
