use serde::Serialize;
use std::fmt::Write;

use crate::{
    config::CategoryConfig,
    types::{Category, PlayerRecord},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardPage<'a> {
    pub category: Category,
    /// 1-based.
    pub page_number: usize,
    pub total_pages: usize,
    pub records: &'a [PlayerRecord],
}

pub fn total_pages(record_count: usize, per_page: usize) -> usize {
    record_count.div_ceil(per_page.max(1)).max(1)
}

/// Slices one page out of a category's records. An empty board still has a
/// single, empty, first page; any other out-of-range page is `None`.
pub fn page(
    records: &[PlayerRecord],
    category: Category,
    page_number: usize,
    per_page: usize,
) -> Option<LeaderboardPage<'_>> {
    let per_page = per_page.max(1);
    let total_pages = total_pages(records.len(), per_page);
    if page_number == 0 || page_number > total_pages {
        return None;
    }

    let start = (page_number - 1) * per_page;
    let end = (start + per_page).min(records.len());
    Some(LeaderboardPage {
        category,
        page_number,
        total_pages,
        records: &records[start..end],
    })
}

/// Chat-message rendering of one page.
pub fn render_page(page: &LeaderboardPage, category: &CategoryConfig, countdown: Option<&str>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "**{}** ({})", category.display_name, category.description);

    if page.records.is_empty() {
        out.push_str("No players found.\n");
    }
    for record in page.records {
        let _ = writeln!(out, "`#{:>3}` {} - {}", record.rank, record.name, record.score_formatted);
    }

    let _ = write!(out, "Page {}/{}", page.page_number, page.total_pages);
    if let Some(countdown) = countdown {
        let _ = write!(out, " | Reset in {}", countdown);
    }
    out
}
