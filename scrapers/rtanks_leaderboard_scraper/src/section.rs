use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::config::CategoryConfig;

static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").unwrap());

/// Finds a category's table by its position among every `<table>` on the
/// page, in document order (nested tables count too).
///
/// Nothing checks that the table found actually holds that category; if
/// the page gains or loses a table before it, the wrong board comes back.
pub fn locate_section<'a>(document: &'a Html, category: &CategoryConfig) -> Option<ElementRef<'a>> {
    document.select(&TABLE).nth(category.section_index)
}

pub fn count_sections(document: &Html) -> usize {
    document.select(&TABLE).count()
}
