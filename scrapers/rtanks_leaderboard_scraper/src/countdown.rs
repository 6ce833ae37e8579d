use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::utils::stripped_text;

static ANY_ELEMENT: Lazy<Selector> = Lazy::new(|| Selector::parse("*").unwrap());
static RESET_PHRASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"обнулится через|resets in").unwrap());
// "2д 4ч 2м" on the Russian page, "2d 4h 2m" on the English one.
static DURATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+д\s*\d+ч\s*\d+м|\d+d\s*\d+h\s*\d+m)").unwrap());

/// How far above the phrase's element the duration may sit: the parent only.
const MAX_ANCESTOR_DEPTH: usize = 1;

/// Finds the "rating resets in ..." notice and returns its duration text.
///
/// The duration is looked for in the element holding the phrase, then in
/// its parent, for pages that put the number in a sibling tag.
pub fn extract_countdown(document: &Html) -> Option<String> {
    document
        .select(&ANY_ELEMENT)
        .filter(|element| announces_reset(element))
        .find_map(|element| {
            std::iter::once(element)
                .chain(element.ancestors().filter_map(ElementRef::wrap))
                .take(MAX_ANCESTOR_DEPTH + 1)
                .find_map(|scope| duration_in(&scope))
        })
}

fn duration_in(element: &ElementRef) -> Option<String> {
    DURATION
        .captures(&stripped_text(element))
        .map(|caps| caps[1].to_string())
}

/// True when one of the element's own text nodes holds the reset phrase.
fn announces_reset(element: &ElementRef) -> bool {
    element
        .children()
        .filter_map(|child| child.value().as_text())
        .any(|text| RESET_PHRASE.is_match(text))
}
