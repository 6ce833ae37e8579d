use scraper::ElementRef;
use tracing::warn;

use crate::error::ScrapeError;

/// Text of an element with every text node trimmed and the non-empty pieces
/// joined without a separator, the way the page reads once whitespace
/// between tags is dropped.
pub fn stripped_text(element: &ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect()
}

// Code points of the zero digit in each decimal-digit run the ratings page
// could plausibly render: ASCII, Arabic-Indic, extended Arabic-Indic, NKo,
// the Indic scripts, Thai, Lao, Tibetan, Myanmar, Khmer, Mongolian and
// full-width forms.
const DIGIT_ZEROS: [u32; 20] = [
    0x0030, 0x0660, 0x06F0, 0x07C0, 0x0966, 0x09E6, 0x0A66, 0x0AE6, 0x0B66, 0x0BE6,
    0x0C66, 0x0CE6, 0x0D66, 0x0E50, 0x0ED0, 0x0F20, 0x1040, 0x17E0, 0x1810, 0xFF10,
];

/// Value of a decimal digit in any of the scripts in [`DIGIT_ZEROS`].
fn decimal_digit(c: char) -> Option<u64> {
    let code = u32::from(c);
    DIGIT_ZEROS
        .iter()
        .find(|zero| (**zero..*zero + 10).contains(&code))
        .map(|zero| u64::from(code - zero))
}

/// Parses a displayed score like `"12 345"`, `"12,345"` or `"12.345"`.
///
/// Everything except digits is dropped, so grouping separators of any
/// locale collapse away. Non-ASCII decimal digits (`"１２３"`) count too.
pub fn parse_score(score_text: &str) -> Result<u64, ScrapeError> {
    let unparseable = || ScrapeError::UnparseableScore(score_text.to_string());

    let mut digits = score_text.chars().filter_map(decimal_digit).peekable();
    if digits.peek().is_none() {
        return Err(unparseable());
    }
    digits.try_fold(0u64, |score, digit| {
        score
            .checked_mul(10)
            .and_then(|score| score.checked_add(digit))
            .ok_or_else(unparseable)
    })
}

/// Like [`parse_score`], but logs and falls back to 0.
pub fn normalize_score(score_text: &str) -> u64 {
    match parse_score(score_text) {
        Ok(score) => score,
        Err(e) => {
            warn!("{}", e);
            0
        }
    }
}

/// Turns an `<img src>` value into an absolute URL.
pub fn resolve_icon_url(src: &str, base_url: &str) -> String {
    if src.starts_with("//") {
        format!("https:{}", src)
    } else if src.starts_with('/') {
        format!("{}{}", base_url.trim_end_matches('/'), src)
    } else {
        src.to_string()
    }
}
