//! Listing title segmentation
//!
//! Titles on the marketplace look like `"BMW 5 серия 2.0 AT, 2017, 121 900 км"`:
//! brand, free-form model, engine volume with a gearbox code, then a
//! comma-separated tail of technical facts. Segmentation runs in a fixed order:
//!
//! 1. drop everything from the first comma
//! 2. drop the `<decimal> <AT|MT>` fragment
//! 3. pick the brand from the first token (with alias and two-word rewrites)
//! 4. scan the *original* title for the year
//! 5. keep the remaining tokens as the model, minus year-like and decimal tokens

use super::{DEFAULT_YEAR, UNDETERMINED_BRAND, UNDETERMINED_MODEL};
use once_cell::sync::Lazy;
use regex::Regex;

static COMMA_TAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r",.*$").unwrap());

static ENGINE_GEARBOX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+\.\d+\s+(AT|MT)").unwrap());

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(19|20)\d{2}\b").unwrap());

static YEAR_TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(19|20)\d{2}\b").unwrap());

static DECIMAL_TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\d+").unwrap());

/// Display brand for the domestic manufacturer, whatever alphabet it was typed in
const VAZ_BRAND: &str = "ВАЗ (LADA)";

const LAND_ROVER_BRAND: &str = "Land Rover";

/// Result of splitting a listing title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTitle {
    /// The title exactly as scraped
    pub full_title: String,

    /// Canonical brand, or [`UNDETERMINED_BRAND`]
    pub brand: String,

    /// Model text, the raw title, or [`UNDETERMINED_MODEL`]
    pub model: String,

    /// First 19xx/20xx year in the title, or [`DEFAULT_YEAR`]
    pub year: i32,
}

/// Splits a listing title into brand, model and year
///
/// Titles with fewer than two tokens (after the comma tail and engine fragment
/// are removed) cannot be segmented: the brand becomes [`UNDETERMINED_BRAND`]
/// and the model is the whole raw title.
///
/// # Example
///
/// ```
/// use lot_harvester::text::parse_title;
///
/// let parsed = parse_title("BMW 5 серия 2.0 AT, 2017, 121 900 км");
/// assert_eq!(parsed.brand, "BMW");
/// assert_eq!(parsed.model, "5 серия");
/// assert_eq!(parsed.year, 2017);
/// ```
pub fn parse_title(title: &str) -> ParsedTitle {
    let without_tail = COMMA_TAIL_RE.replace(title, "");
    let cleaned = ENGINE_GEARBOX_RE.replace_all(&without_tail, "");
    let mut tokens: Vec<&str> = cleaned.split_whitespace().collect();

    if tokens.len() < 2 {
        return ParsedTitle {
            full_title: title.to_string(),
            brand: UNDETERMINED_BRAND.to_string(),
            model: title.to_string(),
            year: DEFAULT_YEAR,
        };
    }

    let first = tokens[0].to_uppercase();
    let brand = if first == "ВАЗ" || first == "VAZ" {
        VAZ_BRAND.to_string()
    } else if first == "LAND" && tokens[1].to_uppercase() == "ROVER" {
        // "Land" is consumed here, "Rover" below together with the brand slot
        tokens.remove(0);
        LAND_ROVER_BRAND.to_string()
    } else {
        tokens[0].to_string()
    };

    let year = find_year(title).unwrap_or(DEFAULT_YEAR);

    let model_tokens: Vec<&str> = tokens[1..]
        .iter()
        .copied()
        .filter(|token| !YEAR_TOKEN_RE.is_match(token) && !DECIMAL_TOKEN_RE.is_match(token))
        .collect();

    let model = if model_tokens.is_empty() {
        UNDETERMINED_MODEL.to_string()
    } else {
        model_tokens.join(" ")
    };

    ParsedTitle {
        full_title: title.to_string(),
        brand,
        model,
        year,
    }
}

/// Finds the first standalone 19xx/20xx number in the text
fn find_year(text: &str) -> Option<i32> {
    YEAR_RE
        .find(text)
        .and_then(|m| m.as_str().parse::<i32>().ok())
}
