use regex::Regex;
use std::sync::OnceLock;

use crate::workflows::readiness::assumptions::{CREDIT_SCORE_MAX, CREDIT_SCORE_MIN};

static ZIP_PATTERN: OnceLock<Regex> = OnceLock::new();
static AMOUNT_PATTERN: OnceLock<Regex> = OnceLock::new();
static INTEGER_PATTERN: OnceLock<Regex> = OnceLock::new();

fn zip_pattern() -> &'static Regex {
    ZIP_PATTERN.get_or_init(|| Regex::new(r"\b\d{5}\b").expect("zip pattern compiles"))
}

fn amount_pattern() -> &'static Regex {
    AMOUNT_PATTERN.get_or_init(|| Regex::new(r"\d+,?\d*").expect("amount pattern compiles"))
}

fn integer_pattern() -> &'static Regex {
    INTEGER_PATTERN.get_or_init(|| Regex::new(r"\d+").expect("integer pattern compiles"))
}

/// First standalone five-digit group, e.g. `"Raleigh 27610"` -> `"27610"`.
pub(crate) fn extract_zip(input: &str) -> Option<&str> {
    zip_pattern().find(input).map(|found| found.as_str())
}

/// A location answer is usable when it carries a zip or a few characters of
/// city name.
pub(crate) fn is_location(input: &str) -> bool {
    extract_zip(input).is_some() || input.trim().chars().count() > 2
}

/// First dollar amount in free text. A single thousands separator is allowed,
/// so `"$5,200/mo"` reads as 5200.
pub(crate) fn first_amount(input: &str) -> Option<f64> {
    let found = amount_pattern().find(input)?;
    found
        .as_str()
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
}

pub(crate) fn first_credit_score(input: &str) -> Option<u16> {
    let found = integer_pattern().find(input)?;
    let value = found.as_str().parse::<u32>().ok()?;
    (u32::from(CREDIT_SCORE_MIN)..=u32::from(CREDIT_SCORE_MAX))
        .contains(&value)
        .then_some(value as u16)
}

pub(crate) fn is_unsure(input: &str) -> bool {
    let lowered = input.to_lowercase().replace('\u{2019}', "'");
    lowered.contains("not sure") || lowered.contains("don't know")
}
