use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::extract::{PostingRecord, PostingTable, NA};

/// Rendered form of every parsed posting date.
pub const CANONICAL_FORMAT: &str = "%m/%d/%Y";

/// Accepted layouts, tried in order; the first that parses wins.
/// `%B` also takes abbreviated month names ("Jan").
const DATE_FORMATS: &[&str] = &[
    "%m/%d/%Y",      // 01/02/2024, 1/2/2024
    "%m/%d/%y",      // 1/2/24
    "%Y-%m-%d",      // 2024-01-02
    "%B %d, %Y",     // January 2, 2024
    "%B %d %Y",      // January 2 2024
    "%d %B %Y",      // 2 January 2024
    "%A, %B %d, %Y", // Tuesday, January 2, 2024
];

// `%Y` takes 1-4 digits; anything below this is a short year read as four.
const MIN_YEAR: i32 = 1000;

// "Posted on …": everything through the last standalone "on" is prefix.
static PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bon\b").unwrap());
static ORDINAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)\b").unwrap());

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateError {
    #[error("posting has no date")]
    Sentinel,
    #[error("unrecognized date text {0:?}")]
    Unrecognized(String),
}

/// Wall clock captured once per run; every posting's age is measured
/// against the same instant.
#[derive(Debug, Clone, Copy)]
pub struct RunContext {
    pub now: NaiveDateTime,
}

impl RunContext {
    pub fn capture() -> Self {
        Self {
            now: chrono::Local::now().naive_local(),
        }
    }

    #[cfg(test)]
    pub fn at(now: NaiveDateTime) -> Self {
        Self { now }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NormalizedPosting {
    /// `date` holds the canonical `MM/DD/YYYY` text when it parsed.
    #[serde(flatten)]
    pub record: PostingRecord,
    pub posted_on: Option<NaiveDate>,
    /// `None` when the date was missing or unreadable.
    pub days_since_posted: Option<i64>,
}

pub type NormalizedTable = Vec<NormalizedPosting>;

/// Drop the "Posted on" style prefix and surrounding whitespace.
pub fn strip_prefix(text: &str) -> &str {
    match PREFIX_RE.find_iter(text).last() {
        Some(m) => text[m.end()..].trim(),
        None => text.trim(),
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, DateError> {
    if raw == NA {
        return Err(DateError::Sentinel);
    }
    let text = strip_prefix(raw);
    let cleaned = ORDINAL_RE.replace_all(text, "$1");
    DATE_FORMATS
        .iter()
        .find_map(|fmt| {
            NaiveDate::parse_from_str(&cleaned, fmt)
                .ok()
                .filter(|d| d.year() >= MIN_YEAR)
        })
        .ok_or_else(|| DateError::Unrecognized(text.to_string()))
}

/// Whole days from midnight of `date` to `now`, floored. Future dates count as 0.
pub fn days_since(date: NaiveDate, now: NaiveDateTime) -> i64 {
    let elapsed = now - date.and_time(NaiveTime::MIN);
    elapsed.num_seconds().div_euclid(86_400).max(0)
}

/// Build a new table with canonical dates and ages. A bad date only affects
/// its own row.
pub fn normalize(table: &PostingTable, ctx: &RunContext) -> NormalizedTable {
    table.iter().map(|r| normalize_record(r, ctx)).collect()
}

fn normalize_record(record: &PostingRecord, ctx: &RunContext) -> NormalizedPosting {
    match parse_date(&record.date) {
        Ok(date) => NormalizedPosting {
            record: PostingRecord {
                date: date.format(CANONICAL_FORMAT).to_string(),
                ..record.clone()
            },
            posted_on: Some(date),
            days_since_posted: Some(days_since(date, ctx.now)),
        },
        Err(DateError::Sentinel) => {
            debug!("No date on posting {:?}", record.position);
            NormalizedPosting {
                record: record.clone(),
                posted_on: None,
                days_since_posted: None,
            }
        }
        Err(e) => {
            warn!("Skipping age for {:?}: {}", record.position, e);
            NormalizedPosting {
                record: PostingRecord {
                    date: strip_prefix(&record.date).to_string(),
                    ..record.clone()
                },
                posted_on: None,
                days_since_posted: None,
            }
        }
    }
}

// ── Tests ──
