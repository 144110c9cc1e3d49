pub mod dates;
pub mod extract;
pub mod fragment;

use scraper::Html;
use tracing::{info, warn};

use dates::{NormalizedTable, RunContext};

/// Listing HTML → posting cards → postings table → normalized table.
pub fn process_page(html: &str, ctx: &RunContext) -> NormalizedTable {
    let document = Html::parse_document(html);
    let cards = fragment::grid_jobs(&document);
    let table = extract::collect(cards);
    if table.is_empty() {
        warn!("No posting cards found on the page");
    } else {
        info!("Extracted {} postings", table.len());
    }
    dates::normalize(&table, ctx)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::extract::NA;
    use chrono::NaiveDate;

    fn ctx(y: i32, m: u32, d: u32) -> RunContext {
        RunContext::at(NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(9, 0, 0).unwrap())
    }

    #[test]
    fn fixture_page() {
        let html = std::fs::read_to_string("tests/fixtures/job-postings.html").unwrap();
        let postings = process_page(&html, &ctx(2024, 1, 9));
        assert_eq!(postings.len(), 6);

        let days: Vec<Option<i64>> = postings.iter().map(|p| p.days_since_posted).collect();
        assert_eq!(days, vec![Some(4), Some(7), None, Some(1), None, Some(55)]);

        let dates: Vec<&str> = postings.iter().map(|p| p.record.date.as_str()).collect();
        assert_eq!(
            dates,
            vec!["01/05/2024", "01/02/2024", NA, "01/08/2024", "Posted recently", "11/15/2023"]
        );

        assert_eq!(postings[3].record.company, NA);
        assert_eq!(postings[4].record.link, NA);
    }

    #[test]
    fn page_without_cards() {
        let postings = process_page("<html><body><p>Nothing here</p></body></html>", &ctx(2024, 1, 9));
        assert!(postings.is_empty());
    }
}
