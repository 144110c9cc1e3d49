use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

static GRID_JOB: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.grid-job").unwrap());
static HEADING: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h2.grid-heading").unwrap());
static STRONG: LazyLock<Selector> = LazyLock::new(|| Selector::parse("strong").unwrap());
static DATE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span.grid-date").unwrap());
static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// One posting card as scraped. Each accessor returns `None` when the
/// sub-element is missing or empty; none of them can fail.
pub trait Fragment {
    fn heading(&self) -> Option<String>;
    fn company(&self) -> Option<String>;
    fn date_text(&self) -> Option<String>;
    fn link(&self) -> Option<String>;
}

impl Fragment for ElementRef<'_> {
    fn heading(&self) -> Option<String> {
        first_text(self, &HEADING)
    }

    fn company(&self) -> Option<String> {
        first_text(self, &STRONG)
    }

    fn date_text(&self) -> Option<String> {
        first_text(self, &DATE)
    }

    fn link(&self) -> Option<String> {
        self.select(&LINK)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(str::trim)
            .filter(|href| !href.is_empty())
            .map(str::to_string)
    }
}

/// Posting cards on the listing page, in page order.
pub fn grid_jobs(document: &Html) -> Vec<ElementRef<'_>> {
    document.select(&GRID_JOB).collect()
}

/// Whitespace-collapsed text of the first match, `None` if absent or blank.
fn first_text(element: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    let node = element.select(selector).next()?;
    let text = node
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ");
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
