use serde::Serialize;

use super::fragment::Fragment;

/// Stored in any field whose sub-element was missing from the card.
pub const NA: &str = "NA";

/// One posting as scraped, fields in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostingRecord {
    pub position: String,
    pub company: String,
    pub date: String,
    pub link: String,
}

impl PostingRecord {
    pub fn has_link(&self) -> bool {
        self.link != NA
    }
}

/// Postings in scrape order.
#[derive(Debug, Clone, Default)]
pub struct PostingTable {
    records: Vec<PostingRecord>,
}

impl PostingTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PostingRecord> {
        self.records.iter()
    }
}

impl FromIterator<PostingRecord> for PostingTable {
    fn from_iter<I: IntoIterator<Item = PostingRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PostingTable {
    type Item = &'a PostingRecord;
    type IntoIter = std::slice::Iter<'a, PostingRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Pull the four fields out of one card. Each field falls back to `NA` on
/// its own, so a missing company never costs us the position or link.
pub fn extract<F: Fragment + ?Sized>(fragment: &F) -> PostingRecord {
    PostingRecord {
        position: or_na(fragment.heading()),
        company: or_na(fragment.company()),
        date: or_na(fragment.date_text()),
        link: or_na(fragment.link()),
    }
}

/// Extract every card, keeping input order and length.
pub fn collect<I>(fragments: I) -> PostingTable
where
    I: IntoIterator,
    I::Item: Fragment,
{
    fragments.into_iter().map(|f| extract(&f)).collect()
}

fn or_na(value: Option<String>) -> String {
    value.unwrap_or_else(|| NA.to_string())
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Card {
        heading: Option<&'static str>,
        company: Option<&'static str>,
        date: Option<&'static str>,
        link: Option<&'static str>,
    }

    impl Fragment for Card {
        fn heading(&self) -> Option<String> {
            self.heading.map(String::from)
        }
        fn company(&self) -> Option<String> {
            self.company.map(String::from)
        }
        fn date_text(&self) -> Option<String> {
            self.date.map(String::from)
        }
        fn link(&self) -> Option<String> {
            self.link.map(String::from)
        }
    }

    fn full() -> Card {
        Card {
            heading: Some("Data Analyst"),
            company: Some("Acme"),
            date: Some("Posted on 01/01/2024"),
            link: Some("http://x"),
        }
    }

    #[test]
    fn all_fields_present() {
        let r = extract(&full());
        assert_eq!(r.position, "Data Analyst");
        assert_eq!(r.company, "Acme");
        assert_eq!(r.date, "Posted on 01/01/2024");
        assert_eq!(r.link, "http://x");
        assert!(r.has_link());
    }

    #[test]
    fn missing_fields_become_na_independently() {
        let r = extract(&Card {
            company: None,
            link: None,
            ..full()
        });
        assert_eq!(
            r,
            PostingRecord {
                position: "Data Analyst".into(),
                company: NA.into(),
                date: "Posted on 01/01/2024".into(),
                link: NA.into(),
            }
        );
        assert!(!r.has_link());
    }

    #[test]
    fn empty_card_is_all_na() {
        let r = extract(&Card::default());
        for value in [&r.position, &r.company, &r.date, &r.link] {
            assert_eq!(value, NA);
        }
    }

    #[test]
    fn collect_preserves_length_and_order() {
        let cards = vec![
            full(),
            Card::default(),
            Card {
                heading: Some("Organizer"),
                ..Card::default()
            },
        ];
        let table = collect(cards);
        assert_eq!(table.len(), 3);
        let positions: Vec<&str> = table.iter().map(|r| r.position.as_str()).collect();
        assert_eq!(positions, vec!["Data Analyst", NA, "Organizer"]);
    }

    #[test]
    fn collect_empty_input() {
        let table = collect(Vec::<Card>::new());
        assert_eq!(table.len(), 0);
        assert!(table.is_empty());
        assert!(!collect(vec![full()]).is_empty());
    }
}
