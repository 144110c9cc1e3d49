use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::parser::dates::NormalizedPosting;
use crate::parser::extract::PostingRecord;

pub const DEFAULT_WINDOW_DAYS: u32 = 7;

/// The whole digest when nothing falls inside the window.
pub const NO_JOBS_NOTICE: &str = "<b><i>No jobs posted in the last week</i></b><br>";

const SOURCE_NAME: &str = "Progressive Data Jobs";
const SOURCE_HOME: &str = "https://www.progressivedatajobs.org/";
const SIGNATURE: &str = "The Progressive Data Jobs Bot";

/// Postings aged `window_days` or less, in table order. Undated postings never qualify.
pub fn recent(postings: &[NormalizedPosting], window_days: u32) -> Vec<&NormalizedPosting> {
    postings
        .iter()
        .filter(|p| p.days_since_posted.is_some_and(|d| d <= i64::from(window_days)))
        .collect()
}

pub struct DigestTemplate {
    recipient_name: String,
}

impl Default for DigestTemplate {
    fn default() -> Self {
        Self::new("there")
    }
}

impl DigestTemplate {
    pub fn new(recipient_name: impl Into<String>) -> Self {
        Self {
            recipient_name: recipient_name.into(),
        }
    }

    pub fn render(&self, postings: &[NormalizedPosting], window_days: u32) -> String {
        let kept = recent(postings, window_days);
        if kept.is_empty() {
            return NO_JOBS_NOTICE.to_string();
        }

        let blocks: String = kept.iter().map(|p| render_posting(&p.record)).collect();

        format!(
            "Hi {name},\n\
             <br><br>\n\
             Here are the postings from\n\
             <a href=\"{home}\" target=_blank><b>{source}</b></a>\n\
             {window}:\n\
             <br><br>\n\
             {blocks}<br>\n\
             Onward, <br>\n\
             <b>{signature}</b>\n",
            name = encode_text(&self.recipient_name),
            home = SOURCE_HOME,
            source = SOURCE_NAME,
            window = window_phrase(window_days),
            blocks = blocks,
            signature = SIGNATURE,
        )
    }
}

/// Digest with the default greeting.
pub fn format_digest(postings: &[NormalizedPosting], window_days: u32) -> String {
    DigestTemplate::default().render(postings, window_days)
}

fn render_posting(r: &PostingRecord) -> String {
    let link = if r.has_link() {
        format!(
            "<a href=\"{}\" target=_blank>Link</a>",
            encode_double_quoted_attribute(&r.link)
        )
    } else {
        "No link".to_string()
    };
    format!(
        "<b>{} @ {}</b><br>\nPosted on {} | {}<br><br>\n",
        encode_text(&r.position),
        encode_text(&r.company),
        encode_text(&r.date),
        link,
    )
}

fn window_phrase(days: u32) -> String {
    match days {
        0 => "today".to_string(),
        1 => "in the past day".to_string(),
        7 => "in the past week".to_string(),
        n => format!("in the past {} days", n),
    }
}

// ── Tests ──
