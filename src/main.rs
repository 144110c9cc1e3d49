mod digest;
mod fetch;
mod mailer;
mod parser;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};

use digest::DigestTemplate;
use parser::dates::{NormalizedTable, RunContext};

#[derive(Parser)]
#[command(name = "pdj_digest", about = "Progressive Data Jobs digest by email")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the job board and email the digest
    Send {
        /// Recipient address
        #[arg(long)]
        to: String,
        /// Name used in the greeting
        #[arg(long, default_value = "there")]
        name: String,
        /// JSON file with "Email Address" and "Password"
        #[arg(long, default_value = mailer::DEFAULT_CREDENTIALS_PATH)]
        credentials: PathBuf,
        /// Include postings at most this many days old
        #[arg(short, long, default_value_t = digest::DEFAULT_WINDOW_DAYS)]
        window: u32,
        /// Print the email instead of sending it
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the digest body without sending
    Preview {
        /// Name used in the greeting
        #[arg(long)]
        name: Option<String>,
        /// Include postings at most this many days old
        #[arg(short, long, default_value_t = digest::DEFAULT_WINDOW_DAYS)]
        window: u32,
    },
    /// List every scraped posting with its age
    Jobs {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    // One clock reading for the whole run
    let ctx = RunContext::capture();

    let result = match cli.command {
        Commands::Send {
            to,
            name,
            credentials,
            window,
            dry_run,
        } => {
            let postings = scrape(&ctx).await?;
            let kept = digest::recent(&postings, window).len();
            let body = DigestTemplate::new(name).render(&postings, window);
            let subject = mailer::subject(ctx.now.date());

            if dry_run {
                println!("To: {}\nSubject: {}\n\n{}", to, subject, body);
                return Ok(());
            }

            let creds = mailer::Credentials::load(&credentials)?;
            let message = mailer::build_message(&creds, &to, &subject, body)?;
            mailer::send(&creds, message).await?;
            println!(
                "Sent {} of {} postings (last {} days) to {}",
                kept,
                postings.len(),
                window,
                to
            );
            Ok(())
        }
        Commands::Preview { name, window } => {
            let postings = scrape(&ctx).await?;
            let body = match name {
                Some(n) => DigestTemplate::new(n).render(&postings, window),
                None => digest::format_digest(&postings, window),
            };
            println!("{}", body);
            Ok(())
        }
        Commands::Jobs { json } => {
            let postings = scrape(&ctx).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&postings)?);
                return Ok(());
            }
            if postings.is_empty() {
                println!("No postings found on {}", fetch::SOURCE_URL);
                return Ok(());
            }

            println!(
                "{:>3} | {:<32} | {:<24} | {:<10} | {:>4} | {}",
                "#", "Position", "Company", "Posted", "Days", "Link"
            );
            println!("{}", "-".repeat(100));

            for (i, p) in postings.iter().enumerate() {
                let days = p
                    .days_since_posted
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".into());
                println!(
                    "{:>3} | {:<32} | {:<24} | {:<10} | {:>4} | {}",
                    i + 1,
                    truncate(&p.record.position, 32),
                    truncate(&p.record.company, 24),
                    truncate(&p.record.date, 10),
                    days,
                    p.record.link
                );
            }

            let undated = postings.iter().filter(|p| p.days_since_posted.is_none()).count();
            println!("\n{} postings | {} without a readable date", postings.len(), undated);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    result
}

async fn scrape(ctx: &RunContext) -> anyhow::Result<NormalizedTable> {
    let html = fetch::fetch_listing_page().await?;
    Ok(parser::process_page(&html, ctx))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}
