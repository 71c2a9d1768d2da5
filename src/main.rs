mod api;
mod calendar;
mod catalog;
mod download_log;
mod downloader;
mod meeting;
mod parser;
mod settings;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use url::Url;

use crate::meeting::MeetingRecord;
use crate::settings::Settings;

#[derive(Parser)]
#[command(name = "fomc_collector", about = "Collect FOMC statements and projection materials")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse the FOMC calendar and optionally download the PDFs
    Collect {
        /// Directory to store PDFs and logs (default: data/fomc_statements)
        #[arg(long)]
        base_dir: Option<PathBuf>,
        /// Number of recent years to include
        #[arg(long, default_value_t = parser::DEFAULT_YEARS)]
        years: i32,
        /// Download PDFs after parsing metadata (otherwise metadata only)
        #[arg(long)]
        download: bool,
    },
    /// Serve the download log as a read-only JSON API
    Serve {
        /// Download log to serve (default: data/fomc_statements/download_log.csv)
        #[arg(long)]
        log_path: Option<PathBuf>,
        /// Address to listen on (default: 0.0.0.0:8000)
        #[arg(long)]
        bind: Option<SocketAddr>,
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
    let settings = Settings::load()?;

    let result = match cli.command {
        Commands::Collect { base_dir, years, download } => {
            let base_dir = base_dir.unwrap_or_else(|| settings.base_dir.clone());
            let source_url = Url::parse(&settings.calendar_url)
                .with_context(|| format!("Invalid calendar URL {:?}", settings.calendar_url))?;
            let client = calendar::build_client(settings.http_timeout())?;

            let html = calendar::fetch_calendar(&client, source_url.as_str()).await?;
            let meetings = parser::parse_calendar(&html, &source_url, years);
            println!("Found {} meetings in the last {} years.", meetings.len(), years);

            if download {
                let logger = download_log::DownloadLogger::open(&base_dir)?;
                let stats =
                    downloader::download_documents(&client, &meetings, &base_dir, &logger).await?;
                println!(
                    "Downloaded entries for {} meetings. Logs stored in {}.",
                    stats.meetings,
                    base_dir.display()
                );
            } else {
                print_meetings(&meetings);
                println!("Download flag not set; metadata collection only. Use --download to fetch PDFs.");
            }
            Ok(())
        }
        Commands::Serve { log_path, bind } => {
            let state = api::ApiState {
                log_path: log_path.unwrap_or_else(|| settings.log_path.clone()),
            };
            api::serve(state, bind.unwrap_or(settings.bind)).await
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn print_meetings(meetings: &[MeetingRecord]) {
    if meetings.is_empty() {
        return;
    }
    println!(
        "{:<10} | {:<40} | {:<9} | {:<10}",
        "Date", "Label", "Statement", "Projection"
    );
    println!("{}", "-".repeat(78));
    for m in meetings {
        println!(
            "{:<10} | {:<40} | {:<9} | {:<10}",
            m.meeting_date.format("%Y-%m-%d").to_string(),
            truncate(&m.label, 37),
            if m.statement_url.is_some() { "yes" } else { "-" },
            if m.projection_url.is_some() { "yes" } else { "-" },
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
