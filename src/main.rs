mod company;
mod fetch;
mod mode;
mod parser;
mod report;
mod scrape;
mod server;
mod settings;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};

use fetch::{ForumClient, PageSource};
use mode::ScrapeMode;
use settings::Settings;

#[derive(Parser)]
#[command(
    name = "placement_tally",
    about = "Tally internship and PPO offers from the placement forum notice board"
)]
struct Cli {
    /// Listing pages to scan (overrides config)
    #[arg(short = 'n', long, global = true)]
    max_pages: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tally internship offer threads
    Offers,
    /// Tally pre-placement offer threads
    Ppos,
    /// Run both scrapes (PPOs first) and print a combined summary
    Run {
        /// Print the JSON body the HTTP API would return
        #[arg(long)]
        json: bool,
    },
    /// Serve the results API over HTTP
    Serve {
        /// Address to bind (host:port, overrides config)
        #[arg(long)]
        bind: Option<String>,
    },
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let mut settings = Settings::load()?;
    if let Some(n) = cli.max_pages {
        settings.max_pages = n;
    }

    // Held here so the blocking client is never dropped inside the runtime.
    let source: Arc<dyn PageSource> = Arc::new(ForumClient::new(&settings)?);

    let result = match cli.command {
        Commands::Offers => scrape_one(source.as_ref(), &settings, ScrapeMode::Offers),
        Commands::Ppos => scrape_one(source.as_ref(), &settings, ScrapeMode::Ppos),
        Commands::Run { json } => {
            let run = report::run_combined(source.as_ref(), &settings)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&run.to_json())?);
            } else {
                println!("{}", report::render_console(&run.ppos));
                println!("{}", report::render_console(&run.internships));
                println!("{}", report::render_summary(&run.summary()));
            }
            Ok(())
        }
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                settings.bind = bind;
            }
            let state = server::AppState::new(settings, Arc::clone(&source));
            let runtime = tokio::runtime::Runtime::new().context("Failed to start runtime")?;
            runtime.block_on(server::serve(state))
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn scrape_one(source: &dyn PageSource, settings: &Settings, mode: ScrapeMode) -> anyhow::Result<()> {
    let report = scrape::scrape(source, settings, mode)
        .with_context(|| format!("Scraping {} failed", mode))?;
    println!("{}", report::render_console(&report));
    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    match d.as_secs() {
        s if s < 60 => format!("{:.1}s", d.as_secs_f64()),
        s => format!("{}m {:02}s", s / 60, s % 60),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn durations_read_in_seconds_then_minutes() {
        assert_eq!(format_duration(Duration::from_millis(4200)), "4.2s");
        assert_eq!(format_duration(Duration::from_secs(59)), "59.0s");
        assert_eq!(format_duration(Duration::from_secs(65)), "1m 05s");
        assert_eq!(format_duration(Duration::from_secs(3725)), "62m 05s");
    }
}
