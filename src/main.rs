// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Turn them into a validated CrawlConfig
// 3. Crawl and convert the site
// 4. Print the reports that were asked for
// 5. Exit with proper code (0 = crawl finished, 2 = error)
//
// Progress lines and log output go to stderr, the reports go to stdout, so
// `infoglue2md ... -r > rejected.tsv` captures just the report.
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - the validated crawl configuration
mod convert; // src/convert/ - page -> Markdown document
mod crawl; // src/crawl/ - frontier, link classification, crawl loop
mod error; // src/error.rs - error types
mod fetch; // src/fetch.rs - HTTP client
mod report; // src/report.rs - rejected/converted reports

use anyhow::Result;
use clap::Parser; // Parser trait enables the parse() method
use cli::Cli;
use config::CrawlConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Run our application logic and capture the exit code
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_tracing();

    let config = CrawlConfig::from_cli(&cli)?;
    if !config.silent {
        eprintln!(
            "Converting {}{} into {}",
            config.root.origin(),
            config.root.path,
            config.output_dir.display()
        );
    }

    let summary = crawl::run(&config).await?;

    if !config.silent {
        eprintln!(
            "Done: {} processed, {} seen, {} converted, {} rejected",
            summary.processed,
            summary.seen,
            summary.converted.len(),
            summary.rejected.len()
        );
    }

    if cli.rejected {
        print_rejected(&summary, cli.json)?;
    }
    if cli.converted {
        print_converted(&summary, cli.json)?;
    }

    Ok(0)
}

// Logs go to stderr; RUST_LOG overrides the default level
//
// Example: RUST_LOG=infoglue2md=debug shows every classified link
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_rejected(summary: &crawl::CrawlSummary, json: bool) -> Result<()> {
    let entries = report::rejected_entries(summary);
    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        print!("{}", report::rejected_tsv(&entries));
    }
    Ok(())
}

fn print_converted(summary: &crawl::CrawlSummary, json: bool) -> Result<()> {
    let entries = report::converted_entries(summary);
    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        print!("{}", report::converted_tsv(&entries));
    }
    Ok(())
}
