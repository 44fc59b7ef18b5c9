//! One-shot recommendations from the command line
//! Usage: recommend --snapshot scaled_dataset.csv "Blinding Lights" "Shape of You"

use anyhow::{Context, Result};
use clap::Parser;
use std::fmt::Write;
use std::path::PathBuf;

use beatwise_api::{
    catalog::Catalog,
    models::Recommendations,
    services::{self, DEFAULT_RECOMMENDATIONS},
};

#[derive(Debug, Parser)]
#[command(name = "recommend", version, about = "Recommend songs similar to the given titles")]
struct Cli {
    /// Standardized feature snapshot (CSV)
    #[arg(long, default_value = "scaled_dataset.csv")]
    snapshot: PathBuf,

    /// Number of recommendations
    #[arg(short = 'k', long = "count", default_value_t = DEFAULT_RECOMMENDATIONS)]
    count: usize,

    /// Seed song titles
    #[arg(required = true)]
    songs: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let catalog = Catalog::load(&cli.snapshot)
        .with_context(|| format!("Failed to load snapshot {}", cli.snapshot.display()))?;

    let result = services::recommend(&catalog, cli.songs.as_slice(), cli.count);
    print!("{}", render(&result));

    Ok(())
}

/// Human readable report of a scoring run
fn render(result: &Recommendations) -> String {
    let mut out = String::new();

    for seed in &result.seeds {
        let _ = writeln!(out, "Found: {} ({}) by {}", seed.name, seed.year, seed.artists);
    }
    for missing in &result.missing {
        let _ = writeln!(out, "Song '{}' not found in the dataset.", missing.trim());
    }

    if result.no_valid_seeds() {
        out.push_str("No valid input songs found.\n");
        return out;
    }

    out.push_str("\nRecommended Songs:\n");
    for item in &result.items {
        let _ = writeln!(
            out,
            "{} ({}) by {} - Score: {:.4}",
            item.name, item.year, item.artists, item.similarity_score
        );
    }

    out
}
