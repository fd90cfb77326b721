use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use shared::dataset::Dataset;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "assets/images.json")]
    dataset: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check page numbering, empty pages and duplicate keys or values.
    Validate,
    /// List pages with their pair counts.
    Summary {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Serialize)]
struct PageSummary {
    page: usize,
    pairs: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let dataset = Dataset::load(&cli.dataset)
        .with_context(|| format!("dataset '{}' is not usable", cli.dataset.display()))?;

    match cli.command {
        Command::Validate => {
            let pairs: usize = dataset.pages().map(|(_, page)| page.len()).sum();
            println!(
                "ok: {} page(s), {pairs} pair(s) in '{}'",
                dataset.page_count(),
                cli.dataset.display()
            );
        }
        Command::Summary { json } => {
            let summary = summarize(&dataset);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                for entry in &summary {
                    println!("page {}: {} pair(s)", entry.page, entry.pairs);
                }
            }
        }
    }

    Ok(())
}

fn summarize(dataset: &Dataset) -> Vec<PageSummary> {
    dataset
        .pages()
        .map(|(number, page)| PageSummary {
            page: number.0,
            pairs: page.len(),
        })
        .collect()
}
