use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use match_core::{GameState, MatchController, TokioCelebrationTimer};
use shared::dataset::Dataset;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod render;
mod session;

use commands::parse_command;
use config::load_settings;
use render::render_board;
use session::{execute, Outcome};

#[derive(Parser, Debug)]
#[command(name = "image-match", about = "Match key images to value images, page by page")]
struct Args {
    /// Dataset JSON: {"1": {"key.png": "value.png", ...}, ...}
    #[arg(long)]
    dataset: Option<PathBuf>,
    #[arg(long)]
    config: Option<PathBuf>,
    /// Fixed shuffle seed for reproducible boards.
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    celebration_secs: Option<u64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(v) = args.dataset {
        settings.dataset_path = v;
    }
    if let Some(v) = args.seed {
        settings.shuffle_seed = Some(v);
    }
    if let Some(v) = args.celebration_secs {
        settings.celebration_window = Duration::from_secs(v);
    }

    let dataset = Dataset::load(&settings.dataset_path).with_context(|| {
        format!(
            "failed to load dataset from '{}'",
            settings.dataset_path.display()
        )
    })?;
    info!(
        path = %settings.dataset_path.display(),
        pages = dataset.page_count(),
        "dataset loaded"
    );

    let dataset = Arc::new(dataset);
    let state = match settings.shuffle_seed {
        Some(seed) => GameState::with_seed(dataset, seed),
        None => GameState::new(dataset),
    }
    .with_celebration_window(settings.celebration_window);

    let (timer_tx, mut timer_rx) = mpsc::unbounded_channel();
    let mut controller = MatchController::new(state, TokioCelebrationTimer::new(timer_tx));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", render_board(&controller.view()));
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read from stdin")? else {
                    break;
                };
                let outcome = parse_command(&line).and_then(|command| execute(&mut controller, command));
                match outcome {
                    Ok(Outcome::Quit) => break,
                    Ok(Outcome::Redraw) => println!("\n{}", render_board(&controller.view())),
                    Ok(Outcome::Notice(text)) => println!("{text}"),
                    Err(err) => println!("! {err:#}"),
                }
            }
            Some(event) = timer_rx.recv() => {
                let was_celebrating = controller.view().celebrating;
                if let Err(err) = controller.handle(event) {
                    warn!(error = %err, "timer event refused");
                }
                if was_celebrating && !controller.view().celebrating {
                    println!("\n{}", render_board(&controller.view()));
                }
            }
        }
    }

    info!(
        page = %controller.view().page,
        tries = controller.view().tries,
        "leaving game"
    );
    Ok(())
}
