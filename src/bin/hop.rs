use anyhow::Result;
use clap::Parser;
use kbharvest::frontier::{load_frontier, save_frontier};
use kbharvest::hop::{list_partitions, run_hop};
use kbharvest::partition::write_nodes;
use kbharvest::Config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "hop")]
#[command(about = "Expand the traversal frontier by one hop across all KB partitions")]
struct Args {
    /// Path to the previous (input) frontier cache file
    #[arg(long)]
    prev_cache_path: PathBuf,

    /// Path to write the next frontier cache file
    #[arg(long)]
    next_cache_path: PathBuf,

    /// Current hop number, used to name the terminal-output file
    #[arg(long, default_value_t = 1)]
    current_hop: u32,

    /// Directory to save the terminal-output file
    #[arg(long)]
    output_dir: PathBuf,

    /// Filename of the JSON file to store terminal nodes
    #[arg(long)]
    json_filename: String,

    /// Directory containing KB partitions
    #[arg(long)]
    partition_dir: PathBuf,

    /// Worker-pool size (defaults to the configured value)
    #[arg(long)]
    workers: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", "info")
    ).init();

    let args = Args::parse();
    let config = Config::load()?;

    let frontier = load_frontier(&args.prev_cache_path)?;
    let partitions = list_partitions(&args.partition_dir)?;
    log::info!(
        "Hop {}: frontier of {} id(s) over {} partition(s)",
        args.current_hop,
        frontier.len(),
        partitions.len()
    );

    let workers = args.workers.unwrap_or(config.extraction.workers);
    let result = run_hop(partitions, frontier, config.edges.clone(), workers).await?;

    std::fs::create_dir_all(&args.output_dir)?;
    let output_path = args
        .output_dir
        .join(format!("{}_hop_{}", args.current_hop, args.json_filename));

    // Both outputs land only after every partition scan succeeded; each is
    // written via temp-then-rename, so a failed hop commits nothing.
    write_nodes(&output_path, &result.terminal)?;
    save_frontier(&args.next_cache_path, &result.next_frontier)?;

    log::info!(
        "Hop {} complete: {} terminal node(s) -> {}, {} next-frontier id(s) -> {}",
        args.current_hop,
        result.terminal.len(),
        output_path.display(),
        result.next_frontier.len(),
        args.next_cache_path.display()
    );
    Ok(())
}
