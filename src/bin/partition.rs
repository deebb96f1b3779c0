use anyhow::Result;
use clap::Parser;
use kbharvest::partition::partition_store;
use kbharvest::store::{JsonlStore, KbStore};
use kbharvest::Config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "partition")]
#[command(about = "Shard the knowledge-base dump into partitions for parallel hop scans")]
struct Args {
    /// Directory to save partitioned KB nodes
    #[arg(long, default_value = "kb_nodes")]
    partition_dir: PathBuf,

    /// Number of partitions to create (defaults to the configured value)
    #[arg(long)]
    num_partitions: Option<usize>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", "info")
    ).init();

    let args = Args::parse();
    let config = Config::load()?;

    log::info!("Loading KB dump from {}", config.extraction.kb_dump.display());
    let store = JsonlStore::open(&config.extraction.kb_dump)?;
    log::info!("KB loaded: {} node(s)", store.len());

    let num_partitions = args.num_partitions.unwrap_or(config.extraction.num_partitions);
    let paths = partition_store(&store, &config.edges, &args.partition_dir, num_partitions)?;

    log::info!(
        "Wrote {} partition file(s) to {}",
        paths.len(),
        args.partition_dir.display()
    );
    Ok(())
}
