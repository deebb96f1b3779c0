use anyhow::Result;
use clap::Parser;
use kbharvest::frontier::{build_root_frontier, save_frontier};
use kbharvest::Config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "root-cache")]
#[command(about = "Create the JSON cache of root nodes that seeds the KB traversal")]
struct Args {
    /// Name of the concept being considered (see [concepts] in config.toml)
    #[arg(long)]
    concept: String,

    /// Directory to store the JSON cache file of root nodes
    #[arg(long)]
    root_cache_dir: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", "info")
    ).init();

    let args = Args::parse();
    let config = Config::load()?;

    // Unknown concepts are rejected here, before any file is touched.
    let seed_map = config.concept(&args.concept)?;

    std::fs::create_dir_all(&args.root_cache_dir)?;
    let output_path = args
        .root_cache_dir
        .join(format!("{}_root_nodes.json", args.concept));

    // Checkpoint guarantee: an existing root cache is never overwritten.
    if output_path.exists() {
        log::info!(
            "Root cache {} already exists, skipping",
            output_path.display()
        );
        return Ok(());
    }

    let frontier = build_root_frontier(seed_map);
    save_frontier(&output_path, &frontier)?;
    log::info!(
        "Wrote {} root node(s) to {}",
        frontier.len(),
        output_path.display()
    );
    Ok(())
}
