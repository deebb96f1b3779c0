use anyhow::Result;
use clap::Parser;
use kbharvest::merge::{merge_hops, write_groups};
use kbharvest::store::load_title_map;
use kbharvest::Config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "merge")]
#[command(about = "Merge terminal nodes from all hop files and group them by country")]
struct Args {
    /// Comma-separated list of input hop files
    #[arg(long, value_delimiter = ',', required = true)]
    input_filepaths: Vec<PathBuf>,

    /// Path to the output JSON file
    #[arg(long)]
    output_filepath: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", "info")
    ).init();

    let args = Args::parse();
    let config = Config::load()?;

    let titles = load_title_map(
        &config.extraction.title_map,
        &config.extraction.title_prefix,
    )?;

    let groups = merge_hops(
        &args.input_filepaths,
        &titles,
        &config.countries,
        &config.edges,
    )?;

    if let Some(parent) = args.output_filepath.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    write_groups(&args.output_filepath, &groups)?;

    let total: usize = groups.values().map(Vec::len).sum();
    log::info!(
        "Merged {} grouped node(s) across {} countries into {}",
        total,
        groups.len(),
        args.output_filepath.display()
    );
    Ok(())
}
