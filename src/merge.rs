//! Merges per-hop terminal nodes and groups them by country.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::EdgeTable;
use crate::error::Result;
use crate::extract::GraphNode;

/// Title used when a node id has no entry in the page-title mapping.
pub const TITLE_NOT_FOUND: &str = "Title Not Found";

/// Group terminal nodes from all hop files by country.
///
/// Missing input files are logged and skipped, so partial merges still
/// succeed; a file that exists but fails to parse is fatal. Every known
/// country gets a group, empty or not. A node joins each matching country's
/// group at most once (full-equality de-duplication, evaluated per group),
/// and a node carrying several known country ids joins all of their groups.
/// Pasta, for instance, has both Italy and China as country of origin and
/// lands in both.
pub fn merge_hops(
    input_paths: &[PathBuf],
    titles: &HashMap<String, String>,
    countries: &BTreeMap<String, String>,
    edges: &EdgeTable,
) -> Result<BTreeMap<String, Vec<GraphNode>>> {
    let mut all_items: Vec<GraphNode> = Vec::new();
    for path in input_paths {
        if !path.exists() {
            log::error!("Input file not found: {}. Skipping...", path.display());
            continue;
        }
        let data = fs::read_to_string(path)?;
        let nodes: Vec<GraphNode> = serde_json::from_str(&data)?;
        all_items.extend(nodes);
    }

    let mut groups: BTreeMap<String, Vec<GraphNode>> = countries
        .values()
        .map(|name| (name.clone(), Vec::new()))
        .collect();

    for mut item in all_items {
        // Union of both country edge types, sorted so group append order is
        // stable across runs.
        let item_countries: BTreeSet<String> = item
            .edge(&edges.country_of_origin)
            .iter()
            .chain(item.edge(&edges.country).iter())
            .cloned()
            .collect();

        item.title = Some(
            titles
                .get(&item.id)
                .cloned()
                .unwrap_or_else(|| TITLE_NOT_FOUND.to_string()),
        );

        for country_id in &item_countries {
            if let Some(country_name) = countries.get(country_id) {
                if let Some(group) = groups.get_mut(country_name) {
                    if !group.contains(&item) {
                        group.push(item.clone());
                    }
                }
            }
        }
    }

    Ok(groups)
}

/// Write the grouped artifact as a pretty-printed JSON object mapping
/// country name to its node array (temp-then-rename).
pub fn write_groups(path: &Path, groups: &BTreeMap<String, Vec<GraphNode>>) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    {
        let file = fs::File::create(&tmp)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, groups)?;
        writer.flush()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}
