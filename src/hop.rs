//! One-hop frontier expansion across the partitioned knowledge base.
//!
//! Each hop is a pure function of (frontier, partitions): every shard is
//! scanned independently by a bounded pool of blocking tasks, the scans are
//! joined, and the per-partition outputs are concatenated. No cross-hop
//! state exists beyond the files the caller passes in.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::future::try_join_all;
use tokio::sync::Semaphore;
use walkdir::WalkDir;

use crate::config::EdgeTable;
use crate::error::{HarvestError, Result};
use crate::extract::GraphNode;
use crate::frontier::FrontierRecord;

/// Read-only frontier lookup shared by all partition scans: (id, root)
/// pairs in frontier order.
#[derive(Debug, Clone, Default)]
pub struct FrontierIndex {
    entries: Vec<(String, String)>,
}

impl FrontierIndex {
    pub fn new(frontier: &[FrontierRecord]) -> Self {
        Self {
            entries: frontier
                .iter()
                .map(|record| (record.id.clone(), record.root.clone()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Output of scanning one partition, or of a whole hop after aggregation.
#[derive(Debug, Default)]
pub struct HopOutput {
    /// Matched nodes that already carry a country association.
    pub terminal: Vec<GraphNode>,
    /// Matched nodes without one; they seed the next hop's frontier.
    pub next_frontier: Vec<FrontierRecord>,
}

/// Classify every node of one partition against the frontier.
///
/// A node matches if any frontier id appears among its subclass-of or
/// instance-of values. The first frontier id to match, in frontier order,
/// assigns the node's root and the remaining frontier ids are not
/// consulted. That tie-break is a reproducibility contract: reruns over the
/// same frontier file assign identical roots, though reordering the
/// frontier itself may assign differently.
///
/// Matched nodes with a country-of-origin or country edge are terminal;
/// other matched nodes derive a next-frontier record; unmatched nodes are
/// dropped from this hop entirely.
pub fn scan_partition(
    nodes: Vec<GraphNode>,
    index: &FrontierIndex,
    edges: &EdgeTable,
) -> HopOutput {
    let mut out = HopOutput::default();

    for mut node in nodes {
        let matched = index.entries.iter().find(|(root_id, _)| {
            node.connects(&edges.subclass_of, root_id)
                || node.connects(&edges.instance_of, root_id)
        });
        let Some((_, root)) = matched else {
            continue;
        };
        let root = root.clone();
        node.root = Some(root.clone());

        let has_country = !node.edge(&edges.country_of_origin).is_empty()
            || !node.edge(&edges.country).is_empty();
        if has_country {
            out.terminal.push(node);
        } else {
            out.next_frontier.push(FrontierRecord {
                // Nodes that failed name extraction fall back to their id.
                name: node.name.clone().unwrap_or_else(|| node.id.clone()),
                id: node.id,
                root,
            });
        }
    }

    out
}

/// Load one shard. A missing or corrupt shard is fatal for the hop.
fn read_partition(path: &Path) -> Result<Vec<GraphNode>> {
    let data = fs::read_to_string(path).map_err(|e| {
        HarvestError::Partition(format!("cannot read partition {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&data).map_err(|e| {
        HarvestError::Partition(format!("unparsable partition {}: {}", path.display(), e))
    })
}

/// Discover shard files (`*.json`) directly under the partition directory,
/// sorted by path for a stable scan order.
pub fn list_partitions(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("json"))
        .collect();
    paths.sort();
    Ok(paths)
}

/// Expand the frontier by one hop over all partition shards.
///
/// Each shard scan runs as an independent blocking task; `workers` bounds
/// how many run at once. The call blocks at the join barrier until every
/// scan finishes, then concatenates the per-partition outputs. Consumers
/// must not rely on cross-partition output order. The first failing shard
/// aborts the whole hop; nothing is written here, so a failed hop commits
/// no partial results and can simply be re-run.
///
/// An empty frontier or an empty partition set yields empty outputs.
pub async fn run_hop(
    partitions: Vec<PathBuf>,
    frontier: Vec<FrontierRecord>,
    edges: EdgeTable,
    workers: usize,
) -> Result<HopOutput> {
    if workers == 0 {
        return Err(HarvestError::Config(
            "workers must be greater than 0".to_string(),
        ));
    }

    let index = Arc::new(FrontierIndex::new(&frontier));
    let edges = Arc::new(edges);
    let pool = Arc::new(Semaphore::new(workers));

    let tasks = partitions.into_iter().map(|path| {
        let index = Arc::clone(&index);
        let edges = Arc::clone(&edges);
        let pool = Arc::clone(&pool);
        async move {
            let _permit = pool
                .acquire_owned()
                .await
                .map_err(|e| HarvestError::Task(e.to_string()))?;
            tokio::task::spawn_blocking(move || {
                let nodes = read_partition(&path)?;
                Ok::<HopOutput, HarvestError>(scan_partition(nodes, &index, &edges))
            })
            .await
            .map_err(|e| HarvestError::Task(e.to_string()))?
        }
    });

    let results = try_join_all(tasks).await?;

    let mut out = HopOutput::default();
    for partition_result in results {
        out.terminal.extend(partition_result.terminal);
        out.next_frontier.extend(partition_result.next_frontier);
    }
    Ok(out)
}
