//! Shards the knowledge base into fixed-size partitions for parallel scans.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::EdgeTable;
use crate::error::{HarvestError, Result};
use crate::extract::{extract_node, GraphNode};
use crate::store::KbStore;

/// Write `nodes` to `path` as a pretty-printed JSON array.
///
/// Writes to a temporary sibling first and renames into place, so a failed
/// run never leaves a partial artifact behind.
pub fn write_nodes(path: &Path, nodes: &[GraphNode]) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    {
        let file = fs::File::create(&tmp)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, nodes)?;
        writer.flush()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Split the store into shard files under `out_dir`.
///
/// Shard size is `len / num_partitions + 1`; the store is streamed once and
/// shards fill in store iteration order, so reruns over the same dump
/// produce identical shard files and identical downstream hop numbering.
/// The final flush always writes a last shard, even an empty one, so an
/// empty store still yields one shard file. Returns the shard paths in
/// creation order.
pub fn partition_store(
    store: &dyn KbStore,
    edges: &EdgeTable,
    out_dir: &Path,
    num_partitions: usize,
) -> Result<Vec<PathBuf>> {
    if num_partitions == 0 {
        return Err(HarvestError::Config(
            "num_partitions must be greater than 0".to_string(),
        ));
    }
    fs::create_dir_all(out_dir)?;

    let shard_size = store.len() / num_partitions + 1;
    let mut buffer: Vec<GraphNode> = Vec::with_capacity(shard_size);
    let mut paths: Vec<PathBuf> = Vec::new();

    for raw in store.iter() {
        let raw = raw?;
        buffer.push(extract_node(&raw, edges));
        if buffer.len() == shard_size {
            let path = out_dir.join(format!("partition_{}.json", paths.len()));
            write_nodes(&path, &buffer)?;
            buffer.clear();
            paths.push(path);
        }
    }

    // Final (possibly short) shard absorbs the remainder.
    let path = out_dir.join(format!("partition_{}.json", paths.len()));
    write_nodes(&path, &buffer)?;
    paths.push(path);

    log::info!(
        "Partitioned {} node(s) into {} shard(s) in {}",
        store.len(),
        paths.len(),
        out_dir.display()
    );
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::JsonlStore;
    use std::io::Write as _;
    use tempfile::TempDir;

    fn edge_table() -> EdgeTable {
        EdgeTable {
            instance_of: "P31".to_string(),
            subclass_of: "P279".to_string(),
            country_of_origin: "P495".to_string(),
            country: "P17".to_string(),
            extra: Default::default(),
        }
    }

    fn dump_with_nodes(n: usize) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for i in 0..n {
            writeln!(
                file,
                r#"{{"id": "Q{}", "name": "node {}", "claims": "P31: Q5"}}"#,
                i, i
            )
            .unwrap();
        }
        file.flush().unwrap();
        file
    }

    fn read_shard(path: &Path) -> Vec<GraphNode> {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_partition_completeness() {
        let dump = dump_with_nodes(10);
        let store = JsonlStore::open(dump.path()).unwrap();
        let out = TempDir::new().unwrap();

        let paths = partition_store(&store, &edge_table(), out.path(), 3).unwrap();

        // shard_size = 10 / 3 + 1 = 4, so shards hold 4, 4 and the remainder.
        assert_eq!(paths.len(), 3);
        let sizes: Vec<usize> = paths.iter().map(|p| read_shard(p).len()).collect();
        assert_eq!(sizes, vec![4, 4, 2]);

        // Union of all shards equals the full node set, in iteration order.
        let all: Vec<GraphNode> = paths.iter().flat_map(|p| read_shard(p)).collect();
        assert_eq!(all.len(), 10);
        for (i, node) in all.iter().enumerate() {
            assert_eq!(node.id, format!("Q{}", i));
        }
    }

    #[test]
    fn test_partition_exact_multiple_writes_trailing_empty_shard() {
        let dump = dump_with_nodes(4);
        let store = JsonlStore::open(dump.path()).unwrap();
        let out = TempDir::new().unwrap();

        // shard_size = 4 / 4 + 1 = 2; the final flush still runs.
        let paths = partition_store(&store, &edge_table(), out.path(), 4).unwrap();
        let sizes: Vec<usize> = paths.iter().map(|p| read_shard(p).len()).collect();
        assert_eq!(sizes, vec![2, 2, 0]);
    }

    #[test]
    fn test_partition_empty_store_yields_one_shard() {
        let dump = dump_with_nodes(0);
        let store = JsonlStore::open(dump.path()).unwrap();
        let out = TempDir::new().unwrap();

        let paths = partition_store(&store, &edge_table(), out.path(), 5).unwrap();
        assert_eq!(paths.len(), 1);
        assert!(read_shard(&paths[0]).is_empty());
    }

    #[test]
    fn test_partition_fewer_nodes_than_partitions() {
        let dump = dump_with_nodes(2);
        let store = JsonlStore::open(dump.path()).unwrap();
        let out = TempDir::new().unwrap();

        // shard_size = 2 / 8 + 1 = 1; shards clamp to the node count.
        let paths = partition_store(&store, &edge_table(), out.path(), 8).unwrap();
        let sizes: Vec<usize> = paths.iter().map(|p| read_shard(p).len()).collect();
        assert_eq!(sizes, vec![1, 1, 0]);
    }

    #[test]
    fn test_partition_zero_count_is_config_error() {
        let dump = dump_with_nodes(3);
        let store = JsonlStore::open(dump.path()).unwrap();
        let out = TempDir::new().unwrap();

        let result = partition_store(&store, &edge_table(), out.path(), 0);
        assert!(matches!(result, Err(HarvestError::Config(_))));
    }

    #[test]
    fn test_partition_is_deterministic_across_reruns() {
        let dump = dump_with_nodes(7);
        let store = JsonlStore::open(dump.path()).unwrap();
        let out_a = TempDir::new().unwrap();
        let out_b = TempDir::new().unwrap();

        let paths_a = partition_store(&store, &edge_table(), out_a.path(), 2).unwrap();
        let paths_b = partition_store(&store, &edge_table(), out_b.path(), 2).unwrap();

        assert_eq!(paths_a.len(), paths_b.len());
        for (a, b) in paths_a.iter().zip(&paths_b) {
            assert_eq!(read_shard(a), read_shard(b));
        }
    }

    #[test]
    fn test_write_nodes_leaves_no_temp_file() {
        let out = TempDir::new().unwrap();
        let path = out.path().join("partition_0.json");
        write_nodes(&path, &[]).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
    }
}
