//! Frontier records and the root-cache builder.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{HarvestError, Result};

/// One frontier entry: a node id to expand, its human-readable name, and
/// the original seed label it traces back to.
///
/// `root` never changes once assigned at frontier creation; every node
/// reached through this entry inherits it unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontierRecord {
    pub id: String,
    pub name: String,
    pub root: String,
}

/// Build the hop-1 frontier from a concept's seed map.
///
/// For the first hop a seed's root is its own label. Output order follows
/// the seed map's (sorted) iteration order, so reruns are deterministic.
pub fn build_root_frontier(seed_map: &BTreeMap<String, String>) -> Vec<FrontierRecord> {
    seed_map
        .iter()
        .map(|(id, name)| FrontierRecord {
            id: id.clone(),
            name: name.clone(),
            root: name.clone(),
        })
        .collect()
}

/// Write a frontier as a pretty-printed JSON array (temp-then-rename).
pub fn save_frontier(path: &Path, records: &[FrontierRecord]) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    {
        let file = fs::File::create(&tmp)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.flush()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Load a frontier cache file.
///
/// A missing or unparsable file is fatal: a hop cannot run without its
/// input frontier.
pub fn load_frontier(path: &Path) -> Result<Vec<FrontierRecord>> {
    let data = fs::read_to_string(path).map_err(|e| {
        HarvestError::Frontier(format!("cannot read frontier {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&data).map_err(|e| {
        HarvestError::Frontier(format!("unparsable frontier {}: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_build_root_frontier_root_equals_name() {
        let seed_map: BTreeMap<String, String> = [
            ("Q2095".to_string(), "food".to_string()),
            ("Q746549".to_string(), "dish".to_string()),
        ]
        .into_iter()
        .collect();

        let frontier = build_root_frontier(&seed_map);
        assert_eq!(frontier.len(), 2);
        for record in &frontier {
            assert_eq!(record.root, record.name);
        }
    }

    #[test]
    fn test_build_root_frontier_deterministic_order() {
        let seed_map: BTreeMap<String, String> = [
            ("Q746549".to_string(), "dish".to_string()),
            ("Q2095".to_string(), "food".to_string()),
        ]
        .into_iter()
        .collect();

        let frontier = build_root_frontier(&seed_map);
        // BTreeMap iteration: sorted by id.
        assert_eq!(frontier[0].id, "Q2095");
        assert_eq!(frontier[1].id, "Q746549");
        assert_eq!(frontier, build_root_frontier(&seed_map));
    }

    #[test]
    fn test_frontier_file_shape() {
        let seed_map: BTreeMap<String, String> =
            [("Q2095".to_string(), "food".to_string())].into_iter().collect();
        let frontier = build_root_frontier(&seed_map);

        let json = serde_json::to_value(&frontier).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{"id": "Q2095", "name": "food", "root": "food"}])
        );
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cuisine_root_nodes.json");
        let frontier = vec![FrontierRecord {
            id: "Q2095".to_string(),
            name: "food".to_string(),
            root: "food".to_string(),
        }];

        save_frontier(&path, &frontier).unwrap();
        assert_eq!(load_frontier(&path).unwrap(), frontier);
    }

    #[test]
    fn test_load_missing_frontier_is_fatal() {
        let result = load_frontier(Path::new("/no/such/frontier.json"));
        assert!(matches!(result, Err(HarvestError::Frontier(_))));
    }

    #[test]
    fn test_load_unparsable_frontier_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not a frontier").unwrap();
        let result = load_frontier(&path);
        assert!(matches!(result, Err(HarvestError::Frontier(_))));
    }
}
