//! Opaque knowledge-base store capability.
//!
//! The concrete dump format stays behind the [`KbStore`] trait: the pipeline
//! only needs to open a store, ask its size, and iterate raw nodes. The
//! shipped implementation reads a JSON-lines dump; other backends can plug
//! in behind the same trait.

pub mod jsonl;

pub use jsonl::JsonlStore;

use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{HarvestError, Result};

/// A raw node handle yielded by a store: an identifier, an optional
/// human-readable name, and the node's claims serialized one per line in
/// `tag: value` form.
#[derive(Debug, Clone, Deserialize)]
pub struct RawNode {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub claims: String,
}

/// Read-only knowledge-base store: frozen at open time, then iterated.
pub trait KbStore {
    /// Number of nodes in the store.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate raw nodes in a stable, store-defined order.
    fn iter(&self) -> Box<dyn Iterator<Item = Result<RawNode>> + '_>;
}

/// One record of the external page-title mapping.
#[derive(Debug, Deserialize)]
struct TitleRecord {
    page: String,
    #[serde(default)]
    qid: Option<String>,
}

/// Load the node-id -> page-title mapping from a JSON-lines file.
///
/// Records without a `qid` are skipped, and `prefix` is stripped from page
/// ids (wiki page ids carry a language-path prefix). A line that fails to
/// decode is logged and skipped rather than failing the whole load.
pub fn load_title_map(path: &Path, prefix: &str) -> Result<HashMap<String, String>> {
    let file = File::open(path).map_err(|e| {
        HarvestError::Store(format!("cannot open title map {}: {}", path.display(), e))
    })?;

    let mut mapping = HashMap::new();
    for (lineno, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: TitleRecord = match serde_json::from_str(&line) {
            Ok(record) => record,
            Err(e) => {
                log::warn!("Skipping title-map line {}: {}", lineno + 1, e);
                continue;
            }
        };
        let Some(qid) = record.qid else { continue };
        let page = record
            .page
            .strip_prefix(prefix)
            .unwrap_or(&record.page)
            .to_string();
        mapping.insert(qid, page);
    }

    log::info!("Extracted {} title mappings", mapping.len());
    Ok(mapping)
}
