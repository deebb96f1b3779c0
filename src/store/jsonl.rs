//! JSON-lines knowledge-base dump reader.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{HarvestError, Result};
use crate::store::{KbStore, RawNode};

/// A KB dump stored as JSON lines, one raw node per line:
/// `{"id": "Q9", "name": "feijoada", "claims": "P31: Q2095\nP495: Q155"}`.
///
/// Opening counts the nodes once so partition sizing can be computed without
/// holding the dump in memory; iteration re-reads the file per pass.
pub struct JsonlStore {
    path: PathBuf,
    len: usize,
}

impl JsonlStore {
    /// Open a dump and freeze it for reading.
    ///
    /// Failure here is fatal for the pipeline: nothing downstream can run
    /// without the graph.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            HarvestError::Store(format!("cannot open KB dump {}: {}", path.display(), e))
        })?;

        let mut len = 0usize;
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| {
                HarvestError::Store(format!("cannot read KB dump {}: {}", path.display(), e))
            })?;
            if !line.trim().is_empty() {
                len += 1;
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            len,
        })
    }
}

impl KbStore for JsonlStore {
    fn len(&self) -> usize {
        self.len
    }

    fn iter(&self) -> Box<dyn Iterator<Item = Result<RawNode>> + '_> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) => {
                let err = HarvestError::Store(format!(
                    "cannot open KB dump {}: {}",
                    self.path.display(),
                    e
                ));
                return Box::new(std::iter::once(Err(err)));
            }
        };

        Box::new(BufReader::new(file).lines().filter_map(|line| match line {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(
                serde_json::from_str::<RawNode>(&line)
                    .map_err(|e| HarvestError::Store(format!("bad dump line: {}", e))),
            ),
            Err(e) => Some(Err(HarvestError::Io(e))),
        }))
    }
}
