use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Main configuration structure
///
/// Holds every immutable table the pipeline needs: the seed concepts, the
/// edge-tag-to-property-id bindings, and the country table. Loaded once at
/// process start and passed explicitly into each stage; the traversal logic
/// never reads ambient global state.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub extraction: ExtractionConfig,
    pub edges: EdgeTable,
    /// Seed maps keyed by concept name; each maps a seed node id to its
    /// human-readable label.
    pub concepts: BTreeMap<String, BTreeMap<String, String>>,
    /// Known affiliation table: country node id -> country name.
    pub countries: BTreeMap<String, String>,
}

/// Paths and sizing for the extraction pipeline
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    /// Path to the knowledge-base dump (JSON lines, one node per line).
    pub kb_dump: PathBuf,
    /// Path to the id -> page-title mapping file (JSON lines).
    pub title_map: PathBuf,
    /// Prefix stripped from page ids when loading the title mapping.
    #[serde(default = "default_title_prefix")]
    pub title_prefix: String,
    /// The KB dump is large, so it is split into partitions small enough to
    /// fit in memory and process on one core.
    #[serde(default = "default_num_partitions")]
    pub num_partitions: usize,
    /// Worker-pool size for parallel partition scans.
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_title_prefix() -> String {
    "/wp/en/".to_string()
}

fn default_num_partitions() -> usize {
    200
}

fn default_workers() -> usize {
    64
}

/// The fixed set of edge types the traversal consults, bound to the property
/// ids they carry in the underlying KB.
#[derive(Debug, Clone, Deserialize)]
pub struct EdgeTable {
    pub instance_of: String,
    pub subclass_of: String,
    pub country_of_origin: String,
    pub country: String,
    /// Additional configured properties (e.g. cuisine, part of). Their
    /// values are retained during extraction but the traversal itself never
    /// consults them.
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl EdgeTable {
    /// All property ids whose values survive node extraction.
    pub fn useful_ids(&self) -> Vec<&str> {
        let mut ids = vec![
            self.instance_of.as_str(),
            self.subclass_of.as_str(),
            self.country_of_origin.as_str(),
            self.country.as_str(),
        ];
        ids.extend(self.extra.values().map(String::as_str));
        ids
    }
}

impl Config {
    /// Load configuration from file
    ///
    /// Looks for the config file in this order:
    /// 1. Path specified in KBHARVEST_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("KBHARVEST_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&config_str)
            .context("Failed to parse config.toml")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.extraction.num_partitions == 0 {
            anyhow::bail!("extraction.num_partitions must be greater than 0");
        }

        if self.extraction.workers == 0 {
            anyhow::bail!("extraction.workers must be greater than 0");
        }

        if self.concepts.is_empty() {
            anyhow::bail!("At least one [concepts.<name>] table is required");
        }

        for (name, seed_map) in &self.concepts {
            if seed_map.is_empty() {
                anyhow::bail!("Concept '{}' has no seed nodes", name);
            }
        }

        if self.countries.is_empty() {
            anyhow::bail!("The [countries] table must not be empty");
        }

        Ok(())
    }

    /// Seed map for one concept.
    ///
    /// Unknown concept names are rejected here, before any traversal work
    /// begins; they are never silently defaulted.
    pub fn concept(&self, name: &str) -> Result<&BTreeMap<String, String>> {
        self.concepts.get(name).ok_or_else(|| {
            anyhow::anyhow!(
                "Invalid concept: {} (known concepts: {})",
                name,
                self.concepts.keys().cloned().collect::<Vec<_>>().join(", ")
            )
        })
    }
}
