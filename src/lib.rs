pub mod config;
pub mod error;
pub mod store;
pub mod extract;
pub mod partition;
pub mod frontier;
pub mod hop;
pub mod merge;

pub use config::{Config, EdgeTable};
pub use error::{HarvestError, Result};
pub use extract::{extract_node, GraphNode};
pub use frontier::{build_root_frontier, FrontierRecord};
pub use hop::{run_hop, HopOutput};
