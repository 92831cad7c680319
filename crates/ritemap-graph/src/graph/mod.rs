//! Reference graph module.
//!
//! # Overview
//!
//! This module turns a config tree of event/rite documents into a
//! deduplicated edge set, then optionally collapses event hops so that only
//! rite destinations remain.
//!
//! ## Pipeline
//!
//! ```text
//! config/<kind>/<id>.json
//!        ↓  build::discover_roots()
//! roots (every event/rite document)
//!        ↓  build::GraphBuilder::build()   (BFS, entry point (event, "0"))
//! EdgeSet (may target events, may contain cycles)
//!        ↓  collapse::collapse_events()
//! EdgeSet (rite targets only)
//!        ↓  stats::GraphStats::from_edges()
//! GraphStats (counts, cycles, content hash)
//! ```
//!
//! ## Typical Usage
//!
//! ```rust,ignore
//! use ritemap_graph::graph::{build::GraphBuilder, collapse::collapse_events, stats::GraphStats};
//!
//! let edges = GraphBuilder::strict(Path::new("config")).build()?;
//! let collapsed = collapse_events(&edges);
//! let stats = GraphStats::from_edges(&collapsed);
//! println!("edges={} rites={}", stats.edge_count, stats.rite_count);
//! ```

pub mod build;
pub mod collapse;
pub mod edges;
pub mod stats;

pub use build::{GraphBuilder, discover_roots, entry_point};
pub use collapse::collapse_events;
pub use edges::{Edge, EdgeSet};
pub use stats::GraphStats;
