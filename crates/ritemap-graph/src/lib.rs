#![forbid(unsafe_code)]
//! ritemap-graph library.
//!
//! # Conventions
//!
//! - **Errors**: Extraction returns [`ritemap_core::ExtractError`]; file I/O
//!   helpers use `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

use std::path::Path;

use tracing::{info, instrument};

use ritemap_core::ExtractError;

pub mod export;
pub mod graph;

pub use graph::{Edge, EdgeSet, GraphBuilder, GraphStats, collapse_events};

/// Run a full extraction over `config_dir`.
///
/// Builds the reference graph with the strict resolver and, if `collapse`
/// is set, removes event nodes as edge targets.
///
/// # Errors
///
/// Any load or classification failure aborts the run; there is no partial
/// result.
#[instrument]
pub fn extract(config_dir: &Path, collapse: bool) -> Result<EdgeSet, ExtractError> {
    let edges = GraphBuilder::strict(config_dir).build()?;
    if !collapse {
        return Ok(edges);
    }
    let collapsed = collapse_events(&edges);
    info!(
        before = edges.len(),
        after = collapsed.len(),
        "collapsed event hops"
    );
    Ok(collapsed)
}
