//! `ritemap export`: extract the reference graph and write the edge list.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::Args;
use serde::Serialize;
use tracing::info;

use ritemap_core::config::{Overrides, resolve_config};
use ritemap_graph::GraphStats;
use ritemap_graph::export::write_edge_list;

use crate::output::{CliError, OutputMode, pretty_kv, pretty_section, render_error, render_mode};

#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Config root holding the `event/` and `rite/` directories.
    #[arg(long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Edge-list file to write.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Keep event nodes as edge targets instead of collapsing them.
    #[arg(long)]
    pub no_collapse: bool,
}

#[derive(Debug, Serialize)]
struct ExportSummary {
    output: String,
    collapsed: bool,
    edges: usize,
    nodes: usize,
    events: usize,
    rites: usize,
    content_hash: String,
}

pub fn run_export(args: &ExportArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let config = resolve_config(
        project_root,
        &Overrides {
            config_dir: args.config_dir.clone(),
            output: args.output.clone(),
            no_collapse: args.no_collapse,
            strict: false,
        },
    )?;

    let edges = match ritemap_graph::extract(&config.config_dir, config.collapse) {
        Ok(edges) => edges,
        Err(err) => {
            render_error(output, &CliError::from(&err))?;
            return Err(err).context("extraction aborted; no edge list written");
        }
    };

    write_edge_list(&config.output, &edges)?;
    info!(path = %config.output.display(), edges = edges.len(), "wrote edge list");

    let stats = GraphStats::from_edges(&edges);
    let summary = ExportSummary {
        output: config.output.display().to_string(),
        collapsed: config.collapse,
        edges: stats.edge_count,
        nodes: stats.node_count,
        events: stats.event_count,
        rites: stats.rite_count,
        content_hash: stats.content_hash,
    };

    render_mode(
        output,
        &summary,
        |s, w| {
            writeln!(w, "output {}", s.output)?;
            writeln!(w, "edges {}", s.edges)?;
            writeln!(w, "nodes {}", s.nodes)?;
            writeln!(w, "hash {}", s.content_hash)
        },
        |s, w| {
            pretty_section(w, "Reference graph exported")?;
            pretty_kv(w, "Output", &s.output)?;
            pretty_kv(w, "Collapsed", if s.collapsed { "yes" } else { "no" })?;
            pretty_kv(w, "Edges", s.edges.to_string())?;
            pretty_kv(
                w,
                "Nodes",
                format!("{} ({} events, {} rites)", s.nodes, s.events, s.rites),
            )?;
            pretty_kv(w, "Hash", &s.content_hash)
        },
    )
}
