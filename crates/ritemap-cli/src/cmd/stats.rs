//! `ritemap stats`: summarize a previously exported edge list.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use ritemap_core::config::{Overrides, resolve_config};
use ritemap_graph::GraphStats;
use ritemap_graph::export::read_edge_list;

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

#[derive(Args, Debug, Default)]
pub struct StatsArgs {
    /// Edge list to read (defaults to the configured export output).
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,
}

pub fn run_stats(args: &StatsArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let config = resolve_config(
        project_root,
        &Overrides {
            output: args.input.clone(),
            ..Overrides::default()
        },
    )?;
    let edges = read_edge_list(&config.output)?;
    let stats = GraphStats::from_edges(&edges);

    render_mode(
        output,
        &stats,
        |s, w| {
            writeln!(w, "nodes {}", s.node_count)?;
            writeln!(w, "edges {}", s.edge_count)?;
            writeln!(w, "events {}", s.event_count)?;
            writeln!(w, "rites {}", s.rite_count)?;
            writeln!(w, "cycles {}", s.cycle_count)?;
            writeln!(w, "hash {}", s.content_hash)
        },
        |s, w| {
            pretty_section(w, "Reference graph")?;
            pretty_kv(w, "Nodes", s.node_count.to_string())?;
            pretty_kv(w, "Edges", s.edge_count.to_string())?;
            pretty_kv(w, "Events", s.event_count.to_string())?;
            pretty_kv(w, "Rites", s.rite_count.to_string())?;
            pretty_kv(w, "Cycles", s.cycle_count.to_string())?;
            pretty_kv(w, "Sources", s.source_only_count.to_string())?;
            pretty_kv(w, "Max in", s.max_in_degree.to_string())?;
            pretty_kv(w, "Max out", s.max_out_degree.to_string())?;
            pretty_kv(w, "Hash", &s.content_hash)
        },
    )
}
