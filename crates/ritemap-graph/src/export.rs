//! Edge-list file format.
//!
//! A JSON array of `[source, target]` pairs, each node an object
//! `{typ, id, readable_id, description}`. Written four-space indented with
//! non-ASCII text kept verbatim.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::graph::edges::EdgeSet;

/// Serialize `edges` into `writer`.
pub fn write_edges<W: Write>(writer: W, edges: &EdgeSet) -> Result<()> {
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(writer, formatter);
    edges
        .serialize(&mut serializer)
        .context("failed to serialize edge list")?;
    Ok(())
}

/// Write `edges` to `path`, creating parent directories as needed.
pub fn write_edge_list(path: &Path, edges: &EdgeSet) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let file = File::create(path)
        .with_context(|| format!("failed to create output file {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write_edges(&mut out, edges)?;
    writeln!(out)?;
    out.flush()
        .with_context(|| format!("failed to flush {}", path.display()))?;
    Ok(())
}

/// Read an edge list previously written by [`write_edge_list`].
pub fn read_edge_list(path: &Path) -> Result<EdgeSet> {
    let file =
        File::open(path).with_context(|| format!("failed to open edge list {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse edge list {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ritemap_core::NodeId;
    use tempfile::TempDir;

    #[test]
    fn file_round_trip_keeps_metadata() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("out/graph.json");
        let edges: EdgeSet = [(
            NodeId::event("0"),
            NodeId::rite("2").with_metadata("宴会", "夜晚的聚会"),
        )]
        .into_iter()
        .collect();

        write_edge_list(&path, &edges).expect("write");
        let text = fs::read_to_string(&path).expect("read back");
        assert!(text.contains("宴会"), "non-ASCII must be written verbatim");
        assert!(text.contains("\n        {"), "four-space indentation");

        let loaded = read_edge_list(&path).expect("parse");
        assert_eq!(loaded, edges);
        let edge = loaded.iter().next().expect("edge");
        assert_eq!(edge.target.description, "夜晚的聚会");
    }

    #[test]
    fn empty_set_writes_empty_array() {
        let mut buf = Vec::new();
        write_edges(&mut buf, &EdgeSet::new()).expect("write");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "[]");
    }
}
