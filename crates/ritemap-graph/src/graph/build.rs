//! Reference-graph construction from a config directory.
//!
//! # Overview
//!
//! [`discover_roots`] walks the config tree and treats every `*.json` file
//! under a directory named `event` or `rite` as a traversal root. The
//! [`GraphBuilder`] then runs a breadth-first traversal from each root,
//! recording an edge from every expanded node to each of its children.
//!
//! ## Entry point
//!
//! Documents carry no root marker, so every discovered root also receives an
//! edge from the synthetic node `(event, "0")` ([`entry_point`]). Consumers
//! get a single conceptual root for the whole graph.
//!
//! ## Termination
//!
//! Events and rites reference each other cyclically. Children are enqueued
//! unconditionally; the visited check at dequeue time guarantees each node
//! is expanded at most once per builder.
//!
//! ## Metadata
//!
//! Edge endpoints carry readable id and description as computed when the
//! edge is recorded. Both are pure functions of the loaded document.

#![allow(clippy::module_name_repetitions)]

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet, VecDeque};
use std::io;
use std::path::Path;

use tracing::{debug, info, instrument};
use walkdir::WalkDir;

use ritemap_core::{ActionResolver, ExtractError, Loader, Node, NodeId, NodeKind};

use crate::graph::edges::EdgeSet;

/// Id of the synthetic entry-point event.
pub const ENTRY_POINT_ID: &str = "0";

/// The synthetic node every discovered root hangs from.
#[must_use]
pub fn entry_point() -> NodeId {
    NodeId::event(ENTRY_POINT_ID)
}

/// Find every document under `config_dir` that lives in an `event` or
/// `rite` directory, at any depth.
///
/// The id is the file name up to its first `.`. Results follow a sorted walk
/// of the tree, so discovery order is deterministic.
///
/// # Errors
///
/// Returns [`ExtractError::Io`] if the tree cannot be walked.
pub fn discover_roots(config_dir: &Path) -> Result<Vec<NodeId>, ExtractError> {
    let mut roots = Vec::new();
    for entry in WalkDir::new(config_dir).sort_by_file_name() {
        let entry = entry.map_err(|err| ExtractError::Io {
            path: err.path().unwrap_or(config_dir).to_path_buf(),
            source: io::Error::from(err),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Some(file_name) = entry.file_name().to_str() else {
            continue;
        };
        if !file_name.ends_with(".json") {
            continue;
        }

        let kind = entry
            .path()
            .parent()
            .and_then(Path::file_name)
            .and_then(|name| name.to_str())
            .and_then(NodeKind::from_dir_name);
        let Some(kind) = kind else {
            continue;
        };

        let id = file_name.split('.').next().unwrap_or_default();
        roots.push(NodeId::new(kind, id));
    }
    Ok(roots)
}

/// Breadth-first edge accumulator.
///
/// Owns all traversal state for one run: the visited set, the edge set and a
/// cache of loaded nodes.
#[derive(Debug)]
pub struct GraphBuilder {
    loader: Loader,
    resolver: ActionResolver,
    nodes: HashMap<NodeId, Node>,
    visited: HashSet<NodeId>,
    edges: EdgeSet,
}

impl GraphBuilder {
    #[must_use]
    pub fn new(loader: Loader, resolver: ActionResolver) -> Self {
        Self {
            loader,
            resolver,
            nodes: HashMap::new(),
            visited: HashSet::new(),
            edges: EdgeSet::new(),
        }
    }

    /// Builder over `config_dir` with the strict resolver.
    #[must_use]
    pub fn strict(config_dir: &Path) -> Self {
        Self::new(Loader::new(config_dir), ActionResolver::strict())
    }

    /// Discover every root under the loader's config root and traverse
    /// from each.
    ///
    /// # Errors
    ///
    /// Any load or resolution failure aborts the whole build.
    #[instrument(skip(self), fields(root = %self.loader.root().display()))]
    pub fn build(mut self) -> Result<EdgeSet, ExtractError> {
        let roots = discover_roots(self.loader.root())?;
        info!(roots = roots.len(), "discovered documents");
        for root in roots {
            self.add_root(&root)?;
        }
        let visited = self.visited_count();
        let edges = self.finish();
        info!(visited, edges = edges.len(), "reference graph built");
        Ok(edges)
    }

    /// Link `root` from the entry point and traverse from it.
    ///
    /// # Errors
    ///
    /// Fails if any reachable document cannot be loaded or resolved.
    pub fn add_root(&mut self, root: &NodeId) -> Result<(), ExtractError> {
        let target = self.annotated(root)?;
        self.edges.insert(entry_point(), target);
        self.traverse_from(root)
    }

    /// Breadth-first traversal from `start`, skipping nodes already expanded.
    ///
    /// # Errors
    ///
    /// Fails if any reachable document cannot be loaded or resolved.
    pub fn traverse_from(&mut self, start: &NodeId) -> Result<(), ExtractError> {
        debug!(node = %start, "visiting");
        let resolver = self.resolver;
        let mut queue = VecDeque::from([start.bare()]);

        while let Some(current) = queue.pop_front() {
            if !self.visited.insert(current.clone()) {
                continue;
            }

            let children = self.node(&current)?.child_ids(&resolver)?;
            let source = self.annotated(&current)?;
            for child in children {
                let target = self.annotated(&child)?;
                self.edges.insert(source.clone(), target);
                queue.push_back(child);
            }
        }
        Ok(())
    }

    /// Number of nodes whose children have been expanded.
    #[must_use]
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Consume the builder and return the accumulated edges.
    #[must_use]
    pub fn finish(self) -> EdgeSet {
        self.edges
    }

    fn node(&mut self, id: &NodeId) -> Result<&Node, ExtractError> {
        match self.nodes.entry(id.bare()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let node = Node::load(&self.loader, id.kind, &id.id)?;
                Ok(entry.insert(node))
            }
        }
    }

    fn annotated(&mut self, id: &NodeId) -> Result<NodeId, ExtractError> {
        self.node(id)?.annotated_id()
    }
}
