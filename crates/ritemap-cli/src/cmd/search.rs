//! `ritemap search`: find documents mentioning a keyword.

use std::borrow::Cow;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::Args;
use encoding_rs::GBK;
use serde::Serialize;
use tracing::warn;
use walkdir::WalkDir;

use ritemap_core::config::{Overrides, resolve_config};
use ritemap_core::{ActionResolver, Loader, NodeId, NodeKind};

use crate::cmd::trace::TraceSession;
use crate::output::{CliError, OutputMode, pretty_section, render_error, render_mode};

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Keyword to look for (case-insensitive).
    pub keyword: String,

    /// Directory to search (defaults to the configured config root).
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Offer to start tracing each matching event/rite document.
    #[arg(long)]
    pub trace: bool,
}

#[derive(Debug, Serialize)]
struct SearchReport {
    keyword: String,
    matches: Vec<String>,
}

/// Every `.json` file under `dir` whose content contains `keyword`,
/// ignoring case. Files are visited in sorted order; unreadable files are
/// logged and skipped.
pub fn search_json_files(dir: &Path, keyword: &str) -> Result<Vec<PathBuf>> {
    let needle = keyword.to_lowercase();
    let mut matches = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("failed to walk {}", dir.display()))?;
        let path = entry.path();
        let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
        if !entry.file_type().is_file() || !is_json {
            continue;
        }

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "cannot read file, skipping");
                continue;
            }
        };
        if decode_document(&bytes).to_lowercase().contains(&needle) {
            matches.push(path.to_path_buf());
        }
    }
    Ok(matches)
}

/// Document text as UTF-8, falling back to GBK for legacy files.
fn decode_document(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => GBK.decode_without_bom_handling(bytes).0,
    }
}

/// The node a document path denotes, if it sits in an `event`/`rite` directory.
fn node_for_path(path: &Path) -> Option<NodeId> {
    let kind = path
        .parent()
        .and_then(Path::file_name)
        .and_then(|name| name.to_str())
        .and_then(NodeKind::from_dir_name)?;
    let id = path.file_name()?.to_str()?.split('.').next()?;
    Some(NodeId::new(kind, id))
}

pub fn run_search(args: &SearchArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let config = resolve_config(
        project_root,
        &Overrides {
            config_dir: args.dir.clone(),
            ..Overrides::default()
        },
    )?;
    let dir = &config.config_dir;
    if !dir.is_dir() {
        let message = format!("{} does not exist or is not a directory", dir.display());
        let error = CliError::new(&message)
            .with_suggestion("pass --dir or set config_dir in ritemap.toml");
        render_error(output, &error)?;
        anyhow::bail!(message);
    }

    let matches = search_json_files(dir, &args.keyword)?;
    let report = SearchReport {
        keyword: args.keyword.clone(),
        matches: matches
            .iter()
            .map(|p| p.strip_prefix(project_root).unwrap_or(p).display().to_string())
            .collect(),
    };

    render_mode(
        output,
        &report,
        |r, w| {
            for m in &r.matches {
                writeln!(w, "{m}")?;
            }
            Ok(())
        },
        |r, w| {
            if r.matches.is_empty() {
                return writeln!(w, "no JSON file mentions '{}'", r.keyword);
            }
            pretty_section(w, &format!("{} file(s) mention '{}'", r.matches.len(), r.keyword))?;
            for (i, m) in r.matches.iter().enumerate() {
                writeln!(w, "{i} - {m}")?;
            }
            Ok(())
        },
    )?;

    if args.trace && !output.is_json() {
        let resolver = if config.trace.strict {
            ActionResolver::strict()
        } else {
            ActionResolver::lenient()
        };
        offer_traces(&matches, &Loader::new(dir), resolver)?;
    }
    Ok(())
}

fn offer_traces(matches: &[PathBuf], loader: &Loader, resolver: ActionResolver) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for path in matches {
        let Some(node) = node_for_path(path) else {
            continue;
        };
        write!(out, "trace {node} ({})? (y/n) ", path.display())?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        if line.trim() == "y" {
            TraceSession::new(loader.clone(), resolver).run(&node, &mut input, &mut out)?;
        }
    }
    Ok(())
}
