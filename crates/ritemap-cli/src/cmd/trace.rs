//! `ritemap trace`: walk the reference graph by hand.
//!
//! Shows one node at a time with its numbered children. Typing a number
//! descends into that child, an empty line goes back up, end of input quits.
//!
//! Unlike `export`, the tracer resolves actions leniently by default: an
//! unknown action key is logged and skipped so exploration can continue.
//! `--strict` restores the extractor's behaviour.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::Args;

use ritemap_core::config::{Overrides, resolve_config};
use ritemap_core::{ActionResolver, Loader, Node, NodeId, NodeKind};

#[derive(Args, Debug)]
pub struct TraceArgs {
    /// Node kind to start from (`event` or `rite`).
    pub kind: NodeKind,

    /// Document id to start from.
    pub id: String,

    /// Config root holding the `event/` and `rite/` directories.
    #[arg(long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Fail on unrecognized action keys instead of skipping them.
    #[arg(long)]
    pub strict: bool,
}

pub fn run_trace(args: &TraceArgs, project_root: &Path) -> Result<()> {
    let config = resolve_config(
        project_root,
        &Overrides {
            config_dir: args.config_dir.clone(),
            strict: args.strict,
            ..Overrides::default()
        },
    )?;

    let resolver = if config.trace.strict {
        ActionResolver::strict()
    } else {
        ActionResolver::lenient()
    };
    let mut session = TraceSession::new(Loader::new(&config.config_dir), resolver);

    let stdin = io::stdin();
    let stdout = io::stdout();
    session.run(&NodeId::new(args.kind, args.id.clone()), stdin.lock(), stdout.lock())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Back,
    Quit,
}

/// Interactive walk state: the loader, the resolver and the breadcrumb road.
pub struct TraceSession {
    loader: Loader,
    resolver: ActionResolver,
    road: Vec<String>,
}

impl TraceSession {
    pub const fn new(loader: Loader, resolver: ActionResolver) -> Self {
        Self {
            loader,
            resolver,
            road: Vec::new(),
        }
    }

    /// Run the session from `start` until the operator backs out or input ends.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        start: &NodeId,
        mut input: R,
        mut out: W,
    ) -> Result<()> {
        self.visit(start, &mut input, &mut out)?;
        out.flush()?;
        Ok(())
    }

    fn visit<R: BufRead, W: Write>(
        &mut self,
        id: &NodeId,
        input: &mut R,
        out: &mut W,
    ) -> Result<Step> {
        let node = Node::load(&self.loader, id.kind, &id.id)
            .with_context(|| format!("cannot trace {id}"))?;
        let label = node.readable_id()?;
        let children: Vec<NodeId> = node.child_ids(&self.resolver)?.into_iter().collect();

        self.road.push(label.clone());
        let step = self.prompt_loop(&node, &label, &children, input, out);
        self.road.pop();
        step
    }

    fn prompt_loop<R: BufRead, W: Write>(
        &mut self,
        node: &Node,
        label: &str,
        children: &[NodeId],
        input: &mut R,
        out: &mut W,
    ) -> Result<Step> {
        loop {
            self.render_node(node, label, children, out)?;
            write!(out, "select a child by number (empty line goes back): ")?;
            out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(out)?;
                return Ok(Step::Quit);
            }

            let choice = line.trim();
            if choice.is_empty() {
                return Ok(Step::Back);
            }

            match choice.parse::<usize>().ok().and_then(|i| children.get(i)) {
                Some(child) => {
                    if self.visit(child, input, out)? == Step::Quit {
                        return Ok(Step::Quit);
                    }
                }
                None => writeln!(out, "invalid choice `{choice}`, try again")?,
            }
        }
    }

    fn render_node<W: Write>(
        &self,
        node: &Node,
        label: &str,
        children: &[NodeId],
        out: &mut W,
    ) -> Result<()> {
        writeln!(out)?;
        writeln!(out, "===== {} {} {label} =====", node.kind(), node.id())?;
        writeln!(out, "{}\t{}", node.path().display(), self.road.join("->"))?;
        let description = node.description()?;
        if !description.is_empty() {
            writeln!(out, "{description}")?;
        }

        writeln!(out, "next:")?;
        for (index, child) in children.iter().enumerate() {
            let path = self.loader.path_for(child.kind, &child.id);
            match Node::load(&self.loader, child.kind, &child.id) {
                Ok(child_node) => {
                    let child_label = child_node.readable_id().unwrap_or_default();
                    writeln!(
                        out,
                        "{index}: {}\t{}\t{child_label}\t{}",
                        child.kind,
                        child.id,
                        path.display()
                    )?;
                    let child_description = child_node.description().unwrap_or_default();
                    if !child_description.is_empty() {
                        writeln!(out, "{child_description}")?;
                    }
                }
                Err(_) => writeln!(
                    out,
                    "{index}: {}\t{}\t<missing document>\t{}",
                    child.kind,
                    child.id,
                    path.display()
                )?,
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_doc(root: &Path, rel: &str, body: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, body).expect("write");
    }

    fn fixture() -> TempDir {
        let dir = TempDir::new().expect("tempdir");
        write_doc(
            dir.path(),
            "event/1.json",
            r#"{"text": "Gate",
                "settlement": [{"action": {"rite": 2, "event_on": 3, "portal": 9}}]}"#,
        );
        write_doc(
            dir.path(),
            "rite/2.json",
            r#"{"name": "Toll", "text": "Pay the keeper.", "settlement": []}"#,
        );
        dir
    }

    fn run(dir: &Path, resolver: ActionResolver, input: &str) -> Result<String> {
        let mut session = TraceSession::new(Loader::new(dir), resolver);
        let mut out = Vec::new();
        session.run(&NodeId::event("1"), input.as_bytes(), &mut out)?;
        Ok(String::from_utf8(out).expect("utf8"))
    }

    #[test]
    fn lists_children_and_marks_missing_documents() {
        let dir = fixture();
        let text = run(dir.path(), ActionResolver::lenient(), "").expect("trace");
        assert!(text.contains("===== event 1 Gate ====="));
        assert!(text.contains("0: event\t3\t<missing document>"));
        assert!(text.contains("1: rite\t2\tToll"));
        assert!(text.contains("Pay the keeper."));
    }

    #[test]
    fn descends_and_tracks_road() {
        let dir = fixture();
        let text = run(dir.path(), ActionResolver::lenient(), "1\n\n\n").expect("trace");
        assert!(text.contains("===== rite 2 Toll ====="));
        assert!(text.contains("Gate->Toll"));
    }

    #[test]
    fn rejects_out_of_range_choice() {
        let dir = fixture();
        let text = run(dir.path(), ActionResolver::lenient(), "7\nx\n\n").expect("trace");
        assert!(text.contains("invalid choice `7`"));
        assert!(text.contains("invalid choice `x`"));
    }

    #[test]
    fn strict_mode_fails_on_unknown_key() {
        let dir = fixture();
        let err = run(dir.path(), ActionResolver::strict(), "").unwrap_err();
        assert!(format!("{err:#}").contains("portal"));
    }
}
