#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use ritemap_core::ConfigError;
use std::env;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "ritemap: reference-graph extractor for event/rite documents",
    long_about = None
)]
struct Cli {
    /// Enable debug logging (ignored when RITEMAP_LOG is set).
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Output format (overrides --json and the FORMAT env var).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Graph",
        about = "Extract the reference graph and write the edge list",
        long_about = "Walk every event and rite document reachable from the global entry event \
                      and every document under the config root, then write the (collapsed) \
                      edge list as JSON. Aborts without writing on any unknown action key.",
        after_help = "EXAMPLES:\n    # Export using ritemap.toml defaults\n    ritemap export\n\n    # Keep event targets and write elsewhere\n    ritemap export --no-collapse -o raw.json"
    )]
    Export(cmd::export::ExportArgs),

    #[command(
        next_help_heading = "Graph",
        about = "Summarize an exported edge list",
        after_help = "EXAMPLES:\n    # Stats for the configured output file\n    ritemap stats\n\n    # Machine-readable stats\n    ritemap stats -i graph.json --json"
    )]
    Stats(cmd::stats::StatsArgs),

    #[command(
        next_help_heading = "Explore",
        about = "Interactively walk the graph from one node",
        long_about = "Show a node with its numbered children. Type a number to descend, an \
                      empty line to go back, end of input to quit.",
        after_help = "EXAMPLES:\n    # Start at the global entry event\n    ritemap trace event 0\n\n    # Start at a rite, failing on unknown action keys\n    ritemap trace rite 5320511 --strict"
    )]
    Trace(cmd::trace::TraceArgs),

    #[command(
        next_help_heading = "Explore",
        about = "Find JSON documents mentioning a keyword",
        after_help = "EXAMPLES:\n    # Search the config root\n    ritemap search lantern\n\n    # Offer to trace each matching document\n    ritemap search lantern --trace"
    )]
    Search(cmd::search::SearchArgs),

    #[command(
        next_help_heading = "Utility",
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n    # Bash\n    ritemap completions bash > /etc/bash_completion.d/ritemap"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

/// Filter used when `RITEMAP_LOG` is unset.
const fn default_filter(verbose: bool, debug_env: bool) -> &'static str {
    if verbose || debug_env {
        "ritemap=debug,info"
    } else {
        "ritemap=info,warn"
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("RITEMAP_LOG").unwrap_or_else(|_| {
        EnvFilter::new(default_filter(verbose, env::var("DEBUG").is_ok()))
    });

    let format = env::var("RITEMAP_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if cli.verbose {
        debug!("Verbose mode enabled");
    }

    let project_root = env::current_dir()?;
    let output = cli.output_mode();

    let result = match cli.command {
        Commands::Export(ref args) => cmd::export::run_export(args, output, &project_root),
        Commands::Stats(ref args) => cmd::stats::run_stats(args, output, &project_root),
        Commands::Trace(ref args) => cmd::trace::run_trace(args, &project_root),
        Commands::Search(ref args) => cmd::search::run_search(args, output, &project_root),
        Commands::Completions(ref args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    };

    if let Some(config_err) = result
        .as_ref()
        .err()
        .and_then(|err| err.downcast_ref::<ConfigError>())
    {
        render_error(output, &CliError::from(config_err))?;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use ritemap_core::NodeKind;
    use std::path::Path;

    #[test]
    fn json_flag_parses_after_subcommand() {
        let cli = Cli::parse_from(["ritemap", "stats", "--json"]);
        assert!(cli.json);
        assert!(cli.output_mode().is_json());
    }

    #[test]
    fn format_flag_wins_over_json() {
        let cli = Cli::parse_from(["ritemap", "--json", "--format", "text", "stats"]);
        assert_eq!(cli.output_mode(), OutputMode::Text);
    }

    #[test]
    fn export_flags_parse() {
        let cli = Cli::parse_from([
            "ritemap",
            "export",
            "--config-dir",
            "data",
            "-o",
            "out/edges.json",
            "--no-collapse",
        ]);
        match cli.command {
            Commands::Export(args) => {
                assert_eq!(args.config_dir.as_deref(), Some(Path::new("data")));
                assert_eq!(args.output.as_deref(), Some(Path::new("out/edges.json")));
                assert!(args.no_collapse);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn trace_takes_kind_and_id() {
        let cli = Cli::parse_from(["ritemap", "trace", "rite", "5320511", "--strict"]);
        match cli.command {
            Commands::Trace(args) => {
                assert_eq!(args.kind, NodeKind::Rite);
                assert_eq!(args.id, "5320511");
                assert!(args.strict);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn trace_rejects_unknown_kind() {
        assert!(Cli::try_parse_from(["ritemap", "trace", "card", "1"]).is_err());
    }

    #[test]
    fn verbose_raises_default_filter() {
        assert_eq!(default_filter(false, false), "ritemap=info,warn");
        assert_eq!(default_filter(true, false), "ritemap=debug,info");
        assert_eq!(default_filter(false, true), "ritemap=debug,info");
        let cli = Cli::parse_from(["ritemap", "-v", "stats"]);
        assert!(cli.verbose);
    }

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
