//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Weighted maturity assessment: score a criteria hierarchy and draw it as a sunburst
#[derive(Parser, Debug)]
#[command(name = "sunburst")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Project directory for local config (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the built-in sample table as JSON
    Sample {
        /// Output file (default: stdout)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Show the scored hierarchy as a tree
    Show {
        /// Snapshot file (default: configured default_file)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Recompute all scores and write the snapshot back
    Score {
        /// Snapshot file (default: configured default_file)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Toggle a maturity level on a leaf criterion
    Select {
        /// Snapshot file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Criterion id, e.g. 1.1.1
        id: String,
        /// Maturity level, counting from 1
        level: usize,
    },

    /// Set the weight of a criterion (0.4, 40 or 40%)
    Weight {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        id: String,
        value: String,
    },

    /// Add a criterion row
    Add {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        id: String,
        name: String,
        /// Weight relative to its siblings (0.4, 40 or 40%)
        #[arg(short, long, default_value = "0")]
        weight: String,
    },

    /// Remove a criterion row; its children move up to the top level
    Remove {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        id: String,
    },

    /// Rename a criterion or change its id
    Rename {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        id: String,
        /// New display name
        #[arg(long)]
        name: Option<String>,
        /// New dotted id
        #[arg(long)]
        new_id: Option<String>,
    },

    /// Import a tab or comma separated table into a snapshot
    Import {
        /// Table file ("-" for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        table: PathBuf,
        /// Snapshot file to write
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: PathBuf,
    },

    /// Export a snapshot as a tab separated table
    Export {
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Render the sunburst chart as SVG
    Render {
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Output file (default: stdout)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
        /// Activate these criteria in order before rendering
        #[arg(long)]
        focus: Vec<String>,
        /// Milliseconds into the last transition (default: settled)
        #[arg(long)]
        at: Option<u64>,
    },

    /// Replay clicks and print where the focus lands ("-" clicks the center)
    Zoom {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Print tooltip data for a criterion as JSON
    Tooltip {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        id: String,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a commented template config
    Template,
    /// Show config file locations
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn given_repeated_debug_flags_when_parsing_then_counts_them() {
        let cli = Cli::parse_from(["sunburst", "-dd", "show", "table.json"]);
        assert_eq!(cli.debug, 2);
        assert!(matches!(cli.command, Some(Commands::Show { file: Some(_) })));
    }

    #[test]
    fn given_render_with_focus_when_parsing_then_collects_ids() {
        let cli = Cli::parse_from([
            "sunburst", "render", "t.json", "--focus", "1", "--focus", "1.1", "--at", "300",
        ]);
        match cli.command {
            Some(Commands::Render { focus, at, .. }) => {
                assert_eq!(focus, vec!["1", "1.1"]);
                assert_eq!(at, Some(300));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
