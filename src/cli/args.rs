//! CLI argument definitions and parsing structures

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// p4stream - stream lifecycle client for Perforce
#[derive(Parser, Debug)]
#[command(name = "p4stream")]
#[command(about = "Create, inspect and cascade-delete Perforce streams")]
#[command(long_about = r#"
p4stream drives the p4 command-line client to manage streams: it builds and
submits stream specs, and deletes streams together with their shelved changes
and workspaces.

EXAMPLES:
  # List every stream on the server
  p4stream list

  # Show one stream as JSON
  p4stream show //Root/Main --json

  # Preview a development stream spec without submitting it
  p4stream create //Root/Dev --name Dev --type development --parent //Root/Main --dry-run

  # Create a release stream with owner-only submit, populated from its parent
  p4stream create //Root/Rel1 --name Rel1 --type release --parent //Root/Main \
      --options 0,1,0,0,1 --populate

  # Delete a stream, its dependents and its files
  p4stream delete //Root/Dev --prune --yes

CONFIGURATION:
  Precedence: CLI flags > P4PORT/P4USER/P4CLIENT > config file > defaults
  The config file is discovered by searching upward from CWD for .p4stream/config.toml
  Use --config to specify an explicit config file path

STREAM OPTIONS:
  --options takes five 0/1 flags, in order:
    submit (ownersubmit/allsubmit), lock (locked/unlocked),
    to-parent (toparent/notoparent), from-parent (fromparent/nofromparent),
    merge (mergeany/mergedown)
  Virtual streams always get notoparent and nofromparent.
"#)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Server address, e.g. ssl:perforce:1666 (overrides P4PORT)
    #[arg(long, global = true)]
    pub port: Option<String>,

    /// Depot user; owns created streams (overrides P4USER)
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Workspace name (overrides P4CLIENT)
    #[arg(long, global = true)]
    pub client: Option<String>,

    /// Path or name of the p4 executable (default: p4)
    #[arg(long, global = true)]
    pub p4_bin: Option<String>,

    /// Per-command timeout in seconds (default: 120, max: 3600)
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all streams
    List,

    /// Show one stream's spec
    ///
    /// EXAMPLES:
    ///   p4stream show //Root/Main
    Show {
        /// Stream location, e.g. //Root/Main
        path: String,
    },

    /// Create a stream
    ///
    /// Mainline streams never have a parent and are never populated.
    /// Virtual streams are never populated.
    ///
    /// EXAMPLES:
    ///   p4stream create //Root/Main --name Main --type mainline
    ///   p4stream create //Root/Dev --name Dev --type development --parent //Root/Main --populate
    Create {
        /// Stream location, e.g. //Root/Dev
        path: String,

        /// Display name
        #[arg(long)]
        name: String,

        /// Stream type: mainline, development, release, virtual or task
        #[arg(long = "type", value_name = "TYPE")]
        kind: String,

        /// Parent stream location
        #[arg(long, default_value = "none")]
        parent: String,

        /// Populate the new stream from its parent
        #[arg(long)]
        populate: bool,

        /// Five 0/1 option flags, e.g. 1,1,0,0,1
        #[arg(long, value_name = "FLAGS")]
        options: Option<String>,

        /// Owner of the new stream (default: the connection user)
        #[arg(long)]
        owner: Option<String>,

        /// Print the spec document instead of submitting it
        #[arg(long)]
        dry_run: bool,
    },

    /// Delete a stream and everything that depends on it
    ///
    /// Removes shelved changes under the stream, its workspaces and unloaded
    /// workspaces, then the stream spec. Nothing is restored if a step fails.
    ///
    /// EXAMPLES:
    ///   p4stream delete //Root/Dev --dry-run
    ///   p4stream delete //Root/Dev --prune --yes
    Delete {
        /// Stream location, e.g. //Root/Dev
        path: String,

        /// Also obliterate the stream's files
        #[arg(long, requires = "yes")]
        prune: bool,

        /// Confirm destructive pruning
        #[arg(long)]
        yes: bool,

        /// List what would be deleted without deleting anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the effective configuration and where each value came from
    Config,
}

/// Build the CLI command structure without parsing arguments
#[must_use]
pub fn build_cli() -> clap::Command {
    <Cli as clap::CommandFactory>::command()
}
