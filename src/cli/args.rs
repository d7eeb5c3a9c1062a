//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Merge independently loaded bone hierarchies into one skeleton and inspect it
#[derive(Parser, Debug)]
#[command(name = "skelmerge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Config file layered over the global one
    #[arg(short, long, global = true, env = "SKELMERGE_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the merged skeleton as a tree
    Tree {
        /// Hierarchy description file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Show the flat node list and every hierarchy
    Describe {
        /// Hierarchy description file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Check that all constituents merge into a valid skeleton
    Check {
        /// Hierarchy description file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Show the path between two bones
    Path {
        /// Hierarchy description file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Start bone
        from: String,
        /// End bone
        to: String,
    },

    /// List the debug draw primitives of the merged skeleton
    Draw {
        /// Hierarchy description file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Also draw hardpoints
        #[arg(long)]
        hardpoints: bool,
        /// Also draw blend bones
        #[arg(long)]
        blend_bones: bool,
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
    /// Show merged config
    Show,

    /// Show config paths
    Path,
}
