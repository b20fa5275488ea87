//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::{LocationId, LocationType};

/// Administrative location directory: Province > District > Sector > Cell > Village
#[derive(Parser, Debug)]
#[command(name = "locdir")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Explicit config file
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a location
    Add {
        /// Display name
        name: String,
        /// Unique code
        code: String,
        /// Level: province, district, sector, cell, village
        #[arg(short = 't', long = "type")]
        location_type: LocationType,
        /// Code of the parent location (required below province)
        #[arg(short, long)]
        parent: Option<String>,
    },

    /// Show one location
    Show {
        /// Location code
        #[arg(required_unless_present = "id", conflicts_with = "id")]
        code: Option<String>,
        /// Look up by id instead of code
        #[arg(long)]
        id: Option<LocationId>,
    },

    /// List direct children
    Children {
        /// Parent location code
        code: String,
    },

    /// Print the path from the province down to a location
    Path {
        /// Location code
        code: String,
    },

    /// Print the province a location belongs to
    Province {
        /// Location code
        code: String,
    },

    /// Print the number of levels below the province
    Depth {
        /// Location code
        code: String,
    },

    /// List every location below a location
    Descendants {
        /// Location code
        code: String,
    },

    /// Show a subtree, or every province when no code is given
    Tree {
        /// Location code
        code: Option<String>,
    },

    /// List locations
    List {
        /// Only this level
        #[arg(short = 't', long = "type")]
        location_type: Option<LocationType>,
    },

    /// Show counts per level
    Stats,

    /// Find locations by name (case-insensitive substring)
    Search {
        /// Text to look for
        term: String,
    },

    /// Check whether a level may be added below a parent
    Check {
        /// Parent location code
        parent: String,
        /// Level of the prospective child
        child_type: LocationType,
    },

    /// Rename a location
    Rename {
        /// Location id
        id: LocationId,
        /// New display name
        name: String,
        /// Assert the current code (rejected if different)
        #[arg(long)]
        code: Option<String>,
        /// Assert the current level (rejected if different)
        #[arg(short = 't', long = "type")]
        location_type: Option<LocationType>,
        /// Assert the current parent code (rejected if different)
        #[arg(short, long)]
        parent: Option<String>,
    },

    /// Delete a location without children
    Delete {
        /// Location id
        id: LocationId,
    },

    /// Print all provinces with their subtrees as TOML
    Export,

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
    /// Print a config template
    Template,
    /// Print config file locations
    Path,
}
