//! CLI parse: clap types for tripgen. No behavior; definitions only.

use crate::request::Preference;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// tripgen - AI travel itinerary generation client
#[derive(Parser)]
#[command(name = "tripgen")]
#[command(about = "Generate, share and browse AI travel itineraries")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides ./tripgen.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend API base URL (overrides configuration)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Enable verbose logging
    #[arg(long, global = true, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, both)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate an itinerary and wait for it (Ctrl-C cancels)
    Plan {
        /// Destination city
        #[arg(long, short = 'd')]
        destination: String,
        /// Number of days (1-5)
        #[arg(long, default_value = "2")]
        days: u32,
        /// Number of travelers
        #[arg(long, default_value = "2")]
        travelers: u32,
        /// Budget description, e.g. "3000 CNY"
        #[arg(long)]
        budget: Option<String>,
        /// Preference tag (repeatable): food, outdoor, shopping, culture, relax, adventure, family
        #[arg(long = "prefer")]
        preferences: Vec<Preference>,
        /// Extra requirements in free text
        #[arg(long)]
        extra: Option<String>,
        /// Display name for the trip
        #[arg(long)]
        name: Option<String>,
        /// Generate without stored credentials; the result is shared by link
        #[arg(long)]
        anonymous: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Log in and remember the access token
    Login {
        #[arg(long)]
        email: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account and remember the access token
    Register {
        #[arg(long)]
        email: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the stored access token
    Logout,
    /// Show the logged-in account
    Whoami,
    /// Browse and manage saved itineraries
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },
    /// View or create share links
    Share {
        #[command(subcommand)]
        command: ShareCommands,
    },
    /// Manage favorite itineraries
    Favorites {
        #[command(subcommand)]
        command: FavoritesCommands,
    },
}

#[derive(Subcommand)]
pub enum HistoryCommands {
    /// List previously generated itineraries
    List {
        #[arg(long, default_value = "20")]
        limit: u32,
        #[arg(long, default_value = "0")]
        offset: u32,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show one saved itinerary
    Show {
        id: i64,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Delete a saved itinerary
    Delete {
        id: i64,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum ShareCommands {
    /// Show an itinerary shared by link
    View {
        /// Share token from the link
        token: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Create a share link for a saved itinerary
    Create {
        id: i64,
        /// Only people with the link and an account can open it
        #[arg(long)]
        private: bool,
        /// Link lifetime in days (backend default when omitted)
        #[arg(long)]
        expires_days: Option<u32>,
    },
}

#[derive(Subcommand)]
pub enum FavoritesCommands {
    /// List favorite itineraries
    List {
        #[arg(long, default_value = "20")]
        limit: u32,
        #[arg(long, default_value = "0")]
        offset: u32,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Mark a saved itinerary as favorite
    Add { id: i64 },
    /// Remove a saved itinerary from favorites
    Remove { id: i64 },
    /// Show whether a saved itinerary is a favorite
    Status { id: i64 },
}
