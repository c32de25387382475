//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tale")]
#[command(author, version, about = "Command-line client for the Tale story-sharing app", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List stories (gateway-first, local store on failure)
    List {
        /// Only stories that carry a location
        #[arg(long)]
        location: bool,

        /// Always hit the backend; fail instead of serving the cache
        #[arg(long)]
        refresh: bool,

        /// 1-based page number
        #[arg(short, long, default_value = "1")]
        page: u32,

        /// Stories per page
        #[arg(short = 's', long, default_value = "10")]
        size: u32,

        /// Print stories as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single story
    Detail {
        /// Story id
        id: String,

        /// Print the story as JSON
        #[arg(long)]
        json: bool,
    },

    /// Submit a new story (queued locally when offline)
    Add {
        /// Story text
        #[arg(short, long)]
        description: String,

        /// Path of the photo to upload
        #[arg(short, long)]
        photo: PathBuf,

        /// Latitude of the story location
        #[arg(long, requires = "lon")]
        lat: Option<f64>,

        /// Longitude of the story location
        #[arg(long, requires = "lat")]
        lon: Option<f64>,
    },

    /// Mark a story as favorite (kept available offline)
    Favorite {
        /// Story id
        id: String,
    },

    /// Remove a story from the favorites and delete its local copy
    Unfavorite {
        /// Story id
        id: String,
    },

    /// List favorited stories
    Favorites {
        /// Print stories as JSON
        #[arg(long)]
        json: bool,
    },

    /// List submissions waiting for a replay
    Pending,

    /// Replay pending submissions against the backend
    Drain,

    /// Log in and store the bearer token
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },

    /// Register a new account
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },

    /// Forget the stored bearer token
    Logout,
}
