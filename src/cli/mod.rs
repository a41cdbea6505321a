//! CLI interface for Backoffice

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "backoffice")]
#[command(version = "1.0.0")]
#[command(about = "Identity and authorization backend for the admin dashboard", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new backoffice.toml configuration file
    Init,

    /// Start the HTTP API server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,
    },

    /// Print the route table as a given viewer would see it
    Routes {
        /// Viewer to evaluate the table for
        #[arg(short, long, default_value = "anonymous")]
        viewer: Viewer,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

/// Session snapshot to evaluate the route table against
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Viewer {
    Anonymous,
    User,
    Admin,
}
