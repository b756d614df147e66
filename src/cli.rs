//! Command line interface built on clap.
//!
//! [`Cli`] carries the subcommands in [`Command`] (serve, tools, call) and the
//! global flags (--config, --verbose).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// mediagen: AI media generation tools served over MCP.
#[derive(Debug, Parser)]
#[command(name = "mediagen", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the configuration file (defaults to ./mediagen.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level, including every poll attempt.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the MCP server on stdin/stdout.
    Serve,

    /// Print the tool definitions as JSON.
    Tools,

    /// Invoke one tool directly and print its result.
    Call {
        /// Tool name, e.g. generate_image.
        tool: String,

        /// Tool arguments as a JSON object.
        #[arg(long, default_value = "{}")]
        args: String,

        /// Print the structured result as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}
