// src/cli/args.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Pages, annotations, tags and lists over a local document store
pub struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Turn debugging information on
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Disable colored log output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Print the default configuration and exit
    #[arg(long = "generate-config")]
    pub generate_config: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve requests as newline-delimited JSON on stdin, one response per line on stdout
    Serve,
    /// Invoke a single method and print its JSON result
    Call {
        /// Method name, e.g. createCustomList
        method: String,
        /// Arguments as a JSON object with camelCase keys
        #[arg(default_value = "{}")]
        params: String,
    },
    /// Initialize a new database
    CreateDb {
        /// pathname to database file, defaults to the configured database
        path: Option<String>,
    },
    /// Show program version, configuration and available methods
    Info,
}
