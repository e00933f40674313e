use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Apply datagrid count filters to a query",
    arg_required_else_help = true
)]
pub struct Args {
    /// Unimportant helpful outputs
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only show errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Machine readable output
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to the configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply count filters to a query and print the resulting DQL
    #[command(name = "apply")]
    Apply {
        /// Entity to select from
        #[arg(required = true, long)]
        entity: String,

        /// Root alias of the entity
        #[arg(long, default_value = "o")]
        alias: String,

        /// LEFT JOIN an association, e.g. `o.comments:c`
        #[arg(long = "join", value_name = "PATH:ALIAS")]
        joins: Vec<String>,

        /// Count filter, e.g. `comments={"type":1,"value":5}` or
        /// `comments:c.id={"type":1,"value":5}`
        #[arg(
            required = true,
            long = "count",
            value_name = "NAME[:ALIAS.FIELD]=PAYLOAD"
        )]
        counts: Vec<String>,

        /// Combine the filters with OR instead of the configured condition
        #[arg(long)]
        or: bool,
    },

    /// List the supported operator codes
    #[command(name = "operators")]
    Operators,

    /// Generate a default configuration file
    #[command(name = "defconfig")]
    DefConfig,
}
