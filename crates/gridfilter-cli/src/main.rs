use std::{env, sync::PoisonError};

use apply::{apply_filters, list_operators};
use clap::Parser;
use cli::{Args, Commands};
use error::CliResult;
use gridfilter_config::config::{self, generate_default_config, set_config_path};
use logging::setup_logging;
use tracing::{debug, info};
use utils::COLOR;

mod apply;
mod cli;
mod error;
mod logging;
mod utils;

fn handle_cli() -> CliResult<()> {
    let args = Args::parse();

    setup_logging(&args);

    if args.no_color {
        *COLOR.write().unwrap_or_else(PoisonError::into_inner) = false;
    }

    if let Some(ref path) = args.config {
        let path = if path.is_absolute() {
            path.clone()
        } else {
            env::current_dir()
                .map_err(gridfilter_config::error::ConfigError::IoError)?
                .join(path)
        };
        debug!("Using configuration at {}", path.display());
        set_config_path(path);
    }

    match args.command {
        Commands::DefConfig => {
            let path = generate_default_config()?;
            info!("Edit {} to change filter behaviour", path.display());
        }
        Commands::Operators => list_operators(args.json)?,
        Commands::Apply {
            entity,
            alias,
            joins,
            counts,
            or,
        } => {
            config::init()?;
            apply_filters(&entity, &alias, &joins, &counts, or, args.json)?;
        }
    }

    Ok(())
}

fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    if let Err(err) = handle_cli() {
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(1);
    }
}
