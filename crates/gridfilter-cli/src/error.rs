use gridfilter_config::error::ConfigError;
use gridfilter_core::FilterError;
use gridfilter_query::QueryError;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    #[diagnostic(code(gridfilter::json))]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument `{value}`: {reason}")]
    #[diagnostic(
        code(gridfilter::invalid_argument),
        help("Run `gridfilter apply --help` for the expected formats")
    )]
    InvalidArgument { value: String, reason: String },
}

pub type CliResult<T> = std::result::Result<T, CliError>;
