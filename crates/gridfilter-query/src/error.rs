//! Error types for gridfilter-query.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug, PartialEq)]
pub enum QueryError {
    #[error("Query has no FROM clause")]
    #[diagnostic(
        code(gridfilter_query::missing_from),
        help("Call `.from(entity, alias)` before rendering the query")
    )]
    MissingFrom,

    #[error("Invalid parameter name: `{0}`")]
    #[diagnostic(
        code(gridfilter_query::invalid_parameter),
        help("Parameter names may only contain letters, digits and underscores")
    )]
    InvalidParameterName(String),

    #[error("Parameter `{0}` is referenced but never bound")]
    #[diagnostic(
        code(gridfilter_query::unbound_parameter),
        help("Bind every `:name` placeholder with `set_parameter`")
    )]
    UnboundParameter(String),
}

/// Result type alias for gridfilter-query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
