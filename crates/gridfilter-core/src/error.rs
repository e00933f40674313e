//! Error types for gridfilter-core.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug, PartialEq)]
pub enum FilterError {
    #[error("Invalid filter payload: {0}")]
    #[diagnostic(
        code(gridfilter::invalid_payload),
        help("A filter payload looks like {{\"type\": 1, \"value\": 5}}; `value` must be numeric")
    )]
    InvalidPayload(String),

    #[error("The type \"{code}\" is not supported, allowed ones are \"{allowed}\"")]
    #[diagnostic(
        code(gridfilter::unsupported_operator),
        help("Set `unknown_operator = \"equal\"` in the configuration to fall back to `=`")
    )]
    UnsupportedOperator { code: i64, allowed: String },

    #[error("Invalid identifier: `{0}`")]
    #[diagnostic(
        code(gridfilter::invalid_identifier),
        help("Aliases and field names may only contain letters, digits and underscores")
    )]
    InvalidIdentifier(String),

    #[error("The option `field_name` must be set for field: `{0}`")]
    #[diagnostic(code(gridfilter::missing_field_name))]
    MissingFieldName(String),

    #[error("The query has no root alias")]
    #[diagnostic(
        code(gridfilter::missing_root_alias),
        help("Add a FROM clause to the query before applying filters")
    )]
    MissingRootAlias,
}

/// Result type alias for filter operations.
pub type Result<T> = std::result::Result<T, FilterError>;
