//! The query builder contract used by datagrid filters.
//!
//! Filters never execute queries. They receive a mutable [`ProxyQuery`] and append
//! clauses and bound parameters to it. [`QueryBuilder`] is an in-memory implementation
//! that renders the accumulated clauses as DQL text.
//!
//! # Example
//!
//! ```
//! use gridfilter_query::{ProxyQuery, QueryBuilder};
//!
//! let mut query = QueryBuilder::select("o").from("Post", "o");
//! query.add_group_by("o");
//! query.and_having("COUNT(o.comments) >= :comments_0".to_string());
//! query.set_parameter("comments_0", 5.into());
//!
//! assert_eq!(
//!     query.to_dql().unwrap(),
//!     "SELECT o FROM Post o GROUP BY o HAVING COUNT(o.comments) >= :comments_0"
//! );
//! ```

pub mod builder;
pub mod clause;
pub mod error;
pub mod expr;
pub mod proxy;
pub mod value;

pub use builder::QueryBuilder;
pub use clause::Conjunction;
pub use error::{QueryError, Result};
pub use proxy::ProxyQuery;
pub use value::Value;
