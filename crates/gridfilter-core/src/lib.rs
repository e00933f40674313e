//! Datagrid filters.
//!
//! A filter turns the value a user submitted in a datagrid form into clauses on a
//! [`gridfilter_query::ProxyQuery`]. [`CountFilter`] restricts rows by the number of
//! related rows, e.g. "posts with at least 5 comments".

pub mod data;
pub mod error;
pub mod filter;
pub mod identifier;
pub mod operator;

pub use data::FilterData;
pub use error::{FilterError, Result};
pub use filter::{count::CountFilter, Filter, FilterOptions, RenderOptions, RenderSettings};
pub use operator::NumberOperator;

#[cfg(test)]
mod tests {
    use gridfilter_config::config::{self, Config, UnknownOperatorPolicy};
    use gridfilter_query::QueryBuilder;
    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn test_new_reads_global_config() {
        let mut lenient = Config::default_config();
        lenient.unknown_operator = Some(UnknownOperatorPolicy::Equal);
        config::set_config(lenient);

        let mut filter = CountFilter::new();
        filter.initialize("comments", FilterOptions::default());
        let mut query = QueryBuilder::select("o").from("Post", "o");
        filter
            .filter(&mut query, "o", "comments", Some(&FilterData::new(Some(7), 1)))
            .unwrap();
        assert_eq!(query.having().unwrap(), "COUNT(o.comments) = :comments_0");

        config::set_config(Config::default_config());
        let mut filter = CountFilter::new();
        let mut query = QueryBuilder::select("o").from("Post", "o");
        assert!(matches!(
            filter.filter(&mut query, "o", "comments", Some(&FilterData::new(Some(7), 1))),
            Err(FilterError::UnsupportedOperator { code: 7, .. })
        ));
    }
}
