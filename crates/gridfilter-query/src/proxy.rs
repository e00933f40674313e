//! The mutation contract filters rely on.

use crate::{clause::Conjunction, value::Value};

/// A query under construction that datagrid filters are allowed to extend.
///
/// The caller owns the query. Filters only append clauses and bind parameters;
/// they never replace or reset what is already there.
pub trait ProxyQuery {
    /// Aliases of the entities in the FROM clause, in declaration order.
    fn root_aliases(&self) -> Vec<String>;

    /// The first root alias, if the query has a FROM clause.
    fn root_alias(&self) -> Option<String> {
        self.root_aliases().into_iter().next()
    }

    /// Adds an expression to GROUP BY. Adding an expression twice has no effect.
    fn add_group_by(&mut self, expr: &str);

    /// Combines a WHERE condition with the existing ones.
    fn add_where(&mut self, conjunction: Conjunction, condition: String);

    /// Combines a HAVING condition with the existing ones.
    fn add_having(&mut self, conjunction: Conjunction, condition: String);

    /// Binds `value` to the `:name` placeholder, replacing any previous binding.
    fn set_parameter(&mut self, name: &str, value: Value);

    /// Returns an id that has not been handed out by this query before.
    fn unique_parameter_id(&mut self) -> u64;

    fn and_where(&mut self, condition: String) {
        self.add_where(Conjunction::And, condition);
    }

    fn or_where(&mut self, condition: String) {
        self.add_where(Conjunction::Or, condition);
    }

    fn and_having(&mut self, condition: String) {
        self.add_having(Conjunction::And, condition);
    }

    fn or_having(&mut self, condition: String) {
        self.add_having(Conjunction::Or, condition);
    }
}
