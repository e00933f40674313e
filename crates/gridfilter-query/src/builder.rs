//! The reference query builder implementation.

use tracing::trace;

use crate::{
    clause::{Conjunction, FromClause, JoinClause, JoinKind, OrderClause, Predicate},
    error::{QueryError, Result},
    expr,
    proxy::ProxyQuery,
    value::Value,
};

/// An in-memory DQL query builder.
///
/// Constructed via [`QueryBuilder::select`], then chained with `.from()`, `.left_join()`,
/// etc. Filters extend it through the [`ProxyQuery`] trait.
///
/// # Example
///
/// ```
/// use gridfilter_query::{ProxyQuery, QueryBuilder};
///
/// let mut query = QueryBuilder::select("o")
///     .from("Post", "o")
///     .left_join("o.comments", "c")
///     .order_by("o.id", true);
///
/// query.and_where("o.published = :published".to_string());
/// query.set_parameter("published", 1.into());
///
/// assert_eq!(
///     query.to_dql().unwrap(),
///     "SELECT o FROM Post o LEFT JOIN o.comments c WHERE o.published = :published ORDER BY o.id DESC"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryBuilder {
    select: Vec<String>,
    from: Vec<FromClause>,
    joins: Vec<JoinClause>,
    wheres: Option<Predicate>,
    group_by: Vec<String>,
    having: Option<Predicate>,
    orders: Vec<OrderClause>,
    parameters: Vec<(String, Value)>,
    parameter_id: u64,
}

impl QueryBuilder {
    /// Starts a new query selecting `expr`.
    pub fn select(expr: impl Into<String>) -> Self {
        Self {
            select: vec![expr.into()],
            ..Default::default()
        }
    }

    /// Adds another SELECT expression.
    pub fn add_select(mut self, expr: impl Into<String>) -> Self {
        self.select.push(expr.into());
        self
    }

    /// Adds an entity to the FROM clause under `alias`.
    pub fn from(mut self, entity: impl Into<String>, alias: impl Into<String>) -> Self {
        self.from.push(FromClause {
            entity: entity.into(),
            alias: alias.into(),
        });
        self
    }

    /// Adds an inner JOIN on an association path.
    pub fn join(mut self, path: impl Into<String>, alias: impl Into<String>) -> Self {
        self.joins.push(JoinClause {
            kind: JoinKind::Inner,
            path: path.into(),
            alias: alias.into(),
        });
        self
    }

    /// Adds a LEFT JOIN on an association path.
    pub fn left_join(mut self, path: impl Into<String>, alias: impl Into<String>) -> Self {
        self.joins.push(JoinClause {
            kind: JoinKind::Left,
            path: path.into(),
            alias: alias.into(),
        });
        self
    }

    /// Adds an ORDER BY clause.
    pub fn order_by(mut self, column: impl Into<String>, desc: bool) -> Self {
        self.orders.push(OrderClause {
            column: column.into(),
            desc,
        });
        self
    }

    /// GROUP BY expressions, in insertion order.
    pub fn group_by(&self) -> &[String] {
        &self.group_by
    }

    /// The rendered WHERE condition, if any.
    pub fn where_clause(&self) -> Option<String> {
        self.wheres.as_ref().map(Predicate::render)
    }

    /// The rendered HAVING condition, if any.
    pub fn having(&self) -> Option<String> {
        self.having.as_ref().map(Predicate::render)
    }

    /// Bound parameters, in binding order.
    pub fn parameters(&self) -> &[(String, Value)] {
        &self.parameters
    }

    /// Looks up a bound parameter.
    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Renders the query as DQL.
    ///
    /// Fails when there is no FROM clause, when a parameter has an invalid name, or when a
    /// placeholder has no bound value.
    pub fn to_dql(&self) -> Result<String> {
        if self.from.is_empty() {
            return Err(QueryError::MissingFrom);
        }

        if let Some((name, _)) = self
            .parameters
            .iter()
            .find(|(name, _)| !expr::is_valid_parameter_name(name))
        {
            return Err(QueryError::InvalidParameterName(name.clone()));
        }

        let select = if self.select.is_empty() {
            self.from
                .iter()
                .map(|f| f.alias.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        } else {
            self.select.join(", ")
        };

        let from = self
            .from
            .iter()
            .map(|f| format!("{} {}", f.entity, f.alias))
            .collect::<Vec<_>>()
            .join(", ");

        let mut dql = format!("SELECT {select} FROM {from}");

        for join in &self.joins {
            let kind = match join.kind {
                JoinKind::Inner => "INNER JOIN",
                JoinKind::Left => "LEFT JOIN",
            };
            dql.push_str(&format!(" {} {} {}", kind, join.path, join.alias));
        }

        let where_clause = self.where_clause();
        if let Some(ref condition) = where_clause {
            dql.push_str(&format!(" WHERE {condition}"));
        }

        if !self.group_by.is_empty() {
            dql.push_str(&format!(" GROUP BY {}", self.group_by.join(", ")));
        }

        let having = self.having();
        if let Some(ref condition) = having {
            dql.push_str(&format!(" HAVING {condition}"));
        }

        if !self.orders.is_empty() {
            let orders = self
                .orders
                .iter()
                .map(|o| format!("{} {}", o.column, if o.desc { "DESC" } else { "ASC" }))
                .collect::<Vec<_>>();
            dql.push_str(&format!(" ORDER BY {}", orders.join(", ")));
        }

        for condition in where_clause.iter().chain(having.iter()) {
            if let Some(name) = expr::placeholders(condition)
                .into_iter()
                .find(|name| self.parameter(name).is_none())
            {
                return Err(QueryError::UnboundParameter(name.to_string()));
            }
        }

        Ok(dql)
    }
}

impl ProxyQuery for QueryBuilder {
    fn root_aliases(&self) -> Vec<String> {
        self.from.iter().map(|f| f.alias.clone()).collect()
    }

    fn add_group_by(&mut self, expr: &str) {
        if self.group_by.iter().any(|g| g == expr) {
            trace!("GROUP BY {} already present", expr);
            return;
        }
        self.group_by.push(expr.to_string());
    }

    fn add_where(&mut self, conjunction: Conjunction, condition: String) {
        self.wheres = Some(Predicate::combine(
            self.wheres.take(),
            conjunction,
            condition,
        ));
    }

    fn add_having(&mut self, conjunction: Conjunction, condition: String) {
        self.having = Some(Predicate::combine(
            self.having.take(),
            conjunction,
            condition,
        ));
    }

    fn set_parameter(&mut self, name: &str, value: Value) {
        match self.parameters.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value,
            None => self.parameters.push((name.to_string(), value)),
        }
    }

    fn unique_parameter_id(&mut self) -> u64 {
        let id = self.parameter_id;
        self.parameter_id = id.wrapping_add(1);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posts() -> QueryBuilder {
        QueryBuilder::select("o").from("Post", "o")
    }

    #[test]
    fn test_minimal_query() {
        assert_eq!(posts().to_dql().unwrap(), "SELECT o FROM Post o");
    }

    #[test]
    fn test_missing_from() {
        assert_eq!(
            QueryBuilder::select("o").to_dql(),
            Err(QueryError::MissingFrom)
        );
    }

    #[test]
    fn test_root_aliases() {
        let query = posts().from("Tag", "t");
        assert_eq!(query.root_aliases(), vec!["o", "t"]);
        assert_eq!(query.root_alias().as_deref(), Some("o"));
        assert_eq!(QueryBuilder::default().root_alias(), None);
    }

    #[test]
    fn test_group_by_is_idempotent() {
        let mut query = posts();
        query.add_group_by("o");
        query.add_group_by("o");
        query.add_group_by("c");
        assert_eq!(query.group_by(), ["o", "c"]);
    }

    #[test]
    fn test_having_combination() {
        let mut query = posts();
        query.and_having("COUNT(o.id) > 1".into());
        query.and_having("COUNT(o.id) < 9".into());
        query.or_having("COUNT(o.id) = 20".into());
        assert_eq!(
            query.having().unwrap(),
            "(COUNT(o.id) > 1 AND COUNT(o.id) < 9) OR COUNT(o.id) = 20"
        );
    }

    #[test]
    fn test_unique_parameter_id_is_monotonic() {
        let mut query = posts();
        assert_eq!(query.unique_parameter_id(), 0);
        assert_eq!(query.unique_parameter_id(), 1);
        assert_eq!(query.unique_parameter_id(), 2);
    }

    #[test]
    fn test_unique_parameter_id_past_u32() {
        let mut query = posts();
        query.parameter_id = u64::from(u32::MAX);
        assert_eq!(query.unique_parameter_id(), u64::from(u32::MAX));
        assert_eq!(query.unique_parameter_id(), u64::from(u32::MAX) + 1);
    }

    #[test]
    fn test_add_select() {
        let query = posts().add_select("COUNT(o.id)");
        assert_eq!(
            query.to_dql().unwrap(),
            "SELECT o, COUNT(o.id) FROM Post o"
        );
    }

    #[test]
    fn test_where_combination() {
        let mut query = posts();
        query.and_where("o.published = 1".into());
        query.and_where("o.deleted = 0".into());
        query.or_where("o.pinned = 1".into());
        assert_eq!(
            query.where_clause().unwrap(),
            "(o.published = 1 AND o.deleted = 0) OR o.pinned = 1"
        );
    }

    #[test]
    fn test_compound_having_keeps_its_grouping() {
        let mut query = posts();
        query.and_having("COUNT(o.tags) > 1 OR COUNT(o.likes) > 1".into());
        query.and_having("COUNT(o.comments) >= 5".into());
        assert_eq!(
            query.to_dql().unwrap(),
            "SELECT o FROM Post o HAVING (COUNT(o.tags) > 1 OR COUNT(o.likes) > 1) \
             AND COUNT(o.comments) >= 5"
        );
    }

    #[test]
    fn test_quoted_colons_are_not_placeholders() {
        let mut query = posts();
        query.and_where("o.at = '10:30'".into());
        query.and_where("o.title = 'it''s :late' AND o.id = :id".into());
        query.set_parameter("id", 1.into());
        assert!(query.to_dql().is_ok());
    }

    #[test]
    fn test_set_parameter_replaces() {
        let mut query = posts();
        query.set_parameter("a", 1.into());
        query.set_parameter("b", 2.into());
        query.set_parameter("a", 3.into());
        assert_eq!(query.parameters().len(), 2);
        assert_eq!(query.parameter("a"), Some(&Value::Integer(3)));
    }

    #[test]
    fn test_full_render() {
        let mut query = posts().left_join("o.comments", "c").order_by("o.id", false);
        query.and_where("o.published = :published".into());
        query.set_parameter("published", 1.into());
        query.add_group_by("o");
        query.and_having("COUNT(c.id) >= :count_0".into());
        query.set_parameter("count_0", 5.into());

        assert_eq!(
            query.to_dql().unwrap(),
            "SELECT o FROM Post o LEFT JOIN o.comments c WHERE o.published = :published \
             GROUP BY o HAVING COUNT(c.id) >= :count_0 ORDER BY o.id ASC"
        );
    }

    #[test]
    fn test_unbound_placeholder() {
        let mut query = posts();
        query.and_having("COUNT(o.id) = :missing".into());
        assert_eq!(
            query.to_dql(),
            Err(QueryError::UnboundParameter("missing".into()))
        );
    }

    #[test]
    fn test_invalid_parameter_name() {
        let mut query = posts();
        query.set_parameter("a.b", 1.into());
        assert_eq!(
            query.to_dql(),
            Err(QueryError::InvalidParameterName("a.b".into()))
        );
    }
}
