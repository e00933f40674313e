//! Filter on the number of related rows.

use gridfilter_config::config::{get_config, Config, UnknownOperatorPolicy};
use gridfilter_query::{expr, ProxyQuery};
use tracing::{debug, warn};

use crate::{
    data::FilterData,
    error::{FilterError, Result},
    filter::{Filter, FilterBase, FilterOptions, RenderOptions, RenderSettings},
    identifier::validate_identifier,
    operator::NumberOperator,
};

/// Restricts a query to rows whose number of `alias.field` entries compares to a number.
///
/// Applying it groups the query by its root alias and appends
/// `COUNT(<alias>.<field>) <op> :<param>` to HAVING.
///
/// # Example
///
/// ```
/// use gridfilter_core::{CountFilter, Filter, FilterData, FilterOptions};
/// use gridfilter_query::QueryBuilder;
///
/// let mut query = QueryBuilder::select("o").from("Post", "o");
/// let mut filter = CountFilter::new();
/// filter.initialize("comments", FilterOptions::default());
///
/// let data = FilterData::new(Some(1), 5);
/// filter.filter(&mut query, "o", "comments", Some(&data)).unwrap();
///
/// assert_eq!(query.having().unwrap(), "COUNT(o.comments) >= :comments_0");
/// ```
#[derive(Debug, Clone)]
pub struct CountFilter {
    base: FilterBase,
    unknown_operator: UnknownOperatorPolicy,
}

impl CountFilter {
    /// Creates a filter configured from the global configuration.
    pub fn new() -> Self {
        Self::with_config(&get_config())
    }

    pub fn with_config(config: &Config) -> Self {
        Self {
            base: FilterBase::new(config),
            unknown_operator: config.unknown_operator(),
        }
    }

    /// Resolves an operator code under the configured unknown-operator policy.
    pub fn operator(&self, code: i64) -> Result<NumberOperator> {
        if let Some(operator) = NumberOperator::from_code(code) {
            return Ok(operator);
        }

        match self.unknown_operator {
            UnknownOperatorPolicy::Reject => {
                Err(FilterError::UnsupportedOperator {
                    code,
                    allowed: NumberOperator::allowed_codes(),
                })
            }
            UnknownOperatorPolicy::Equal => {
                warn!(
                    "Operator type {} is not supported by filter '{}', comparing with '='",
                    code,
                    self.name()
                );
                Ok(NumberOperator::Equal)
            }
        }
    }
}

impl Default for CountFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for CountFilter {
    fn base(&self) -> &FilterBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut FilterBase {
        &mut self.base
    }

    fn default_options(&self) -> FilterOptions {
        FilterOptions {
            field_type: Some("number".to_string()),
            ..Default::default()
        }
    }

    fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            form_type: "number".to_string(),
            options: RenderOptions {
                field_type: self.field_type().to_string(),
                field_options: self.field_options().clone(),
                label: self.label(),
            },
        }
    }

    fn filter(
        &mut self,
        query: &mut dyn ProxyQuery,
        alias: &str,
        field: &str,
        data: Option<&FilterData>,
    ) -> Result<()> {
        let Some(data) = data else {
            debug!("No value submitted for filter '{}'", self.name());
            return Ok(());
        };

        let Some(value) = data.numeric_value() else {
            debug!(
                "Ignoring non-numeric value {:?} for filter '{}'",
                data.value,
                self.name()
            );
            return Ok(());
        };

        let operator = self.operator(
            data.operator_type
                .unwrap_or(NumberOperator::Equal.code()),
        )?;

        validate_identifier(alias)?;
        validate_identifier(field)?;

        // COUNT(c.comments) >= :comments_0
        let parameter_name = self.new_parameter_name(query);
        let group_by = query.root_alias().unwrap_or_else(|| alias.to_string());
        query.add_group_by(&group_by);

        let condition = expr::comparison(
            &expr::count(&expr::path(alias, field)),
            operator.symbol(),
            &expr::param(&parameter_name),
        );
        debug!("Filter '{}' adds HAVING {}", self.name(), condition);

        self.apply_having(query, condition);
        query.set_parameter(&parameter_name, value);

        Ok(())
    }
}
