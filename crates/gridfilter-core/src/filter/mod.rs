//! The datagrid filter contract.
//!
//! A filter is initialized once with a name and [`FilterOptions`], then applied to a
//! query with the value submitted for it. Applying a filter only ever appends to the
//! query; it never removes clauses that are already there.

pub mod count;

use gridfilter_config::config::Config;
use gridfilter_query::{Conjunction, ProxyQuery};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::{
    data::FilterData,
    error::{FilterError, Result},
};

/// Options a filter is initialized with.
///
/// Unset options fall back to the filter's [`Filter::default_options`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    pub label: Option<String>,

    /// Field the filter applies to, relative to the filtered alias.
    pub field_name: Option<String>,

    /// Form type used to render the value input.
    pub field_type: Option<String>,

    pub field_options: Map<String, JsonValue>,

    /// Overrides the configured default condition.
    pub condition: Option<Conjunction>,

    /// Alias to filter on instead of the query's root alias, e.g. a joined association.
    pub association_alias: Option<String>,
}

impl FilterOptions {
    /// Fills every unset option from `defaults`.
    pub fn or(self, defaults: FilterOptions) -> FilterOptions {
        FilterOptions {
            label: self.label.or(defaults.label),
            field_name: self.field_name.or(defaults.field_name),
            field_type: self.field_type.or(defaults.field_type),
            field_options: if self.field_options.is_empty() {
                defaults.field_options
            } else {
                self.field_options
            },
            condition: self.condition.or(defaults.condition),
            association_alias: self.association_alias.or(defaults.association_alias),
        }
    }
}

/// What the UI layer needs to render a filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSettings {
    /// Form type of the whole filter widget.
    pub form_type: String,
    pub options: RenderOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderOptions {
    pub field_type: String,
    pub field_options: Map<String, JsonValue>,
    pub label: String,
}

/// State shared by every filter.
#[derive(Debug, Clone)]
pub struct FilterBase {
    name: Option<String>,
    options: FilterOptions,
    active: bool,
    parameter_prefix: String,
    default_condition: Conjunction,
}

impl FilterBase {
    pub fn new(config: &Config) -> Self {
        Self {
            name: None,
            options: FilterOptions::default(),
            active: false,
            parameter_prefix: config.parameter_prefix().to_string(),
            default_condition: config.default_condition(),
        }
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }
}

pub trait Filter {
    fn base(&self) -> &FilterBase;

    fn base_mut(&mut self) -> &mut FilterBase;

    fn default_options(&self) -> FilterOptions;

    fn render_settings(&self) -> RenderSettings;

    /// Restricts `query` on `alias.field` according to `data`.
    fn filter(
        &mut self,
        query: &mut dyn ProxyQuery,
        alias: &str,
        field: &str,
        data: Option<&FilterData>,
    ) -> Result<()>;

    fn initialize(&mut self, name: &str, options: FilterOptions) {
        let options = options.or(self.default_options());
        let base = self.base_mut();
        base.name = Some(name.to_string());
        base.options = options;
    }

    fn name(&self) -> &str {
        self.base().name.as_deref().unwrap_or_default()
    }

    /// Name usable as a form field name.
    fn form_name(&self) -> String {
        self.name().replace('.', "__")
    }

    fn label(&self) -> String {
        self.base()
            .options
            .label
            .clone()
            .unwrap_or_else(|| humanize(self.name()))
    }

    fn field_name(&self) -> Result<&str> {
        self.base()
            .options
            .field_name
            .as_deref()
            .ok_or_else(|| FilterError::MissingFieldName(self.name().to_string()))
    }

    fn field_type(&self) -> &str {
        self.base()
            .options
            .field_type
            .as_deref()
            .unwrap_or("text")
    }

    fn field_options(&self) -> &Map<String, JsonValue> {
        &self.base().options.field_options
    }

    fn condition(&self) -> Conjunction {
        self.base()
            .options
            .condition
            .unwrap_or(self.base().default_condition)
    }

    fn is_active(&self) -> bool {
        self.base().active
    }

    /// Applies the filter on its configured field.
    ///
    /// The alias is the `association_alias` option when set, otherwise the query's root alias.
    fn apply(&mut self, query: &mut dyn ProxyQuery, data: Option<&FilterData>) -> Result<()> {
        let alias = match self.base().options.association_alias.clone() {
            Some(alias) => alias,
            None => query.root_alias().ok_or(FilterError::MissingRootAlias)?,
        };
        let field = self.field_name()?.to_string();

        self.filter(query, &alias, &field, data)
    }

    /// `<prefix><name with dots replaced>_<unique id>`
    fn new_parameter_name(&self, query: &mut dyn ProxyQuery) -> String {
        format!(
            "{}{}_{}",
            self.base().parameter_prefix,
            self.name().replace('.', "_"),
            query.unique_parameter_id()
        )
    }

    fn apply_where(&mut self, query: &mut dyn ProxyQuery, condition: String) {
        query.add_where(self.condition(), condition);
        self.base_mut().active = true;
    }

    fn apply_having(&mut self, query: &mut dyn ProxyQuery, condition: String) {
        query.add_having(self.condition(), condition);
        self.base_mut().active = true;
    }
}

/// `comments_count` -> `Comments count`
fn humanize(name: &str) -> String {
    let spaced = name.replace(['_', '.'], " ");
    let mut chars = spaced.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
