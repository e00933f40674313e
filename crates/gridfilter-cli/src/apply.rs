use gridfilter_core::{CountFilter, Filter, FilterData, FilterOptions, NumberOperator};
use gridfilter_query::{Conjunction, QueryBuilder, Value};
use nu_ansi_term::Color::{Cyan, Green};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};

use crate::{
    error::{CliError, CliResult},
    utils::Colored,
};

/// A parsed `NAME[:ALIAS.FIELD]=PAYLOAD` argument.
#[derive(Debug, PartialEq)]
pub struct CountArg {
    pub name: String,
    pub target: Option<(String, String)>,
    pub payload: Option<FilterData>,
}

impl CountArg {
    pub fn parse(arg: &str) -> CliResult<Self> {
        let invalid = |reason: &str| {
            CliError::InvalidArgument {
                value: arg.to_string(),
                reason: reason.to_string(),
            }
        };

        let (head, payload) = arg
            .split_once('=')
            .ok_or_else(|| invalid("expected `=` followed by a JSON payload"))?;

        let (name, target) = match head.split_once(':') {
            Some((name, target)) => {
                let (alias, field) = target
                    .split_once('.')
                    .ok_or_else(|| invalid("expected `ALIAS.FIELD` after `:`"))?;
                (name, Some((alias.to_string(), field.to_string())))
            }
            None => (head, None),
        };

        if name.is_empty() {
            return Err(invalid("filter name is empty"));
        }

        Ok(Self {
            name: name.to_string(),
            target,
            payload: FilterData::from_json(payload)?,
        })
    }

    fn options(&self, condition: Option<Conjunction>) -> FilterOptions {
        match &self.target {
            Some((alias, field)) => {
                FilterOptions {
                    field_name: Some(field.clone()),
                    association_alias: Some(alias.clone()),
                    condition,
                    ..Default::default()
                }
            }
            None => {
                FilterOptions {
                    field_name: Some(self.name.clone()),
                    condition,
                    ..Default::default()
                }
            }
        }
    }
}

/// Parses `PATH:ALIAS`, e.g. `o.comments:c`.
pub fn parse_join(arg: &str) -> CliResult<(String, String)> {
    match arg.rsplit_once(':') {
        Some((path, alias)) if !path.is_empty() && !alias.is_empty() => {
            Ok((path.to_string(), alias.to_string()))
        }
        _ => {
            Err(CliError::InvalidArgument {
                value: arg.to_string(),
                reason: "expected `PATH:ALIAS`".to_string(),
            })
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AppliedFilter {
    pub name: String,
    pub active: bool,
}

#[derive(Debug, Serialize)]
pub struct FilteredQuery {
    pub dql: String,
    pub parameters: Vec<(String, Value)>,
    pub filters: Vec<AppliedFilter>,
}

pub fn build_query(
    entity: &str,
    alias: &str,
    joins: &[String],
    counts: &[String],
    or: bool,
) -> CliResult<FilteredQuery> {
    let mut query = QueryBuilder::select(alias).from(entity, alias);
    for join in joins {
        let (path, join_alias) = parse_join(join)?;
        query = query.left_join(path, join_alias);
    }

    let condition = or.then_some(Conjunction::Or);
    let mut filters = Vec::with_capacity(counts.len());

    for count in counts {
        let arg = CountArg::parse(count)?;
        let mut filter = CountFilter::new();
        filter.initialize(&arg.name, arg.options(condition));
        filter.apply(&mut query, arg.payload.as_ref())?;

        debug!("Filter '{}' active: {}", filter.name(), filter.is_active());
        filters.push(AppliedFilter {
            name: filter.name().to_string(),
            active: filter.is_active(),
        });
    }

    Ok(FilteredQuery {
        dql: query.to_dql()?,
        parameters: query.parameters().to_vec(),
        filters,
    })
}

pub fn apply_filters(
    entity: &str,
    alias: &str,
    joins: &[String],
    counts: &[String],
    or: bool,
    json_output: bool,
) -> CliResult<()> {
    let result = build_query(entity, alias, joins, counts, or)?;

    if json_output {
        let mut parameters = serde_json::Map::new();
        for (name, value) in &result.parameters {
            parameters.insert(name.clone(), serde_json::to_value(value)?);
        }
        let output = json!({
            "dql": result.dql,
            "parameters": parameters,
            "filters": result.filters,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", result.dql);
    for (name, value) in &result.parameters {
        println!("  {} = {}", Colored(Cyan, format!(":{name}")), value);
    }

    let inactive = result.filters.iter().filter(|f| !f.active).count();
    if inactive > 0 {
        info!("{} filter(s) had no usable value and were skipped", inactive);
    }

    Ok(())
}

pub fn list_operators(json_output: bool) -> CliResult<()> {
    if json_output {
        let operators: Vec<_> = NumberOperator::ALL
            .iter()
            .map(|op| json!({ "code": op.code(), "name": op.name(), "symbol": op.symbol() }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&operators)?);
        return Ok(());
    }

    for op in NumberOperator::ALL {
        println!(
            "{}  {:<2}  {}",
            Colored(Green, op.code()),
            op.symbol(),
            op.name()
        );
    }
    Ok(())
}
