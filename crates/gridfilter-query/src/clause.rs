//! Internal representation of query clauses.
//!
//! WHERE and HAVING conditions are kept as a tree of [`Predicate`]s so that
//! mixing `and_*` and `or_*` calls keeps the grouping of earlier conditions.

use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

static TOP_LEVEL_CONJUNCTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s(AND|OR)\s").unwrap());

/// How a new condition is combined with the existing ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Conjunction {
    #[default]
    And,
    Or,
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conjunction::And => write!(f, "AND"),
            Conjunction::Or => write!(f, "OR"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Predicate {
    Leaf(String),
    Composite {
        conjunction: Conjunction,
        parts: Vec<Predicate>,
    },
}

impl Predicate {
    /// Combines `existing` with `condition`.
    ///
    /// Consecutive conditions with the same conjunction are flattened into one
    /// composite; switching conjunction wraps everything seen so far.
    pub(crate) fn combine(
        existing: Option<Predicate>,
        conjunction: Conjunction,
        condition: String,
    ) -> Predicate {
        match existing {
            None => Predicate::Leaf(condition),
            Some(Predicate::Composite {
                conjunction: current,
                mut parts,
            }) if current == conjunction => {
                parts.push(Predicate::Leaf(condition));
                Predicate::Composite {
                    conjunction,
                    parts,
                }
            }
            Some(previous) => {
                Predicate::Composite {
                    conjunction,
                    parts: vec![previous, Predicate::Leaf(condition)],
                }
            }
        }
    }

    pub(crate) fn render(&self) -> String {
        match self {
            Predicate::Leaf(sql) => sql.clone(),
            Predicate::Composite {
                conjunction,
                parts,
            } => {
                let grouped = parts.len() > 1;
                parts
                    .iter()
                    .map(|part| {
                        match part {
                            Predicate::Composite {
                                ..
                            } => format!("({})", part.render()),
                            Predicate::Leaf(sql)
                                if grouped && TOP_LEVEL_CONJUNCTION.is_match(sql) =>
                            {
                                format!("({sql})")
                            }
                            Predicate::Leaf(sql) => sql.clone(),
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(&format!(" {conjunction} "))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum JoinKind {
    Inner,
    Left,
}

/// A JOIN on an association path, e.g. `LEFT JOIN o.comments c`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct JoinClause {
    pub kind: JoinKind,
    pub path: String,
    pub alias: String,
}

/// An entity in the FROM clause.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FromClause {
    pub entity: String,
    pub alias: String,
}

/// An ORDER BY clause.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct OrderClause {
    pub column: String,
    pub desc: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(s: &str) -> String {
        s.to_string()
    }

    #[test]
    fn test_single_condition_renders_bare() {
        let p = Predicate::combine(None, Conjunction::And, leaf("a = 1"));
        assert_eq!(p.render(), "a = 1");
    }

    #[test]
    fn test_same_conjunction_is_flattened() {
        let p = Predicate::combine(None, Conjunction::And, leaf("a"));
        let p = Predicate::combine(Some(p), Conjunction::And, leaf("b"));
        let p = Predicate::combine(Some(p), Conjunction::And, leaf("c"));
        assert_eq!(p.render(), "a AND b AND c");
    }

    #[test]
    fn test_switching_conjunction_groups_previous() {
        let p = Predicate::combine(None, Conjunction::And, leaf("a"));
        let p = Predicate::combine(Some(p), Conjunction::And, leaf("b"));
        let p = Predicate::combine(Some(p), Conjunction::Or, leaf("c"));
        assert_eq!(p.render(), "(a AND b) OR c");
    }

    #[test]
    fn test_compound_leaf_is_parenthesized() {
        let p = Predicate::combine(None, Conjunction::And, leaf("a = 1 OR b = 2"));
        assert_eq!(p.render(), "a = 1 OR b = 2");

        let p = Predicate::combine(Some(p), Conjunction::And, leaf("c = 3"));
        assert_eq!(p.render(), "(a = 1 OR b = 2) AND c = 3");

        let p = Predicate::combine(Some(p), Conjunction::Or, leaf("x = 1 and y = 2"));
        assert_eq!(p.render(), "((a = 1 OR b = 2) AND c = 3) OR (x = 1 and y = 2)");
    }

    #[test]
    fn test_words_containing_conjunctions_stay_bare() {
        let p = Predicate::combine(None, Conjunction::And, leaf("o.brand = 1"));
        let p = Predicate::combine(Some(p), Conjunction::And, leaf("o.order_count > 2"));
        assert_eq!(p.render(), "o.brand = 1 AND o.order_count > 2");
    }

    #[test]
    fn test_first_or_behaves_like_and() {
        let p = Predicate::combine(None, Conjunction::Or, leaf("a"));
        assert_eq!(p, Predicate::Leaf("a".into()));
    }

    #[test]
    fn test_conjunction_display() {
        assert_eq!(Conjunction::And.to_string(), "AND");
        assert_eq!(Conjunction::Or.to_string(), "OR");
    }
}
