//! Number comparison operators and their form codes.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::FilterError;

/// A comparison selectable in a number filter.
///
/// The integer codes are shared with the operator form field and must not be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NumberOperator {
    GreaterEqual,
    GreaterThan,
    Equal,
    LessEqual,
    LessThan,
}

/// Operator code to SQL symbol.
pub const CHOICES: [(i64, &str); 5] = [
    (NumberOperator::GreaterEqual.code(), ">="),
    (NumberOperator::GreaterThan.code(), ">"),
    (NumberOperator::Equal.code(), "="),
    (NumberOperator::LessEqual.code(), "<="),
    (NumberOperator::LessThan.code(), "<"),
];

impl NumberOperator {
    pub const ALL: [NumberOperator; 5] = [
        NumberOperator::GreaterEqual,
        NumberOperator::GreaterThan,
        NumberOperator::Equal,
        NumberOperator::LessEqual,
        NumberOperator::LessThan,
    ];

    pub const fn code(self) -> i64 {
        match self {
            NumberOperator::GreaterEqual => 1,
            NumberOperator::GreaterThan => 2,
            NumberOperator::Equal => 3,
            NumberOperator::LessEqual => 4,
            NumberOperator::LessThan => 5,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.code() == code)
    }

    pub fn symbol(self) -> &'static str {
        CHOICES
            .iter()
            .find(|(code, _)| *code == self.code())
            .map(|(_, symbol)| *symbol)
            .unwrap_or("=")
    }

    pub fn name(self) -> &'static str {
        match self {
            NumberOperator::GreaterEqual => "greater-or-equal",
            NumberOperator::GreaterThan => "greater-than",
            NumberOperator::Equal => "equal",
            NumberOperator::LessEqual => "less-or-equal",
            NumberOperator::LessThan => "less-than",
        }
    }

    /// Comma separated list of the known codes, as shown in error messages.
    pub fn allowed_codes() -> String {
        CHOICES
            .iter()
            .map(|(code, _)| code.to_string())
            .collect::<Vec<_>>()
            .join("\", \"")
    }
}

impl fmt::Display for NumberOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for NumberOperator {
    type Err = FilterError;

    /// Parses an operator from its name, symbol or numeric code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(code) = s.parse::<i64>() {
            return Self::from_code(code).ok_or_else(|| {
                FilterError::UnsupportedOperator {
                    code,
                    allowed: Self::allowed_codes(),
                }
            });
        }

        Self::ALL
            .into_iter()
            .find(|op| op.name() == s || op.symbol() == s)
            .ok_or_else(|| FilterError::InvalidPayload(format!("unknown operator `{s}`")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_map_to_symbols() {
        assert_eq!(NumberOperator::from_code(1).unwrap().symbol(), ">=");
        assert_eq!(NumberOperator::from_code(2).unwrap().symbol(), ">");
        assert_eq!(NumberOperator::from_code(3).unwrap().symbol(), "=");
        assert_eq!(NumberOperator::from_code(4).unwrap().symbol(), "<=");
        assert_eq!(NumberOperator::from_code(5).unwrap().symbol(), "<");
    }

    #[test]
    fn test_unknown_codes() {
        assert_eq!(NumberOperator::from_code(0), None);
        assert_eq!(NumberOperator::from_code(6), None);
        assert_eq!(NumberOperator::from_code(-1), None);
    }

    #[test]
    fn test_choices_cover_every_operator() {
        for op in NumberOperator::ALL {
            assert!(CHOICES.iter().any(|(code, _)| *code == op.code()));
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "greater-or-equal".parse::<NumberOperator>().unwrap(),
            NumberOperator::GreaterEqual
        );
        assert_eq!("<".parse::<NumberOperator>().unwrap(), NumberOperator::LessThan);
        assert_eq!("3".parse::<NumberOperator>().unwrap(), NumberOperator::Equal);
        assert!(matches!(
            "9".parse::<NumberOperator>(),
            Err(FilterError::UnsupportedOperator { code: 9, .. })
        ));
        assert!(matches!(
            "between".parse::<NumberOperator>(),
            Err(FilterError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_allowed_codes() {
        assert_eq!(NumberOperator::allowed_codes(), "1\", \"2\", \"3\", \"4\", \"5");
    }
}
