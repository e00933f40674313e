use std::sync::LazyLock;

use regex::Regex;

use crate::error::{FilterError, Result};

static IDENTIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("unable to compile identifier regex")
});

/// Checks that `s` can be interpolated into query text as an alias or field name.
pub fn validate_identifier(s: &str) -> Result<()> {
    if IDENTIFIER_RE.is_match(s) {
        Ok(())
    } else {
        Err(FilterError::InvalidIdentifier(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identifiers() {
        for s in ["c", "comments", "_private", "post2", "CamelCase"] {
            assert!(validate_identifier(s).is_ok(), "{s} should be valid");
        }
    }

    #[test]
    fn test_invalid_identifiers() {
        for s in ["", "2post", "c.comments", "id) OR 1=1 --", "a b", "naïve"] {
            assert_eq!(
                validate_identifier(s),
                Err(FilterError::InvalidIdentifier(s.to_string()))
            );
        }
    }
}
