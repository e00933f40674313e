//! Helpers for building DQL expression fragments.

/// `COUNT(<path>)`
pub fn count(path: &str) -> String {
    format!("COUNT({path})")
}

/// `<alias>.<field>`
pub fn path(alias: &str, field: &str) -> String {
    format!("{alias}.{field}")
}

/// `:<name>`
pub fn param(name: &str) -> String {
    format!(":{name}")
}

/// `<left> <op> <right>`
pub fn comparison(left: &str, op: &str, right: &str) -> String {
    format!("{left} {op} {right}")
}

/// Returns `true` when `name` can be used as a parameter name.
pub fn is_valid_parameter_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Extracts the names of all `:name` placeholders in `sql`, in order of appearance.
///
/// Text inside single-quoted string literals is skipped.
pub fn placeholders(sql: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let bytes = sql.as_bytes();
    let mut quoted = false;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            // `''` inside a literal toggles twice, so escaped quotes stay quoted.
            b'\'' => {
                quoted = !quoted;
                i += 1;
            }
            b':' if !quoted => {
                let start = i + 1;
                let mut end = start;
                while end < bytes.len()
                    && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_')
                {
                    end += 1;
                }
                if end > start {
                    names.push(&sql[start..end]);
                }
                i = end.max(start);
            }
            _ => i += 1,
        }
    }

    names
}
