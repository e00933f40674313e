use std::any::type_name;

use documented::DocumentedFields;
use toml_edit::{Decor, Item, RawString, Table};
use tracing::warn;

use crate::error::{ConfigError, Result};

/// Appends `docs` to the comment prefix of `decor`, one `#` line per doc line.
pub fn append_docs_as_toml_comments(decor: &mut Decor, docs: &str) {
    let old_prefix = decor.prefix().and_then(RawString::as_str).unwrap_or("");

    let comments: String = docs
        .lines()
        .map(|l| {
            if l.is_empty() {
                "#\n".into()
            } else {
                format!("# {l}\n")
            }
        })
        .collect();

    let new_prefix = match old_prefix.lines().last() {
        None => format!("{old_prefix}{comments}"),
        Some("") => format!("{old_prefix}{comments}"),
        Some(_) => format!("{old_prefix}#\n{comments}"),
    };
    decor.set_prefix(new_prefix);
}

/// Writes the field docs of `T` above each key of `table`.
///
/// The configuration is flat, so every documented key must hold a plain value.
/// Keys without field docs are left alone.
pub fn annotate_toml_table<T: DocumentedFields>(table: &mut Table) -> Result<()> {
    for (mut key_mut, value_item) in table.iter_mut() {
        let key_str = key_mut.get();
        match T::get_field_docs(key_str) {
            Ok(docs) => {
                match value_item {
                    Item::Value(_) => append_docs_as_toml_comments(key_mut.leaf_decor_mut(), docs),
                    _ => return Err(ConfigError::UnexpectedTomlItem(key_str.into())),
                }
            }
            Err(_) => {
                warn!(
                    "Field '{}' found in TOML but not in struct '{}'",
                    key_str,
                    type_name::<T>()
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use toml_edit::Decor;

    use super::*;
    use crate::config::Config;

    fn prefix_of(decor: &Decor) -> String {
        decor
            .prefix()
            .and_then(|p| p.as_str())
            .unwrap_or_default()
            .to_string()
    }

    #[test]
    fn test_append_docs_as_toml_comments() {
        let mut decor = Decor::new("", "");
        append_docs_as_toml_comments(&mut decor, "Test documentation");

        assert_eq!(prefix_of(&decor), "# Test documentation\n");
    }

    #[test]
    fn test_append_docs_empty_lines() {
        let mut decor = Decor::new("", "");
        append_docs_as_toml_comments(&mut decor, "Line 1\n\nLine 2");

        assert_eq!(prefix_of(&decor), "# Line 1\n#\n# Line 2\n");
    }

    #[test]
    fn test_append_docs_separates_existing_comment() {
        let mut decor = Decor::new("# existing\n", "");
        append_docs_as_toml_comments(&mut decor, "New");

        assert_eq!(prefix_of(&decor), "# existing\n#\n# New\n");
    }

    #[test]
    fn test_annotate_config_table() {
        let config = Config::default_config();
        let doc = config.to_annotated_document().unwrap().to_string();

        assert!(doc.contains("# What to do when a filter receives an operator code"));
        assert!(doc.contains("unknown_operator = \"reject\""));
    }

    #[test]
    fn test_annotate_rejects_nested_table() {
        let mut doc: toml_edit::DocumentMut = "[unknown_operator]\nmode = 1\n".parse().unwrap();

        assert!(matches!(
            annotate_toml_table::<Config>(doc.as_table_mut()),
            Err(ConfigError::UnexpectedTomlItem(key)) if key == "unknown_operator"
        ));
    }

    #[test]
    fn test_annotate_skips_unknown_keys() {
        let mut doc: toml_edit::DocumentMut = "extra = 1\n".parse().unwrap();
        annotate_toml_table::<Config>(doc.as_table_mut()).unwrap();

        assert_eq!(doc.to_string(), "extra = 1\n");
    }
}
