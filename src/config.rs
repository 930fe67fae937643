//! Editor settings, loaded from JSON.

use crate::error::EditorError;
use crate::sanity::{self, SanityCheck};
use crate::xml::braces::DEFAULT_MAX_DEPTH;
use freedict_values::{Typology, ValueTables};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const FREEDICT_EDITOR_NAMESPACE: &str = "http://freedict.org/ns/freedict-editor";
pub const FREEDICT_EDITOR_NAMESPACE_PREFIX: &str = "fd";

/// Headwords longer than this are cut when shown in reports.
pub const DEFAULT_HEADWORD_LENGTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Prefix bound to the editor namespace in every XPath expression.
    pub namespace_prefix: String,
    pub namespace_uri: String,
    /// Open braces allowed on the stack before a string counts as unbalanced.
    pub max_brace_depth: usize,
    pub headword_length: usize,
    /// Checks to run. When absent, the default checks are built for
    /// `namespace_prefix`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sanity_checks: Option<Vec<SanityCheck>>,
    /// Replacement tables in `label<TAB>code` form, keyed by typology.
    pub tables: BTreeMap<Typology, Vec<String>>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            namespace_prefix: FREEDICT_EDITOR_NAMESPACE_PREFIX.to_string(),
            namespace_uri: FREEDICT_EDITOR_NAMESPACE.to_string(),
            max_brace_depth: DEFAULT_MAX_DEPTH,
            headword_length: DEFAULT_HEADWORD_LENGTH,
            sanity_checks: None,
            tables: BTreeMap::new(),
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, EditorError> {
        let path = path.as_ref();
        log::info!("Loading editor configuration from {}", path.display());
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// The configured checks, or the default ones using this
    /// configuration's namespace prefix.
    pub fn checks(&self) -> Vec<SanityCheck> {
        match &self.sanity_checks {
            Some(checks) => checks.clone(),
            None => sanity::default_checks(&self.namespace_prefix),
        }
    }

    /// The built-in tables with this configuration's overrides applied.
    pub fn value_tables(&self) -> Result<ValueTables, EditorError> {
        let mut tables = ValueTables::default();
        for (typology, items) in &self.tables {
            tables.load_tab_list(*typology, items)?;
        }
        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use freedict_values::ValuesError;

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = EditorConfig::from_json("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.namespace_prefix, "fd");
        assert_eq!(config.max_brace_depth, 100);
        assert_eq!(config.checks(), sanity::default_checks("fd"));
    }

    #[test]
    fn test_default_checks_follow_custom_prefix() {
        let config = EditorConfig::from_json(r#"{ "namespacePrefix": "ed" }"#).unwrap();
        assert_eq!(config.checks(), sanity::default_checks("ed"));
        assert!(config.checks()[0].xpath.contains("ed:unbalanced-braces"));

        let config = EditorConfig::from_json(r#"{ "sanityChecks": [] }"#).unwrap();
        assert!(config.checks().is_empty());
    }

    #[test]
    fn test_table_overrides() {
        let config = EditorConfig::from_json(
            r#"{ "tables": { "gen": ["None\t", "Utrum\tc", "Neuter\tn"] } }"#,
        )
        .unwrap();
        let tables = config.value_tables().unwrap();
        assert_eq!(tables.get(Typology::Gender).len(), 3);
        assert_eq!(tables.get(Typology::Gender).value_to_index(Some("c")), Some(1));
        // Untouched typologies keep their built-in tables.
        assert_eq!(tables.get(Typology::Number), &Typology::Number.default_table());
    }

    #[test]
    fn test_bad_table_override_is_reported() {
        let config = EditorConfig::from_json(r#"{ "tables": { "pos": ["Noun n"] } }"#).unwrap();
        assert!(matches!(
            config.value_tables(),
            Err(EditorError::Values(ValuesError::MissingSeparator { index: 0, .. }))
        ));
    }

    #[test]
    fn test_unknown_typology_key_fails() {
        assert!(matches!(
            EditorConfig::from_json(r#"{ "tables": { "colour": [] } }"#),
            Err(EditorError::Config(_))
        ));
    }
}
