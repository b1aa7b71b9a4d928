//! Configuration data structures for mismatch-lint.
//!
//! Defines the YAML config format: per-family name tables, ignored types,
//! and performance switches. Every field is optional; omitted tables fall
//! back to the built-in lists in [`super::defaults`].

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::types::ContainerFamily;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration for mismatch-lint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LintConfig {
    /// Config format version (currently "1.0").
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub collection: FamilyOverrides,

    #[serde(default)]
    pub string_builder: FamilyOverrides,

    #[serde(default)]
    pub array: FamilyOverrides,

    /// Performance tuning knobs.
    #[serde(default)]
    pub performance: PerformanceConfig,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            collection: FamilyOverrides::default(),
            string_builder: FamilyOverrides::default(),
            array: FamilyOverrides::default(),
            performance: PerformanceConfig::default(),
        }
    }
}

impl LintConfig {
    /// The overrides section for `family`.
    pub fn overrides(&self, family: ContainerFamily) -> &FamilyOverrides {
        match family {
            ContainerFamily::Collection => &self.collection,
            ContainerFamily::StringBuilder => &self.string_builder,
            ContainerFamily::Array => &self.array,
        }
    }

    /// Effective name tables for `family`, with defaults filled in.
    pub fn names_for(&self, family: ContainerFamily) -> FamilyNames {
        let overrides = self.overrides(family);
        FamilyNames {
            query_names: overrides
                .query_names
                .clone()
                .unwrap_or_else(|| to_owned(defaults::query_names(family))),
            update_names: overrides
                .update_names
                .clone()
                .unwrap_or_else(|| to_owned(defaults::update_names(family))),
            ignored_types: overrides.ignored_types.clone().unwrap_or_default(),
        }
    }
}

// ---------------------------------------------------------------------------
// FamilyOverrides
// ---------------------------------------------------------------------------

/// User-supplied tables for one container family. `None` means "use defaults".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FamilyOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_names: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_names: Option<Vec<String>>,

    /// Simple type names excluded from analysis (e.g. `Properties`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignored_types: Option<Vec<String>>,
}

/// Fully resolved tables for one family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyNames {
    pub query_names: Vec<String>,
    pub update_names: Vec<String>,
    pub ignored_types: Vec<String>,
}

// ---------------------------------------------------------------------------
// PerformanceConfig
// ---------------------------------------------------------------------------

/// Performance tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceConfig {
    /// Stop walking a scope once a target is both queried and updated.
    #[serde(default = "default_true")]
    pub early_exit: bool,

    /// Check files on the rayon thread pool.
    #[serde(default = "default_true")]
    pub parallel: bool,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            early_exit: true,
            parallel: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_version() -> String {
    "1.0".to_string()
}

fn default_true() -> bool {
    true
}

fn to_owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq as pa_eq;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test]
    fn default_config() {
        let config = LintConfig::default();
        pa_eq!(config.version, "1.0");
        assert!(config.performance.early_exit);
        assert!(config.performance.parallel);
        pa_eq!(config.collection, FamilyOverrides::default());
    }

    #[test]
    fn empty_yaml_uses_defaults() {
        let config: LintConfig = serde_yaml::from_str("{}").unwrap();
        pa_eq!(config, LintConfig::default());
    }

    #[test_case(ContainerFamily::Collection ; "collection")]
    #[test_case(ContainerFamily::StringBuilder ; "string builder")]
    #[test_case(ContainerFamily::Array ; "array")]
    fn omitted_tables_fall_back_to_defaults(family: ContainerFamily) {
        let names = LintConfig::default().names_for(family);
        pa_eq!(names.query_names, to_owned(defaults::query_names(family)));
        pa_eq!(names.update_names, to_owned(defaults::update_names(family)));
        assert!(names.ignored_types.is_empty());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let yaml = r#"
collection:
  update_names: [add, enqueue]
  ignored_types: [Properties]
"#;
        let config: LintConfig = serde_yaml::from_str(yaml).unwrap();
        let names = config.names_for(ContainerFamily::Collection);
        pa_eq!(names.update_names, vec!["add".to_string(), "enqueue".to_string()]);
        pa_eq!(
            names.query_names,
            to_owned(defaults::query_names(ContainerFamily::Collection))
        );
        pa_eq!(names.ignored_types, vec!["Properties".to_string()]);

        let untouched = config.names_for(ContainerFamily::StringBuilder);
        assert!(untouched.ignored_types.is_empty());
    }

    #[test]
    fn full_yaml_config() {
        let yaml = r#"
version: "1.0"
collection:
  query_names: [contains, size]
string_builder:
  ignored_types: [StringBuffer]
array:
  ignored_types: []
performance:
  early_exit: false
  parallel: false
"#;
        let config: LintConfig = serde_yaml::from_str(yaml).unwrap();
        pa_eq!(
            config.collection.query_names,
            Some(vec!["contains".to_string(), "size".to_string()])
        );
        pa_eq!(
            config.names_for(ContainerFamily::StringBuilder).ignored_types,
            vec!["StringBuffer".to_string()]
        );
        pa_eq!(config.array.ignored_types, Some(Vec::new()));
        assert!(!config.performance.early_exit);
        assert!(!config.performance.parallel);
    }

    #[test]
    fn performance_section_partial() {
        let perf: PerformanceConfig = serde_yaml::from_str("parallel: false").unwrap();
        assert!(perf.early_exit);
        assert!(!perf.parallel);
    }

    #[test]
    fn invalid_yaml_returns_error() {
        let result: Result<LintConfig, _> = serde_yaml::from_str("{{invalid yaml}}");
        assert!(result.is_err());
    }

    #[test]
    fn wrong_type_is_rejected() {
        let result: Result<LintConfig, _> = serde_yaml::from_str("collection: 3");
        assert!(result.is_err());
    }

    #[test]
    fn unset_overrides_are_not_serialized() {
        let yaml = serde_yaml::to_string(&LintConfig::default()).unwrap();
        assert!(!yaml.contains("query_names"));
        assert!(yaml.contains("early_exit"));
    }

    proptest! {
        #[test]
        fn config_yaml_roundtrip(early in any::<bool>(), parallel in any::<bool>(),
                                 names in proptest::collection::vec("[a-z]{1,8}", 0..5)) {
            let config = LintConfig {
                collection: FamilyOverrides {
                    update_names: Some(names.clone()),
                    ..Default::default()
                },
                performance: PerformanceConfig { early_exit: early, parallel },
                ..Default::default()
            };
            let yaml = serde_yaml::to_string(&config).unwrap();
            let back: LintConfig = serde_yaml::from_str(&yaml).unwrap();
            pa_eq!(back, config);
        }
    }
}
