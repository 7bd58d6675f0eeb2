//! Artifact descriptor parsing
//!
//! Handles parsing `artifact.toml` descriptors and property-style
//! descriptor text into the export sets and override entries a module is
//! isolated with.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::debug;

use crate::module::filter::{
    ExportFilter, EXPORTED_CLASS_PACKAGES_PROPERTY, EXPORTED_RESOURCE_PACKAGES_PROPERTY,
};
use crate::module::policy::LookupPolicy;
use crate::module::traits::{IsolationError, LookupStrategy};

/// Property key listing lookup override entries (comma-separated)
pub const LOOKUP_OVERRIDES_PROPERTY: &str = "artifact.lookup.overrides";
/// Property key naming the default lookup strategy
pub const LOOKUP_DEFAULT_STRATEGY_PROPERTY: &str = "artifact.lookup.defaultStrategy";

/// Artifact descriptor (artifact.toml structure)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactDescriptor {
    /// Module name
    pub name: String,
    /// Human-readable description
    #[serde(default)]
    pub description: Option<String>,
    /// Public surface of the module
    #[serde(default)]
    pub export: ExportSection,
    /// Lookup overrides
    #[serde(default)]
    pub lookup: LookupSection,
}

/// `[export]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSection {
    /// Dotted package names; absent means none
    #[serde(default)]
    pub class_packages: Option<Vec<String>>,
    /// Slash-delimited folder names; absent means none
    #[serde(default)]
    pub resource_packages: Option<Vec<String>>,
}

/// `[lookup]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupSection {
    /// Override entries in `[-][=]name` form
    #[serde(default)]
    pub overrides: Vec<String>,
    /// Strategy when no override applies; falls back to the global config
    #[serde(default)]
    pub default_strategy: Option<LookupStrategy>,
}

impl ArtifactDescriptor {
    /// Descriptor for a module that exports nothing and overrides nothing
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            export: ExportSection::default(),
            lookup: LookupSection::default(),
        }
    }

    /// Load descriptor from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, IsolationError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            IsolationError::InvalidDescriptor(format!(
                "Failed to read descriptor file {:?}: {}",
                path.as_ref(),
                e
            ))
        })?;

        Self::from_toml_str(&contents)
    }

    /// Parse descriptor TOML
    pub fn from_toml_str(contents: &str) -> Result<Self, IsolationError> {
        let descriptor: ArtifactDescriptor = toml::from_str(contents).map_err(|e| {
            IsolationError::InvalidDescriptor(format!("Failed to parse descriptor TOML: {}", e))
        })?;

        if descriptor.name.trim().is_empty() {
            return Err(IsolationError::InvalidDescriptor(
                "Module name cannot be empty".to_string(),
            ));
        }

        debug!("Parsed descriptor for module {}", descriptor.name);
        Ok(descriptor)
    }

    /// Parse property-style descriptor text
    ///
    /// Recognizes the exported class/resource package keys plus the lookup
    /// keys; list values are comma-separated. Unknown keys are ignored.
    pub fn from_properties(name: impl Into<String>, text: &str) -> Result<Self, IsolationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(IsolationError::InvalidDescriptor(
                "Module name cannot be empty".to_string(),
            ));
        }

        let properties = parse_properties(text);
        let list = |key: &str| properties.get(key).map(|value| split_list(value));

        let default_strategy = properties
            .get(LOOKUP_DEFAULT_STRATEGY_PROPERTY)
            .map(|value| value.parse::<LookupStrategy>())
            .transpose()?;

        Ok(Self {
            name,
            description: None,
            export: ExportSection {
                class_packages: list(EXPORTED_CLASS_PACKAGES_PROPERTY),
                resource_packages: list(EXPORTED_RESOURCE_PACKAGES_PROPERTY),
            },
            lookup: LookupSection {
                overrides: list(LOOKUP_OVERRIDES_PROPERTY).unwrap_or_default(),
                default_strategy,
            },
        })
    }

    /// Exported class packages; an absent list means none
    pub fn exported_class_packages(&self) -> HashSet<String> {
        self.export
            .class_packages
            .iter()
            .flatten()
            .cloned()
            .collect()
    }

    /// Exported resource folders; an absent list means none
    pub fn exported_resource_packages(&self) -> HashSet<String> {
        self.export
            .resource_packages
            .iter()
            .flatten()
            .cloned()
            .collect()
    }

    /// Build the export filter for this module
    pub fn export_filter(&self) -> Result<ExportFilter, IsolationError> {
        ExportFilter::from_parts(
            Some(self.exported_class_packages()),
            Some(self.exported_resource_packages()),
        )
    }

    /// Build the lookup policy for this module
    ///
    /// `fallback_strategy` applies when the descriptor names none.
    pub fn lookup_policy(
        &self,
        fallback_strategy: LookupStrategy,
        reject_ambiguous: bool,
    ) -> Result<LookupPolicy, IsolationError> {
        let strategy = self.lookup.default_strategy.unwrap_or(fallback_strategy);
        LookupPolicy::from_entries(&self.lookup.overrides, strategy, reject_ambiguous).map_err(
            |e| match e {
                IsolationError::AmbiguousOverride(msg) => IsolationError::AmbiguousOverride(
                    format!("module {}: {}", self.name, msg),
                ),
                other => other,
            },
        )
    }

    /// Save descriptor as TOML
    pub fn to_toml_string(&self) -> Result<String, IsolationError> {
        toml::to_string_pretty(self).map_err(|e| IsolationError::SerializationError(e.to_string()))
    }
}

/// Parse `key=value` / `key: value` lines
///
/// Blank lines and lines starting with `#` or `!` are skipped; a trailing
/// `\` continues the value on the next line. Later keys win.
fn parse_properties(text: &str) -> HashMap<String, String> {
    let mut properties = HashMap::new();
    let mut pending = String::new();

    for raw in text.lines() {
        let line = raw.trim();
        if pending.is_empty() && (line.is_empty() || line.starts_with('#') || line.starts_with('!'))
        {
            continue;
        }

        if let Some(continued) = line.strip_suffix('\\') {
            pending.push_str(continued);
            continue;
        }
        pending.push_str(line);
        insert_property(&mut properties, &std::mem::take(&mut pending));
    }

    // A continuation on the last line still ends the property
    if !pending.is_empty() {
        insert_property(&mut properties, &pending);
    }

    properties
}

fn insert_property(properties: &mut HashMap<String, String>, logical: &str) {
    if let Some(pos) = logical.find(['=', ':']) {
        let key = logical[..pos].trim();
        let value = logical[pos + 1..].trim();
        if !key.is_empty() {
            properties.insert(key.to_string(), value.to_string());
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_continuation_keeps_last_property() {
        let properties = parse_properties("a = 1\nlist = x, \\");
        assert_eq!(properties.get("a").map(String::as_str), Some("1"));
        assert_eq!(properties.get("list").map(String::as_str), Some("x,"));

        let descriptor = ArtifactDescriptor::from_properties(
            "shipping",
            "artifact.export.classPackages=com.acme.shipping.api, \\",
        )
        .unwrap();
        assert_eq!(
            descriptor.export.class_packages,
            Some(vec!["com.acme.shipping.api".to_string()])
        );
    }

    #[test]
    fn test_parse_properties_with_comments_and_continuations() {
        let properties = parse_properties(
            "# comment\n! also comment\n\na = 1\nb: two\nlist = x, \\\n  y,z\n",
        );
        assert_eq!(properties.get("a").map(String::as_str), Some("1"));
        assert_eq!(properties.get("b").map(String::as_str), Some("two"));
        assert_eq!(properties.get("list").map(String::as_str), Some("x, y,z"));
    }

    #[test]
    fn test_split_list_drops_blanks() {
        assert_eq!(split_list(" a, ,b ,"), vec!["a".to_string(), "b".to_string()]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_from_properties() {
        let descriptor = ArtifactDescriptor::from_properties(
            "billing",
            "artifact.export.classPackages=com.acme.api, com.acme.spi\n\
             artifact.export.resourcePackages=META-INF/services\n\
             artifact.lookup.overrides=-org.slf4j,=org.slf4j.impl.StaticLoggerBinder\n\
             artifact.lookup.defaultStrategy=local\n",
        )
        .unwrap();

        assert_eq!(descriptor.exported_class_packages().len(), 2);
        assert!(descriptor.exported_resource_packages().contains("META-INF/services"));
        assert_eq!(descriptor.lookup.overrides.len(), 2);
        assert_eq!(descriptor.lookup.default_strategy, Some(LookupStrategy::Local));
    }

    #[test]
    fn test_missing_keys_export_nothing() {
        let descriptor = ArtifactDescriptor::from_properties("empty", "").unwrap();
        assert_eq!(descriptor.export.class_packages, None);
        assert!(descriptor.export_filter().unwrap().is_empty());
    }

    #[test]
    fn test_bad_default_strategy_is_rejected() {
        let result =
            ArtifactDescriptor::from_properties("x", "artifact.lookup.defaultStrategy=upwards");
        assert!(matches!(result, Err(IsolationError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_from_toml_str() {
        let descriptor = ArtifactDescriptor::from_toml_str(
            r#"
            name = "billing"

            [export]
            class_packages = ["com.acme.api"]

            [lookup]
            overrides = ["-org.slf4j"]
            default_strategy = "delegate"
            "#,
        )
        .unwrap();

        assert_eq!(descriptor.name, "billing");
        assert_eq!(descriptor.export.resource_packages, None);
        let policy = descriptor.lookup_policy(LookupStrategy::Local, true).unwrap();
        assert!(policy.is_blocked("org.slf4j.Logger"));
        assert_eq!(policy.default_strategy(), LookupStrategy::Delegate);
    }

    #[test]
    fn test_empty_name_is_rejected() {
        assert!(ArtifactDescriptor::from_toml_str("name = \"\"").is_err());
        assert!(ArtifactDescriptor::from_properties(" ", "").is_err());
    }

    #[test]
    fn test_ambiguous_override_names_module() {
        let mut descriptor = ArtifactDescriptor::new("billing");
        descriptor.lookup.overrides = vec!["=a.B".into(), "-=a.B".into()];
        match descriptor.lookup_policy(LookupStrategy::Delegate, true) {
            Err(IsolationError::AmbiguousOverride(msg)) => assert!(msg.contains("billing")),
            other => panic!("expected ambiguous override, got {:?}", other),
        }
    }
}
