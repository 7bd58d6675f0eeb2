//! Descriptor validation framework
//!
//! Validates artifact descriptors for name format, export set shape and
//! override consistency before a module is isolated with them.

use std::collections::HashSet;
use tracing::{debug, warn};

use crate::module::naming::{PACKAGE_SEPARATOR, RESOURCE_SEPARATOR};
use crate::module::policy::{Disposition, NamePattern, OverrideEntry};
use crate::module::registry::descriptor::ArtifactDescriptor;

/// Validation result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Descriptor is valid
    Valid,
    /// Descriptor is invalid with specific errors
    Invalid(Vec<String>),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

/// Descriptor validator
pub struct DescriptorValidator {
    /// Maximum module name length
    max_name_len: usize,
}

impl DescriptorValidator {
    /// Create a new descriptor validator
    pub fn new() -> Self {
        Self { max_name_len: 64 }
    }

    /// Validate an artifact descriptor
    pub fn validate(&self, descriptor: &ArtifactDescriptor) -> ValidationResult {
        let mut errors = Vec::new();

        if !self.is_valid_name(&descriptor.name) {
            errors.push(format!(
                "Invalid module name: {:?} (must be alphanumeric with dashes/underscores/dots)",
                descriptor.name
            ));
        }

        for package in descriptor.export.class_packages.iter().flatten() {
            if let Err(reason) = check_class_package(package) {
                errors.push(format!("Invalid class package {:?}: {}", package, reason));
            }
        }

        for folder in descriptor.export.resource_packages.iter().flatten() {
            if let Err(reason) = check_resource_folder(folder) {
                errors.push(format!("Invalid resource folder {:?}: {}", folder, reason));
            }
        }

        errors.extend(self.validate_overrides(&descriptor.lookup.overrides));

        if errors.is_empty() {
            debug!("Descriptor validation passed for module: {}", descriptor.name);
            ValidationResult::Valid
        } else {
            warn!(
                "Descriptor validation failed for module {}: {:?}",
                descriptor.name, errors
            );
            ValidationResult::Invalid(errors)
        }
    }

    /// Validate module name format
    #[inline]
    fn is_valid_name(&self, name: &str) -> bool {
        if name.is_empty() || name.len() > self.max_name_len {
            return false;
        }

        if !name.chars().next().is_some_and(|c| c.is_alphanumeric()) {
            return false;
        }

        name.chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.')
    }

    /// Override entries must parse, and no pattern may be both local and blocked
    fn validate_overrides(&self, overrides: &[String]) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen: HashSet<(NamePattern, Disposition)> = HashSet::new();

        for raw in overrides {
            match raw.parse::<OverrideEntry>() {
                Ok(entry) => {
                    let opposite = match entry.disposition {
                        Disposition::Local => Disposition::Blocked,
                        Disposition::Blocked => Disposition::Local,
                    };
                    if seen.contains(&(entry.pattern.clone(), opposite)) {
                        errors.push(format!(
                            "Override {:?} is configured as both local and blocked",
                            entry.pattern.as_str()
                        ));
                    }
                    seen.insert((entry.pattern, entry.disposition));
                }
                Err(e) => errors.push(format!("Invalid override {:?}: {}", raw, e)),
            }
        }

        errors
    }
}

impl Default for DescriptorValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn has_whitespace(name: &str) -> bool {
    name.chars().any(char::is_whitespace)
}

/// The empty string (default package) is always valid
fn check_class_package(package: &str) -> Result<(), &'static str> {
    if package.is_empty() {
        return Ok(());
    }
    if has_whitespace(package) {
        return Err("contains whitespace");
    }
    if package.contains(RESOURCE_SEPARATOR) {
        return Err("class packages are dotted, not slash-delimited");
    }
    if package.split(PACKAGE_SEPARATOR).any(str::is_empty) {
        return Err("empty segment or leading/trailing separator");
    }
    Ok(())
}

/// The empty string (root folder) is always valid
fn check_resource_folder(folder: &str) -> Result<(), &'static str> {
    if folder.is_empty() {
        return Ok(());
    }
    if has_whitespace(folder) {
        return Err("contains whitespace");
    }
    if folder.starts_with(RESOURCE_SEPARATOR) {
        return Err("leading separator never matches normalized resource names");
    }
    if folder.split(RESOURCE_SEPARATOR).any(str::is_empty) {
        return Err("empty segment or trailing separator");
    }
    Ok(())
}
