//! Isolation layer traits and shared types
//!
//! Defines the filter trait consumed by the external loader hierarchy, the
//! decision types returned by queries, and the error taxonomy raised while
//! building isolation state.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Filters class and resource names against a module's public surface
///
/// Implemented by the export filter. The loader that walks the module
/// hierarchy calls this before exposing a name to a dependent module.
/// Implementations must be total: every input classifies to a boolean.
pub trait ClassLoaderFilter: Send + Sync {
    /// Whether the class with the given fully-qualified (dotted) name is exported
    fn exports_class(&self, class_name: &str) -> bool;

    /// Whether the resource with the given slash-delimited name is exported
    fn exports_resource(&self, resource_name: &str) -> bool;
}

/// Where resolution of a name should happen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupStrategy {
    /// Resolve inside the current module
    Local,
    /// Ask another namespace (usually the parent loader) first
    #[default]
    Delegate,
}

impl fmt::Display for LookupStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupStrategy::Local => write!(f, "local"),
            LookupStrategy::Delegate => write!(f, "delegate"),
        }
    }
}

impl std::str::FromStr for LookupStrategy {
    type Err = IsolationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "child-first" | "child_first" => Ok(LookupStrategy::Local),
            "delegate" | "parent-first" | "parent_first" => Ok(LookupStrategy::Delegate),
            other => Err(IsolationError::InvalidConfiguration(format!(
                "Unknown lookup strategy: {}",
                other
            ))),
        }
    }
}

/// Visibility of a name to consumers of the module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportDecision {
    Exported,
    NotExported,
}

impl ExportDecision {
    #[inline]
    pub fn is_exported(self) -> bool {
        matches!(self, ExportDecision::Exported)
    }
}

impl From<bool> for ExportDecision {
    fn from(exported: bool) -> Self {
        if exported {
            ExportDecision::Exported
        } else {
            ExportDecision::NotExported
        }
    }
}

/// Isolation layer errors
///
/// Raised only while building filters, policies and registries. Queries
/// never fail.
#[derive(Debug, Error)]
pub enum IsolationError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Ambiguous override: {0}")]
    AmbiguousOverride(String),

    #[error("Invalid artifact descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    #[error("Module already registered: {0}")]
    DuplicateModule(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for IsolationError {
    fn from(e: serde_json::Error) -> Self {
        IsolationError::SerializationError(e.to_string())
    }
}

impl From<toml::de::Error> for IsolationError {
    fn from(e: toml::de::Error) -> Self {
        IsolationError::SerializationError(e.to_string())
    }
}
