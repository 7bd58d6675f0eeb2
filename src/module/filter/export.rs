//! Export filter
//!
//! Answers whether a fully-qualified class or resource name is part of a
//! module's public surface. Matching is by exact package/folder only: an
//! exported `com.acme` says nothing about `com.acme.sub`.

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};
use tracing::debug;

use crate::module::naming::{package_name, resource_folder};
use crate::module::traits::{ClassLoaderFilter, ExportDecision, IsolationError};

/// Property key listing exported class packages (comma-separated)
pub const EXPORTED_CLASS_PACKAGES_PROPERTY: &str = "artifact.export.classPackages";
/// Property key listing exported resource folders (comma-separated)
pub const EXPORTED_RESOURCE_PACKAGES_PROPERTY: &str = "artifact.export.resourcePackages";

static EXPORT_NOTHING: LazyLock<Arc<ExportFilter>> = LazyLock::new(|| {
    Arc::new(ExportFilter {
        exported_class_packages: HashSet::new(),
        exported_resource_packages: HashSet::new(),
    })
});

/// Filters classes and resources by exported package/folder names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFilter {
    exported_class_packages: HashSet<String>,
    exported_resource_packages: HashSet<String>,
}

impl ExportFilter {
    /// Create a filter from exported class packages and resource folders
    ///
    /// Either collection may be empty.
    pub fn new<C, R, S>(class_packages: C, resource_packages: R) -> Self
    where
        C: IntoIterator<Item = S>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let filter = Self {
            exported_class_packages: class_packages.into_iter().map(Into::into).collect(),
            exported_resource_packages: resource_packages.into_iter().map(Into::into).collect(),
        };
        debug!(
            "Created export filter: {} class packages, {} resource folders",
            filter.exported_class_packages.len(),
            filter.exported_resource_packages.len()
        );
        filter
    }

    /// Create a filter from possibly-absent sets
    ///
    /// Both sets must be supplied, even if empty. An absent set is a
    /// configuration error rather than an implicit "export nothing".
    pub fn from_parts(
        class_packages: Option<HashSet<String>>,
        resource_packages: Option<HashSet<String>>,
    ) -> Result<Self, IsolationError> {
        let class_packages = class_packages.ok_or_else(|| {
            IsolationError::InvalidConfiguration(
                "Exported class packages cannot be absent".to_string(),
            )
        })?;
        let resource_packages = resource_packages.ok_or_else(|| {
            IsolationError::InvalidConfiguration(
                "Exported resource packages cannot be absent".to_string(),
            )
        })?;

        Ok(Self::new(class_packages, resource_packages))
    }

    /// The shared filter that exports nothing
    pub fn export_nothing() -> &'static ExportFilter {
        EXPORT_NOTHING.as_ref()
    }

    /// Owned handle to the same filter as [`ExportFilter::export_nothing`]
    pub fn shared_export_nothing() -> Arc<ExportFilter> {
        Arc::clone(&EXPORT_NOTHING)
    }

    /// Class check that also accepts an absent name (default package)
    #[inline]
    pub fn exports_class_opt(&self, class_name: Option<&str>) -> bool {
        self.exported_class_packages
            .contains(package_name(class_name))
    }

    /// Resource check that also accepts an absent name (root folder)
    #[inline]
    pub fn exports_resource_opt(&self, resource_name: Option<&str>) -> bool {
        self.exported_resource_packages
            .contains(resource_folder(resource_name))
    }

    pub fn class_decision(&self, class_name: &str) -> ExportDecision {
        self.exports_class_opt(Some(class_name)).into()
    }

    pub fn resource_decision(&self, resource_name: &str) -> ExportDecision {
        self.exports_resource_opt(Some(resource_name)).into()
    }

    /// Exported class packages
    pub fn class_packages(&self) -> impl Iterator<Item = &str> {
        self.exported_class_packages.iter().map(String::as_str)
    }

    /// Exported resource folders
    pub fn resource_packages(&self) -> impl Iterator<Item = &str> {
        self.exported_resource_packages.iter().map(String::as_str)
    }

    /// Whether this filter exports nothing at all
    pub fn is_empty(&self) -> bool {
        self.exported_class_packages.is_empty() && self.exported_resource_packages.is_empty()
    }
}

impl Default for ExportFilter {
    fn default() -> Self {
        ExportFilter::clone(&EXPORT_NOTHING)
    }
}

impl ClassLoaderFilter for ExportFilter {
    #[inline]
    fn exports_class(&self, class_name: &str) -> bool {
        self.exports_class_opt(Some(class_name))
    }

    #[inline]
    fn exports_resource(&self, resource_name: &str) -> bool {
        self.exports_resource_opt(Some(resource_name))
    }
}
