//! Per-module isolation state
//!
//! Pairs a module's export filter with its lookup policy so the loader
//! hierarchy can ask both questions about a name in one call.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::config::IsolationConfig;
use crate::module::filter::ExportFilter;
use crate::module::naming::{normalize_resource_name, NameKind};
use crate::module::policy::LookupPolicy;
use crate::module::registry::descriptor::ArtifactDescriptor;
use crate::module::traits::{ClassLoaderFilter, IsolationError, LookupStrategy};

/// Combined answer for one name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionDecision {
    pub module: String,
    pub kind: NameKind,
    pub name: String,
    /// Visible to modules depending on this one
    pub exported: bool,
    /// Where the owning module's loader resolves the name
    pub strategy: LookupStrategy,
}

/// Immutable isolation state for one loaded module
#[derive(Debug, Clone)]
pub struct ArtifactIsolation {
    name: String,
    filter: Arc<ExportFilter>,
    policy: LookupPolicy,
}

impl ArtifactIsolation {
    pub fn new(name: impl Into<String>, filter: Arc<ExportFilter>, policy: LookupPolicy) -> Self {
        Self {
            name: name.into(),
            filter,
            policy,
        }
    }

    /// Isolation for a module with no public surface and no overrides
    pub fn sealed(name: impl Into<String>, default_strategy: LookupStrategy) -> Self {
        Self::new(
            name,
            ExportFilter::shared_export_nothing(),
            LookupPolicy::with_default(default_strategy),
        )
    }

    /// Build isolation state from a descriptor
    pub fn from_descriptor(
        descriptor: &ArtifactDescriptor,
        config: &IsolationConfig,
    ) -> Result<Self, IsolationError> {
        let filter = descriptor.export_filter()?;
        let policy =
            descriptor.lookup_policy(config.default_strategy, config.reject_ambiguous_overrides)?;

        debug!(
            "Isolation for module {}: exports_nothing={}, {} overrides, default {}",
            descriptor.name,
            filter.is_empty(),
            policy.overrides().entries().len(),
            policy.default_strategy()
        );

        Ok(Self::new(descriptor.name.clone(), Arc::new(filter), policy))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn filter(&self) -> &ExportFilter {
        &self.filter
    }

    pub fn policy(&self) -> &LookupPolicy {
        &self.policy
    }

    pub fn class_decision(&self, class_name: &str) -> ResolutionDecision {
        ResolutionDecision {
            module: self.name.clone(),
            kind: NameKind::Class,
            name: class_name.to_string(),
            exported: self.filter.exports_class(class_name),
            strategy: self.policy.lookup_strategy(class_name),
        }
    }

    pub fn resource_decision(&self, resource_name: &str) -> ResolutionDecision {
        ResolutionDecision {
            module: self.name.clone(),
            kind: NameKind::Resource,
            name: normalize_resource_name(resource_name).to_string(),
            exported: self.filter.exports_resource(resource_name),
            strategy: self.policy.resource_lookup_strategy(resource_name),
        }
    }
}

impl ClassLoaderFilter for ArtifactIsolation {
    fn exports_class(&self, class_name: &str) -> bool {
        self.filter.exports_class(class_name)
    }

    fn exports_resource(&self, resource_name: &str) -> bool {
        self.filter.exports_resource(resource_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn isolation() -> ArtifactIsolation {
        let mut descriptor = ArtifactDescriptor::new("billing");
        descriptor.export.class_packages = Some(vec!["com.acme.billing.api".into()]);
        descriptor.export.resource_packages = Some(vec!["com/acme/billing".into()]);
        descriptor.lookup.overrides = vec!["com.acme.billing".into(), "-org.slf4j".into()];
        ArtifactIsolation::from_descriptor(&descriptor, &IsolationConfig::default()).unwrap()
    }

    #[test]
    fn test_class_decision() {
        let isolation = isolation();

        let decision = isolation.class_decision("com.acme.billing.api.Invoice");
        assert!(decision.exported);
        assert_eq!(decision.strategy, LookupStrategy::Local);
        assert_eq!(decision.kind, NameKind::Class);

        let decision = isolation.class_decision("org.slf4j.Logger");
        assert!(!decision.exported);
        assert_eq!(decision.strategy, LookupStrategy::Delegate);
    }

    #[test]
    fn test_resource_decision_normalizes_name() {
        let isolation = isolation();
        let decision = isolation.resource_decision("/com/acme/billing/rates.csv");
        assert_eq!(decision.name, "com/acme/billing/rates.csv");
        assert!(decision.exported);
        assert_eq!(decision.strategy, LookupStrategy::Local);
    }

    #[test]
    fn test_sealed_module() {
        let isolation = ArtifactIsolation::sealed("plain", LookupStrategy::Delegate);
        assert!(!isolation.exports_class("a.B"));
        assert_eq!(isolation.class_decision("a.B").strategy, LookupStrategy::Delegate);
        assert!(std::ptr::eq(isolation.filter(), ExportFilter::export_nothing()));
    }

    #[test]
    fn test_decision_serializes() {
        let json = serde_json::to_string(&isolation().class_decision("x.Y")).unwrap();
        assert!(json.contains("\"strategy\":\"delegate\""));
        assert!(json.contains("\"kind\":\"class\""));
    }
}
