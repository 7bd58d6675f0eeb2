//! Class loader lookup policy
//!
//! Decides whether a name being resolved should be satisfied by the
//! module's own loader or delegated up the hierarchy. Overrides correct
//! the default strategy for specific names or packages.

use tracing::trace;

use crate::module::naming::{normalize_resource_name, NameKind};
use crate::module::policy::overrides::{Disposition, OverrideSet};
use crate::module::traits::{IsolationError, LookupStrategy};

/// Immutable lookup policy for one module
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupPolicy {
    overrides: OverrideSet,
    default_strategy: LookupStrategy,
}

impl LookupPolicy {
    /// Create a policy from an already-validated override set
    pub fn new(overrides: OverrideSet, default_strategy: LookupStrategy) -> Self {
        Self {
            overrides,
            default_strategy,
        }
    }

    /// Create a policy from textual override entries (`[-][=]name`)
    pub fn from_entries<I, S>(
        entries: I,
        default_strategy: LookupStrategy,
        reject_ambiguous: bool,
    ) -> Result<Self, IsolationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let overrides = OverrideSet::parse(entries, reject_ambiguous)?;
        Ok(Self::new(overrides, default_strategy))
    }

    /// A policy with no overrides
    pub fn with_default(default_strategy: LookupStrategy) -> Self {
        Self::new(OverrideSet::empty(), default_strategy)
    }

    /// Whether the class `class_name` must never be resolved locally
    #[inline]
    pub fn is_blocked(&self, class_name: &str) -> bool {
        self.overrides.resolve(class_name, NameKind::Class) == Some(Disposition::Blocked)
    }

    /// Whether the class `class_name` is forced to resolve locally
    #[inline]
    pub fn is_overridden(&self, class_name: &str) -> bool {
        self.overrides.resolve(class_name, NameKind::Class) == Some(Disposition::Local)
    }

    /// Resource counterpart of [`LookupPolicy::is_blocked`]; one leading `/` is ignored
    #[inline]
    pub fn is_resource_blocked(&self, resource_name: &str) -> bool {
        self.resolve_resource(resource_name) == Some(Disposition::Blocked)
    }

    /// Resource counterpart of [`LookupPolicy::is_overridden`]; one leading `/` is ignored
    #[inline]
    pub fn is_resource_overridden(&self, resource_name: &str) -> bool {
        self.resolve_resource(resource_name) == Some(Disposition::Local)
    }

    /// Where a class resolves
    pub fn lookup_strategy(&self, class_name: &str) -> LookupStrategy {
        self.strategy_for(class_name, NameKind::Class)
    }

    /// Where a resource resolves; one leading `/` is ignored
    pub fn resource_lookup_strategy(&self, resource_name: &str) -> LookupStrategy {
        self.strategy_for(normalize_resource_name(resource_name), NameKind::Resource)
    }

    fn resolve_resource(&self, resource_name: &str) -> Option<Disposition> {
        self.overrides
            .resolve(normalize_resource_name(resource_name), NameKind::Resource)
    }

    fn strategy_for(&self, name: &str, kind: NameKind) -> LookupStrategy {
        let strategy = match self.overrides.resolve(name, kind) {
            Some(Disposition::Local) => LookupStrategy::Local,
            Some(Disposition::Blocked) => LookupStrategy::Delegate,
            None => self.default_strategy,
        };
        trace!("Lookup strategy for {:?} {}: {}", kind, name, strategy);
        strategy
    }

    pub fn default_strategy(&self) -> LookupStrategy {
        self.default_strategy
    }

    pub fn overrides(&self) -> &OverrideSet {
        &self.overrides
    }
}
