//! Registry of loaded modules' isolation state
//!
//! Each module's state sits behind an `ArcSwap`: a descriptor change builds
//! a fresh immutable `ArtifactIsolation` and swaps it in atomically, so
//! loaders holding a handle never observe a half-updated policy and never
//! take a lock to read it.

use arc_swap::ArcSwap;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::IsolationConfig;
use crate::module::isolation::{ArtifactIsolation, ResolutionDecision};
use crate::module::registry::descriptor::ArtifactDescriptor;
use crate::module::registry::discovery::{ArtifactDiscovery, DiscoveredArtifact};
use crate::module::traits::IsolationError;

/// Live handle to one module's isolation state
pub type IsolationHandle = Arc<ArcSwap<ArtifactIsolation>>;

/// Registry of isolation state keyed by module name
pub struct IsolationRegistry {
    config: IsolationConfig,
    modules: RwLock<HashMap<String, IsolationHandle>>,
}

impl IsolationRegistry {
    /// Create an empty registry
    pub fn new(config: IsolationConfig) -> Self {
        Self {
            config,
            modules: RwLock::new(HashMap::new()),
        }
    }

    /// Create a registry holding every discovered artifact
    pub fn from_discovered(
        config: IsolationConfig,
        artifacts: &[DiscoveredArtifact],
    ) -> Result<Self, IsolationError> {
        let registry = Self::new(config);
        for artifact in artifacts {
            registry.register(&artifact.descriptor)?;
        }
        Ok(registry)
    }

    /// Discover artifacts under `config.descriptors_dir` and register them all
    pub fn load(config: IsolationConfig) -> Result<Self, IsolationError> {
        let mut discovery = ArtifactDiscovery::new(&config.descriptors_dir);
        if !config.strict_validation {
            discovery = discovery.lenient();
        }
        let artifacts = discovery.discover()?;
        Self::from_discovered(config, &artifacts)
    }

    pub fn config(&self) -> &IsolationConfig {
        &self.config
    }

    /// Build and register isolation state for a new module
    pub fn register(&self, descriptor: &ArtifactDescriptor) -> Result<IsolationHandle, IsolationError> {
        let isolation = ArtifactIsolation::from_descriptor(descriptor, &self.config)?;
        self.register_isolation(isolation)
    }

    /// Register already-built isolation state
    pub fn register_isolation(
        &self,
        isolation: ArtifactIsolation,
    ) -> Result<IsolationHandle, IsolationError> {
        let name = isolation.name().to_string();
        let mut modules = self.modules.write();
        if modules.contains_key(&name) {
            return Err(IsolationError::DuplicateModule(name));
        }

        let handle: IsolationHandle = Arc::new(ArcSwap::from_pointee(isolation));
        modules.insert(name.clone(), Arc::clone(&handle));
        info!("Registered isolation for module {}", name);
        Ok(handle)
    }

    /// Rebuild a module's isolation state from a new descriptor
    ///
    /// The new state is fully built before the swap; on error the current
    /// state stays in place. Returns the state that was replaced.
    pub fn replace(
        &self,
        descriptor: &ArtifactDescriptor,
    ) -> Result<Arc<ArtifactIsolation>, IsolationError> {
        let handle = self.handle(&descriptor.name)?;
        let isolation = ArtifactIsolation::from_descriptor(descriptor, &self.config)?;
        let previous = handle.swap(Arc::new(isolation));
        info!("Replaced isolation for module {}", descriptor.name);
        Ok(previous)
    }

    /// Remove a module; returns its last isolation state
    pub fn unregister(&self, name: &str) -> Result<Arc<ArtifactIsolation>, IsolationError> {
        let handle = self
            .modules
            .write()
            .remove(name)
            .ok_or_else(|| IsolationError::ModuleNotFound(name.to_string()))?;
        info!("Unregistered isolation for module {}", name);
        Ok(handle.load_full())
    }

    /// Live handle for a module, for loaders that keep querying it
    pub fn handle(&self, name: &str) -> Result<IsolationHandle, IsolationError> {
        self.modules
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| IsolationError::ModuleNotFound(name.to_string()))
    }

    /// Snapshot of a module's current isolation state
    pub fn get(&self, name: &str) -> Result<Arc<ArtifactIsolation>, IsolationError> {
        Ok(self.handle(name)?.load_full())
    }

    pub fn class_decision(
        &self,
        module: &str,
        class_name: &str,
    ) -> Result<ResolutionDecision, IsolationError> {
        let decision = self.handle(module)?.load().class_decision(class_name);
        debug!("Class decision: {:?}", decision);
        Ok(decision)
    }

    pub fn resource_decision(
        &self,
        module: &str,
        resource_name: &str,
    ) -> Result<ResolutionDecision, IsolationError> {
        let decision = self.handle(module)?.load().resource_decision(resource_name);
        debug!("Resource decision: {:?}", decision);
        Ok(decision)
    }

    /// Registered module names, sorted
    pub fn module_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.modules.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.modules.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.read().is_empty()
    }
}

impl Default for IsolationRegistry {
    fn default() -> Self {
        Self::new(IsolationConfig::default())
    }
}
