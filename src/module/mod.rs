//! Artifact classloading isolation
//!
//! Decides, for a class or resource name, whether a module exposes it to
//! its dependents and whether the module's own loader or another namespace
//! resolves it.
//!
//! ## Architecture
//!
//! - **Export filtering**: exact package/folder membership, no inheritance
//! - **Lookup policy**: forced-local and blocked overrides, exact before prefix
//! - **Immutable state**: built once per module, replaced by atomic swap
//! - **Total queries**: every input string classifies; only construction fails
//!
//! Byte loading, caching and hierarchy traversal belong to the host loader.

pub mod filter;
pub mod isolation;
pub mod naming;
pub mod policy;
pub mod registry;
pub mod traits;
pub mod validation;

pub use filter::ExportFilter;
pub use isolation::{ArtifactIsolation, ResolutionDecision};
pub use naming::NameKind;
pub use policy::{Disposition, LookupPolicy, NamePattern, OverrideSet};
pub use registry::{ArtifactDescriptor, ArtifactDiscovery, IsolationRegistry};
pub use traits::{ClassLoaderFilter, ExportDecision, IsolationError, LookupStrategy};
pub use validation::{DescriptorValidator, ValidationResult};
