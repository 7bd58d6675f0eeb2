//! Artifact registry and discovery
//!
//! Handles descriptor parsing, artifact discovery, and the registry of
//! per-module isolation state.

pub mod descriptor;
pub mod discovery;
pub mod isolation_registry;

pub use descriptor::{ArtifactDescriptor, ExportSection, LookupSection};
pub use discovery::{ArtifactDiscovery, DiscoveredArtifact};
pub use isolation_registry::{IsolationHandle, IsolationRegistry};
