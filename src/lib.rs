//! Artifact Isolation - classloading isolation decisions for module runtimes
//!
//! This crate answers the two questions a module-isolated loader asks for
//! every class or resource name:
//!
//! 1. **Export**: may this module expose the name to modules that depend on it?
//! 2. **Lookup**: should the module's own loader resolve the name, or delegate it?
//!
//! ## Design Principles
//!
//! 1. **Pure Deciders**: no I/O, no locking, no mutation on the query path
//! 2. **Explicit Surfaces**: exports are listed package by package
//! 3. **Exact Before Prefix**: an exact override always beats a package override
//! 4. **Fail Fast At Construction**: absent sets and ambiguous overrides are rejected

pub mod config;
pub mod module;
pub mod utils;

pub use config::{IsolationConfig, LoggingConfig};
pub use module::{
    ArtifactDescriptor, ArtifactIsolation, ClassLoaderFilter, ExportDecision, ExportFilter,
    IsolationError, IsolationRegistry, LookupPolicy, LookupStrategy, OverrideSet,
    ResolutionDecision,
};
