//! Export filtering for module public surfaces
//!
//! Decides which class packages and resource folders a module exposes to
//! the modules that depend on it.

pub mod export;

pub use export::{ExportFilter, EXPORTED_CLASS_PACKAGES_PROPERTY, EXPORTED_RESOURCE_PACKAGES_PROPERTY};
