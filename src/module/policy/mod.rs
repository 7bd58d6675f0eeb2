//! Lookup policy: local versus delegated resolution
//!
//! Override sets mark names or packages as forced-local or blocked, and the
//! lookup policy turns them into a resolution strategy per name.

pub mod lookup;
pub mod overrides;

pub use lookup::LookupPolicy;
pub use overrides::{Disposition, NamePattern, OverrideEntry, OverrideSet, OverrideSetBuilder};
