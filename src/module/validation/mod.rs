//! Descriptor validation framework
//!
//! Checks artifact descriptors before their export sets and overrides are
//! frozen into isolation state.

pub mod descriptor_validator;

pub use descriptor_validator::{DescriptorValidator, ValidationResult};
