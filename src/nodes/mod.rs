//! Node type registry and built-in templates.

pub mod builtin;
pub mod registry;

// Re-export commonly used types
pub use registry::{NodeRegistry, NodeTemplate, RegistryEntry};
