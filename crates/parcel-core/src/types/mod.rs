//! Core data types for package management.

pub mod version;

pub use version::{Constraint, Op, Version};
