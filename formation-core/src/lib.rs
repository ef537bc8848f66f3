//! Formation Core
//!
//! Core library for a declarative infrastructure template builder: a typed
//! resource graph with reference resolution, whole-graph validation, and
//! deterministic rendering to a CloudFormation JSON document.

pub mod error;
pub mod render;
pub mod schema;
pub mod sink;
pub mod template;
pub mod validate;
pub mod value;
