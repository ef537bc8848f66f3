//! Schema - Resource type catalog
//!
//! Provider crates register a spec per resource type, listing the runtime
//! attributes that may be targeted by an attribute reference. The registry
//! is deliberately open: types it does not know about are accepted and
//! surfaced as advisory findings during validation.

use std::collections::HashMap;

/// Spec for one resource type: its type tag and valid runtime attributes.
#[derive(Debug, Clone)]
pub struct ResourceTypeSpec {
    type_tag: String,
    description: Option<String>,
    attributes: Vec<String>,
}

impl ResourceTypeSpec {
    pub fn new(type_tag: impl Into<String>) -> Self {
        Self {
            type_tag: type_tag.into(),
            description: None,
            attributes: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declare a runtime attribute (e.g. `Arn`, `Endpoint.Address`).
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.attributes.push(name.into());
        self
    }

    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a == name)
    }
}

/// Lookup table of resource type specs, keyed by type tag.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    specs: HashMap<String, ResourceTypeSpec>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_specs(specs: impl IntoIterator<Item = ResourceTypeSpec>) -> Self {
        let mut registry = Self::new();
        for spec in specs {
            registry.register(spec);
        }
        registry
    }

    pub fn register(&mut self, spec: ResourceTypeSpec) {
        self.specs.insert(spec.type_tag.clone(), spec);
    }

    pub fn spec(&self, type_tag: &str) -> Option<&ResourceTypeSpec> {
        self.specs.get(type_tag)
    }

    pub fn contains(&self, type_tag: &str) -> bool {
        self.specs.contains_key(type_tag)
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }
}
