//! Template - The resource graph and its build-once lifecycle
//!
//! A `Template` accumulates parameters and resources, hands out references
//! between them, and renders once. Structured references are checked eagerly:
//! a reference can only be created to an entity already in the graph.
//!
//! The template has exactly two phases. While **Building**, entities may be
//! added; after the first successful `render()` it is **Rendered** and every
//! further mutation fails with [`TemplateError::Frozen`].

use std::collections::{BTreeMap, HashMap};

use crate::error::TemplateError;
use crate::render::{self, Rendered};
use crate::schema::TypeRegistry;
use crate::validate::{self, Finding};
use crate::value::{Reference, Value, pseudo};

/// Deploy-time input declared in the template.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub param_type: String,
    pub description: Option<String>,
    pub default: Option<Value>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, param_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.into(),
            description: None,
            default: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }
}

/// Declared infrastructure object.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub title: String,
    pub type_tag: String,
    /// BTreeMap keeps property iteration deterministic
    pub properties: BTreeMap<String, Value>,
    /// Explicit ordering overrides on top of derived reference edges
    pub depends_on: Vec<String>,
}

impl Resource {
    pub fn new(title: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            type_tag: type_tag.into(),
            properties: BTreeMap::new(),
            depends_on: Vec::new(),
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value: Value) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    pub fn depends_on(mut self, title: impl Into<String>) -> Self {
        self.depends_on.push(title.into());
        self
    }
}

/// Proof that a parameter was added; hands out references to it.
#[derive(Debug, Clone)]
pub struct ParameterHandle {
    name: String,
}

impl ParameterHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn reference(&self) -> Value {
        Value::Ref(Reference::Parameter(self.name.clone()))
    }
}

/// Proof that a resource was added; hands out references to it.
#[derive(Debug, Clone)]
pub struct ResourceHandle {
    title: String,
    type_tag: String,
}

impl ResourceHandle {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    /// Reference to this resource's primary identifier.
    pub fn reference(&self) -> Value {
        Value::Ref(Reference::Resource(self.title.clone()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Building,
    Rendered,
}

/// What a logical name is bound to in the shared namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Parameter,
    Resource,
}

/// The root container: insertion-ordered parameters and resources plus the
/// name table they share.
#[derive(Debug, Clone)]
pub struct Template {
    description: Option<String>,
    parameters: Vec<Parameter>,
    resources: Vec<Resource>,
    names: HashMap<String, EntityKind>,
    registry: TypeRegistry,
    phase: Phase,
}

impl Template {
    pub fn new() -> Self {
        Self::with_registry(TypeRegistry::default())
    }

    pub fn with_registry(registry: TypeRegistry) -> Self {
        Self {
            description: None,
            parameters: Vec::new(),
            resources: Vec::new(),
            names: HashMap::new(),
            registry,
            phase: Phase::Building,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn find_resource(&self, title: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.title == title)
    }

    pub fn kind_of(&self, name: &str) -> Option<EntityKind> {
        self.names.get(name).copied()
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Declare a deploy-time parameter.
    pub fn add_parameter(
        &mut self,
        parameter: Parameter,
    ) -> Result<ParameterHandle, TemplateError> {
        self.ensure_building()?;
        self.claim_name(&parameter.name, EntityKind::Parameter)?;
        let handle = ParameterHandle {
            name: parameter.name.clone(),
        };
        self.parameters.push(parameter);
        Ok(handle)
    }

    /// Add a resource. Every structured reference in its properties and every
    /// `depends_on` entry must target an entity already in the graph.
    pub fn add_resource(&mut self, resource: Resource) -> Result<ResourceHandle, TemplateError> {
        self.ensure_building()?;
        if self.names.contains_key(&resource.title) || pseudo::is_pseudo(&resource.title) {
            return Err(TemplateError::DuplicateName {
                name: resource.title.clone(),
            });
        }

        for value in resource.properties.values() {
            for reference in value.references() {
                self.check_reference(&reference)?;
            }
        }
        for dependency in &resource.depends_on {
            if self.kind_of(dependency) != Some(EntityKind::Resource) {
                return Err(TemplateError::UnknownReference {
                    name: dependency.clone(),
                });
            }
        }

        let handle = ResourceHandle {
            title: resource.title.clone(),
            type_tag: resource.type_tag.clone(),
        };
        self.names
            .insert(resource.title.clone(), EntityKind::Resource);
        self.resources.push(resource);
        Ok(handle)
    }

    /// Name-based reference to a prior parameter or resource. Names in the
    /// `AWS::` namespace resolve to pseudo-parameter references.
    pub fn ref_to(&self, name: &str) -> Result<Value, TemplateError> {
        if pseudo::is_pseudo(name) {
            return Ok(Value::Ref(Reference::Pseudo(name.to_string())));
        }
        match self.names.get(name) {
            Some(EntityKind::Parameter) => {
                Ok(Value::Ref(Reference::Parameter(name.to_string())))
            }
            Some(EntityKind::Resource) => Ok(Value::Ref(Reference::Resource(name.to_string()))),
            None => Err(TemplateError::UnknownReference {
                name: name.to_string(),
            }),
        }
    }

    /// Reference to a runtime attribute of a prior resource. Checked against
    /// the type registry when it knows the resource type.
    pub fn attr_of(
        &self,
        handle: &ResourceHandle,
        attribute: &str,
    ) -> Result<Value, TemplateError> {
        self.check_attribute(handle.type_tag(), attribute)?;
        Ok(Value::Ref(Reference::ResourceAttr {
            title: handle.title().to_string(),
            attribute: attribute.to_string(),
        }))
    }

    /// Whole-graph validation pass. Fatal findings block rendering; warnings
    /// are returned alongside a successful render.
    pub fn validate(&self) -> Vec<Finding> {
        validate::validate(self)
    }

    /// Validate and render. On success the template freezes: no transition
    /// back to Building exists.
    pub fn render(&mut self) -> Result<Rendered, TemplateError> {
        let (fatal, warnings): (Vec<Finding>, Vec<Finding>) =
            self.validate().into_iter().partition(Finding::is_fatal);
        if !fatal.is_empty() {
            return Err(TemplateError::Validation(fatal));
        }
        let document = render::render(self);
        self.phase = Phase::Rendered;
        Ok(Rendered { document, warnings })
    }

    fn ensure_building(&self) -> Result<(), TemplateError> {
        match self.phase {
            Phase::Building => Ok(()),
            Phase::Rendered => Err(TemplateError::Frozen),
        }
    }

    fn claim_name(&mut self, name: &str, kind: EntityKind) -> Result<(), TemplateError> {
        // The AWS:: namespace belongs to pseudo parameters.
        if self.names.contains_key(name) || pseudo::is_pseudo(name) {
            return Err(TemplateError::DuplicateName {
                name: name.to_string(),
            });
        }
        self.names.insert(name.to_string(), kind);
        Ok(())
    }

    fn check_reference(&self, reference: &Reference) -> Result<(), TemplateError> {
        let unknown = |name: &str| TemplateError::UnknownReference {
            name: name.to_string(),
        };
        match reference {
            Reference::Pseudo(name) => {
                if pseudo::is_pseudo(name) {
                    Ok(())
                } else {
                    Err(unknown(name))
                }
            }
            Reference::Parameter(name) => {
                if pseudo::is_pseudo(name) || self.kind_of(name) == Some(EntityKind::Parameter) {
                    Ok(())
                } else {
                    Err(unknown(name))
                }
            }
            Reference::Resource(title) => {
                if self.kind_of(title) == Some(EntityKind::Resource) {
                    Ok(())
                } else {
                    Err(unknown(title))
                }
            }
            Reference::ResourceAttr { title, attribute } => {
                let resource = self.find_resource(title).ok_or_else(|| unknown(title))?;
                self.check_attribute(&resource.type_tag, attribute)
            }
        }
    }

    fn check_attribute(&self, type_tag: &str, attribute: &str) -> Result<(), TemplateError> {
        // Unknown types are accepted here; validation reports them as advisory.
        if let Some(spec) = self.registry.spec(type_tag)
            && !spec.has_attribute(attribute)
        {
            return Err(TemplateError::InvalidAttribute {
                type_tag: type_tag.to_string(),
                attribute: attribute.to_string(),
            });
        }
        Ok(())
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::new()
    }
}
