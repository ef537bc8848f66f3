//! Value - Property values and typed references
//!
//! A property value is either a literal, a collection, or a resolvable link
//! to another template entity. Links are tagged variants rather than bare
//! strings so that typos surface at build time instead of as malformed
//! output.

use std::collections::BTreeMap;

/// Pseudo parameters provided by the provisioning engine at deploy time.
pub mod pseudo {
    pub const ACCOUNT_ID: &str = "AWS::AccountId";
    pub const PARTITION: &str = "AWS::Partition";
    pub const REGION: &str = "AWS::Region";
    pub const STACK_NAME: &str = "AWS::StackName";
    pub const NO_VALUE: &str = "AWS::NoValue";

    /// The `AWS::` namespace is reserved for engine-provided parameters.
    pub fn is_pseudo(name: &str) -> bool {
        name.starts_with("AWS::")
    }
}

/// Typed link from a property to another template entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// Deploy-time input declared in the template
    Parameter(String),
    /// Another resource's primary identifier
    Resource(String),
    /// A runtime attribute of another resource (e.g. an endpoint address)
    ResourceAttr { title: String, attribute: String },
    /// Engine-provided pseudo parameter (`AWS::Region`, `AWS::StackName`, ...)
    Pseudo(String),
}

impl Reference {
    /// Logical name this reference points at.
    pub fn target(&self) -> &str {
        match self {
            Reference::Parameter(name)
            | Reference::Resource(name)
            | Reference::Pseudo(name) => name,
            Reference::ResourceAttr { title, .. } => title,
        }
    }
}

/// Secret store backing a [`Value::SecretRef`] indirection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretStore {
    SecretsManager,
    SsmSecure,
}

impl SecretStore {
    /// Scheme used in the rendered dynamic-reference string.
    pub fn scheme(&self) -> &'static str {
        match self {
            SecretStore::SecretsManager => "secretsmanager",
            SecretStore::SsmSecure => "ssm-secure",
        }
    }
}

/// Property value of a resource or parameter default.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int(i64),
    Bool(bool),
    List(Vec<Value>),
    /// Nested object; BTreeMap keeps iteration deterministic
    Map(BTreeMap<String, Value>),
    /// Resolvable link to a parameter or resource
    Ref(Reference),
    /// String interpolation with `${Name}` / `${Title.Attribute}` placeholders
    Sub(String),
    /// Indirection into an external secret store, resolved at deploy time
    SecretRef { store: SecretStore, key: String },
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(items.into_iter().collect())
    }

    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn sub(template: impl Into<String>) -> Self {
        Value::Sub(template.into())
    }

    /// Dynamic reference into AWS Secrets Manager
    /// (e.g. `lab/wordpress/db:SecretString:password`).
    pub fn secrets_manager(key: impl Into<String>) -> Self {
        Value::SecretRef {
            store: SecretStore::SecretsManager,
            key: key.into(),
        }
    }

    /// Dynamic reference into an SSM SecureString parameter.
    pub fn ssm_secure(key: impl Into<String>) -> Self {
        Value::SecretRef {
            store: SecretStore::SsmSecure,
            key: key.into(),
        }
    }

    /// Visit this value and every nested value, depth first.
    pub fn walk(&self, f: &mut dyn FnMut(&Value)) {
        f(self);
        match self {
            Value::List(items) => {
                for item in items {
                    item.walk(f);
                }
            }
            Value::Map(map) => {
                for value in map.values() {
                    value.walk(f);
                }
            }
            _ => {}
        }
    }

    /// All structured references contained in this value, nested ones included.
    pub fn references(&self) -> Vec<Reference> {
        let mut refs = Vec::new();
        self.walk(&mut |value| {
            if let Value::Ref(reference) = value {
                refs.push(reference.clone());
            }
        });
        refs
    }

    pub fn type_name(&self) -> String {
        match self {
            Value::String(_) => "String".to_string(),
            Value::Int(_) => "Int".to_string(),
            Value::Bool(_) => "Bool".to_string(),
            Value::List(_) => "List".to_string(),
            Value::Map(_) => "Map".to_string(),
            Value::Ref(reference) => format!("Ref({})", reference.target()),
            Value::Sub(template) => format!("Sub({template})"),
            Value::SecretRef { store, key } => {
                format!("SecretRef({}:{})", store.scheme(), key)
            }
        }
    }
}
