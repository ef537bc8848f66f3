//! Error taxonomy for template construction, validation, and output

use std::path::PathBuf;

use crate::validate::Finding;

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// Parameters and resources share one namespace; a name is claimed once.
    #[error("duplicate logical name '{name}'")]
    DuplicateName { name: String },

    /// The graph is append-only, so a reference target must already exist.
    #[error("reference to undeclared entity '{name}'")]
    UnknownReference { name: String },

    #[error("attribute '{attribute}' is not defined for resource type '{type_tag}'")]
    InvalidAttribute { type_tag: String, attribute: String },

    /// Aggregate of every fatal finding, not just the first.
    #[error("validation failed with {} fatal finding(s)", .0.len())]
    Validation(Vec<Finding>),

    #[error("template is frozen: render() has already succeeded")]
    Frozen,

    #[error("failed to write template to {}", path.display())]
    SinkWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
