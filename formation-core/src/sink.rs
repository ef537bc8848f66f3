//! Sink - writing rendered documents
//!
//! A single write to a caller-specified path. Failures propagate as
//! [`TemplateError::SinkWrite`]; output is deterministic, so retrying
//! without fixing the underlying cause would be pointless.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::TemplateError;
use crate::render::Document;

/// Create (or truncate) `path` and write the document, flushing before
/// return. Nothing is ever written for a template that failed validation,
/// since no [`Document`] exists in that case.
pub fn write_document(document: &Document, path: &Path) -> Result<(), TemplateError> {
    let sink_err = |source: std::io::Error| TemplateError::SinkWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::create(path).map_err(sink_err)?;
    file.write_all(document.to_json_string().as_bytes())
        .map_err(sink_err)?;
    file.flush().map_err(sink_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{Resource, Template};

    fn rendered_document() -> Document {
        let mut template = Template::new();
        template
            .add_resource(Resource::new("Cluster", "AWS::ECS::Cluster"))
            .unwrap();
        template.render().unwrap().document
    }

    #[test]
    fn written_file_matches_the_serialized_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("template.json");
        let document = rendered_document();

        write_document(&document, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, document.to_json_string());
    }

    #[test]
    fn unwritable_path_surfaces_as_sink_error() {
        let dir = tempfile::tempdir().unwrap();
        let document = rendered_document();

        // The directory itself is not a writable file target.
        let err = write_document(&document, dir.path()).unwrap_err();
        match err {
            TemplateError::SinkWrite { path, .. } => assert_eq!(path, dir.path()),
            other => panic!("expected SinkWrite, got {other:?}"),
        }
    }
}
