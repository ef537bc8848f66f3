//! Render - pure graph-to-document transformation
//!
//! Rendering never reorders resources: the document is declarative desired
//! state, emitted in insertion order plus explicit DependsOn, and the
//! provisioning engine does its own dependency resolution. Identical graphs
//! render to byte-identical documents.

use serde_json::{Map, Value as Json, json};

use crate::template::{Parameter, Resource, Template};
use crate::validate::Finding;
use crate::value::{Reference, Value};

pub const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";

/// Deterministic JSON form of a rendered template.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Json,
}

impl Document {
    pub fn as_json(&self) -> &Json {
        &self.root
    }

    /// Pretty-printed JSON with a trailing newline. Map order is insertion
    /// order (serde_json's preserve_order), so the output is reproducible.
    pub fn to_json_string(&self) -> String {
        let mut out = serde_json::to_string_pretty(&self.root)
            .unwrap_or_else(|_| String::from("{}"));
        out.push('\n');
        out
    }

    /// Write this document to a file; see [`crate::sink::write_document`].
    pub fn write_to(&self, path: &std::path::Path) -> Result<(), crate::error::TemplateError> {
        crate::sink::write_document(self, path)
    }
}

/// Successful render output: the document plus every non-fatal finding.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub document: Document,
    pub warnings: Vec<Finding>,
}

pub(crate) fn render(template: &Template) -> Document {
    let mut root = Map::new();
    root.insert(
        "AWSTemplateFormatVersion".to_string(),
        json!(TEMPLATE_FORMAT_VERSION),
    );
    if let Some(description) = template.description() {
        root.insert("Description".to_string(), json!(description));
    }

    if !template.parameters().is_empty() {
        let mut parameters = Map::new();
        for parameter in template.parameters() {
            parameters.insert(parameter.name.clone(), render_parameter(parameter));
        }
        root.insert("Parameters".to_string(), Json::Object(parameters));
    }

    let mut resources = Map::new();
    for resource in template.resources() {
        resources.insert(resource.title.clone(), render_resource(resource));
    }
    root.insert("Resources".to_string(), Json::Object(resources));

    Document {
        root: Json::Object(root),
    }
}

fn render_parameter(parameter: &Parameter) -> Json {
    let mut entry = Map::new();
    entry.insert("Type".to_string(), json!(parameter.param_type));
    if let Some(description) = &parameter.description {
        entry.insert("Description".to_string(), json!(description));
    }
    if let Some(default) = &parameter.default {
        entry.insert("Default".to_string(), render_value(default));
    }
    Json::Object(entry)
}

fn render_resource(resource: &Resource) -> Json {
    let mut entry = Map::new();
    entry.insert("Type".to_string(), json!(resource.type_tag));
    if !resource.depends_on.is_empty() {
        entry.insert("DependsOn".to_string(), json!(resource.depends_on));
    }
    if !resource.properties.is_empty() {
        let mut properties = Map::new();
        for (name, value) in &resource.properties {
            properties.insert(name.clone(), render_value(value));
        }
        entry.insert("Properties".to_string(), Json::Object(properties));
    }
    Json::Object(entry)
}

/// Provider-native placeholder forms for references; literals pass through.
pub fn render_value(value: &Value) -> Json {
    match value {
        Value::String(s) => json!(s),
        Value::Int(n) => json!(n),
        Value::Bool(b) => json!(b),
        Value::List(items) => Json::Array(items.iter().map(render_value).collect()),
        Value::Map(map) => {
            let mut object = Map::new();
            for (key, nested) in map {
                object.insert(key.clone(), render_value(nested));
            }
            Json::Object(object)
        }
        Value::Ref(Reference::ResourceAttr { title, attribute }) => {
            json!({ "Fn::GetAtt": [title, attribute] })
        }
        Value::Ref(reference) => json!({ "Ref": reference.target() }),
        Value::Sub(template_string) => json!({ "Fn::Sub": template_string }),
        Value::SecretRef { store, key } => {
            json!(format!("{{{{resolve:{}:{}}}}}", store.scheme(), key))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{Parameter, Resource, Template};
    use crate::value::pseudo;

    fn vpc_stack() -> Template {
        let mut template = Template::new();
        let vpc_id = template
            .add_parameter(Parameter::new("VPCId", "AWS::EC2::VPC::Id").with_description("VPC"))
            .unwrap();
        template
            .add_resource(
                Resource::new("DBSG", "AWS::EC2::SecurityGroup")
                    .with_property("GroupDescription", Value::string("DB Security Group"))
                    .with_property("VpcId", vpc_id.reference()),
            )
            .unwrap();
        template
    }

    #[test]
    fn parameter_reference_renders_as_ref_placeholder() {
        let mut template = vpc_stack();
        let rendered = template.render().unwrap();
        let doc = rendered.document.as_json();

        assert_eq!(doc["Parameters"]["VPCId"]["Type"], json!("AWS::EC2::VPC::Id"));
        assert_eq!(
            doc["Resources"]["DBSG"]["Properties"]["VpcId"],
            json!({ "Ref": "VPCId" })
        );
        assert_eq!(rendered.warnings.len(), 0);
    }

    #[test]
    fn entry_counts_and_insertion_order_are_preserved() {
        let mut template = Template::new();
        template
            .add_parameter(Parameter::new("VPCId", "AWS::EC2::VPC::Id"))
            .unwrap();
        template
            .add_parameter(Parameter::new("SubnetId", "AWS::EC2::Subnet::Id"))
            .unwrap();
        for title in ["Zebra", "Alpha", "Middle"] {
            template
                .add_resource(Resource::new(title, "AWS::ECS::Cluster"))
                .unwrap();
        }

        let rendered = template.render().unwrap();
        let doc = rendered.document.as_json();

        let parameter_names: Vec<&String> =
            doc["Parameters"].as_object().unwrap().keys().collect();
        assert_eq!(parameter_names, ["VPCId", "SubnetId"]);

        // Not alphabetical: insertion order survives rendering.
        let resource_titles: Vec<&String> =
            doc["Resources"].as_object().unwrap().keys().collect();
        assert_eq!(resource_titles, ["Zebra", "Alpha", "Middle"]);
    }

    #[test]
    fn getatt_sub_and_secret_forms() {
        let mut template = Template::new();
        let database = template
            .add_resource(Resource::new("Database", "AWS::RDS::DBInstance"))
            .unwrap();
        let endpoint = template.attr_of(&database, "Endpoint.Address").unwrap();
        template
            .add_resource(
                Resource::new("Task", "AWS::ECS::TaskDefinition")
                    .with_property("DbHost", endpoint)
                    .with_property("LogGroup", Value::sub("/ecs/web-${AWS::StackName}"))
                    .with_property(
                        "DbPassword",
                        Value::secrets_manager("lab/db:SecretString:password"),
                    )
                    .with_property("Region", template.ref_to(pseudo::REGION).unwrap()),
            )
            .unwrap();

        let rendered = template.render().unwrap();
        let properties = &rendered.document.as_json()["Resources"]["Task"]["Properties"];

        assert_eq!(
            properties["DbHost"],
            json!({ "Fn::GetAtt": ["Database", "Endpoint.Address"] })
        );
        assert_eq!(
            properties["LogGroup"],
            json!({ "Fn::Sub": "/ecs/web-${AWS::StackName}" })
        );
        assert_eq!(
            properties["DbPassword"],
            json!("{{resolve:secretsmanager:lab/db:SecretString:password}}")
        );
        assert_eq!(properties["Region"], json!({ "Ref": "AWS::Region" }));
    }

    #[test]
    fn depends_on_is_emitted_verbatim() {
        let mut template = Template::new();
        template
            .add_resource(Resource::new("Role", "AWS::IAM::Role"))
            .unwrap();
        template
            .add_resource(Resource::new("Cluster", "AWS::ECS::Cluster").depends_on("Role"))
            .unwrap();

        let rendered = template.render().unwrap();
        assert_eq!(
            rendered.document.as_json()["Resources"]["Cluster"]["DependsOn"],
            json!(["Role"])
        );
    }

    #[test]
    fn identical_graphs_render_byte_identically() {
        let mut first = vpc_stack();
        let mut second = vpc_stack();

        let a = first.render().unwrap().document.to_json_string();
        let b = second.render().unwrap().document.to_json_string();
        assert_eq!(a, b);
        assert!(a.ends_with('\n'));
    }

    #[test]
    fn rendering_a_clone_matches_the_original() {
        let mut template = vpc_stack();
        let mut copy = template.clone();
        assert_eq!(
            template.render().unwrap().document,
            copy.render().unwrap().document
        );
    }
}
