//! ECS resource type definitions

use formation_core::schema::ResourceTypeSpec;

pub fn cluster() -> ResourceTypeSpec {
    ResourceTypeSpec::new("AWS::ECS::Cluster")
        .with_description("An ECS cluster")
        .attribute("Arn")
}

pub fn task_definition() -> ResourceTypeSpec {
    ResourceTypeSpec::new("AWS::ECS::TaskDefinition")
        .with_description("An ECS task definition")
        .attribute("TaskDefinitionArn")
}

pub fn service() -> ResourceTypeSpec {
    ResourceTypeSpec::new("AWS::ECS::Service")
        .with_description("An ECS service")
        .attribute("Name")
        .attribute("ServiceArn")
}

/// Returns all ECS resource type specs
pub fn specs() -> Vec<ResourceTypeSpec> {
    vec![cluster(), task_definition(), service()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_exposes_arn_and_name() {
        let spec = service();
        assert!(spec.has_attribute("ServiceArn"));
        assert!(spec.has_attribute("Name"));
        assert!(!spec.has_attribute("TaskDefinition"));
    }
}
