//! CloudWatch Logs resource type definitions

use formation_core::schema::ResourceTypeSpec;

pub fn log_group() -> ResourceTypeSpec {
    ResourceTypeSpec::new("AWS::Logs::LogGroup")
        .with_description("A CloudWatch Logs log group")
        .attribute("Arn")
}

/// Returns all Logs resource type specs
pub fn specs() -> Vec<ResourceTypeSpec> {
    vec![log_group()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_group_exposes_arn() {
        assert!(log_group().has_attribute("Arn"));
    }
}
