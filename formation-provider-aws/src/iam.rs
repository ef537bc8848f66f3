//! IAM resource type definitions

use formation_core::schema::ResourceTypeSpec;

pub fn role() -> ResourceTypeSpec {
    ResourceTypeSpec::new("AWS::IAM::Role")
        .with_description("An IAM role")
        .attribute("Arn")
        .attribute("RoleId")
}

/// Returns all IAM resource type specs
pub fn specs() -> Vec<ResourceTypeSpec> {
    vec![role()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_exposes_arn() {
        assert!(role().has_attribute("Arn"));
        assert!(!role().has_attribute("RoleName"));
    }
}
