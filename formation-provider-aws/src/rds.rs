//! RDS resource type definitions

use formation_core::schema::ResourceTypeSpec;

pub fn db_instance() -> ResourceTypeSpec {
    ResourceTypeSpec::new("AWS::RDS::DBInstance")
        .with_description("An RDS database instance")
        .attribute("Endpoint.Address")
        .attribute("Endpoint.Port")
        .attribute("DBInstanceArn")
        .attribute("DbiResourceId")
        .attribute("MasterUserSecret.SecretArn")
}

/// Returns all RDS resource type specs
pub fn specs() -> Vec<ResourceTypeSpec> {
    vec![db_instance()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_instance_exposes_endpoint_attributes() {
        let spec = db_instance();
        assert!(spec.has_attribute("Endpoint.Address"));
        assert!(spec.has_attribute("Endpoint.Port"));
        assert!(!spec.has_attribute("MasterUserPassword"));
    }
}
