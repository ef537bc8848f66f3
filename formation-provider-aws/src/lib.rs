//! Formation Provider AWS
//!
//! CloudFormation resource type catalog: per-service specs listing the
//! runtime attributes each type exposes to `Fn::GetAtt`. Used by the core
//! builder to check attribute references at build time.

pub mod ec2;
pub mod ecs;
pub mod iam;
pub mod logs;
pub mod rds;

use formation_core::schema::TypeRegistry;

/// Registry with every resource type this catalog knows about.
pub fn registry() -> TypeRegistry {
    TypeRegistry::with_specs(
        ec2::specs()
            .into_iter()
            .chain(ecs::specs())
            .chain(iam::specs())
            .chain(logs::specs())
            .chain(rds::specs()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_covers_every_service_module() {
        let registry = registry();
        for type_tag in [
            "AWS::EC2::SecurityGroup",
            "AWS::ECS::Cluster",
            "AWS::ECS::Service",
            "AWS::ECS::TaskDefinition",
            "AWS::IAM::Role",
            "AWS::Logs::LogGroup",
            "AWS::RDS::DBInstance",
        ] {
            assert!(registry.contains(type_tag), "missing {type_tag}");
        }
    }
}
