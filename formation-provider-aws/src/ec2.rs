//! EC2 resource type definitions

use formation_core::schema::ResourceTypeSpec;

pub fn security_group() -> ResourceTypeSpec {
    ResourceTypeSpec::new("AWS::EC2::SecurityGroup")
        .with_description("An EC2 security group")
        .attribute("GroupId")
        .attribute("VpcId")
}

pub fn vpc() -> ResourceTypeSpec {
    ResourceTypeSpec::new("AWS::EC2::VPC")
        .with_description("A Virtual Private Cloud")
        .attribute("VpcId")
        .attribute("CidrBlock")
        .attribute("DefaultNetworkAcl")
        .attribute("DefaultSecurityGroup")
}

pub fn subnet() -> ResourceTypeSpec {
    ResourceTypeSpec::new("AWS::EC2::Subnet")
        .with_description("A VPC subnet")
        .attribute("SubnetId")
        .attribute("AvailabilityZone")
        .attribute("CidrBlock")
        .attribute("VpcId")
}

/// Returns all EC2 resource type specs
pub fn specs() -> Vec<ResourceTypeSpec> {
    vec![security_group(), vpc(), subnet()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn security_group_exposes_group_id() {
        let spec = security_group();
        assert!(spec.has_attribute("GroupId"));
        assert!(!spec.has_attribute("GroupName"));
    }
}
