//! WordPress on Fargate: an RDS MySQL instance fronted by an ECS service.
//!
//! Database master credentials are SecretRef indirections into Secrets
//! Manager rather than literal values, so validation stays clean.

use formation_core::error::TemplateError;
use formation_core::template::{Parameter, Resource, Template};
use formation_core::value::{Value, pseudo};

const DB_NAME: &str = "wordpress";
const CONTAINER_NAME: &str = "wordpress";
const DB_SECRET: &str = "lab/wordpress/db";

fn db_secret(field: &str) -> Value {
    Value::secrets_manager(format!("{DB_SECRET}:SecretString:{field}"))
}

fn ingress_rule(protocol: &str, from_port: &str, to_port: &str, cidr: &str) -> Value {
    Value::object([
        ("IpProtocol", Value::string(protocol)),
        ("FromPort", Value::string(from_port)),
        ("ToPort", Value::string(to_port)),
        ("CidrIp", Value::string(cidr)),
    ])
}

pub fn template() -> Result<Template, TemplateError> {
    let mut t = Template::with_registry(formation_provider_aws::registry())
        .with_description("WordPress on ECS Fargate with an RDS MySQL backend");

    let vpc_id = t.add_parameter(
        Parameter::new("VPCId", "AWS::EC2::VPC::Id").with_description("VPC"),
    )?;

    let db_sg = t.add_resource(
        Resource::new("DBSecurityGroup", "AWS::EC2::SecurityGroup")
            .with_property("GroupDescription", Value::string("DB Security Group"))
            .with_property("GroupName", Value::string("DB Security Group"))
            .with_property(
                "SecurityGroupIngress",
                Value::list([ingress_rule("tcp", "3306", "3306", "0.0.0.0/0")]),
            )
            .with_property("VpcId", vpc_id.reference()),
    )?;

    let database = t.add_resource(
        Resource::new("Database", "AWS::RDS::DBInstance")
            .with_property("AllocatedStorage", Value::string("20"))
            .with_property("DBInstanceClass", Value::string("db.t3.micro"))
            .with_property("DBName", Value::string(DB_NAME))
            .with_property("Engine", Value::string("mysql"))
            .with_property("EngineVersion", Value::string("8.0.35"))
            .with_property("PubliclyAccessible", Value::Bool(true))
            .with_property("MasterUsername", db_secret("username"))
            .with_property("MasterUserPassword", db_secret("password"))
            .with_property("VPCSecurityGroups", Value::list([db_sg.reference()]))
            .with_property("StorageType", Value::string("gp2")),
    )?;

    let subnet_id = t.add_parameter(
        Parameter::new("SubnetId", "AWS::EC2::Subnet::Id").with_description("Subnet"),
    )?;

    let web_sg = t.add_resource(
        Resource::new("WebSecurityGroup", "AWS::EC2::SecurityGroup")
            .with_property("GroupDescription", Value::string("Web Security Group"))
            .with_property("GroupName", Value::string("Web Security Group"))
            .with_property(
                "SecurityGroupIngress",
                Value::list([ingress_rule("tcp", "80", "80", "0.0.0.0/0")]),
            )
            .with_property("VpcId", vpc_id.reference()),
    )?;

    let execution_role = t.add_resource(
        Resource::new("EcsTaskExecutionRole", "AWS::IAM::Role")
            .with_property(
                "AssumeRolePolicyDocument",
                Value::object([
                    ("Version", Value::string("2012-10-17")),
                    (
                        "Statement",
                        Value::list([Value::object([
                            ("Effect", Value::string("Allow")),
                            (
                                "Principal",
                                Value::object([(
                                    "Service",
                                    Value::string("ecs-tasks.amazonaws.com"),
                                )]),
                            ),
                            ("Action", Value::string("sts:AssumeRole")),
                        ])]),
                    ),
                ]),
            )
            .with_property(
                "ManagedPolicyArns",
                Value::list([Value::string(
                    "arn:aws:iam::aws:policy/service-role/AmazonECSTaskExecutionRolePolicy",
                )]),
            ),
    )?;

    let cluster = t.add_resource(
        Resource::new("ECSCluster", "AWS::ECS::Cluster")
            .with_property("CapacityProviders", Value::list([Value::string("FARGATE")]))
            .depends_on(execution_role.title()),
    )?;

    let log_group = t.add_resource(
        Resource::new("WebLogGroup", "AWS::Logs::LogGroup")
            .with_property("LogGroupName", Value::sub("/ecs/web-${AWS::StackName}"))
            .with_property("RetentionInDays", Value::Int(30)),
    )?;

    let db_endpoint = t.attr_of(&database, "Endpoint.Address")?;
    let task_definition = t.add_resource(
        Resource::new("ECSTaskDefinition", "AWS::ECS::TaskDefinition")
            .with_property("Cpu", Value::string("256"))
            .with_property("Memory", Value::string("512"))
            .with_property("NetworkMode", Value::string("awsvpc"))
            .with_property("Family", Value::string("wordpress"))
            .with_property("ExecutionRoleArn", t.attr_of(&execution_role, "Arn")?)
            .with_property(
                "RuntimePlatform",
                Value::object([
                    ("CpuArchitecture", Value::string("X86_64")),
                    ("OperatingSystemFamily", Value::string("LINUX")),
                ]),
            )
            .with_property(
                "ContainerDefinitions",
                Value::list([Value::object([
                    ("Name", Value::string(CONTAINER_NAME)),
                    ("Image", Value::string("wordpress")),
                    ("Essential", Value::Bool(true)),
                    ("Cpu", Value::Int(0)),
                    ("MemoryReservation", Value::Int(256)),
                    (
                        "PortMappings",
                        Value::list([Value::object([
                            ("ContainerPort", Value::Int(80)),
                            ("HostPort", Value::Int(80)),
                            ("Protocol", Value::string("tcp")),
                        ])]),
                    ),
                    (
                        "LogConfiguration",
                        Value::object([
                            ("LogDriver", Value::string("awslogs")),
                            (
                                "Options",
                                Value::object([
                                    ("awslogs-group", log_group.reference()),
                                    ("awslogs-region", t.ref_to(pseudo::REGION)?),
                                    ("awslogs-stream-prefix", Value::string("ecs")),
                                ]),
                            ),
                        ]),
                    ),
                    (
                        "Environment",
                        Value::list([
                            Value::object([
                                ("Name", Value::string("WORDPRESS_DB_HOST")),
                                ("Value", db_endpoint),
                            ]),
                            Value::object([
                                ("Name", Value::string("WORDPRESS_DB_USER")),
                                ("Value", db_secret("username")),
                            ]),
                            Value::object([
                                ("Name", Value::string("WORDPRESS_DB_PASSWORD")),
                                ("Value", db_secret("password")),
                            ]),
                            Value::object([
                                ("Name", Value::string("WORDPRESS_DEBUG")),
                                ("Value", Value::string("1")),
                            ]),
                        ]),
                    ),
                ])]),
            ),
    )?;

    t.add_resource(
        Resource::new("ECSService", "AWS::ECS::Service")
            .with_property("Cluster", cluster.reference())
            .with_property("DesiredCount", Value::Int(1))
            .with_property("LaunchType", Value::string("FARGATE"))
            .with_property("PlatformVersion", Value::string("LATEST"))
            .with_property("TaskDefinition", task_definition.reference())
            .with_property(
                "NetworkConfiguration",
                Value::object([(
                    "AwsvpcConfiguration",
                    Value::object([
                        ("AssignPublicIp", Value::string("ENABLED")),
                        ("Subnets", Value::list([subnet_id.reference()])),
                        ("SecurityGroups", Value::list([web_sg.reference()])),
                    ]),
                )]),
            ),
    )?;

    Ok(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stack_validates_without_findings() {
        let template = template().unwrap();
        let findings = template.validate();
        assert!(findings.is_empty(), "unexpected findings: {findings:?}");
    }

    #[test]
    fn stack_has_expected_entries_in_insertion_order() {
        let mut template = template().unwrap();
        let rendered = template.render().unwrap();
        let doc = rendered.document.as_json();

        let parameters: Vec<&String> = doc["Parameters"].as_object().unwrap().keys().collect();
        assert_eq!(parameters, ["VPCId", "SubnetId"]);

        let resources: Vec<&String> = doc["Resources"].as_object().unwrap().keys().collect();
        assert_eq!(
            resources,
            [
                "DBSecurityGroup",
                "Database",
                "WebSecurityGroup",
                "EcsTaskExecutionRole",
                "ECSCluster",
                "WebLogGroup",
                "ECSTaskDefinition",
                "ECSService"
            ]
        );
    }

    #[test]
    fn references_render_in_provider_native_form() {
        let mut template = template().unwrap();
        let doc = template.render().unwrap().document.as_json().clone();

        assert_eq!(
            doc["Resources"]["DBSecurityGroup"]["Properties"]["VpcId"],
            json!({ "Ref": "VPCId" })
        );
        assert_eq!(
            doc["Resources"]["ECSCluster"]["DependsOn"],
            json!(["EcsTaskExecutionRole"])
        );
        assert_eq!(
            doc["Resources"]["WebLogGroup"]["Properties"]["LogGroupName"],
            json!({ "Fn::Sub": "/ecs/web-${AWS::StackName}" })
        );

        let environment = &doc["Resources"]["ECSTaskDefinition"]["Properties"]
            ["ContainerDefinitions"][0]["Environment"];
        assert_eq!(
            environment[0],
            json!({
                "Name": "WORDPRESS_DB_HOST",
                "Value": { "Fn::GetAtt": ["Database", "Endpoint.Address"] }
            })
        );
        assert_eq!(
            environment[2]["Value"],
            json!("{{resolve:secretsmanager:lab/wordpress/db:SecretString:password}}")
        );
    }

    #[test]
    fn rendering_is_deterministic_across_builds() {
        let a = template().unwrap().render().unwrap().document.to_json_string();
        let b = template().unwrap().render().unwrap().document.to_json_string();
        assert_eq!(a, b);
    }
}
