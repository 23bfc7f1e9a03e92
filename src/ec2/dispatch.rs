//! Operation-name routing for the network service.

use serde_json::Value;

use super::Ec2Backend;
use crate::framework::{parse, respond, ServiceError};
use crate::model::ec2::*;

pub fn dispatch(backend: &mut Ec2Backend, operation: &str, params: Value) -> Result<Value, ServiceError> {
    match operation {
        "CreateVpc" => {
            let vpc = backend.create_vpc(parse(params)?)?;
            respond(&CreateVpcOutput { vpc })
        }
        "DescribeVpcs" => {
            let input: DescribeVpcsInput = parse(params)?;
            let vpcs = backend.describe_vpcs(&input.vpc_ids)?;
            respond(&DescribeVpcsOutput { vpcs })
        }
        "DeleteVpc" => {
            let input: DeleteVpcInput = parse(params)?;
            backend.delete_vpc(&input.vpc_id)?;
            respond(&Ack::ok())
        }
        "CreateSubnet" => {
            let subnet = backend.create_subnet(parse(params)?)?;
            respond(&CreateSubnetOutput { subnet })
        }
        "DescribeSubnets" => {
            let input: DescribeSubnetsInput = parse(params)?;
            let subnets = backend.describe_subnets(&input.subnet_ids, &input.filters)?;
            respond(&DescribeSubnetsOutput { subnets })
        }
        "DeleteSubnet" => {
            let input: DeleteSubnetInput = parse(params)?;
            backend.delete_subnet(&input.subnet_id)?;
            respond(&Ack::ok())
        }
        "CreateSecurityGroup" => {
            let group = backend.create_security_group(parse(params)?)?;
            respond(&CreateSecurityGroupOutput { group_id: group.group_id })
        }
        "DescribeSecurityGroups" => {
            let input: DescribeSecurityGroupsInput = parse(params)?;
            let security_groups = backend.describe_security_groups(&input.group_ids)?;
            respond(&DescribeSecurityGroupsOutput { security_groups })
        }
        "DeleteSecurityGroup" => {
            let input: DeleteSecurityGroupInput = parse(params)?;
            backend.delete_security_group(&input.group_id)?;
            respond(&Ack::ok())
        }
        "CreateTags" => {
            let input: CreateTagsInput = parse(params)?;
            backend.create_tags(&input.resources, &input.tags)?;
            respond(&Ack::ok())
        }
        "DeleteTags" => {
            let input: DeleteTagsInput = parse(params)?;
            backend.delete_tags(&input.resources, &input.tags)?;
            respond(&Ack::ok())
        }
        other => Err(ServiceError::unknown_operation(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ec2::tests::backend;
    use serde_json::json;

    #[test]
    fn test_dispatch_round_trip() {
        let mut ec2 = backend();
        let out = dispatch(&mut ec2, "CreateVpc", json!({"CidrBlock": "10.0.0.0/16"})).unwrap();
        let vpc_id = out["Vpc"]["VpcId"].as_str().unwrap().to_string();
        assert_eq!(out["Vpc"]["CidrBlock"], "10.0.0.0/16");

        let err = dispatch(&mut ec2, "CreateSubnet", json!({"VpcId": "vpc-nope", "CidrBlock": "10.0.0.0/24"}))
            .unwrap_err();
        assert_eq!(err.code, "InvalidVpcID.NotFound");
        assert_eq!(err.message, "The vpc ID 'vpc-nope' does not exist");

        dispatch(&mut ec2, "CreateTags", json!({"Resources": [vpc_id], "Tags": [{"Key": "env", "Value": "dev"}]}))
            .unwrap();
        let out = dispatch(&mut ec2, "DescribeVpcs", Value::Null).unwrap();
        assert_eq!(out["Vpcs"][0]["Tags"][0]["Key"], "env");

        assert_eq!(dispatch(&mut ec2, "RunInstances", Value::Null).unwrap_err().code, "InvalidAction");
    }
}
