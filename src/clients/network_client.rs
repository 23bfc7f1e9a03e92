use tracing::instrument;

use crate::clients::ApiClient;
use crate::framework::{ServiceClient, ServiceError};
use crate::lifecycle::Service;
use crate::model::ec2::*;

/// Client for the network service of one region.
#[derive(Clone)]
pub struct NetworkClient {
    inner: ServiceClient<Service>,
}

impl NetworkClient {
    pub fn new(inner: ServiceClient<Service>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn create_vpc(&self, cidr_block: &str) -> Result<Vpc, ServiceError> {
        let input = CreateVpcInput {
            cidr_block: cidr_block.to_string(),
        };
        let output: CreateVpcOutput = self.call("CreateVpc", &input).await?;
        Ok(output.vpc)
    }

    #[instrument(skip(self))]
    pub async fn create_subnet(&self, vpc_id: &str, cidr_block: &str, availability_zone: &str) -> Result<Subnet, ServiceError> {
        let input = CreateSubnetInput {
            vpc_id: vpc_id.to_string(),
            cidr_block: cidr_block.to_string(),
            availability_zone: Some(availability_zone.to_string()),
        };
        let output: CreateSubnetOutput = self.call("CreateSubnet", &input).await?;
        Ok(output.subnet)
    }

    #[instrument(skip(self))]
    pub async fn create_security_group(&self, vpc_id: &str, group_name: &str) -> Result<String, ServiceError> {
        let input = CreateSecurityGroupInput {
            group_name: group_name.to_string(),
            description: group_name.to_string(),
            vpc_id: vpc_id.to_string(),
        };
        let output: CreateSecurityGroupOutput = self.call("CreateSecurityGroup", &input).await?;
        Ok(output.group_id)
    }

    #[instrument(skip(self))]
    pub async fn describe_subnets(&self, subnet_ids: Vec<String>) -> Result<Vec<Tagged<Subnet>>, ServiceError> {
        let input = DescribeSubnetsInput {
            subnet_ids,
            filters: Vec::new(),
        };
        let output: DescribeSubnetsOutput = self.call("DescribeSubnets", &input).await?;
        Ok(output.subnets)
    }
}

impl ApiClient for NetworkClient {
    const SERVICE: Service = Service::Ec2;

    fn inner(&self) -> &ServiceClient<Service> {
        &self.inner
    }
}
