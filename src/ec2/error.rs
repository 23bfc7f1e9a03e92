//! Error types for the network service.

use thiserror::Error;

use crate::framework::ErrorCode;

/// Errors raised by the network backend. These are the "foreign" errors other
/// services see through the network resolver and must relabel.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum Ec2Error {
    #[error("The vpc ID '{0}' does not exist")]
    VpcNotFound(String),

    #[error("The subnet ID '{0}' does not exist")]
    SubnetNotFound(String),

    #[error("The security group '{0}' does not exist")]
    SecurityGroupNotFound(String),

    #[error("The security group '{name}' already exists for VPC '{vpc_id}'")]
    DuplicateSecurityGroup { name: String, vpc_id: String },

    #[error("Value ({0}) for parameter cidrBlock is invalid. This is not a valid CIDR block.")]
    InvalidCidr(String),

    #[error("Value ({zone}) for parameter availabilityZone is invalid. Subnets can currently only be created in the following availability zones: {valid}.")]
    InvalidAvailabilityZone { zone: String, valid: String },

    #[error("The CIDR '{0}' is invalid.")]
    VpcRange(String),

    #[error("The CIDR '{0}' is invalid.")]
    SubnetRange(String),

    #[error("The CIDR '{0}' conflicts with another subnet")]
    SubnetConflict(String),

    #[error("The vpc '{0}' has dependencies and cannot be deleted.")]
    DependencyViolation(String),

    #[error("The ID '{0}' is not valid")]
    InvalidId(String),
}

impl ErrorCode for Ec2Error {
    fn code(&self) -> &'static str {
        match self {
            Ec2Error::VpcNotFound(_) => "InvalidVpcID.NotFound",
            Ec2Error::SubnetNotFound(_) => "InvalidSubnetID.NotFound",
            Ec2Error::SecurityGroupNotFound(_) => "InvalidGroup.NotFound",
            Ec2Error::DuplicateSecurityGroup { .. } => "InvalidGroup.Duplicate",
            Ec2Error::InvalidCidr(_) | Ec2Error::InvalidAvailabilityZone { .. } => "InvalidParameterValue",
            Ec2Error::VpcRange(_) => "InvalidVpc.Range",
            Ec2Error::SubnetRange(_) => "InvalidSubnet.Range",
            Ec2Error::SubnetConflict(_) => "InvalidSubnet.Conflict",
            Ec2Error::DependencyViolation(_) => "DependencyViolation",
            Ec2Error::InvalidId(_) => "InvalidID",
        }
    }
}
