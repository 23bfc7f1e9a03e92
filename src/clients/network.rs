//! Cross-service network lookups.
//!
//! Backends that reference network resources (directories need subnets, resolver
//! endpoints need subnets and security groups, rule associations need VPCs)
//! depend on the narrow [`NetworkResolver`] trait rather than on the network
//! backend itself.
//!
//! Failures come back as the network service's own [`Ec2Error`]. Callers must
//! relabel them into their own taxonomy before they reach the boundary.

use std::collections::BTreeSet;

use tracing::debug;

use crate::ec2::{Ec2Backend, Ec2Error};
use crate::model::ec2::{SecurityGroup, Subnet, Vpc};

pub trait NetworkResolver {
    fn vpc(&self, vpc_id: &str) -> Result<Vpc, Ec2Error>;

    fn subnet(&self, subnet_id: &str) -> Result<Subnet, Ec2Error>;

    fn security_group(&self, group_id: &str) -> Result<SecurityGroup, Ec2Error>;

    /// Resolves every id, failing on the first unknown one.
    fn subnets(&self, subnet_ids: &[String]) -> Result<Vec<Subnet>, Ec2Error> {
        subnet_ids.iter().map(|id| self.subnet(id)).collect()
    }

    /// How many distinct availability zones the given subnets cover.
    fn distinct_availability_zones(&self, subnet_ids: &[String]) -> Result<usize, Ec2Error> {
        let subnets = self.subnets(subnet_ids)?;
        let zones: BTreeSet<&str> = subnets.iter().map(|s| s.availability_zone.as_str()).collect();
        Ok(zones.len())
    }
}

/// Reads straight from the network backend of the same (account, region).
///
/// Holds only a borrow, so every lookup sees the registry as it is right now.
pub struct Ec2Resolver<'a> {
    backend: &'a Ec2Backend,
}

impl<'a> Ec2Resolver<'a> {
    pub fn new(backend: &'a Ec2Backend) -> Self {
        Self { backend }
    }
}

impl NetworkResolver for Ec2Resolver<'_> {
    fn vpc(&self, vpc_id: &str) -> Result<Vpc, Ec2Error> {
        debug!(%vpc_id, "Resolve vpc");
        self.backend.get_vpc(vpc_id).cloned()
    }

    fn subnet(&self, subnet_id: &str) -> Result<Subnet, Ec2Error> {
        debug!(%subnet_id, "Resolve subnet");
        self.backend.get_subnet(subnet_id).cloned()
    }

    fn security_group(&self, group_id: &str) -> Result<SecurityGroup, Ec2Error> {
        debug!(%group_id, "Resolve security group");
        self.backend.get_security_group(group_id).cloned()
    }
}
