//! Network service backend: VPCs, subnets and security groups.
//!
//! This is the registry the other backends resolve references against, through
//! [`NetworkResolver`](crate::clients::NetworkResolver). It is also a service in
//! its own right, reachable via [`dispatch`].

pub mod dispatch;
pub mod entity;
pub mod error;

pub use dispatch::dispatch;
pub use error::*;

use chrono::Utc;
use ipnetwork::Ipv4Network;
use tracing::{debug, info};

use crate::framework::{random_hex, ResourceRegistry, Scope, Tag, TaggingService};
use crate::model::ec2::{
    CreateSecurityGroupInput, CreateSubnetInput, CreateVpcInput, Filter, SecurityGroup, Subnet,
    Tagged, Vpc, RESERVED_ADDRESSES,
};

/// Smallest and largest prefix a VPC or subnet may use.
const PREFIX_RANGE: std::ops::RangeInclusive<u8> = 16..=28;

#[derive(Debug)]
pub struct Ec2Backend {
    scope: Scope,
    vpcs: ResourceRegistry<Vpc>,
    subnets: ResourceRegistry<Subnet>,
    security_groups: ResourceRegistry<SecurityGroup>,
    tagger: TaggingService,
}

fn parse_cidr(cidr: &str) -> Result<Ipv4Network, Ec2Error> {
    let network: Ipv4Network = cidr
        .contains('/')
        .then(|| cidr.parse().ok())
        .flatten()
        .ok_or_else(|| Ec2Error::InvalidCidr(cidr.to_string()))?;
    if network.ip() != network.network() {
        return Err(Ec2Error::InvalidCidr(cidr.to_string()));
    }
    Ok(network)
}

fn overlaps(a: &Ipv4Network, b: &Ipv4Network) -> bool {
    a.contains(b.network()) || b.contains(a.network())
}

impl Ec2Backend {
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            vpcs: ResourceRegistry::new(),
            subnets: ResourceRegistry::new(),
            security_groups: ResourceRegistry::new(),
            tagger: TaggingService::new(),
        }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    // --- VPCs ---

    pub fn create_vpc(&mut self, input: CreateVpcInput) -> Result<Vpc, Ec2Error> {
        debug!(?input, "CreateVpc");
        let cidr_block = parse_cidr(&input.cidr_block)?;
        if !PREFIX_RANGE.contains(&cidr_block.prefix()) {
            return Err(Ec2Error::VpcRange(input.cidr_block));
        }
        let vpc = Vpc {
            vpc_id: self.vpcs.generate_id(|| format!("vpc-{}", random_hex(17))),
            cidr_block,
            state: "available".to_string(),
            owner_id: self.scope.account_id.clone(),
            is_default: false,
            create_time: Utc::now(),
        };
        let id = self.vpcs.insert(vpc.clone());
        info!(kind = "vpc", %id, size = self.vpcs.len(), "Created");
        Ok(vpc)
    }

    pub fn get_vpc(&self, vpc_id: &str) -> Result<&Vpc, Ec2Error> {
        self.vpcs
            .get(vpc_id)
            .ok_or_else(|| Ec2Error::VpcNotFound(vpc_id.to_string()))
    }

    /// All VPCs, or exactly the requested ones (each must exist).
    pub fn describe_vpcs(&self, vpc_ids: &[String]) -> Result<Vec<Tagged<Vpc>>, Ec2Error> {
        let vpcs: Vec<&Vpc> = if vpc_ids.is_empty() {
            self.vpcs.iter().collect()
        } else {
            vpc_ids.iter().map(|id| self.get_vpc(id)).collect::<Result<_, _>>()?
        };
        Ok(vpcs.into_iter().map(|v| self.tagged(v.clone(), &v.vpc_id)).collect())
    }

    pub fn delete_vpc(&mut self, vpc_id: &str) -> Result<(), Ec2Error> {
        self.get_vpc(vpc_id)?;
        let dependents = self.subnets.count(|s| s.vpc_id == vpc_id)
            + self.security_groups.count(|g| g.vpc_id == vpc_id);
        if dependents > 0 {
            return Err(Ec2Error::DependencyViolation(vpc_id.to_string()));
        }
        self.vpcs.remove(vpc_id);
        self.tagger.delete_all_tags_for_resource(vpc_id);
        info!(kind = "vpc", id = %vpc_id, size = self.vpcs.len(), "Deleted");
        Ok(())
    }

    // --- Subnets ---

    pub fn create_subnet(&mut self, input: CreateSubnetInput) -> Result<Subnet, Ec2Error> {
        debug!(?input, "CreateSubnet");
        let vpc_cidr = self.get_vpc(&input.vpc_id)?.cidr_block;
        let cidr_block = parse_cidr(&input.cidr_block)?;
        if !PREFIX_RANGE.contains(&cidr_block.prefix())
            || cidr_block.prefix() < vpc_cidr.prefix()
            || !vpc_cidr.contains(cidr_block.network())
        {
            return Err(Ec2Error::SubnetRange(input.cidr_block));
        }
        let conflict = self
            .subnets
            .find(|s| s.vpc_id == input.vpc_id && overlaps(&s.cidr_block, &cidr_block));
        if conflict.is_some() {
            return Err(Ec2Error::SubnetConflict(input.cidr_block));
        }

        let zones = self.scope.availability_zones();
        let availability_zone = match input.availability_zone {
            Some(zone) if zones.contains(&zone) => zone,
            Some(zone) => {
                return Err(Ec2Error::InvalidAvailabilityZone {
                    zone,
                    valid: zones.join(", "),
                })
            }
            None => zones[0].clone(),
        };

        let hosts = 1u32 << (32 - u32::from(cidr_block.prefix()));
        let subnet = Subnet {
            subnet_id: self.subnets.generate_id(|| format!("subnet-{}", random_hex(17))),
            vpc_id: input.vpc_id,
            cidr_block,
            availability_zone,
            available_ip_address_count: hosts - RESERVED_ADDRESSES,
            state: "available".to_string(),
            owner_id: self.scope.account_id.clone(),
        };
        let id = self.subnets.insert(subnet.clone());
        info!(kind = "subnet", %id, size = self.subnets.len(), "Created");
        Ok(subnet)
    }

    pub fn get_subnet(&self, subnet_id: &str) -> Result<&Subnet, Ec2Error> {
        self.subnets
            .get(subnet_id)
            .ok_or_else(|| Ec2Error::SubnetNotFound(subnet_id.to_string()))
    }

    /// Supports the `vpc-id` and `availability-zone` filters; other names match nothing.
    pub fn describe_subnets(
        &self,
        subnet_ids: &[String],
        filters: &[Filter],
    ) -> Result<Vec<Tagged<Subnet>>, Ec2Error> {
        let subnets: Vec<&Subnet> = if subnet_ids.is_empty() {
            self.subnets.iter().collect()
        } else {
            subnet_ids.iter().map(|id| self.get_subnet(id)).collect::<Result<_, _>>()?
        };
        let matches_filters = |s: &Subnet| {
            filters.iter().all(|f| match f.name.as_str() {
                "vpc-id" => f.values.contains(&s.vpc_id),
                "availability-zone" => f.values.contains(&s.availability_zone),
                _ => false,
            })
        };
        Ok(subnets
            .into_iter()
            .filter(|s| matches_filters(s))
            .map(|s| self.tagged(s.clone(), &s.subnet_id))
            .collect())
    }

    pub fn delete_subnet(&mut self, subnet_id: &str) -> Result<(), Ec2Error> {
        self.subnets
            .remove(subnet_id)
            .ok_or_else(|| Ec2Error::SubnetNotFound(subnet_id.to_string()))?;
        self.tagger.delete_all_tags_for_resource(subnet_id);
        info!(kind = "subnet", id = %subnet_id, size = self.subnets.len(), "Deleted");
        Ok(())
    }

    // --- Security groups ---

    pub fn create_security_group(
        &mut self,
        input: CreateSecurityGroupInput,
    ) -> Result<SecurityGroup, Ec2Error> {
        debug!(?input, "CreateSecurityGroup");
        self.get_vpc(&input.vpc_id)?;
        let duplicate = self
            .security_groups
            .find(|g| g.vpc_id == input.vpc_id && g.group_name == input.group_name);
        if duplicate.is_some() {
            return Err(Ec2Error::DuplicateSecurityGroup {
                name: input.group_name,
                vpc_id: input.vpc_id,
            });
        }
        let group = SecurityGroup {
            group_id: self.security_groups.generate_id(|| format!("sg-{}", random_hex(17))),
            group_name: input.group_name,
            description: input.description,
            vpc_id: input.vpc_id,
            owner_id: self.scope.account_id.clone(),
        };
        let id = self.security_groups.insert(group.clone());
        info!(kind = "security_group", %id, size = self.security_groups.len(), "Created");
        Ok(group)
    }

    pub fn get_security_group(&self, group_id: &str) -> Result<&SecurityGroup, Ec2Error> {
        self.security_groups
            .get(group_id)
            .ok_or_else(|| Ec2Error::SecurityGroupNotFound(group_id.to_string()))
    }

    pub fn describe_security_groups(
        &self,
        group_ids: &[String],
    ) -> Result<Vec<Tagged<SecurityGroup>>, Ec2Error> {
        let groups: Vec<&SecurityGroup> = if group_ids.is_empty() {
            self.security_groups.iter().collect()
        } else {
            group_ids
                .iter()
                .map(|id| self.get_security_group(id))
                .collect::<Result<_, _>>()?
        };
        Ok(groups.into_iter().map(|g| self.tagged(g.clone(), &g.group_id)).collect())
    }

    pub fn delete_security_group(&mut self, group_id: &str) -> Result<(), Ec2Error> {
        self.security_groups
            .remove(group_id)
            .ok_or_else(|| Ec2Error::SecurityGroupNotFound(group_id.to_string()))?;
        self.tagger.delete_all_tags_for_resource(group_id);
        info!(kind = "security_group", id = %group_id, size = self.security_groups.len(), "Deleted");
        Ok(())
    }

    // --- Tags ---

    fn ensure_taggable(&self, resource_id: &str) -> Result<(), Ec2Error> {
        if self.vpcs.contains(resource_id)
            || self.subnets.contains(resource_id)
            || self.security_groups.contains(resource_id)
        {
            Ok(())
        } else {
            Err(Ec2Error::InvalidId(resource_id.to_string()))
        }
    }

    pub fn create_tags(&mut self, resource_ids: &[String], tags: &[Tag]) -> Result<(), Ec2Error> {
        for id in resource_ids {
            self.ensure_taggable(id)?;
        }
        for id in resource_ids {
            self.tagger.tag_resource(id, tags);
        }
        Ok(())
    }

    pub fn delete_tags(&mut self, resource_ids: &[String], tags: &[Tag]) -> Result<(), Ec2Error> {
        for id in resource_ids {
            self.ensure_taggable(id)?;
        }
        for id in resource_ids {
            if tags.is_empty() {
                self.tagger.delete_all_tags_for_resource(id);
            } else {
                let keys: Vec<String> = tags.iter().map(|t| t.key.clone()).collect();
                self.tagger.untag_resource_using_names(id, &keys);
            }
        }
        Ok(())
    }

    fn tagged<T>(&self, resource: T, id: &str) -> Tagged<T> {
        Tagged {
            resource,
            tags: self.tagger.list_tags_for_resource(id),
        }
    }
}
