//! DNS resolver backend: endpoints, forwarding rules and rule-to-VPC associations.
//!
//! Endpoints reference subnets and security groups, associations reference VPCs;
//! all of them are looked up through the [`NetworkResolver`] of the same region.
//! Tags are keyed by ARN.

pub mod dispatch;
pub mod entity;
pub mod error;
pub mod validations;

pub use dispatch::dispatch;
pub use error::*;

use std::collections::HashSet;
use std::net::Ipv4Addr;

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::clients::NetworkResolver;
use crate::framework::tagging::validate_tags;
use crate::framework::validation::Validator;
use crate::framework::{paginate, random_hex, Resource, ResourceRegistry, Scope, Tag, TaggingService};
use crate::model::ec2::Subnet;
use crate::model::route53resolver::*;
use validations::*;

const DEFAULT_MAX_RESULTS: u32 = 10;
const MAX_SECURITY_GROUPS: usize = 10;
const MIN_IP_ADDRESSES: usize = 2;

const ENDPOINT_FILTERS: &[&str] = &[
    "CreatorRequestId",
    "Direction",
    "HostVPCId",
    "IpAddressCount",
    "Name",
    "SecurityGroupIds",
    "Status",
];
const RULE_FILTERS: &[&str] = &[
    "CreatorRequestId",
    "DomainName",
    "Name",
    "ResolverEndpointId",
    "Status",
    "RuleType",
];
const ASSOCIATION_FILTERS: &[&str] = &["Name", "ResolverRuleId", "Status", "VPCId"];

/// Keeps records whose serialized field named by each filter holds one of its values.
fn apply_filters<T: Serialize + Clone>(
    records: Vec<&T>,
    filters: &[Filter],
    allowed: &[&str],
) -> Result<Vec<T>, ResolverError> {
    if let Some(bad) = filters.iter().find(|f| !allowed.contains(&f.name.as_str())) {
        return Err(ResolverError::InvalidParameter(format!(
            "The filter '{}' is invalid",
            bad.name
        )));
    }
    let field_matches = |value: &Value, wanted: &[String]| match value {
        Value::String(s) => wanted.contains(s),
        Value::Number(n) => wanted.contains(&n.to_string()),
        Value::Array(items) => items
            .iter()
            .any(|item| item.as_str().is_some_and(|s| wanted.iter().any(|w| w == s))),
        _ => false,
    };
    Ok(records
        .into_iter()
        .filter(|record| {
            let json = serde_json::to_value(record).unwrap_or_default();
            filters
                .iter()
                .all(|f| json.get(&f.name).is_some_and(|value| field_matches(value, &f.values)))
        })
        .cloned()
        .collect())
}

fn parse_ip(ip: &str, subnet_id: &str) -> Result<Ipv4Addr, ResolverError> {
    ip.parse().map_err(|_| out_of_subnet(ip, subnet_id))
}

fn out_of_subnet(ip: &str, subnet_id: &str) -> ResolverError {
    ResolverError::InvalidRequest(format!(
        "IP address '{ip}' is either not in subnet '{subnet_id}' CIDR range or is reserved"
    ))
}

#[derive(Debug)]
pub struct ResolverBackend {
    scope: Scope,
    quotas: ResolverQuotas,
    endpoints: ResourceRegistry<ResolverEndpoint>,
    rules: ResourceRegistry<ResolverRule>,
    associations: ResourceRegistry<ResolverRuleAssociation>,
    tagger: TaggingService,
}

impl ResolverBackend {
    pub fn new(scope: Scope, quotas: ResolverQuotas) -> Self {
        Self {
            scope,
            quotas,
            endpoints: ResourceRegistry::new(),
            rules: ResourceRegistry::new(),
            associations: ResourceRegistry::new(),
            tagger: TaggingService::new(),
        }
    }

    fn limit_exceeded(&self, quota: &'static str) -> ResolverError {
        ResolverError::LimitExceeded {
            account: self.scope.account_id.clone(),
            quota,
        }
    }

    // --- Endpoints ---

    /// Every address held by any endpoint, as `(subnet, ip)` pairs.
    fn taken_addresses(&self) -> HashSet<(String, String)> {
        self.endpoints
            .iter()
            .flat_map(|e| e.ip_addresses.iter())
            .map(|a| (a.subnet_id.clone(), a.ip.clone()))
            .collect()
    }

    /// Resolves the subnet and settles the address: a requested one must be a free
    /// host address of the subnet, a missing one is the first free host address.
    fn assign_address(
        &self,
        network: &dyn NetworkResolver,
        request: &IpAddressRequest,
        taken: &mut HashSet<(String, String)>,
    ) -> Result<(Subnet, String), ResolverError> {
        let subnet = network.subnet(&request.subnet_id).map_err(|e| {
            debug!(error = %e, "Subnet lookup failed");
            ResolverError::InvalidParameter(format!("The subnet ID '{}' does not exist", request.subnet_id))
        })?;
        let ip = match &request.ip {
            Some(ip) => {
                if !subnet.is_usable(parse_ip(ip, &subnet.subnet_id)?) {
                    return Err(out_of_subnet(ip, &subnet.subnet_id));
                }
                ip.clone()
            }
            None => subnet
                .usable_hosts()
                .map(|ip| ip.to_string())
                .find(|ip| !taken.contains(&(subnet.subnet_id.clone(), ip.clone())))
                .ok_or_else(|| {
                    ResolverError::InvalidRequest(format!(
                        "Subnet '{}' has no free IP addresses",
                        subnet.subnet_id
                    ))
                })?,
        };
        if !taken.insert((subnet.subnet_id.clone(), ip.clone())) {
            return Err(ResolverError::ResourceExists(format!(
                "The IP address '{ip}' in subnet '{}' is already in use",
                subnet.subnet_id
            )));
        }
        Ok((subnet, ip))
    }

    fn address_record(subnet_id: &str, ip: String) -> IpAddressResponse {
        let now = Utc::now();
        IpAddressResponse {
            ip_id: format!("rni-{}", random_hex(17)),
            subnet_id: subnet_id.to_string(),
            ip,
            status: "ATTACHED".to_string(),
            status_message: "This IP address is operational.".to_string(),
            creation_time: now,
            modification_time: now,
        }
    }

    fn verify_security_groups(
        network: &dyn NetworkResolver,
        security_group_ids: &[String],
    ) -> Result<(), ResolverError> {
        if security_group_ids.len() > MAX_SECURITY_GROUPS {
            return Err(ResolverError::InvalidParameter(
                "Maximum of 10 security groups are allowed".to_string(),
            ));
        }
        for group_id in security_group_ids {
            if !group_id.starts_with("sg-") {
                return Err(ResolverError::InvalidParameter(format!(
                    "Malformed security group ID: Invalid id: '{group_id}' (expecting 'sg-...')"
                )));
            }
            network.security_group(group_id).map_err(|_| {
                ResolverError::ResourceNotFound(format!("The security group '{group_id}' does not exist"))
            })?;
        }
        Ok(())
    }

    pub fn create_resolver_endpoint(
        &mut self,
        input: &CreateResolverEndpointInput,
        network: &dyn NetworkResolver,
    ) -> Result<ResolverEndpoint, ResolverError> {
        debug!(?input, "CreateResolverEndpoint");
        let mut v = Validator::new();
        check_endpoint_inputs(
            &mut v,
            &input.creator_request_id,
            &input.direction,
            &input.ip_addresses,
            input.name.as_deref(),
            &input.security_group_ids,
        );
        v.finish()?;
        validate_tags(&input.tags, self.quotas.tags_per_resource)?;

        if self.endpoints.len() >= self.quotas.endpoints {
            return Err(self.limit_exceeded("max-endpoints"));
        }
        if input.ip_addresses.len() < MIN_IP_ADDRESSES {
            return Err(ResolverError::InvalidRequest(
                "Resolver endpoint needs to have at least 2 IP addresses".to_string(),
            ));
        }
        let mut taken = self.taken_addresses();
        let mut host_vpc_id = None;
        let mut ip_addresses = Vec::with_capacity(input.ip_addresses.len());
        for request in &input.ip_addresses {
            let (subnet, ip) = self.assign_address(network, request, &mut taken)?;
            host_vpc_id.get_or_insert_with(|| subnet.vpc_id.clone());
            ip_addresses.push(Self::address_record(&subnet.subnet_id, ip));
        }
        Self::verify_security_groups(network, &input.security_group_ids)?;
        if self
            .endpoints
            .find(|e| e.creator_request_id == input.creator_request_id)
            .is_some()
        {
            return Err(ResolverError::ResourceExists(format!(
                "Resolver endpoint with creator request ID '{}' already exists",
                input.creator_request_id
            )));
        }

        let direction = if input.direction == INBOUND { "in" } else { "out" };
        let id = self
            .endpoints
            .generate_id(|| format!("rslvr-{direction}-{}", random_hex(17)));
        let now = Utc::now();
        let endpoint = ResolverEndpoint {
            arn: self.scope.arn("route53resolver", &format!("resolver-endpoint/{id}")),
            id: id.clone(),
            creator_request_id: input.creator_request_id.clone(),
            name: input.name.clone(),
            security_group_ids: input.security_group_ids.clone(),
            direction: input.direction.clone(),
            ip_address_count: ip_addresses.len(),
            host_vpc_id: host_vpc_id.unwrap_or_default(),
            status: "OPERATIONAL".to_string(),
            status_message: "This Resolver Endpoint is operational.".to_string(),
            creation_time: now,
            modification_time: now,
            ip_addresses,
        };
        self.tagger.tag_resource(&endpoint.arn, &input.tags);
        self.endpoints.insert(endpoint.clone());
        info!(kind = ResolverEndpoint::KIND, %id, size = self.endpoints.len(), "Created");
        Ok(endpoint)
    }

    fn check_endpoint_id(resolver_endpoint_id: &str) -> Result<(), ResolverError> {
        let mut v = Validator::new();
        check_id(&mut v, "resolverEndpointId", resolver_endpoint_id);
        Ok(v.finish()?)
    }

    pub fn get_resolver_endpoint(&self, resolver_endpoint_id: &str) -> Result<&ResolverEndpoint, ResolverError> {
        Self::check_endpoint_id(resolver_endpoint_id)?;
        self.endpoints
            .get(resolver_endpoint_id)
            .ok_or_else(|| ResolverError::endpoint_not_found(resolver_endpoint_id))
    }

    fn endpoint_mut(&mut self, resolver_endpoint_id: &str) -> Result<&mut ResolverEndpoint, ResolverError> {
        Self::check_endpoint_id(resolver_endpoint_id)?;
        self.endpoints
            .get_mut(resolver_endpoint_id)
            .ok_or_else(|| ResolverError::endpoint_not_found(resolver_endpoint_id))
    }

    pub fn update_resolver_endpoint(
        &mut self,
        input: &UpdateResolverEndpointInput,
    ) -> Result<ResolverEndpoint, ResolverError> {
        let mut v = Validator::new();
        check_id(&mut v, "resolverEndpointId", &input.resolver_endpoint_id);
        check_name(&mut v, input.name.as_deref());
        v.finish()?;
        let endpoint = self.endpoint_mut(&input.resolver_endpoint_id)?;
        if input.name.is_some() {
            endpoint.name = input.name.clone();
        }
        endpoint.modification_time = Utc::now();
        info!(kind = ResolverEndpoint::KIND, id = %input.resolver_endpoint_id, "Updated");
        Ok(endpoint.clone())
    }

    /// Returns the endpoint as it was at the moment of deletion, in `DELETING` state.
    pub fn delete_resolver_endpoint(&mut self, resolver_endpoint_id: &str) -> Result<ResolverEndpoint, ResolverError> {
        self.get_resolver_endpoint(resolver_endpoint_id)?;
        let dependents: Vec<&str> = self
            .rules
            .list(|r| r.resolver_endpoint_id.as_deref() == Some(resolver_endpoint_id))
            .into_iter()
            .map(|r| r.id.as_str())
            .collect();
        if !dependents.is_empty() {
            return Err(ResolverError::InvalidRequest(format!(
                "Cannot delete resolver endpoint unless its related resolver rules are deleted. \
                 The following rules still use this resolver endpoint: {}",
                dependents.join(", ")
            )));
        }
        let mut endpoint = self
            .endpoints
            .remove(resolver_endpoint_id)
            .ok_or_else(|| ResolverError::endpoint_not_found(resolver_endpoint_id))?;
        self.tagger.delete_all_tags_for_resource(&endpoint.arn);
        endpoint.status = "DELETING".to_string();
        endpoint.status_message = "Deleting the Resolver Endpoint".to_string();
        info!(kind = ResolverEndpoint::KIND, id = %resolver_endpoint_id, size = self.endpoints.len(), "Deleted");
        Ok(endpoint)
    }

    pub fn list_resolver_endpoints(&self, input: &ListInput) -> Result<ListResolverEndpointsOutput, ResolverError> {
        let mut v = Validator::new();
        check_max_results(&mut v, input.max_results);
        v.finish()?;
        let max_results = input.max_results.unwrap_or(DEFAULT_MAX_RESULTS);
        let matching = apply_filters(self.endpoints.list(|_| true), &input.filters, ENDPOINT_FILTERS)?;
        let (resolver_endpoints, next_token) =
            paginate(&matching, input.next_token.as_deref(), max_results as usize)?;
        Ok(ListResolverEndpointsOutput {
            next_token,
            max_results,
            resolver_endpoints,
        })
    }

    pub fn list_resolver_endpoint_ip_addresses(
        &self,
        input: &ListResolverEndpointIpAddressesInput,
    ) -> Result<ListResolverEndpointIpAddressesOutput, ResolverError> {
        let mut v = Validator::new();
        check_max_results(&mut v, input.max_results);
        v.finish()?;
        let endpoint = self.get_resolver_endpoint(&input.resolver_endpoint_id)?;
        let max_results = input.max_results.unwrap_or(DEFAULT_MAX_RESULTS);
        let (ip_addresses, next_token) = paginate(
            &endpoint.ip_addresses,
            input.next_token.as_deref(),
            max_results as usize,
        )?;
        Ok(ListResolverEndpointIpAddressesOutput {
            next_token,
            max_results,
            ip_addresses,
        })
    }

    pub fn associate_resolver_endpoint_ip_address(
        &mut self,
        input: &EndpointIpAddressInput,
        network: &dyn NetworkResolver,
    ) -> Result<ResolverEndpoint, ResolverError> {
        let count = self.get_resolver_endpoint(&input.resolver_endpoint_id)?.ip_addresses.len();
        let subnet_id = input.ip_address.subnet_id.clone().ok_or_else(|| {
            ResolverError::InvalidRequest("[RSLVR-00503] Need to specify SubnetId.".to_string())
        })?;
        if count >= MAX_IP_ADDRESSES {
            return Err(self.limit_exceeded("max-ip-addresses-per-endpoint"));
        }
        let request = IpAddressRequest {
            subnet_id,
            ip: input.ip_address.ip.clone(),
        };
        let mut taken = self.taken_addresses();
        let (subnet, ip) = self.assign_address(network, &request, &mut taken)?;

        let endpoint = self.endpoint_mut(&input.resolver_endpoint_id)?;
        endpoint.ip_addresses.push(Self::address_record(&subnet.subnet_id, ip));
        endpoint.ip_address_count = endpoint.ip_addresses.len();
        endpoint.modification_time = Utc::now();
        info!(kind = ResolverEndpoint::KIND, id = %endpoint.id, size = endpoint.ip_address_count, "Address associated");
        Ok(endpoint.clone())
    }

    pub fn disassociate_resolver_endpoint_ip_address(
        &mut self,
        input: &EndpointIpAddressInput,
    ) -> Result<ResolverEndpoint, ResolverError> {
        let wanted = &input.ip_address;
        let endpoint = self.endpoint_mut(&input.resolver_endpoint_id)?;
        let position = endpoint.ip_addresses.iter().position(|a| match (&wanted.ip_id, &wanted.ip) {
            (Some(ip_id), _) => &a.ip_id == ip_id,
            (None, Some(ip)) => &a.ip == ip && wanted.subnet_id.as_ref().is_none_or(|s| &a.subnet_id == s),
            (None, None) => false,
        });
        let Some(position) = position else {
            let label = wanted.ip_id.as_ref().or(wanted.ip.as_ref()).cloned().unwrap_or_default();
            return Err(ResolverError::ResourceNotFound(format!(
                "The IP address '{label}' does not exist for resolver endpoint '{}'",
                endpoint.id
            )));
        };
        if endpoint.ip_addresses.len() <= MIN_IP_ADDRESSES {
            return Err(ResolverError::InvalidRequest(
                "The resolver endpoint needs to have at least 2 IP addresses".to_string(),
            ));
        }
        endpoint.ip_addresses.remove(position);
        endpoint.ip_address_count = endpoint.ip_addresses.len();
        endpoint.modification_time = Utc::now();
        info!(kind = ResolverEndpoint::KIND, id = %endpoint.id, size = endpoint.ip_address_count, "Address disassociated");
        Ok(endpoint.clone())
    }

    // --- Rules ---

    pub fn create_resolver_rule(&mut self, input: &CreateResolverRuleInput) -> Result<ResolverRule, ResolverError> {
        debug!(?input, "CreateResolverRule");
        let mut v = Validator::new();
        check_rule_inputs(
            &mut v,
            &input.creator_request_id,
            input.name.as_deref(),
            &input.rule_type,
            &input.domain_name,
            &input.target_ips,
            input.resolver_endpoint_id.as_deref(),
        );
        v.finish()?;
        validate_tags(&input.tags, self.quotas.tags_per_resource)?;

        if self.rules.len() >= self.quotas.rules {
            return Err(self.limit_exceeded("max-rules"));
        }
        if input.rule_type == "SYSTEM" && (!input.target_ips.is_empty() || input.resolver_endpoint_id.is_some()) {
            return Err(ResolverError::InvalidRequest(
                "Cannot specify TargetIps or ResolverEndpointId for SYSTEM rules".to_string(),
            ));
        }
        if let Some(bad) = input.target_ips.iter().find(|t| t.ip.parse::<Ipv4Addr>().is_err()) {
            return Err(ResolverError::InvalidParameter(format!(
                "Invalid IP address '{}' in TargetIps",
                bad.ip
            )));
        }
        if let Some(endpoint_id) = &input.resolver_endpoint_id {
            let endpoint = self.get_resolver_endpoint(endpoint_id)?;
            if endpoint.direction != OUTBOUND {
                return Err(ResolverError::InvalidRequest(
                    "Cannot associate rules with resolver endpoint of INBOUND direction".to_string(),
                ));
            }
        }
        if self
            .rules
            .find(|r| r.creator_request_id == input.creator_request_id)
            .is_some()
        {
            return Err(ResolverError::ResourceExists(format!(
                "Resolver rule with creator request ID '{}' already exists",
                input.creator_request_id
            )));
        }

        let id = self.rules.generate_id(|| format!("rslvr-rr-{}", random_hex(17)));
        let now = Utc::now();
        let rule = ResolverRule {
            arn: self.scope.arn("route53resolver", &format!("resolver-rule/{id}")),
            id: id.clone(),
            creator_request_id: input.creator_request_id.clone(),
            domain_name: input.domain_name.clone(),
            status: "COMPLETE".to_string(),
            status_message: "Successfully created Resolver Rule".to_string(),
            rule_type: input.rule_type.clone(),
            name: input.name.clone(),
            target_ips: input.target_ips.clone(),
            resolver_endpoint_id: input.resolver_endpoint_id.clone(),
            owner_id: self.scope.account_id.clone(),
            share_status: "NOT_SHARED".to_string(),
            creation_time: now,
            modification_time: now,
        };
        self.tagger.tag_resource(&rule.arn, &input.tags);
        self.rules.insert(rule.clone());
        info!(kind = ResolverRule::KIND, %id, size = self.rules.len(), "Created");
        Ok(rule)
    }

    pub fn get_resolver_rule(&self, resolver_rule_id: &str) -> Result<&ResolverRule, ResolverError> {
        let mut v = Validator::new();
        check_id(&mut v, "resolverRuleId", resolver_rule_id);
        v.finish()?;
        self.rules
            .get(resolver_rule_id)
            .ok_or_else(|| ResolverError::rule_not_found(resolver_rule_id))
    }

    pub fn delete_resolver_rule(&mut self, resolver_rule_id: &str) -> Result<ResolverRule, ResolverError> {
        self.get_resolver_rule(resolver_rule_id)?;
        if self
            .associations
            .find(|a| a.resolver_rule_id == resolver_rule_id)
            .is_some()
        {
            return Err(ResolverError::ResourceInUse(
                "Please disassociate this resolver rule from VPC first before deleting".to_string(),
            ));
        }
        let mut rule = self
            .rules
            .remove(resolver_rule_id)
            .ok_or_else(|| ResolverError::rule_not_found(resolver_rule_id))?;
        self.tagger.delete_all_tags_for_resource(&rule.arn);
        rule.status = "DELETING".to_string();
        rule.status_message = "Deleting Resolver Rule".to_string();
        info!(kind = ResolverRule::KIND, id = %resolver_rule_id, size = self.rules.len(), "Deleted");
        Ok(rule)
    }

    pub fn list_resolver_rules(&self, input: &ListInput) -> Result<ListResolverRulesOutput, ResolverError> {
        let mut v = Validator::new();
        check_max_results(&mut v, input.max_results);
        v.finish()?;
        let max_results = input.max_results.unwrap_or(DEFAULT_MAX_RESULTS);
        let matching = apply_filters(self.rules.list(|_| true), &input.filters, RULE_FILTERS)?;
        let (resolver_rules, next_token) = paginate(&matching, input.next_token.as_deref(), max_results as usize)?;
        Ok(ListResolverRulesOutput {
            next_token,
            max_results,
            resolver_rules,
        })
    }

    // --- Rule associations ---

    pub fn associate_resolver_rule(
        &mut self,
        input: &AssociateResolverRuleInput,
        network: &dyn NetworkResolver,
    ) -> Result<ResolverRuleAssociation, ResolverError> {
        debug!(?input, "AssociateResolverRule");
        let mut v = Validator::new();
        check_id(&mut v, "resolverRuleId", &input.resolver_rule_id);
        check_name(&mut v, input.name.as_deref());
        check_id(&mut v, "vPCId", &input.vpc_id);
        v.finish()?;

        self.get_resolver_rule(&input.resolver_rule_id)?;
        network.vpc(&input.vpc_id).map_err(|_| {
            ResolverError::InvalidParameter(format!("The vpc ID '{}' does not exist", input.vpc_id))
        })?;
        if self
            .associations
            .find(|a| a.resolver_rule_id == input.resolver_rule_id && a.vpc_id == input.vpc_id)
            .is_some()
        {
            return Err(ResolverError::InvalidRequest(format!(
                "The resolver rule '{}' is already associated with the VPC '{}'",
                input.resolver_rule_id, input.vpc_id
            )));
        }
        if self.associations.len() >= self.quotas.rule_associations {
            return Err(self.limit_exceeded("max-rule-association"));
        }

        let id = self
            .associations
            .generate_id(|| format!("rslvr-rrassoc-{}", random_hex(17)));
        let association = ResolverRuleAssociation {
            id: id.clone(),
            resolver_rule_id: input.resolver_rule_id.clone(),
            name: input.name.clone(),
            vpc_id: input.vpc_id.clone(),
            status: "COMPLETE".to_string(),
            status_message: String::new(),
        };
        self.associations.insert(association.clone());
        info!(kind = ResolverRuleAssociation::KIND, %id, size = self.associations.len(), "Created");
        Ok(association)
    }

    pub fn disassociate_resolver_rule(
        &mut self,
        input: &DisassociateResolverRuleInput,
    ) -> Result<ResolverRuleAssociation, ResolverError> {
        let mut v = Validator::new();
        check_id(&mut v, "vPCId", &input.vpc_id);
        check_id(&mut v, "resolverRuleId", &input.resolver_rule_id);
        v.finish()?;

        self.get_resolver_rule(&input.resolver_rule_id)?;
        let id = self
            .associations
            .find(|a| a.resolver_rule_id == input.resolver_rule_id && a.vpc_id == input.vpc_id)
            .map(|a| a.id.clone())
            .ok_or_else(|| {
                ResolverError::ResourceNotFound(format!(
                    "Resolver Rule Association between Resolver Rule '{}' and VPC '{}' does not exist",
                    input.resolver_rule_id, input.vpc_id
                ))
            })?;
        let mut association = self
            .associations
            .remove(&id)
            .ok_or_else(|| ResolverError::ResourceNotFound(format!("ResolverRuleAssociation '{id}' does not Exist")))?;
        association.status = "DELETING".to_string();
        association.status_message = "Deleting Association".to_string();
        info!(kind = ResolverRuleAssociation::KIND, %id, size = self.associations.len(), "Deleted");
        Ok(association)
    }

    pub fn get_resolver_rule_association(
        &self,
        resolver_rule_association_id: &str,
    ) -> Result<&ResolverRuleAssociation, ResolverError> {
        let mut v = Validator::new();
        check_id(&mut v, "resolverRuleAssociationId", resolver_rule_association_id);
        v.finish()?;
        self.associations.get(resolver_rule_association_id).ok_or_else(|| {
            ResolverError::ResourceNotFound(format!(
                "ResolverRuleAssociation '{resolver_rule_association_id}' does not Exist"
            ))
        })
    }

    pub fn list_resolver_rule_associations(
        &self,
        input: &ListInput,
    ) -> Result<ListResolverRuleAssociationsOutput, ResolverError> {
        let mut v = Validator::new();
        check_max_results(&mut v, input.max_results);
        v.finish()?;
        let max_results = input.max_results.unwrap_or(DEFAULT_MAX_RESULTS);
        let matching = apply_filters(self.associations.list(|_| true), &input.filters, ASSOCIATION_FILTERS)?;
        let (resolver_rule_associations, next_token) =
            paginate(&matching, input.next_token.as_deref(), max_results as usize)?;
        Ok(ListResolverRuleAssociationsOutput {
            next_token,
            max_results,
            resolver_rule_associations,
        })
    }

    // --- Tags ---

    fn ensure_arn(&self, resource_arn: &str) -> Result<(), ResolverError> {
        let known = self.endpoints.find(|e| e.arn == resource_arn).is_some()
            || self.rules.find(|r| r.arn == resource_arn).is_some();
        if known {
            Ok(())
        } else {
            Err(ResolverError::ResourceNotFound(format!(
                "Resolver endpoint with ID '{resource_arn}' does not exist"
            )))
        }
    }

    pub fn tag_resource(&mut self, resource_arn: &str, tags: &[Tag]) -> Result<(), ResolverError> {
        self.ensure_arn(resource_arn)?;
        validate_tags(tags, self.quotas.tags_per_resource)?;
        let existing = self.tagger.list_tags_for_resource(resource_arn);
        let added = tags.iter().filter(|t| !existing.iter().any(|e| e.key == t.key)).count();
        if existing.len() + added > self.quotas.tags_per_resource {
            return Err(self.limit_exceeded("max-tags-per-resource"));
        }
        self.tagger.tag_resource(resource_arn, tags);
        Ok(())
    }

    pub fn untag_resource(&mut self, resource_arn: &str, tag_keys: &[String]) -> Result<(), ResolverError> {
        self.ensure_arn(resource_arn)?;
        self.tagger.untag_resource_using_names(resource_arn, tag_keys);
        Ok(())
    }

    pub fn list_tags_for_resource(
        &self,
        input: &ListTagsForResourceInput,
    ) -> Result<ListTagsForResourceOutput, ResolverError> {
        let mut v = Validator::new();
        check_max_results(&mut v, input.max_results);
        v.finish()?;
        self.ensure_arn(&input.resource_arn)?;
        let tags = self.tagger.list_tags_for_resource(&input.resource_arn);
        let limit = input.max_results.map_or(tags.len(), |m| m as usize);
        let (tags, next_token) = paginate(&tags, input.next_token.as_deref(), limit)?;
        Ok(ListTagsForResourceOutput { tags, next_token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::Ec2Resolver;
    use crate::ec2::tests::{backend as ec2_backend, subnet, vpc};
    use crate::ec2::Ec2Backend;
    use crate::framework::mock::MockNetwork;
    use crate::framework::ErrorCode;
    use crate::model::ec2::CreateSecurityGroupInput;

    struct Fixture {
        ec2: Ec2Backend,
        resolver: ResolverBackend,
        vpc_id: String,
        subnets: Vec<String>,
        group_id: String,
    }

    fn fixture() -> Fixture {
        let mut ec2 = ec2_backend();
        let vpc = vpc(&mut ec2, "10.0.0.0/16");
        let a = subnet(&mut ec2, &vpc.vpc_id, "10.0.0.0/28", "us-west-2a");
        let b = subnet(&mut ec2, &vpc.vpc_id, "10.0.1.0/24", "us-west-2b");
        let group = ec2
            .create_security_group(CreateSecurityGroupInput {
                group_name: "resolver".into(),
                description: "resolver endpoints".into(),
                vpc_id: vpc.vpc_id.clone(),
            })
            .unwrap();
        let resolver = ResolverBackend::new(ec2.scope().clone(), ResolverQuotas::default());
        Fixture {
            ec2,
            resolver,
            vpc_id: vpc.vpc_id,
            subnets: vec![a.subnet_id, b.subnet_id],
            group_id: group.group_id,
        }
    }

    impl Fixture {
        fn endpoint_input(&self, request_id: &str) -> CreateResolverEndpointInput {
            CreateResolverEndpointInput {
                creator_request_id: request_id.into(),
                name: Some("my endpoint".into()),
                security_group_ids: vec![self.group_id.clone()],
                direction: OUTBOUND.into(),
                ip_addresses: self
                    .subnets
                    .iter()
                    .map(|s| IpAddressRequest {
                        subnet_id: s.clone(),
                        ip: None,
                    })
                    .collect(),
                tags: vec![],
            }
        }

        fn create(&mut self, input: &CreateResolverEndpointInput) -> Result<ResolverEndpoint, ResolverError> {
            self.resolver.create_resolver_endpoint(input, &Ec2Resolver::new(&self.ec2))
        }
    }

    #[test]
    fn test_create_resolver_endpoint() {
        let mut f = fixture();
        let mut input = f.endpoint_input("req-1");
        input.tags = vec![Tag::new("team", "dns")];
        let endpoint = f.create(&input).unwrap();

        assert!(endpoint.id.starts_with("rslvr-out-"));
        assert_eq!(endpoint.id.len(), "rslvr-out-".len() + 17);
        assert_eq!(
            endpoint.arn,
            format!("arn:aws:route53resolver:us-west-2:123456789012:resolver-endpoint/{}", endpoint.id)
        );
        assert_eq!(endpoint.host_vpc_id, f.vpc_id);
        assert_eq!(endpoint.status, "OPERATIONAL");
        assert_eq!(endpoint.ip_address_count, 2);
        assert_eq!(endpoint.ip_addresses[0].ip, "10.0.0.4");
        assert!(endpoint.ip_addresses[0].ip_id.starts_with("rni-"));
        assert_eq!(f.resolver.tagger.list_tags_for_resource(&endpoint.arn), input.tags);

        let json = serde_json::to_value(&endpoint).unwrap();
        assert_eq!(json["HostVPCId"], f.vpc_id.as_str());
        assert!(json.get("IpAddresses").is_none());

        let err = f.create(&input).unwrap_err();
        assert_eq!(err.code(), "ResourceExistsException");
    }

    #[test]
    fn test_endpoint_address_rules() {
        let mut f = fixture();
        let mut input = f.endpoint_input("req-1");
        input.ip_addresses.truncate(1);
        assert_eq!(
            f.create(&input).unwrap_err(),
            ResolverError::InvalidRequest("Resolver endpoint needs to have at least 2 IP addresses".into())
        );

        let mut input = f.endpoint_input("req-2");
        input.ip_addresses[0].ip = Some("10.0.0.15".into());
        let err = f.create(&input).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!(
                "IP address '10.0.0.15' is either not in subnet '{}' CIDR range or is reserved",
                f.subnets[0]
            )
        );

        let mut input = f.endpoint_input("req-3");
        input.ip_addresses[1].subnet_id = f.subnets[0].clone();
        input.ip_addresses[0].ip = Some("10.0.0.9".into());
        input.ip_addresses[1].ip = Some("10.0.0.9".into());
        assert_eq!(f.create(&input).unwrap_err().code(), "ResourceExistsException");

        let mut input = f.endpoint_input("req-4");
        input.ip_addresses[1].subnet_id = "subnet-0000000000".into();
        assert_eq!(
            f.create(&input).unwrap_err(),
            ResolverError::InvalidParameter("The subnet ID 'subnet-0000000000' does not exist".into())
        );
    }

    #[test]
    fn test_endpoint_security_group_rules() {
        let mut f = fixture();
        let mut input = f.endpoint_input("req-1");
        input.security_group_ids = vec!["foo".into()];
        let err = f.create(&input).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Malformed security group ID: Invalid id: 'foo' (expecting 'sg-...')"
        );

        input.security_group_ids = vec!["sg-0123".into()];
        let err = f.create(&input).unwrap_err();
        assert_eq!(err.code(), "ResourceNotFoundException");
        assert_eq!(err.to_string(), "The security group 'sg-0123' does not exist");

        input.security_group_ids = (0..11).map(|i| format!("sg-{i}")).collect();
        assert_eq!(
            f.create(&input).unwrap_err().to_string(),
            "Maximum of 10 security groups are allowed"
        );
    }

    #[test]
    fn test_endpoint_quota() {
        let mut f = fixture();
        for i in 0..4 {
            let input = f.endpoint_input(&format!("req-{i}"));
            f.create(&input).unwrap();
        }
        let input = f.endpoint_input("req-5");
        let err = f.create(&input).unwrap_err();
        assert_eq!(err.code(), "LimitExceededException");
        assert_eq!(err.to_string(), "Account '123456789012' has exceeded 'max-endpoints'");
    }

    #[test]
    fn test_validation_runs_before_network_lookups() {
        let mut resolver = ResolverBackend::new(Scope::new("123456789012", "us-east-1", "aws"), ResolverQuotas::default());
        let network = MockNetwork::new();
        let input = CreateResolverEndpointInput {
            creator_request_id: "req".into(),
            direction: "SIDEWAYS".into(),
            ip_addresses: vec![IpAddressRequest {
                subnet_id: "subnet-aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".into(),
                ip: None,
            }],
            ..Default::default()
        };
        let err = resolver.create_resolver_endpoint(&input, &network).unwrap_err();
        assert!(err.to_string().starts_with("2 validation errors detected"));
        assert!(err.to_string().contains("at 'ipAddresses.subnetId' failed to satisfy constraint: Member must have length less than or equal to 32"));
        network.verify();
    }

    #[test]
    fn test_delete_and_list_endpoints() {
        let mut f = fixture();
        let first = f.create(&f.endpoint_input("req-1")).unwrap();
        let mut inbound = f.endpoint_input("req-2");
        inbound.direction = INBOUND.into();
        let second = f.create(&inbound).unwrap();
        assert!(second.id.starts_with("rslvr-in-"));
        assert_eq!(second.ip_addresses[0].ip, "10.0.0.5");

        let listed = f
            .resolver
            .list_resolver_endpoints(&ListInput {
                filters: vec![Filter {
                    name: "Direction".into(),
                    values: vec![INBOUND.into()],
                }],
                ..Default::default()
            })
            .unwrap();
        assert_eq!(listed.resolver_endpoints.len(), 1);
        assert_eq!(listed.resolver_endpoints[0].id, second.id);
        assert_eq!(listed.max_results, 10);

        let err = f
            .resolver
            .list_resolver_endpoints(&ListInput {
                filters: vec![Filter {
                    name: "Color".into(),
                    values: vec![],
                }],
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(err.code(), "InvalidParameterException");

        let deleted = f.resolver.delete_resolver_endpoint(&first.id).unwrap();
        assert_eq!(deleted.status, "DELETING");
        assert_eq!(
            f.resolver.get_resolver_endpoint(&first.id).unwrap_err(),
            ResolverError::endpoint_not_found(&first.id)
        );
        assert_eq!(
            f.resolver.delete_resolver_endpoint(&first.id).unwrap_err().code(),
            "ResourceNotFoundException"
        );
    }

    #[test]
    fn test_endpoint_ip_address_association() {
        let mut f = fixture();
        let endpoint = f.create(&f.endpoint_input("req-1")).unwrap();
        let associate = EndpointIpAddressInput {
            resolver_endpoint_id: endpoint.id.clone(),
            ip_address: IpAddressUpdate {
                subnet_id: Some(f.subnets[1].clone()),
                ip: Some("10.0.1.200".into()),
                ip_id: None,
            },
        };
        let network = Ec2Resolver::new(&f.ec2);
        let updated = f.resolver.associate_resolver_endpoint_ip_address(&associate, &network).unwrap();
        assert_eq!(updated.ip_address_count, 3);

        let removed = f.resolver.disassociate_resolver_endpoint_ip_address(&associate).unwrap();
        assert_eq!(removed.ip_address_count, 2);
        let err = f.resolver.disassociate_resolver_endpoint_ip_address(&associate).unwrap_err();
        assert_eq!(err.code(), "ResourceNotFoundException");

        let last = EndpointIpAddressInput {
            resolver_endpoint_id: endpoint.id.clone(),
            ip_address: IpAddressUpdate {
                ip_id: Some(removed.ip_addresses[0].ip_id.clone()),
                ..Default::default()
            },
        };
        assert_eq!(
            f.resolver.disassociate_resolver_endpoint_ip_address(&last).unwrap_err().code(),
            "InvalidRequestException"
        );

        let listed = f
            .resolver
            .list_resolver_endpoint_ip_addresses(&ListResolverEndpointIpAddressesInput {
                resolver_endpoint_id: endpoint.id,
                max_results: Some(1),
                next_token: None,
            })
            .unwrap();
        assert_eq!(listed.ip_addresses.len(), 1);
        assert_eq!(listed.next_token.as_deref(), Some("1"));
    }

    #[test]
    fn test_rules_and_associations() {
        let mut f = fixture();
        let endpoint = f.create(&f.endpoint_input("req-1")).unwrap();
        let rule_input = CreateResolverRuleInput {
            creator_request_id: "rule-1".into(),
            rule_type: "FORWARD".into(),
            domain_name: "corp.example.com".into(),
            target_ips: vec![TargetAddress {
                ip: "10.10.0.2".into(),
                port: 53,
            }],
            resolver_endpoint_id: Some(endpoint.id.clone()),
            ..Default::default()
        };
        let rule = f.resolver.create_resolver_rule(&rule_input).unwrap();
        assert!(rule.id.starts_with("rslvr-rr-"));
        assert_eq!(rule.owner_id, "123456789012");

        let err = f.resolver.delete_resolver_endpoint(&endpoint.id).unwrap_err();
        assert_eq!(err.code(), "InvalidRequestException");
        assert!(err.to_string().ends_with(&rule.id));

        let system = CreateResolverRuleInput {
            creator_request_id: "rule-2".into(),
            rule_type: "SYSTEM".into(),
            domain_name: "corp.example.com".into(),
            resolver_endpoint_id: Some(endpoint.id.clone()),
            ..Default::default()
        };
        assert_eq!(f.resolver.create_resolver_rule(&system).unwrap_err().code(), "InvalidRequestException");

        let associate = AssociateResolverRuleInput {
            resolver_rule_id: rule.id.clone(),
            name: None,
            vpc_id: f.vpc_id.clone(),
        };
        let association = f
            .resolver
            .associate_resolver_rule(&associate, &Ec2Resolver::new(&f.ec2))
            .unwrap();
        assert!(association.id.starts_with("rslvr-rrassoc-"));
        assert_eq!(
            f.resolver
                .associate_resolver_rule(&associate, &Ec2Resolver::new(&f.ec2))
                .unwrap_err()
                .code(),
            "InvalidRequestException"
        );
        let missing_vpc = AssociateResolverRuleInput {
            vpc_id: "vpc-00000000".into(),
            ..associate.clone()
        };
        assert_eq!(
            f.resolver
                .associate_resolver_rule(&missing_vpc, &Ec2Resolver::new(&f.ec2))
                .unwrap_err(),
            ResolverError::InvalidParameter("The vpc ID 'vpc-00000000' does not exist".into())
        );

        assert_eq!(f.resolver.delete_resolver_rule(&rule.id).unwrap_err().code(), "ResourceInUseException");
        let got = f.resolver.get_resolver_rule_association(&association.id).unwrap();
        assert_eq!(got.vpc_id, f.vpc_id);

        let gone = f
            .resolver
            .disassociate_resolver_rule(&DisassociateResolverRuleInput {
                vpc_id: f.vpc_id.clone(),
                resolver_rule_id: rule.id.clone(),
            })
            .unwrap();
        assert_eq!(gone.status, "DELETING");
        let deleted = f.resolver.delete_resolver_rule(&rule.id).unwrap();
        assert_eq!(deleted.status, "DELETING");
        assert!(f.resolver.list_resolver_rules(&ListInput::default()).unwrap().resolver_rules.is_empty());
    }

    #[test]
    fn test_tags_by_arn() {
        let mut f = fixture();
        let endpoint = f.create(&f.endpoint_input("req-1")).unwrap();
        f.resolver
            .tag_resource(&endpoint.arn, &[Tag::new("a", "1"), Tag::new("b", "2")])
            .unwrap();
        f.resolver.untag_resource(&endpoint.arn, &["a".into()]).unwrap();
        let listed = f
            .resolver
            .list_tags_for_resource(&ListTagsForResourceInput {
                resource_arn: endpoint.arn.clone(),
                max_results: None,
                next_token: None,
            })
            .unwrap();
        assert_eq!(listed.tags, vec![Tag::new("b", "2")]);

        let err = f.resolver.tag_resource("arn:aws:route53resolver:us-west-2:123456789012:resolver-endpoint/x", &[]);
        assert_eq!(err.unwrap_err().code(), "ResourceNotFoundException");

        f.resolver.delete_resolver_endpoint(&endpoint.id).unwrap();
        assert!(!f.resolver.tagger.has_tags(&endpoint.arn));
    }
}
