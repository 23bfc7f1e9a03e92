//! Parameter constraints for the DNS resolver service.

use std::sync::LazyLock;

use crate::framework::validation::{
    matches, max_items, max_length, max_value, min_length, min_value, one_of, AsJson, Pattern, Validator,
};
use crate::model::route53resolver::{IpAddressRequest, TargetAddress, INBOUND, OUTBOUND};

pub const DIRECTIONS: &[&str] = &[INBOUND, OUTBOUND];
pub const RULE_TYPES: &[&str] = &["FORWARD", "SYSTEM", "RECURSIVE"];
pub const MAX_IP_ADDRESSES: usize = 10;

const NAME_SOURCE: &str = r"^(?!^[0-9]+$)([a-zA-Z0-9-_' ']+)$";

pub static NAME: LazyLock<Pattern> = LazyLock::new(|| Pattern::custom(NAME_SOURCE, is_valid_name));

/// Letters, digits, `-`, `_`, `'` and spaces, but not digits alone.
fn is_valid_name(value: &str) -> bool {
    !value.is_empty()
        && !value.chars().all(|c| c.is_ascii_digit())
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '\'' | ' '))
}

pub fn check_name(v: &mut Validator, name: Option<&str>) {
    v.check_opt("name", name, max_length(64));
    v.check_opt("name", name, matches(&NAME));
}

pub fn check_endpoint_inputs(
    v: &mut Validator,
    creator_request_id: &str,
    direction: &str,
    ip_addresses: &[IpAddressRequest],
    name: Option<&str>,
    security_group_ids: &[String],
) {
    v.check("creatorRequestId", creator_request_id, max_length(255));
    v.check("direction", direction, one_of(DIRECTIONS));
    v.check("ipAddresses", &AsJson(ip_addresses), |list| {
        max_items(MAX_IP_ADDRESSES)(list.0)
    });
    check_name(v, name);
    for group_id in security_group_ids {
        v.check("securityGroupIds", group_id.as_str(), max_length(64));
    }
    for address in ip_addresses {
        v.check("ipAddresses.subnetId", address.subnet_id.as_str(), max_length(32));
    }
}

pub fn check_rule_inputs(
    v: &mut Validator,
    creator_request_id: &str,
    name: Option<&str>,
    rule_type: &str,
    domain_name: &str,
    target_ips: &[TargetAddress],
    resolver_endpoint_id: Option<&str>,
) {
    v.check("creatorRequestId", creator_request_id, max_length(255));
    check_name(v, name);
    v.check("ruleType", rule_type, one_of(RULE_TYPES));
    v.check("domainName", domain_name, min_length(1));
    v.check("domainName", domain_name, max_length(256));
    for target in target_ips {
        v.check("targetIps.port", &target.port, max_value(65535u32));
    }
    v.check_opt("resolverEndpointId", resolver_endpoint_id, max_length(64));
}

/// Resource ids share one bound: at most 64 characters.
pub fn check_id(v: &mut Validator, field: &str, id: &str) {
    v.check(field, id, max_length(64));
}

pub fn check_max_results(v: &mut Validator, max_results: Option<u32>) {
    v.check_opt("maxResults", max_results.as_ref(), min_value(1u32));
    v.check_opt("maxResults", max_results.as_ref(), max_value(100u32));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_rules() {
        assert!(NAME.is_match("my endpoint's-name_1"));
        assert!(!NAME.is_match("12345"));
        assert!(!NAME.is_match("bad!name"));
        assert!(!NAME.is_match(""));
    }

    #[test]
    fn test_endpoint_inputs_are_batched() {
        let addresses: Vec<IpAddressRequest> = (0..11)
            .map(|i| IpAddressRequest {
                subnet_id: format!("subnet-{i}"),
                ip: None,
            })
            .collect();
        let mut v = Validator::new();
        check_endpoint_inputs(
            &mut v,
            &"x".repeat(256),
            "inbound",
            &addresses,
            Some("12345"),
            &["sg-1".to_string()],
        );
        let err = v.finish().unwrap_err();
        let fields: Vec<&str> = err.violations().iter().map(|x| x.field.as_str()).collect();
        assert_eq!(fields, vec!["creatorRequestId", "direction", "ipAddresses", "name"]);
        assert!(err.to_string().contains(r#"Value '[{"SubnetId":"subnet-0"}"#));
        assert!(err
            .to_string()
            .contains("at 'direction' failed to satisfy constraint: Member must satisfy enum value set: [INBOUND, OUTBOUND]"));
    }
}
