//! Operation-name routing for the DNS resolver service.

use serde_json::Value;

use super::ResolverBackend;
use crate::clients::NetworkResolver;
use crate::framework::{parse, respond, ServiceError};
use crate::model::route53resolver::*;
use crate::model::Empty;

pub fn dispatch(
    backend: &mut ResolverBackend,
    network: &dyn NetworkResolver,
    operation: &str,
    params: Value,
) -> Result<Value, ServiceError> {
    match operation {
        "CreateResolverEndpoint" => {
            let input: CreateResolverEndpointInput = parse(params)?;
            let resolver_endpoint = backend.create_resolver_endpoint(&input, network)?;
            respond(&ResolverEndpointOutput { resolver_endpoint })
        }
        "GetResolverEndpoint" => {
            let input: ResolverEndpointIdInput = parse(params)?;
            let resolver_endpoint = backend.get_resolver_endpoint(&input.resolver_endpoint_id)?.clone();
            respond(&ResolverEndpointOutput { resolver_endpoint })
        }
        "UpdateResolverEndpoint" => {
            let input: UpdateResolverEndpointInput = parse(params)?;
            let resolver_endpoint = backend.update_resolver_endpoint(&input)?;
            respond(&ResolverEndpointOutput { resolver_endpoint })
        }
        "DeleteResolverEndpoint" => {
            let input: ResolverEndpointIdInput = parse(params)?;
            let resolver_endpoint = backend.delete_resolver_endpoint(&input.resolver_endpoint_id)?;
            respond(&ResolverEndpointOutput { resolver_endpoint })
        }
        "ListResolverEndpoints" => {
            let input: ListInput = parse(params)?;
            respond(&backend.list_resolver_endpoints(&input)?)
        }
        "ListResolverEndpointIpAddresses" => {
            let input: ListResolverEndpointIpAddressesInput = parse(params)?;
            respond(&backend.list_resolver_endpoint_ip_addresses(&input)?)
        }
        "AssociateResolverEndpointIpAddress" => {
            let input: EndpointIpAddressInput = parse(params)?;
            let resolver_endpoint = backend.associate_resolver_endpoint_ip_address(&input, network)?;
            respond(&ResolverEndpointOutput { resolver_endpoint })
        }
        "DisassociateResolverEndpointIpAddress" => {
            let input: EndpointIpAddressInput = parse(params)?;
            let resolver_endpoint = backend.disassociate_resolver_endpoint_ip_address(&input)?;
            respond(&ResolverEndpointOutput { resolver_endpoint })
        }
        "CreateResolverRule" => {
            let input: CreateResolverRuleInput = parse(params)?;
            let resolver_rule = backend.create_resolver_rule(&input)?;
            respond(&ResolverRuleOutput { resolver_rule })
        }
        "GetResolverRule" => {
            let input: ResolverRuleIdInput = parse(params)?;
            let resolver_rule = backend.get_resolver_rule(&input.resolver_rule_id)?.clone();
            respond(&ResolverRuleOutput { resolver_rule })
        }
        "DeleteResolverRule" => {
            let input: ResolverRuleIdInput = parse(params)?;
            let resolver_rule = backend.delete_resolver_rule(&input.resolver_rule_id)?;
            respond(&ResolverRuleOutput { resolver_rule })
        }
        "ListResolverRules" => {
            let input: ListInput = parse(params)?;
            respond(&backend.list_resolver_rules(&input)?)
        }
        "AssociateResolverRule" => {
            let input: AssociateResolverRuleInput = parse(params)?;
            let resolver_rule_association = backend.associate_resolver_rule(&input, network)?;
            respond(&ResolverRuleAssociationOutput { resolver_rule_association })
        }
        "DisassociateResolverRule" => {
            let input: DisassociateResolverRuleInput = parse(params)?;
            let resolver_rule_association = backend.disassociate_resolver_rule(&input)?;
            respond(&ResolverRuleAssociationOutput { resolver_rule_association })
        }
        "GetResolverRuleAssociation" => {
            let input: ResolverRuleAssociationIdInput = parse(params)?;
            let resolver_rule_association = backend
                .get_resolver_rule_association(&input.resolver_rule_association_id)?
                .clone();
            respond(&ResolverRuleAssociationOutput { resolver_rule_association })
        }
        "ListResolverRuleAssociations" => {
            let input: ListInput = parse(params)?;
            respond(&backend.list_resolver_rule_associations(&input)?)
        }
        "TagResource" => {
            let input: TagResourceInput = parse(params)?;
            backend.tag_resource(&input.resource_arn, &input.tags)?;
            respond(&Empty {})
        }
        "UntagResource" => {
            let input: UntagResourceInput = parse(params)?;
            backend.untag_resource(&input.resource_arn, &input.tag_keys)?;
            respond(&Empty {})
        }
        "ListTagsForResource" => {
            let input: ListTagsForResourceInput = parse(params)?;
            respond(&backend.list_tags_for_resource(&input)?)
        }
        other => Err(ServiceError::unknown_operation(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockNetwork;
    use crate::framework::Scope;
    use serde_json::json;

    #[test]
    fn test_dispatch_endpoint_not_found() {
        let mut resolver = ResolverBackend::new(
            Scope::new("123456789012", "eu-west-1", "aws"),
            ResolverQuotas::default(),
        );
        let network = MockNetwork::new();
        let err = dispatch(
            &mut resolver,
            &network,
            "GetResolverEndpoint",
            json!({"ResolverEndpointId": "rslvr-in-0123456789abcdef0"}),
        )
        .unwrap_err();
        assert_eq!(err.code, "ResourceNotFoundException");
        assert_eq!(
            err.message,
            "Resolver endpoint with ID 'rslvr-in-0123456789abcdef0' does not exist"
        );

        let listed = dispatch(&mut resolver, &network, "ListResolverRules", Value::Null).unwrap();
        assert_eq!(listed, json!({"MaxResults": 10, "ResolverRules": []}));
        network.verify();
    }
}
