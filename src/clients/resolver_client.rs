use tracing::instrument;

use crate::clients::ApiClient;
use crate::framework::{ServiceClient, ServiceError, Tag};
use crate::lifecycle::Service;
use crate::model::route53resolver::*;

/// Client for the DNS resolver service of one region.
#[derive(Clone)]
pub struct ResolverClient {
    inner: ServiceClient<Service>,
}

impl ResolverClient {
    pub fn new(inner: ServiceClient<Service>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn create_resolver_endpoint(&self, input: &CreateResolverEndpointInput) -> Result<ResolverEndpoint, ServiceError> {
        let output: ResolverEndpointOutput = self.call("CreateResolverEndpoint", input).await?;
        Ok(output.resolver_endpoint)
    }

    #[instrument(skip(self))]
    pub async fn get_resolver_endpoint(&self, resolver_endpoint_id: &str) -> Result<ResolverEndpoint, ServiceError> {
        let input = ResolverEndpointIdInput {
            resolver_endpoint_id: resolver_endpoint_id.to_string(),
        };
        let output: ResolverEndpointOutput = self.call("GetResolverEndpoint", &input).await?;
        Ok(output.resolver_endpoint)
    }

    #[instrument(skip(self))]
    pub async fn delete_resolver_endpoint(&self, resolver_endpoint_id: &str) -> Result<ResolverEndpoint, ServiceError> {
        let input = ResolverEndpointIdInput {
            resolver_endpoint_id: resolver_endpoint_id.to_string(),
        };
        let output: ResolverEndpointOutput = self.call("DeleteResolverEndpoint", &input).await?;
        Ok(output.resolver_endpoint)
    }

    #[instrument(skip(self))]
    pub async fn create_resolver_rule(&self, input: &CreateResolverRuleInput) -> Result<ResolverRule, ServiceError> {
        let output: ResolverRuleOutput = self.call("CreateResolverRule", input).await?;
        Ok(output.resolver_rule)
    }

    #[instrument(skip(self))]
    pub async fn associate_resolver_rule(&self, resolver_rule_id: &str, vpc_id: &str) -> Result<ResolverRuleAssociation, ServiceError> {
        let input = AssociateResolverRuleInput {
            resolver_rule_id: resolver_rule_id.to_string(),
            vpc_id: vpc_id.to_string(),
            ..Default::default()
        };
        let output: ResolverRuleAssociationOutput = self.call("AssociateResolverRule", &input).await?;
        Ok(output.resolver_rule_association)
    }

    #[instrument(skip(self))]
    pub async fn list_tags_for_resource(&self, resource_arn: &str) -> Result<Vec<Tag>, ServiceError> {
        let input = ListTagsForResourceInput {
            resource_arn: resource_arn.to_string(),
            max_results: None,
            next_token: None,
        };
        let output: ListTagsForResourceOutput = self.call("ListTagsForResource", &input).await?;
        Ok(output.tags)
    }
}

impl ApiClient for ResolverClient {
    const SERVICE: Service = Service::Route53Resolver;

    fn inner(&self) -> &ServiceClient<Service> {
        &self.inner
    }
}
