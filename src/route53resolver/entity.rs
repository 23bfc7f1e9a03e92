use crate::framework::Resource;
use crate::model::route53resolver::{ResolverEndpoint, ResolverRule, ResolverRuleAssociation};

impl Resource for ResolverEndpoint {
    const KIND: &'static str = "resolver_endpoint";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Resource for ResolverRule {
    const KIND: &'static str = "resolver_rule";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Resource for ResolverRuleAssociation {
    const KIND: &'static str = "resolver_rule_association";

    fn id(&self) -> &str {
        &self.id
    }
}
