//! One (account, region) worth of service backends.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use tracing::info;

use crate::clients::Ec2Resolver;
use crate::ds::DirectoryBackend;
use crate::ec2::Ec2Backend;
use crate::firehose::FirehoseBackend;
use crate::framework::{Dispatcher, Scope, ServiceError};
use crate::lifecycle::config::QuotaConfig;
use crate::route53resolver::ResolverBackend;
use crate::signer::SignerBackend;
use crate::{ds, ec2, firehose, route53resolver, signer};

/// The simulated services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Service {
    Ec2,
    Ds,
    Route53Resolver,
    Firehose,
    Signer,
}

impl Service {
    pub const ALL: [Service; 5] = [
        Service::Ec2,
        Service::Ds,
        Service::Route53Resolver,
        Service::Firehose,
        Service::Signer,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Service::Ec2 => "ec2",
            Service::Ds => "ds",
            Service::Route53Resolver => "route53resolver",
            Service::Firehose => "firehose",
            Service::Signer => "signer",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Unknown service: {0}")]
pub struct UnknownService(pub String);

impl FromStr for Service {
    type Err = UnknownService;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Service::ALL
            .into_iter()
            .find(|service| service.name() == s)
            .ok_or_else(|| UnknownService(s.to_string()))
    }
}

/// Exactly one backend per service for one (account, region).
///
/// Dependent backends resolve network references through an [`Ec2Resolver`]
/// borrowed from this same region, so they always see the live network state.
#[derive(Debug)]
pub struct RegionBackends {
    scope: Scope,
    quotas: QuotaConfig,
    ec2: Ec2Backend,
    ds: DirectoryBackend,
    route53resolver: ResolverBackend,
    firehose: FirehoseBackend,
    signer: SignerBackend,
}

impl RegionBackends {
    pub fn new(scope: Scope, quotas: QuotaConfig) -> Self {
        Self {
            ec2: Ec2Backend::new(scope.clone()),
            ds: DirectoryBackend::new(scope.clone(), quotas.directory.clone()),
            route53resolver: ResolverBackend::new(scope.clone(), quotas.resolver.clone()),
            firehose: FirehoseBackend::new(scope.clone(), quotas.firehose.clone()),
            signer: SignerBackend::new(scope.clone()),
            scope,
            quotas,
        }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }
}

impl Dispatcher for RegionBackends {
    type Service = Service;

    fn label(&self) -> String {
        format!("{}/{}", self.scope.account_id, self.scope.region)
    }

    fn dispatch(&mut self, service: Service, operation: &str, params: Value) -> Result<Value, ServiceError> {
        match service {
            Service::Ec2 => ec2::dispatch(&mut self.ec2, operation, params),
            Service::Ds => ds::dispatch(&mut self.ds, &Ec2Resolver::new(&self.ec2), operation, params),
            Service::Route53Resolver => {
                route53resolver::dispatch(&mut self.route53resolver, &Ec2Resolver::new(&self.ec2), operation, params)
            }
            Service::Firehose => firehose::dispatch(&mut self.firehose, operation, params),
            Service::Signer => signer::dispatch(&mut self.signer, operation, params),
        }
    }

    fn reset(&mut self, service: Service) {
        let scope = self.scope.clone();
        match service {
            Service::Ec2 => self.ec2 = Ec2Backend::new(scope),
            Service::Ds => self.ds = DirectoryBackend::new(scope, self.quotas.directory.clone()),
            Service::Route53Resolver => {
                self.route53resolver = ResolverBackend::new(scope, self.quotas.resolver.clone())
            }
            Service::Firehose => self.firehose = FirehoseBackend::new(scope, self.quotas.firehose.clone()),
            Service::Signer => self.signer = SignerBackend::new(scope),
        }
        info!(label = %self.label(), %service, "Backend rebuilt");
    }

    fn reset_all(&mut self) {
        *self = RegionBackends::new(self.scope.clone(), self.quotas.clone());
    }
}
