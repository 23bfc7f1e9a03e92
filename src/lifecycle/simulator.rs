use std::collections::BTreeMap;

use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::framework::{FrameworkError, Scope, ServiceActor, ServiceClient};
use crate::lifecycle::config::{ConfigError, SimulatorConfig};
use crate::lifecycle::region::{RegionBackends, Service};
use crate::lifecycle::regions::regions_in;

#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("No backends for account {account} in region {region}")]
    UnknownRegion { account: String, region: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Framework(#[from] FrameworkError),

    #[error("Actor task failed: {0}")]
    ActorFailed(String),
}

/// The region registry: one [`ServiceActor`] per configured (account, region).
///
/// Built once, eagerly, at startup. Entries are never removed; a reset rebuilds
/// backend state inside the owning actor instead.
///
/// # Example
///
/// ```ignore
/// let simulator = Simulator::new(SimulatorConfig::default())?;
/// let network = NetworkClient::new(simulator.region("us-east-1")?);
/// let vpc = network.create_vpc("10.0.0.0/16").await?;
///
/// simulator.reset("us-east-1", Service::Ec2).await?;
/// simulator.shutdown().await?;
/// ```
pub struct Simulator {
    default_account: String,
    clients: BTreeMap<(String, String), ServiceClient<Service>>,
    handles: Vec<JoinHandle<()>>,
}

impl Simulator {
    /// Spawns every region actor. Must be called from within a Tokio runtime.
    pub fn new(config: SimulatorConfig) -> Result<Self, SimulatorError> {
        config.validate()?;
        let mut clients = BTreeMap::new();
        let mut handles = Vec::new();

        for account_id in &config.account_ids {
            for partition in &config.partitions {
                let regions = regions_in(partition).ok_or_else(|| ConfigError::UnknownPartition(partition.clone()))?;
                for region in regions {
                    let scope = Scope::new(account_id.as_str(), *region, partition.as_str());
                    let backends = RegionBackends::new(scope, config.quotas.clone());
                    let (actor, client) = ServiceActor::new(config.channel_capacity, backends);
                    handles.push(tokio::spawn(actor.run()));
                    clients.insert((account_id.clone(), region.to_string()), client);
                }
            }
        }

        info!(
            accounts = config.account_ids.len(),
            regions = clients.len(),
            "Simulator started"
        );
        Ok(Self {
            default_account: config.default_account().to_string(),
            clients,
            handles,
        })
    }

    pub fn default_account(&self) -> &str {
        &self.default_account
    }

    pub fn client(&self, account_id: &str, region: &str) -> Result<ServiceClient<Service>, SimulatorError> {
        self.clients
            .get(&(account_id.to_string(), region.to_string()))
            .cloned()
            .ok_or_else(|| SimulatorError::UnknownRegion {
                account: account_id.to_string(),
                region: region.to_string(),
            })
    }

    /// The handle for `region` in the default account.
    pub fn region(&self, region: &str) -> Result<ServiceClient<Service>, SimulatorError> {
        self.client(&self.default_account, region)
    }

    /// Rebuilds one service's state in `region`, for every configured account.
    pub async fn reset(&self, region: &str, service: Service) -> Result<(), SimulatorError> {
        let mut found = false;
        for ((_, r), client) in &self.clients {
            if r == region {
                client.reset(service).await?;
                found = true;
            }
        }
        if found {
            Ok(())
        } else {
            Err(SimulatorError::UnknownRegion {
                account: self.default_account.clone(),
                region: region.to_string(),
            })
        }
    }

    /// Rebuilds every service in every region.
    pub async fn reset_all(&self) -> Result<(), SimulatorError> {
        for client in self.clients.values() {
            client.reset_all().await?;
        }
        Ok(())
    }

    /// Closes every actor's channel and waits for the actors to exit.
    ///
    /// Clients cloned out of the simulator keep their actor alive, so drop them first.
    pub async fn shutdown(self) -> Result<(), SimulatorError> {
        info!("Shutting down simulator...");
        drop(self.clients);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(SimulatorError::ActorFailed(e.to_string()));
            }
        }

        info!("Simulator shutdown complete.");
        Ok(())
    }
}
