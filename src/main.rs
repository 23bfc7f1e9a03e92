//! # cloudmock demo
//!
//! Starts a [`Simulator`] from `CLOUDMOCK_CONFIG` (or the defaults), builds a
//! small network, creates a directory on it, then shows a rejected request.

use cloudmock::clients::{DirectoryClient, NetworkClient};
use cloudmock::lifecycle::{setup_tracing, Service, Simulator, SimulatorConfig};
use cloudmock::model::ds::{CreateDirectoryInput, VpcSettings};
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let config = SimulatorConfig::load()?;
    let simulator = Simulator::new(config)?;
    let region = simulator.region("us-east-1")?;
    let network = NetworkClient::new(region.clone());
    let directories = DirectoryClient::new(region);

    let span = tracing::info_span!("network_setup");
    let (vpc_id, subnet_ids) = async {
        let vpc = network.create_vpc("10.0.0.0/16").await?;
        let a = network.create_subnet(&vpc.vpc_id, "10.0.1.0/24", "us-east-1a").await?;
        let b = network.create_subnet(&vpc.vpc_id, "10.0.2.0/24", "us-east-1b").await?;
        Ok::<_, cloudmock::framework::ServiceError>((vpc.vpc_id, vec![a.subnet_id, b.subnet_id]))
    }
    .instrument(span)
    .await?;

    let input = CreateDirectoryInput {
        name: "corp.example.com".to_string(),
        password: "Demo-Passw0rd".to_string(),
        size: "Small".to_string(),
        vpc_settings: Some(VpcSettings { vpc_id, subnet_ids }),
        ..Default::default()
    };
    let directory_id = directories.create_directory(&input).await?;
    info!(%directory_id, "Directory created");

    let bad = CreateDirectoryInput {
        size: "Huge".to_string(),
        password: "short".to_string(),
        ..input
    };
    match directories.create_directory(&bad).await {
        Ok(id) => info!(%id, "Unexpectedly accepted"),
        Err(e) => error!(code = %e.code, message = %e.message, "Rejected as expected"),
    }

    simulator.reset("us-east-1", Service::Ds).await?;
    let limits = directories.get_directory_limits().await?;
    info!(count = limits.cloud_only_directories_current_count, "After reset");

    drop(network);
    drop(directories);
    simulator.shutdown().await?;
    info!("Demo completed successfully");
    Ok(())
}
