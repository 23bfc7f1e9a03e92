//! Typed clients over a region's [`ServiceClient`](crate::framework::ServiceClient),
//! plus the cross-service network lookups backends depend on.

pub mod api_client;
pub mod directory_client;
pub mod firehose_client;
pub mod network;
pub mod network_client;
pub mod resolver_client;
pub mod signer_client;

pub use api_client::*;
pub use directory_client::*;
pub use firehose_client::*;
pub use network::*;
pub use network_client::*;
pub use resolver_client::*;
pub use signer_client::*;
