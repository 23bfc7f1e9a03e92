//! # Simulator Lifecycle
//!
//! Spins up one [`ServiceActor`](crate::framework::ServiceActor) per (account,
//! region), each owning a [`RegionBackends`], and tears them down again.
//!
//! 1. **Configuration** - [`SimulatorConfig`] decides which accounts and partitions get backends
//! 2. **Creation** - [`Simulator::new`] eagerly spawns every region actor
//! 3. **Reset** - [`Simulator::reset`] rebuilds one service's state, serialized with that region's requests
//! 4. **Shutdown** - [`Simulator::shutdown`] drops the clients and awaits every actor
//!
//! Dependencies between services never cross actors: a directory or resolver
//! backend resolves network references against the network backend living in
//! the same [`RegionBackends`].

pub mod config;
pub mod region;
pub mod regions;
pub mod simulator;
pub mod tracing;

pub use config::*;
pub use region::*;
pub use simulator::*;
pub use self::tracing::*;
