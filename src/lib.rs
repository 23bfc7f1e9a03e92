//! # cloudmock
//!
//! An in-memory simulator of cloud control-plane APIs. Each simulated service
//! keeps its state in a per-(account, region) backend that validates requests,
//! enforces quotas and cross-resource rules, and answers in the provider's own
//! response shapes and error codes.
//!
//! ## Services
//!
//! - [`ec2`] - VPCs, subnets and security groups; the registry other services resolve against
//! - [`ds`] - directories, including managed AD and connectors
//! - [`route53resolver`] - resolver endpoints, rules and rule associations
//! - [`firehose`] - delivery streams
//! - [`signer`] - code-signing profiles and the platform catalogue
//!
//! ## Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! Resource registries, the batching validator, tagging, the error taxonomy and
//! the [`ServiceActor`](framework::ServiceActor) that serializes one region's requests.
//!
//! ### 2. The Orchestrator ([`lifecycle`])
//! [`Simulator`](lifecycle::Simulator) spawns one actor per configured (account, region)
//! and handles reset and shutdown.
//!
//! ### 3. The Interface ([`clients`])
//! Typed clients such as [`DirectoryClient`](clients::DirectoryClient) over the untyped
//! `(service, operation, params)` path, and the [`NetworkResolver`](clients::NetworkResolver)
//! seam between services.
//!
//! ### 4. The Wire Shapes ([`model`])
//! Records, inputs and outputs, named and cased as each provider API names them.
//!
//! ## Quick Start
//!
//! ```bash
//! RUST_LOG=info cargo run
//! cargo test
//! ```

pub mod clients;
pub mod ds;
pub mod ec2;
pub mod firehose;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod route53resolver;
pub mod signer;
