//! Wire-shaped records, request inputs and response outputs for every service.
//!
//! Field names and casing follow each provider API exactly, so these types are
//! what the boundary layer serializes.

pub mod ds;
pub mod ec2;
pub mod firehose;
pub mod route53resolver;
pub mod signer;

use serde::{Deserialize, Serialize};

/// The `{}` body of operations that return nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Empty {}
