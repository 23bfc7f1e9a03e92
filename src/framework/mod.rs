//! Building blocks shared by every simulated service.
//!
//! # Main Components
//!
//! - [`ResourceRegistry`] - in-memory store of one backend's records, keyed by id
//! - [`Validator`](validation::Validator) - batches format violations into one [`ValidationError`]
//! - [`TaggingService`] - per-resource key/value tags
//! - [`ServiceError`] and [`ErrorCode`] - the taxonomy the boundary renders
//! - [`ServiceActor`] - serializes requests against one region's backends
//!
//! # Testing
//!
//! See the [`mock`] module for testing a backend without a real network registry.

pub mod actor;
pub mod core;
pub mod error;
pub mod mock;
pub mod tagging;
pub mod validation;

pub use actor::{Dispatcher, FrameworkError, ServiceActor, ServiceClient, ServiceRequest};
pub use self::core::{paginate, random_hex, InvalidNextToken, Resource, ResourceRegistry, Scope};
pub use error::{parse, respond, ErrorCode, ServiceError};
pub use tagging::{Tag, TaggingService};
pub use validation::ValidationError;
