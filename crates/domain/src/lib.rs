//! Apiary Domain - Core business types
//!
//! This crate defines the domain model for the Apiary request organizer.
//! All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod environment;
pub mod error;
pub mod record;
pub mod request;
pub mod settings;
pub mod tree;
pub mod variables;

pub use auth::{AuthEntry, AuthScheme, AuthStore, NO_AUTH_KEY};
pub use environment::{Environment, EnvironmentId, EnvironmentStore, DEFAULT_ENVIRONMENT_ID};
pub use error::{DomainError, DomainResult};
pub use record::{RecordKind, RequestDetails, RequestRecord};
pub use request::{BodyKind, HttpMethod, KeyValuePair};
pub use settings::TransportSettings;
pub use tree::{DeleteOutcome, NodeId, RequestTree, Subtree};
pub use variables::{Resolution, VariableScope};
