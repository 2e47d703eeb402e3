//! Apiary Application - Orchestration layer
//!
//! Sits between the pure domain model and the host-facing layers: the
//! state hub fans mutation notices out to interested panels, request
//! preparation turns a stored record into something a transport can send,
//! and the dispatcher port abstracts the transport itself.

pub mod dispatch;
pub mod error;
pub mod hub;
pub mod prepare;

pub use dispatch::{cancellation_pair, CancelHandle, RequestDispatcher, ResponseData, SendOutcome};
pub use error::{ApplicationError, ApplicationResult};
pub use hub::{StateEvent, StateHub, StateTopic, SubscriberId, Subscription, EXTERNAL_ORIGIN};
pub use prepare::{prepare, PreparedRequest};
