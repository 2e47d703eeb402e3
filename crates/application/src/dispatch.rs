//! Dispatcher port.
//!
//! The transport that actually sends a [`PreparedRequest`] lives outside
//! this crate; it plugs in through [`RequestDispatcher`]. Cancellation is
//! a watch channel: the editor flips the handle, the transport observes
//! the receiver and winds down.

use std::time::Duration;
use tokio::sync::watch;

use crate::prepare::PreparedRequest;

/// A completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseData {
    /// HTTP status code.
    pub status: u16,
    /// Response headers in arrival order.
    pub headers: Vec<(String, String)>,
    /// Response body text.
    pub body: String,
    /// Wall time from dispatch to last byte.
    pub elapsed: Duration,
}

/// How a dispatch ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The server answered, whatever the status code.
    Response(ResponseData),
    /// The exchange failed below HTTP: connection, TLS, timeout.
    Failure {
        /// Transport error description.
        message: String,
        /// Time spent before the failure.
        elapsed: Duration,
    },
    /// The user cancelled while the request was in flight.
    Canceled {
        /// Time spent before cancellation took effect.
        elapsed: Duration,
    },
}

/// Port implemented by the transport layer.
pub trait RequestDispatcher {
    /// Sends a prepared request.
    ///
    /// Implementations must watch `cancel` and resolve to
    /// [`SendOutcome::Canceled`] promptly once it turns true. Transport
    /// failures are data, not errors; the outcome carries them.
    fn send(
        &self,
        request: PreparedRequest,
        cancel: watch::Receiver<bool>,
    ) -> impl Future<Output = SendOutcome> + Send;
}

/// Flips the cancellation flag handed to a dispatcher.
#[derive(Debug)]
pub struct CancelHandle {
    sender: watch::Sender<bool>,
}

impl CancelHandle {
    /// Signals cancellation. Safe to call more than once.
    pub fn cancel(&self) {
        let _ = self.sender.send(true);
    }
}

/// Creates a linked cancellation handle and receiver, initially not
/// cancelled.
#[must_use]
pub fn cancellation_pair() -> (CancelHandle, watch::Receiver<bool>) {
    let (sender, receiver) = watch::channel(false);
    (CancelHandle { sender }, receiver)
}
