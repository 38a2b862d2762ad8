//! Broadcast events and subscriptions.

use std::fmt;

use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};

use crate::location::{AuthorizationStatus, Position};

/// Broadcast topic names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// `location.updated`
    Updated,
    /// `location.failed`
    Failed,
    /// `location.authorizationChanged`
    AuthorizationChanged,
}

impl Topic {
    /// Wire name of the topic.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Updated => "location.updated",
            Self::Failed => "location.failed",
            Self::AuthorizationChanged => "location.authorizationChanged",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event broadcast by the facade to its subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationEvent {
    /// A new position was cached.
    Updated(Position),
    /// The capability failed to deliver a position.
    Failed(String),
    /// The location permission changed.
    AuthorizationChanged(AuthorizationStatus),
}

impl LocationEvent {
    /// The topic this event is published on.
    #[must_use]
    pub const fn topic(&self) -> Topic {
        match self {
            Self::Updated(_) => Topic::Updated,
            Self::Failed(_) => Topic::Failed,
            Self::AuthorizationChanged(_) => Topic::AuthorizationChanged,
        }
    }
}

/// A live subscription to facade events.
///
/// Dropping the subscription unsubscribes. A subscription that falls more
/// than the channel capacity behind skips the missed events and carries on.
pub struct Subscription {
    rx: broadcast::Receiver<LocationEvent>,
    topic: Option<Topic>,
}

impl Subscription {
    pub(crate) const fn new(rx: broadcast::Receiver<LocationEvent>, topic: Option<Topic>) -> Self {
        Self { rx, topic }
    }

    /// The topic filter, or `None` for all topics.
    #[must_use]
    pub const fn topic(&self) -> Option<Topic> {
        self.topic
    }

    fn accepts(&self, event: &LocationEvent) -> bool {
        self.topic.is_none_or(|topic| event.topic() == topic)
    }

    /// Waits for the next matching event.
    ///
    /// Returns `None` once the facade and every event sink are gone.
    pub async fn recv(&mut self) -> Option<LocationEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) if self.accepts(&event) => return Some(event),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    log::warn!("Location subscriber lagged, skipped {skipped} events");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Returns the next matching event if one is already queued.
    pub fn try_recv(&mut self) -> Option<LocationEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(event) if self.accepts(&event) => return Some(event),
                Ok(_) => {}
                Err(TryRecvError::Lagged(skipped)) => {
                    log::warn!("Location subscriber lagged, skipped {skipped} events");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("topic", &self.topic)
            .field("pending", &self.rx.len())
            .finish()
    }
}
