//! The location facade and its broadcast interface.
//!
//! # Architecture
//!
//! ```text
//! LocationFacade (public API, Stopped/Running)
//!     ├── LocationCapability (one per facade, behind a mutex)
//!     └── EventRelay (cached position + tokio broadcast)
//!             └── Subscription (per subscriber, optional topic filter)
//! ```
//!
//! # Topics
//!
//! | Topic | Payload |
//! |-------|---------|
//! | `location.updated` | [`Position`](crate::location::Position) |
//! | `location.failed` | error description |
//! | `location.authorizationChanged` | [`AuthorizationStatus`](crate::location::AuthorizationStatus) |

mod config;
mod events;
mod manager;
pub(crate) mod relay;
mod shared;

pub use config::{FacadeConfig, DEFAULT_EVENT_CAPACITY};
pub use events::{LocationEvent, Subscription, Topic};
pub use manager::{FacadeState, LocationFacade};
