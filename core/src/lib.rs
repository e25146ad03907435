//! Synchronous API client core for the events/RSVP service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). `EventsSession` drives the
//! round-trips through a `Transport` and adds the one dependent workflow:
//! create a guest, then RSVP that guest to an event.
//!
//! # Design
//! - `EventsClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - `{ data: ... }` envelopes are unwrapped as a fallible decode step.
//! - `UreqTransport` (feature `ureq`, default) is the blocking network
//!   transport; tests substitute their own `Transport`.

pub mod client;
pub mod datetime;
pub mod error;
pub mod http;
pub mod session;
pub mod transport;
pub mod types;

pub use client::EventsClient;
pub use error::{ApiError, RegistrationError};
pub use crate::http::{HttpMethod, HttpRequest, HttpResponse};
pub use session::EventsSession;
pub use transport::Transport;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{Event, Guest, NewEvent, NewGuest, NewRsvp, Registration, ResourceId, Rsvp};
