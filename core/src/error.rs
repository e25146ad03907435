//! Error types for the events API client.
//!
//! # Design
//! The taxonomy follows where a call can break: before a response exists
//! (`Fetch`), after a response arrived but could not be understood
//! (`Decode`), or when the server answered with a non-success status
//! (`RequestRejected`). The registration workflow wraps these in
//! `RegistrationError` so a caller can tell which step failed and whether a
//! guest was left behind.

use thiserror::Error;

use crate::types::Guest;

/// Errors returned by `EventsClient` parse methods and `Transport`
/// implementations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The transport call itself failed (network unreachable, DNS, ...).
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// A response arrived but its body was not JSON or lacked the expected
    /// `{ data: ... }` envelope.
    #[error("decode failed: {0}")]
    Decode(String),

    /// The server answered with a non-success status.
    ///
    /// `message` is the body's `message` field when present, otherwise the
    /// canonical status text.
    #[error("request rejected with HTTP {status}: {message}")]
    RequestRejected { status: u16, message: String },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// HTTP status of a rejected request, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::RequestRejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Failure of the guest → RSVP registration workflow.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// Guest creation failed. No RSVP was attempted.
    #[error("guest creation failed: {0}")]
    GuestFailed(#[source] ApiError),

    /// The guest was created but the RSVP was not. The guest is not rolled
    /// back and is returned here.
    #[error("guest {} created but RSVP failed: {source}", .guest.id)]
    RsvpFailed {
        guest: Guest,
        #[source]
        source: ApiError,
    },
}

impl RegistrationError {
    /// The underlying API error regardless of the step that produced it.
    pub fn api_error(&self) -> &ApiError {
        match self {
            RegistrationError::GuestFailed(e) => e,
            RegistrationError::RsvpFailed { source, .. } => source,
        }
    }

    /// The guest left without an RSVP, if any.
    pub fn orphaned_guest(&self) -> Option<&Guest> {
        match self {
            RegistrationError::GuestFailed(_) => None,
            RegistrationError::RsvpFailed { guest, .. } => Some(guest),
        }
    }
}
