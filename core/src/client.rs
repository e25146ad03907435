//! Stateless HTTP request builder and response parser for the events API.
//!
//! # Design
//! `EventsClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! Whoever executes the round-trip in between (a `Transport`, a test, a host
//! runtime) stays outside the core, which keeps it deterministic.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Envelope, ErrorBody, Event, Guest, NewEvent, NewGuest, NewRsvp, ResourceId, Rsvp};

/// Environment variable read by `EventsClient::from_env`.
pub const BASE_URL_ENV: &str = "EVENTS_API_URL";

/// Base URL used when `EVENTS_API_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

/// Everything but RFC 3986 unreserved characters is escaped in a path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Synchronous, stateless client for the events API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventsClient {
    base_url: String,
}

impl EventsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Client rooted at `$EVENTS_API_URL`, or `DEFAULT_BASE_URL`.
    pub fn from_env() -> Self {
        Self::from_config(std::env::var(BASE_URL_ENV).ok().as_deref())
    }

    /// Client rooted at `base_url`, or `DEFAULT_BASE_URL` when unset or blank.
    pub fn from_config(base_url: Option<&str>) -> Self {
        match base_url.map(str::trim) {
            Some(url) if !url.is_empty() => Self::new(url),
            _ => Self::new(DEFAULT_BASE_URL),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_events(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/events", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_event(&self, input: &NewEvent) -> Result<HttpRequest, ApiError> {
        self.json_post("events", input)
    }

    pub fn build_delete_event(&self, id: &ResourceId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!(
                "{}/events/{}",
                self.base_url,
                utf8_percent_encode(&id.to_string(), PATH_SEGMENT)
            ),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_guest(&self, input: &NewGuest) -> Result<HttpRequest, ApiError> {
        self.json_post("guests", input)
    }

    pub fn build_create_rsvp(&self, event_id: &ResourceId, guest_id: &ResourceId) -> Result<HttpRequest, ApiError> {
        let input = NewRsvp {
            event_id: event_id.clone(),
            guest_id: guest_id.clone(),
        };
        self.json_post("rsvps", &input)
    }

    pub fn parse_list_events(&self, response: HttpResponse) -> Result<Vec<Event>, ApiError> {
        check_status(&response)?;
        decode_data(&response.body)
    }

    pub fn parse_create_event(&self, response: HttpResponse) -> Result<Event, ApiError> {
        check_status(&response)?;
        decode_data(&response.body)
    }

    pub fn parse_delete_event(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    /// A guest without a usable id is a decode failure: nothing could
    /// reference it afterwards.
    pub fn parse_create_guest(&self, response: HttpResponse) -> Result<Guest, ApiError> {
        check_status(&response)?;
        let guest: Guest = decode_data(&response.body)?;
        if guest.id.is_empty() {
            return Err(ApiError::Decode("guest has an empty id".to_string()));
        }
        Ok(guest)
    }

    /// The RSVP body is optional. A success status with an empty or
    /// unrecognized body yields `Ok(None)`.
    pub fn parse_create_rsvp(&self, response: HttpResponse) -> Result<Option<Rsvp>, ApiError> {
        check_status(&response)?;
        if response.body.trim().is_empty() {
            return Ok(None);
        }
        match decode_data::<Rsvp>(&response.body) {
            Ok(rsvp) => Ok(Some(rsvp)),
            Err(e) => {
                log::debug!("ignoring RSVP response body: {e}");
                Ok(None)
            }
        }
    }

    fn json_post<T: Serialize>(&self, resource: &str, input: &T) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/{resource}", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

/// Map a non-2xx status to `ApiError::RequestRejected`, preferring the
/// body's `message` over the canonical status text.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let message = serde_json::from_str::<ErrorBody>(&response.body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| status_text(response.status).to_string());
    log::warn!("request rejected with HTTP {}: {message}", response.status);
    Err(ApiError::RequestRejected {
        status: response.status,
        message,
    })
}

fn status_text(status: u16) -> &'static str {
    ::http::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown Status")
}

fn decode_data<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str::<Envelope<T>>(body)
        .map(|env| env.data)
        .map_err(|e| ApiError::Decode(e.to_string()))
}
