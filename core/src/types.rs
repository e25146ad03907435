//! Domain DTOs for the events API.
//!
//! # Design
//! These types mirror the remote API's schema but are owned by the client.
//! Server-assigned identifiers are opaque: the API may send them as strings
//! or integers, and `ResourceId` remembers which.
//! The `{ data: ... }` wrapper is modeled explicitly as `Envelope` so that a
//! missing `data` field is a decode failure rather than an assumption.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::datetime::iso_millis;

/// Server-assigned identifier of an event, guest or RSVP.
///
/// Keeps the JSON type the server used so the id goes back out exactly as it
/// came in: `12` stays a number, `"12"` stays a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum ResourceId {
    Num(u64),
    Str(String),
}

impl ResourceId {
    /// An id that cannot name a record: the empty string.
    pub fn is_empty(&self) -> bool {
        matches!(self, ResourceId::Str(s) if s.is_empty())
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Num(n) => write!(f, "{n}"),
            ResourceId::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        ResourceId::Str(value.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(value: String) -> Self {
        ResourceId::Str(value)
    }
}

impl From<u64> for ResourceId {
    fn from(value: u64) -> Self {
        ResourceId::Num(value)
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = ResourceId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string or non-negative integer identifier")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<ResourceId, E> {
                Ok(ResourceId::Str(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<ResourceId, E> {
                Ok(ResourceId::Str(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<ResourceId, E> {
                Ok(ResourceId::Num(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<ResourceId, E> {
                u64::try_from(v)
                    .map(ResourceId::Num)
                    .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

/// An event as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Event {
    pub id: ResourceId,
    pub name: String,
    #[serde(with = "iso_millis")]
    pub date: DateTime<Utc>,
    pub location: String,
    pub description: String,
}

/// Request payload for creating an event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewEvent {
    pub name: String,
    #[serde(with = "iso_millis")]
    pub date: DateTime<Utc>,
    pub location: String,
    pub description: String,
}

impl NewEvent {
    /// Whether `event` carries exactly these fields.
    pub fn matches(&self, event: &Event) -> bool {
        self.name == event.name
            && self.date == event.date
            && self.location == event.location
            && self.description == event.description
    }
}

/// A guest as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Guest {
    pub id: ResourceId,
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Request payload for creating a guest. Fields are forwarded as given.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewGuest {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Request payload linking a guest to an event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewRsvp {
    pub event_id: ResourceId,
    pub guest_id: ResourceId,
}

/// An RSVP record, when the API echoes one back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Rsvp {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ResourceId>,
    pub event_id: ResourceId,
    pub guest_id: ResourceId,
}

/// Outcome of a successful guest registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub guest: Guest,
    pub rsvp: Option<Rsvp>,
}

/// The `{ data: ... }` wrapper around every success payload. Other fields
/// (`success`, `error`) are ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: T,
}

/// The optional `{ message: ... }` body of a failed request.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_id_keeps_json_type() {
        let from_str: ResourceId = serde_json::from_str(r#""42""#).unwrap();
        let from_int: ResourceId = serde_json::from_str("42").unwrap();
        assert_eq!(from_str, ResourceId::from("42"));
        assert_eq!(from_int, ResourceId::from(42_u64));
        assert_ne!(from_str, from_int);
        assert_eq!(from_int.to_string(), "42");
    }

    #[test]
    fn resource_id_rejects_objects_and_negatives() {
        assert!(serde_json::from_str::<ResourceId>(r#"{"id":1}"#).is_err());
        assert!(serde_json::from_str::<ResourceId>("-3").is_err());
    }

    #[test]
    fn resource_id_serializes_back_unchanged() {
        assert_eq!(serde_json::to_string(&ResourceId::from(7_u64)).unwrap(), "7");
        assert_eq!(serde_json::to_string(&ResourceId::from("7")).unwrap(), r#""7""#);
    }

    #[test]
    fn only_empty_string_id_is_empty() {
        assert!(ResourceId::from("").is_empty());
        assert!(!ResourceId::from(0_u64).is_empty());
    }

    #[test]
    fn new_rsvp_uses_camel_case_keys() {
        let rsvp = NewRsvp {
            event_id: "e1".into(),
            guest_id: "g1".into(),
        };
        let json = serde_json::to_value(&rsvp).unwrap();
        assert_eq!(json, serde_json::json!({"eventId": "e1", "guestId": "g1"}));
    }

    #[test]
    fn event_requires_every_field() {
        let result: Result<Event, _> = serde_json::from_str(
            r#"{"id":1,"name":"x","date":"2024-12-01T18:00:00.000Z","location":"HQ"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn envelope_ignores_extra_fields() {
        let env: Envelope<Vec<Event>> =
            serde_json::from_str(r#"{"success":true,"error":null,"data":[]}"#).unwrap();
        assert!(env.data.is_empty());
    }

    #[test]
    fn rsvp_id_is_optional() {
        let rsvp: Rsvp = serde_json::from_str(r#"{"eventId":1,"guestId":"g"}"#).unwrap();
        assert!(rsvp.id.is_none());
        assert_eq!(rsvp.event_id, ResourceId::from(1_u64));
    }
}
