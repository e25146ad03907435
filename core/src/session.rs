//! Operations that actually reach the API.
//!
//! # Design
//! `EventsSession` pairs an `EventsClient` with a `Transport` and runs
//! build → execute → parse for each operation. Every call is one-shot: no
//! retry, no deduplication, no cancellation once issued. The session holds no
//! state besides the client's base URL and the transport.
//!
//! `register_guest_for_event` is the only multi-step operation. Guest
//! creation must finish, and yield a server-assigned id, before the RSVP is
//! sent. A failed RSVP leaves the guest in place; the error hands it back to
//! the caller instead of attempting a compensating delete.

use crate::client::EventsClient;
use crate::error::{ApiError, RegistrationError};
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{Event, Guest, NewEvent, NewGuest, Registration, ResourceId, Rsvp};

#[derive(Debug, Clone)]
pub struct EventsSession<T> {
    client: EventsClient,
    transport: T,
}

impl<T: Transport> EventsSession<T> {
    pub fn new(client: EventsClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &EventsClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn list_events(&self) -> Result<Vec<Event>, ApiError> {
        let response = self.send(self.client.build_list_events())?;
        self.client.parse_list_events(response)
    }

    pub fn create_event(&self, input: &NewEvent) -> Result<Event, ApiError> {
        let response = self.send(self.client.build_create_event(input)?)?;
        let event = self.client.parse_create_event(response)?;
        log::info!("created event {} ({})", event.id, event.name);
        Ok(event)
    }

    pub fn delete_event(&self, id: &ResourceId) -> Result<(), ApiError> {
        let response = self.send(self.client.build_delete_event(id))?;
        self.client.parse_delete_event(response)?;
        log::info!("deleted event {id}");
        Ok(())
    }

    pub fn create_guest(&self, input: &NewGuest) -> Result<Guest, ApiError> {
        let response = self.send(self.client.build_create_guest(input)?)?;
        self.client.parse_create_guest(response)
    }

    pub fn create_rsvp(&self, event_id: &ResourceId, guest_id: &ResourceId) -> Result<Option<Rsvp>, ApiError> {
        let response = self.send(self.client.build_create_rsvp(event_id, guest_id)?)?;
        self.client.parse_create_rsvp(response)
    }

    /// Create a guest, then an RSVP linking it to `event_id`.
    ///
    /// Stops at the first failure. If the RSVP fails the guest already
    /// exists remotely and is returned inside `RegistrationError::RsvpFailed`.
    pub fn register_guest_for_event(
        &self,
        event_id: &ResourceId,
        guest: &NewGuest,
    ) -> Result<Registration, RegistrationError> {
        let guest = self.create_guest(guest).map_err(RegistrationError::GuestFailed)?;

        match self.create_rsvp(event_id, &guest.id) {
            Ok(rsvp) => {
                log::info!("registered guest {} for event {event_id}", guest.id);
                Ok(Registration { guest, rsvp })
            }
            Err(source) => {
                log::warn!("guest {} exists without an RSVP for event {event_id}: {source}", guest.id);
                Err(RegistrationError::RsvpFailed { guest, source })
            }
        }
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        log::debug!("{} {}", request.method, request.path);
        let response = self.transport.execute(&request)?;
        log::debug!("{} {} -> {}", request.method, request.path, response.status);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;
    use crate::http::HttpMethod;

    /// Replays canned results in order and records every request it sees.
    #[derive(Default)]
    struct ScriptedTransport {
        replies: Mutex<VecDeque<Result<HttpResponse, ApiError>>>,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl ScriptedTransport {
        fn reply(self, result: Result<HttpResponse, ApiError>) -> Self {
            self.replies.lock().unwrap().push_back(result);
            self
        }

        fn seen(&self) -> Vec<HttpRequest> {
            self.seen.lock().unwrap().clone()
        }

        fn calls_to(&self, suffix: &str) -> usize {
            self.seen().iter().filter(|r| r.path.ends_with(suffix)).count()
        }
    }

    impl Transport for ScriptedTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            self.seen.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted reply left")
        }
    }

    fn session(transport: ScriptedTransport) -> EventsSession<ScriptedTransport> {
        EventsSession::new(EventsClient::new("http://api.test"), transport)
    }

    fn new_guest() -> NewGuest {
        NewGuest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-0100".to_string(),
        }
    }

    fn guest_created(id: &str) -> HttpResponse {
        HttpResponse::new(
            201,
            format!(r#"{{"data":{{"id":"{id}","name":"Ada","email":"ada@example.com","phone":"555-0100"}}}}"#),
        )
    }

    #[test]
    fn registration_sends_event_id_and_new_guest_id() {
        let s = session(
            ScriptedTransport::default()
                .reply(Ok(guest_created("g-7")))
                .reply(Ok(HttpResponse::new(201, ""))),
        );

        let registration = s
            .register_guest_for_event(&ResourceId::from("e-1"), &new_guest())
            .unwrap();
        assert_eq!(registration.guest.id, ResourceId::from("g-7"));
        assert!(registration.rsvp.is_none());

        let seen = s.transport().seen();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].path, "http://api.test/guests");
        assert_eq!(seen[1].method, HttpMethod::Post);
        assert_eq!(seen[1].path, "http://api.test/rsvps");
        let body: serde_json::Value = serde_json::from_str(seen[1].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"eventId": "e-1", "guestId": "g-7"}));
    }

    #[test]
    fn registration_forwards_numeric_ids_unchanged() {
        let s = session(
            ScriptedTransport::default()
                .reply(Ok(HttpResponse::new(
                    201,
                    r#"{"data":{"id":12,"name":"Ada","email":"ada@example.com","phone":"555-0100"}}"#,
                )))
                .reply(Ok(HttpResponse::new(201, ""))),
        );

        let registration = s
            .register_guest_for_event(&ResourceId::from(42_u64), &new_guest())
            .unwrap();
        assert_eq!(registration.guest.id, ResourceId::from(12_u64));

        let seen = s.transport().seen();
        let body: serde_json::Value = serde_json::from_str(seen[1].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"eventId": 42, "guestId": 12}));
    }

    #[test]
    fn registration_stops_when_guest_id_is_empty() {
        let s = session(ScriptedTransport::default().reply(Ok(guest_created(""))));

        let err = s
            .register_guest_for_event(&ResourceId::from("e-1"), &new_guest())
            .unwrap_err();
        assert!(matches!(err, RegistrationError::GuestFailed(ApiError::Decode(_))));
        assert_eq!(s.transport().calls_to("/guests"), 1);
        assert_eq!(s.transport().calls_to("/rsvps"), 0);
    }

    #[test]
    fn registration_stops_when_guest_transport_fails() {
        let s = session(ScriptedTransport::default().reply(Err(ApiError::Fetch("connection refused".into()))));

        let err = s
            .register_guest_for_event(&ResourceId::from("e-1"), &new_guest())
            .unwrap_err();
        assert!(matches!(err, RegistrationError::GuestFailed(ApiError::Fetch(_))));
        assert!(err.orphaned_guest().is_none());
        assert_eq!(s.transport().calls_to("/guests"), 1);
        assert_eq!(s.transport().calls_to("/rsvps"), 0);
    }

    #[test]
    fn registration_stops_when_guest_is_rejected() {
        let s = session(
            ScriptedTransport::default().reply(Ok(HttpResponse::new(400, r#"{"message":"email is required"}"#))),
        );

        let err = s
            .register_guest_for_event(&ResourceId::from("e-1"), &new_guest())
            .unwrap_err();
        match err.api_error() {
            ApiError::RequestRejected { status, message } => {
                assert_eq!(*status, 400);
                assert_eq!(message, "email is required");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(s.transport().calls_to("/rsvps"), 0);
    }

    #[test]
    fn registration_stops_when_guest_body_is_garbage() {
        let s = session(ScriptedTransport::default().reply(Ok(HttpResponse::new(201, "{}"))));

        let err = s
            .register_guest_for_event(&ResourceId::from("e-1"), &new_guest())
            .unwrap_err();
        assert!(matches!(err, RegistrationError::GuestFailed(ApiError::Decode(_))));
        assert_eq!(s.transport().calls_to("/rsvps"), 0);
    }

    #[test]
    fn failed_rsvp_keeps_the_guest() {
        let s = session(
            ScriptedTransport::default()
                .reply(Ok(guest_created("g-8")))
                .reply(Ok(HttpResponse::new(404, r#"{"message":"event not found"}"#))),
        );

        let err = s
            .register_guest_for_event(&ResourceId::from("missing"), &new_guest())
            .unwrap_err();
        assert_eq!(err.orphaned_guest().map(|g| g.id.clone()), Some(ResourceId::from("g-8")));
        assert_eq!(err.api_error().status(), Some(404));
        // No compensating delete or retry was issued.
        assert_eq!(s.transport().seen().len(), 2);
    }

    #[test]
    fn create_event_returns_decoded_event() {
        let s = session(ScriptedTransport::default().reply(Ok(HttpResponse::new(
            201,
            r#"{"data":{"id":"42","name":"Launch Party","date":"2024-12-01T18:00:00.000Z","location":"HQ","description":"Kickoff"}}"#,
        ))));
        let input: NewEvent = serde_json::from_value(serde_json::json!({
            "name": "Launch Party",
            "date": "2024-12-01T18:00:00.000Z",
            "location": "HQ",
            "description": "Kickoff",
        }))
        .unwrap();

        let event = s.create_event(&input).unwrap();
        assert_eq!(event.id, ResourceId::from("42"));
        assert!(input.matches(&event));
    }

    #[test]
    fn list_events_surfaces_fetch_error() {
        let s = session(ScriptedTransport::default().reply(Err(ApiError::Fetch("dns failure".into()))));
        assert!(matches!(s.list_events().unwrap_err(), ApiError::Fetch(_)));
    }

    #[test]
    fn list_events_empty_body_is_decode_error() {
        let s = session(ScriptedTransport::default().reply(Ok(HttpResponse::new(200, ""))));
        assert!(matches!(s.list_events().unwrap_err(), ApiError::Decode(_)));
    }

    #[test]
    fn delete_event_is_not_retried() {
        let s = session(ScriptedTransport::default().reply(Ok(HttpResponse::new(503, ""))));
        let err = s.delete_event(&ResourceId::from("1")).unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert_eq!(s.transport().seen().len(), 1);
    }
}
