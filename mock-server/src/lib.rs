use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub date: String,
    pub location: String,
    pub description: String,
}

#[derive(Deserialize)]
pub struct CreateEvent {
    pub name: String,
    pub date: String,
    pub location: String,
    pub description: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Guest {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Deserialize)]
pub struct CreateGuest {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rsvp {
    pub id: Uuid,
    pub event_id: Uuid,
    pub guest_id: Uuid,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRsvp {
    pub event_id: String,
    pub guest_id: String,
}

/// Success wrapper: `{ "success": true, "data": ... }`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

fn envelope<T>(data: T) -> Json<Envelope<T>> {
    Json(Envelope { success: true, data })
}

/// Failure body: `{ "success": false, "message": ... }`.
pub struct ApiFailure {
    status: StatusCode,
    message: String,
}

impl ApiFailure {
    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        log::warn!("{} {}", self.status, self.message);
        let body = json!({ "success": false, "message": self.message });
        (self.status, Json(body)).into_response()
    }
}

#[derive(Debug, Default)]
pub struct Store {
    pub events: Vec<Event>,
    pub guests: Vec<Guest>,
    pub rsvps: Vec<Rsvp>,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/{id}", delete(delete_event))
        .route("/guests", get(list_guests).post(create_guest))
        .route("/rsvps", get(list_rsvps).post(create_rsvp))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_events(State(db): State<Db>) -> Json<Envelope<Vec<Event>>> {
    let store = db.read().await;
    envelope(store.events.clone())
}

async fn create_event(
    State(db): State<Db>,
    Json(input): Json<CreateEvent>,
) -> (StatusCode, Json<Envelope<Event>>) {
    let event = Event {
        id: Uuid::new_v4(),
        name: input.name,
        date: input.date,
        location: input.location,
        description: input.description,
    };
    log::info!("created event {}", event.id);
    db.write().await.events.push(event.clone());
    (StatusCode::CREATED, envelope(event))
}

async fn delete_event(State(db): State<Db>, Path(id): Path<String>) -> Result<StatusCode, ApiFailure> {
    let mut store = db.write().await;
    let position = store
        .events
        .iter()
        .position(|e| e.id.to_string() == id)
        .ok_or_else(|| ApiFailure::not_found(format!("event {id} not found")))?;
    store.events.remove(position);
    log::info!("deleted event {id}");
    Ok(StatusCode::NO_CONTENT)
}

async fn list_guests(State(db): State<Db>) -> Json<Envelope<Vec<Guest>>> {
    let store = db.read().await;
    envelope(store.guests.clone())
}

async fn create_guest(
    State(db): State<Db>,
    Json(input): Json<CreateGuest>,
) -> (StatusCode, Json<Envelope<Guest>>) {
    let guest = Guest {
        id: Uuid::new_v4(),
        name: input.name,
        email: input.email,
        phone: input.phone,
    };
    log::info!("created guest {}", guest.id);
    db.write().await.guests.push(guest.clone());
    (StatusCode::CREATED, envelope(guest))
}

async fn list_rsvps(State(db): State<Db>) -> Json<Envelope<Vec<Rsvp>>> {
    let store = db.read().await;
    envelope(store.rsvps.clone())
}

async fn create_rsvp(
    State(db): State<Db>,
    Json(input): Json<CreateRsvp>,
) -> Result<(StatusCode, Json<Envelope<Rsvp>>), ApiFailure> {
    let mut store = db.write().await;
    let event_id = store
        .events
        .iter()
        .find(|e| e.id.to_string() == input.event_id)
        .map(|e| e.id)
        .ok_or_else(|| ApiFailure::not_found(format!("event {} not found", input.event_id)))?;
    let guest_id = store
        .guests
        .iter()
        .find(|g| g.id.to_string() == input.guest_id)
        .map(|g| g.id)
        .ok_or_else(|| ApiFailure::not_found(format!("guest {} not found", input.guest_id)))?;
    let rsvp = Rsvp {
        id: Uuid::new_v4(),
        event_id,
        guest_id,
    };
    log::info!("guest {guest_id} RSVP'd to event {event_id}");
    store.rsvps.push(rsvp.clone());
    Ok((StatusCode::CREATED, envelope(rsvp)))
}
