//! Simple REST API server example for the ticket reservation engine.
//!
//! Run with: `cargo run --example server`
//!
//! ## Endpoints
//!
//! - `GET /events` - List all events
//! - `POST /events` - Create an event
//! - `GET /events/{id}` - Get an event by id
//! - `PUT /events/{id}` - Update an event
//! - `GET /events/{id}/tickets` - List all tickets for an event
//! - `POST /tickets/reserve` - Reserve a ticket
//! - `POST /tickets/{id}/purchase` - Purchase a reserved ticket
//! - `POST /tickets/{id}/cancel` - Cancel a purchased ticket
//!
//! ## Example Usage
//!
//! ```bash
//! # Create an event
//! curl -X POST http://localhost:3000/events \
//!   -H "Content-Type: application/json" \
//!   -d '{"venue": "Red Rocks", "date": "2026-06-21T20:00:00Z", "description": "Summer solstice show", "capacity": 500, "ticket_types": [{"id": 1, "name": "GA", "price": "45.00", "quantity": 300}]}'
//!
//! # Reserve a ticket
//! curl -X POST http://localhost:3000/tickets/reserve \
//!   -H "Content-Type: application/json" \
//!   -d '{"event_id": 1, "ticket_type_id": 1}'
//!
//! # Purchase it
//! curl -X POST http://localhost:3000/tickets/1/purchase
//! ```

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use boxoffice_rs::{Engine, Event, EventId, Ticket, TicketError, TicketId, TicketType, TicketTypeId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;

// === Request/Response DTOs ===

/// One ticket type in an event request body.
#[derive(Debug, Deserialize)]
pub struct TicketTypeRequest {
    pub id: u32,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
}

/// Request body for creating or updating an event.
#[derive(Debug, Deserialize)]
pub struct EventRequest {
    pub venue: String,
    pub date: DateTime<Utc>,
    pub description: String,
    pub capacity: u32,
    pub ticket_types: Vec<TicketTypeRequest>,
}

impl EventRequest {
    /// Converts the request DTO into the internal event body.
    fn into_event(self) -> Event {
        Event::new(
            self.venue,
            self.date,
            self.description,
            self.capacity,
            self.ticket_types
                .into_iter()
                .map(|t| TicketType::new(TicketTypeId(t.id), t.name, t.price, t.quantity))
                .collect(),
        )
    }
}

/// Request body for reserving a ticket.
#[derive(Debug, Deserialize)]
pub struct ReserveRequest {
    pub event_id: u32,
    pub ticket_type_id: u32,
}

/// Response body for errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

// === Application State ===

/// Shared application state containing the reservation engine.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
}

// === Error Handling ===

/// Wrapper for converting `TicketError` into HTTP responses.
pub struct AppError(TicketError);

impl From<TicketError> for AppError {
    fn from(err: TicketError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            TicketError::EventNotFound => (StatusCode::NOT_FOUND, "EVENT_NOT_FOUND"),
            TicketError::TicketNotFound => (StatusCode::NOT_FOUND, "TICKET_NOT_FOUND"),
            TicketError::TypeNotFound => (StatusCode::NOT_FOUND, "TICKET_TYPE_NOT_FOUND"),
            TicketError::CapacityFull => (StatusCode::UNPROCESSABLE_ENTITY, "CAPACITY_FULL"),
            TicketError::CapacityExceeded => (StatusCode::BAD_REQUEST, "CAPACITY_EXCEEDED"),
            TicketError::HoldExpired => (StatusCode::CONFLICT, "HOLD_EXPIRED"),
            TicketError::InvalidState => (StatusCode::CONFLICT, "INVALID_STATE"),
        };

        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}

fn not_found(code: &str, message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: message.to_string(),
            code: code.to_string(),
        }),
    )
}

// === Handlers ===

/// GET /events - List all events.
async fn list_events(State(state): State<AppState>) -> Json<Vec<Event>> {
    Json(state.engine.events().get_all())
}

/// GET /events/{id} - Get event by id.
async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<Event>, (StatusCode, Json<ErrorResponse>)> {
    state
        .engine
        .events()
        .get(EventId(id))
        .map(Json)
        .ok_or_else(|| not_found("EVENT_NOT_FOUND", "Event not found"))
}

/// POST /events - Create a new event.
async fn create_event(
    State(state): State<AppState>,
    Json(request): Json<EventRequest>,
) -> Result<(StatusCode, Json<Event>), AppError> {
    let event = state.engine.events().create(request.into_event())?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// PUT /events/{id} - Replace an event's body.
async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(request): Json<EventRequest>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    if state.engine.events().update(EventId(id), request.into_event()) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("EVENT_NOT_FOUND", "Event not found"))
    }
}

/// GET /events/{id}/tickets - List all tickets for an event.
async fn list_event_tickets(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Json<Vec<Ticket>> {
    Json(state.engine.tickets_for_event(EventId(id)))
}

/// POST /tickets/reserve - Take a hold on a seat.
async fn reserve_ticket(
    State(state): State<AppState>,
    Json(request): Json<ReserveRequest>,
) -> Result<Json<Ticket>, AppError> {
    let ticket = state.engine.reserve(
        EventId(request.event_id),
        TicketTypeId(request.ticket_type_id),
    )?;
    Ok(Json(ticket))
}

/// POST /tickets/{id}/purchase - Convert a hold into a sale.
async fn purchase_ticket(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<StatusCode, AppError> {
    state.engine.purchase(TicketId(id))?;
    Ok(StatusCode::OK)
}

/// POST /tickets/{id}/cancel - Void a purchased ticket.
async fn cancel_ticket(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<StatusCode, AppError> {
    state.engine.cancel(TicketId(id))?;
    Ok(StatusCode::OK)
}

// === Router ===

fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/{id}", get(get_event).put(update_event))
        .route("/events/{id}/tickets", get(list_event_tickets))
        .route("/tickets/reserve", post(reserve_ticket))
        .route("/tickets/{id}/purchase", post(purchase_ticket))
        .route("/tickets/{id}/cancel", post(cancel_ticket))
        .with_state(state)
}

// === Main ===

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let state = AppState {
        engine: Arc::new(Engine::new()),
    };

    let app = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:3000").await.unwrap();
    println!("Boxoffice API server running on http://127.0.0.1:3000");
    println!();
    println!("Endpoints:");
    println!("  GET  /events                  - List all events");
    println!("  POST /events                  - Create an event");
    println!("  GET  /events/:id              - Get event by id");
    println!("  PUT  /events/:id              - Update an event");
    println!("  GET  /events/:id/tickets      - List tickets for an event");
    println!("  POST /tickets/reserve         - Reserve a ticket");
    println!("  POST /tickets/:id/purchase    - Purchase a reserved ticket");
    println!("  POST /tickets/:id/cancel      - Cancel a purchased ticket");

    axum::serve(listener, app).await.unwrap();
}
