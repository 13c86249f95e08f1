// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! # Boxoffice
//!
//! This library provides a ticket reservation engine for concert events:
//! timed holds against a per-event capacity, purchases within a 10-minute
//! hold window, and cancellations that return seats to inventory.
//!
//! ## Core Components
//!
//! - [`Engine`]: Reservation engine driving the ticket lifecycle
//! - [`EventStore`] / [`TicketStore`]: In-memory stores with store-owned id
//!   sequences
//! - [`Event`] / [`TicketType`] / [`Ticket`]: The data model
//! - [`TicketError`]: Error kinds for every failure path
//!
//! ## Example
//!
//! ```
//! use boxoffice_rs::{Engine, Event, TicketType, TicketTypeId};
//! use chrono::{TimeZone, Utc};
//! use rust_decimal_macros::dec;
//!
//! let engine = Engine::new();
//!
//! // Register an event with one tier of inventory
//! let event = engine
//!     .events()
//!     .create(Event::new(
//!         "Royal Albert Hall",
//!         Utc.with_ymd_and_hms(2026, 6, 21, 20, 0, 0).unwrap(),
//!         "Midsummer gala",
//!         500,
//!         vec![TicketType::new(
//!             TicketTypeId(1),
//!             "General admission",
//!             dec!(45.00),
//!             300,
//!         )],
//!     ))
//!     .unwrap();
//!
//! // Hold a seat, then buy it
//! let ticket = engine.reserve(event.id, TicketTypeId(1)).unwrap();
//! engine.purchase(ticket.id).unwrap();
//!
//! assert_eq!(engine.tickets_for_event(event.id).len(), 1);
//! ```
//!
//! ## Thread Safety
//!
//! Stores are backed by concurrent maps; the engine serializes reservations
//! per event, so racing callers can never push an event past its capacity.

pub mod error;
mod base;
mod engine;
mod event;
mod event_store;
mod ticket;
mod ticket_store;

pub use base::{EventId, TicketId, TicketTypeId};
pub use engine::Engine;
pub use error::TicketError;
pub use event::{Event, TicketType};
pub use event_store::EventStore;
pub use ticket::{Ticket, TicketStatus};
pub use ticket_store::TicketStore;
