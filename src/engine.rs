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

//! Reservation engine.
//!
//! The [`Engine`] is the central component that moves tickets through their
//! lifecycle against the event and ticket stores. It handles reservations,
//! purchases, cancellations, and reclamation of expired holds.
//!
//! # Operations
//!
//! - **Reserve**: take a 10-minute hold on one seat of a ticket type,
//!   subject to event capacity and type quantity.
//! - **Purchase**: convert a live hold into a sale.
//! - **Cancel**: void a purchased ticket and return its seat to inventory.
//!
//! # Thread Safety
//!
//! Both stores use [`DashMap`](dashmap::DashMap); the engine's mutual
//! exclusion discipline is built on their entry handles. `reserve` holds the
//! event's entry for the whole operation, so two reservations against the
//! same event serialize and can never both pass the capacity check. The lock
//! order is event entry before ticket entries; no code path acquires an
//! event entry while holding a ticket entry, so the two maps cannot form a
//! cycle.

use crate::base::{EventId, TicketId, TicketTypeId};
use crate::error::TicketError;
use crate::event_store::EventStore;
use crate::ticket::{Ticket, TicketStatus};
use crate::ticket_store::TicketStore;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

/// Reservation engine orchestrating the event and ticket stores.
///
/// # Invariants
///
/// - A ticket type's remaining quantity never goes below zero.
/// - Active (Reserved + Purchased) tickets for an event never exceed its
///   capacity at reservation time.
/// - Purchase is only valid from Reserved; cancel only from Purchased;
///   nothing transitions out of Cancelled.
/// - One UTC clock is used for both the reservation sweep and the purchase
///   expiry check.
pub struct Engine {
    events: Arc<EventStore>,
    tickets: Arc<TicketStore>,
}

impl Engine {
    /// How long a hold stays valid before it expires.
    pub const HOLD_WINDOW_MINUTES: i64 = 10;

    /// The hold window as a duration.
    pub fn hold_window() -> Duration {
        Duration::minutes(Self::HOLD_WINDOW_MINUTES)
    }

    /// Creates an engine with fresh, empty stores.
    pub fn new() -> Self {
        Self::with_stores(Arc::new(EventStore::new()), Arc::new(TicketStore::new()))
    }

    /// Creates an engine over existing stores.
    ///
    /// The stores are shared; callers keeping their own `Arc` can read (and
    /// in tests, manipulate) state the engine operates on.
    pub fn with_stores(events: Arc<EventStore>, tickets: Arc<TicketStore>) -> Self {
        Self { events, tickets }
    }

    /// The event store backing this engine.
    pub fn events(&self) -> &EventStore {
        &self.events
    }

    /// The ticket store backing this engine.
    pub fn tickets(&self) -> &TicketStore {
        &self.tickets
    }

    /// Takes a hold on one seat of `ticket_type_id` at `event_id`.
    ///
    /// Before counting capacity, every expired hold in the store is swept to
    /// Cancelled — globally, not just for this event — so stale holds from
    /// anywhere free their capacity slots on the next reservation.
    ///
    /// # Errors
    ///
    /// - [`TicketError::EventNotFound`] - No event with that id.
    /// - [`TicketError::CapacityFull`] - Active tickets already meet the
    ///   event's capacity.
    /// - [`TicketError::TypeNotFound`] - The type is not on the event, or
    ///   its remaining quantity is zero.
    ///
    /// Failure paths leave both stores untouched.
    pub fn reserve(
        &self,
        event_id: EventId,
        ticket_type_id: TicketTypeId,
    ) -> Result<Ticket, TicketError> {
        let now = Utc::now();

        // Exclusive handle: serializes reservations for this event. Held
        // until the new ticket is persisted.
        let mut event = self
            .events
            .get_mut(event_id)
            .ok_or(TicketError::EventNotFound)?;

        let expired = self.tickets.sweep_expired(now, Self::hold_window());
        if expired > 0 {
            debug!(expired, "sweep released expired holds");
        }

        let active = self.tickets.active_count(event_id);
        if active as u64 >= u64::from(event.capacity) {
            return Err(TicketError::CapacityFull);
        }

        let ticket_type = event
            .ticket_type_mut(ticket_type_id)
            .ok_or(TicketError::TypeNotFound)?;
        if ticket_type.remaining == 0 {
            return Err(TicketError::TypeNotFound);
        }
        ticket_type.remaining -= 1;

        let ticket = self
            .tickets
            .add(Ticket::reserved(event_id, ticket_type_id, now));
        debug!(ticket = %ticket.id, event = %event_id, "hold taken");
        Ok(ticket)
    }

    /// Converts a live hold into a sale.
    ///
    /// The ticket type's quantity does not change here; it was already
    /// decremented when the hold was taken.
    ///
    /// # Errors
    ///
    /// - [`TicketError::TicketNotFound`] - No ticket with that id.
    /// - [`TicketError::InvalidState`] - The ticket is not Reserved.
    /// - [`TicketError::HoldExpired`] - The hold window elapsed; the ticket
    ///   is cancelled as a side effect (lazy expiry on touch).
    pub fn purchase(&self, ticket_id: TicketId) -> Result<(), TicketError> {
        let now = Utc::now();

        let mut ticket = self
            .tickets
            .get_mut(ticket_id)
            .ok_or(TicketError::TicketNotFound)?;
        if ticket.status != TicketStatus::Reserved {
            return Err(TicketError::InvalidState);
        }
        if ticket.hold_expired(now, Self::hold_window()) {
            ticket.status = TicketStatus::Cancelled;
            return Err(TicketError::HoldExpired);
        }

        ticket.status = TicketStatus::Purchased;
        Ok(())
    }

    /// Voids a purchased ticket and returns its seat to inventory.
    ///
    /// Restocking is best-effort: if an event update replaced the ticket
    /// types since the sale, there may be no type to return the seat to. The
    /// cancellation still succeeds.
    ///
    /// # Errors
    ///
    /// - [`TicketError::TicketNotFound`] - No ticket with that id.
    /// - [`TicketError::InvalidState`] - The ticket is not Purchased
    ///   (reserved-but-unpurchased holds can only expire, not cancel).
    pub fn cancel(&self, ticket_id: TicketId) -> Result<(), TicketError> {
        // Transition under the ticket entry, then restock after releasing
        // it: the event entry is never acquired while a ticket entry is
        // held.
        let (event_id, ticket_type_id) = {
            let mut ticket = self
                .tickets
                .get_mut(ticket_id)
                .ok_or(TicketError::TicketNotFound)?;
            if ticket.status != TicketStatus::Purchased {
                return Err(TicketError::InvalidState);
            }
            ticket.status = TicketStatus::Cancelled;
            (ticket.event_id, ticket.ticket_type_id)
        };

        match self.events.get_mut(event_id) {
            Some(mut event) => match event.ticket_type_mut(ticket_type_id) {
                Some(ticket_type) => ticket_type.remaining += 1,
                None => warn!(%event_id, %ticket_type_id, "no ticket type to restock"),
            },
            None => warn!(%event_id, "no event to restock"),
        }

        Ok(())
    }

    /// All tickets for an event, any status, ordered by id.
    pub fn tickets_for_event(&self, event_id: EventId) -> Vec<Ticket> {
        self.tickets.by_event(event_id)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
