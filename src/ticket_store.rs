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

//! In-memory ticket store.
//!
//! Tickets live in a [`DashMap`] keyed by id, with the id sequence owned by
//! the store. Ids are sequential, so insertion order is recoverable by
//! sorting; listings return tickets in that order.

use crate::base::{EventId, TicketId};
use crate::ticket::{Ticket, TicketStatus};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use dashmap::mapref::one::RefMut;
use std::sync::atomic::{AtomicU32, Ordering};

/// Store of every ticket ever issued, in any status.
#[derive(Debug)]
pub struct TicketStore {
    tickets: DashMap<TicketId, Ticket>,
    /// Next id to assign. Sequential from 1, global across events.
    next_id: AtomicU32,
}

impl TicketStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            tickets: DashMap::new(),
            next_id: AtomicU32::new(1),
        }
    }

    /// Stores a ticket under the next sequential id and returns the record
    /// with the id populated.
    pub fn add(&self, mut ticket: Ticket) -> Ticket {
        ticket.id = TicketId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.tickets.insert(ticket.id, ticket);
        ticket
    }

    /// Returns a snapshot of one ticket, or `None` if no such id exists.
    pub fn get(&self, id: TicketId) -> Option<Ticket> {
        self.tickets.get(&id).map(|t| *t)
    }

    /// Returns an exclusive handle to one ticket. Status transitions are
    /// atomic while the handle is held.
    pub fn get_mut(&self, id: TicketId) -> Option<RefMut<'_, TicketId, Ticket>> {
        self.tickets.get_mut(&id)
    }

    /// Returns every ticket, ordered by id.
    pub fn get_all(&self) -> Vec<Ticket> {
        let mut tickets: Vec<Ticket> = self.tickets.iter().map(|t| *t.value()).collect();
        tickets.sort_by_key(|t| t.id.0);
        tickets
    }

    /// Returns all tickets for one event, any status, ordered by id.
    pub fn by_event(&self, event_id: EventId) -> Vec<Ticket> {
        let mut tickets: Vec<Ticket> = self
            .tickets
            .iter()
            .filter(|t| t.event_id == event_id)
            .map(|t| *t.value())
            .collect();
        tickets.sort_by_key(|t| t.id.0);
        tickets
    }

    /// Counts tickets for the event that hold a capacity slot: Reserved or
    /// Purchased. Cancelled tickets are excluded.
    pub fn active_count(&self, event_id: EventId) -> usize {
        self.tickets
            .iter()
            .filter(|t| t.event_id == event_id && t.is_active())
            .count()
    }

    /// Cancels every Reserved ticket whose hold age strictly exceeds
    /// `window`, across all events. Returns how many were expired.
    ///
    /// Expiry releases the capacity slot but does not restock the ticket
    /// type's remaining quantity.
    pub fn sweep_expired(&self, now: DateTime<Utc>, window: Duration) -> usize {
        let mut expired = 0;
        for mut ticket in self.tickets.iter_mut() {
            if ticket.hold_expired(now, window) {
                ticket.status = TicketStatus::Cancelled;
                expired += 1;
            }
        }
        expired
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }
}

impl Default for TicketStore {
    fn default() -> Self {
        Self::new()
    }
}
