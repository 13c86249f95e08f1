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

//! In-memory event store.
//!
//! Events are kept in a [`DashMap`] keyed by id, with the id sequence owned
//! by the store itself. The exclusive handle returned by [`EventStore::get_mut`]
//! doubles as the per-event lock the reservation engine serializes on.

use crate::base::EventId;
use crate::error::TicketError;
use crate::event::Event;
use dashmap::DashMap;
use dashmap::mapref::one::RefMut;
use std::sync::atomic::{AtomicU32, Ordering};

/// Store of all known events.
#[derive(Debug)]
pub struct EventStore {
    events: DashMap<EventId, Event>,
    /// Next id to assign. Sequential from 1.
    next_id: AtomicU32,
}

impl EventStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            events: DashMap::new(),
            next_id: AtomicU32::new(1),
        }
    }

    /// Returns a snapshot of every event, ordered by id.
    pub fn get_all(&self) -> Vec<Event> {
        let mut events: Vec<Event> = self.events.iter().map(|e| e.value().clone()).collect();
        events.sort_by_key(|e| e.id.0);
        events
    }

    /// Returns a snapshot of one event, or `None` if no such id exists.
    pub fn get(&self, id: EventId) -> Option<Event> {
        self.events.get(&id).map(|e| e.clone())
    }

    /// Returns an exclusive handle to one event.
    ///
    /// The handle holds the map entry until dropped; concurrent callers for
    /// the same event block. The engine relies on this to serialize
    /// reservations per event.
    pub fn get_mut(&self, id: EventId) -> Option<RefMut<'_, EventId, Event>> {
        self.events.get_mut(&id)
    }

    /// Validates and stores a new event, assigning the next sequential id.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::CapacityExceeded`] when the summed ticket-type
    /// quantities exceed the event's capacity. This check runs at creation
    /// only; [`EventStore::update`] does not repeat it.
    pub fn create(&self, mut event: Event) -> Result<Event, TicketError> {
        if event.total_allotment() > u64::from(event.capacity) {
            return Err(TicketError::CapacityExceeded);
        }

        event.id = EventId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.events.insert(event.id, event.clone());
        Ok(event)
    }

    /// Replaces the body of an existing event in place, keeping its id.
    ///
    /// Returns `false` if no event with that id exists. The allotment-vs-
    /// capacity check is not re-run here (create-time only).
    pub fn update(&self, id: EventId, updated: Event) -> bool {
        match self.events.get_mut(&id) {
            Some(mut existing) => {
                existing.venue = updated.venue;
                existing.date = updated.date;
                existing.description = updated.description;
                existing.capacity = updated.capacity;
                existing.ticket_types = updated.ticket_types;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new()
    }
}
