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

//! Event and ticket-type records.

use crate::base::{EventId, TicketTypeId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One tier of inventory on an event (e.g. "General admission", "VIP").
///
/// `remaining` is the live counter: decremented when a reservation is taken,
/// incremented when a purchased ticket is cancelled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TicketType {
    pub id: TicketTypeId,
    pub name: String,
    pub price: Decimal,
    pub remaining: u32,
}

impl TicketType {
    pub fn new(id: TicketTypeId, name: impl Into<String>, price: Decimal, remaining: u32) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            remaining,
        }
    }
}

/// A concert event with a hard capacity and an ordered list of ticket types.
///
/// The id is assigned by the event store at creation and is immutable after
/// that; everything else is replaceable via update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Event {
    pub id: EventId,
    pub venue: String,
    pub date: DateTime<Utc>,
    pub description: String,
    /// Maximum number of simultaneously active (Reserved or Purchased)
    /// tickets, across all ticket types.
    pub capacity: u32,
    pub ticket_types: Vec<TicketType>,
}

impl Event {
    /// Creates an event body awaiting id assignment by the store.
    pub fn new(
        venue: impl Into<String>,
        date: DateTime<Utc>,
        description: impl Into<String>,
        capacity: u32,
        ticket_types: Vec<TicketType>,
    ) -> Self {
        Self {
            id: EventId(0),
            venue: venue.into(),
            date,
            description: description.into(),
            capacity,
            ticket_types,
        }
    }

    pub fn ticket_type(&self, id: TicketTypeId) -> Option<&TicketType> {
        self.ticket_types.iter().find(|t| t.id == id)
    }

    pub fn ticket_type_mut(&mut self, id: TicketTypeId) -> Option<&mut TicketType> {
        self.ticket_types.iter_mut().find(|t| t.id == id)
    }

    /// Sum of remaining quantities across all ticket types. Compared against
    /// capacity when the event is created.
    pub fn total_allotment(&self) -> u64 {
        self.ticket_types
            .iter()
            .map(|t| u64::from(t.remaining))
            .sum()
    }
}
