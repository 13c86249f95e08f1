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

//! Ticket records.
//!
//! Tickets follow a state machine:
//! - [`Reserved`] → [`Purchased`] (via purchase, within the hold window)
//! - [`Reserved`] → [`Cancelled`] (via hold expiry)
//! - [`Purchased`] → [`Cancelled`] (via cancel)
//!
//! `Cancelled` is terminal.
//!
//! [`Reserved`]: TicketStatus::Reserved
//! [`Purchased`]: TicketStatus::Purchased
//! [`Cancelled`]: TicketStatus::Cancelled

use crate::base::{EventId, TicketId, TicketTypeId};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TicketStatus {
    Reserved,
    Purchased,
    Cancelled,
}

/// A single sold or held seat, created by a successful reservation.
///
/// Tickets are never deleted; expired or cancelled tickets remain in the
/// store with status [`TicketStatus::Cancelled`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ticket {
    pub id: TicketId,
    pub event_id: EventId,
    pub ticket_type_id: TicketTypeId,
    /// When the hold was taken. The hold window is measured from here.
    pub reserved_at: DateTime<Utc>,
    pub status: TicketStatus,
}

impl Ticket {
    /// Creates a fresh hold. The id is a placeholder until the ticket store
    /// assigns the real one on insert.
    pub fn reserved(
        event_id: EventId,
        ticket_type_id: TicketTypeId,
        reserved_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TicketId(0),
            event_id,
            ticket_type_id,
            reserved_at,
            status: TicketStatus::Reserved,
        }
    }

    /// Whether this ticket counts against its event's capacity.
    pub fn is_active(&self) -> bool {
        matches!(self.status, TicketStatus::Reserved | TicketStatus::Purchased)
    }

    /// Whether this hold has outlived the window. Only Reserved tickets can
    /// expire; the age comparison is strictly greater-than, so a hold aged
    /// exactly `window` is still valid.
    pub fn hold_expired(&self, now: DateTime<Utc>, window: Duration) -> bool {
        self.status == TicketStatus::Reserved && now - self.reserved_at > window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minted(reserved_at: DateTime<Utc>) -> Ticket {
        Ticket::reserved(EventId(1), TicketTypeId(1), reserved_at)
    }

    #[test]
    fn hold_at_exact_window_is_still_valid() {
        let now = Utc::now();
        let ticket = minted(now - Duration::minutes(10));
        assert!(!ticket.hold_expired(now, Duration::minutes(10)));
    }

    #[test]
    fn hold_past_window_is_expired() {
        let now = Utc::now();
        let ticket = minted(now - Duration::minutes(10) - Duration::seconds(1));
        assert!(ticket.hold_expired(now, Duration::minutes(10)));
    }

    #[test]
    fn purchased_tickets_never_expire() {
        let now = Utc::now();
        let mut ticket = minted(now - Duration::hours(2));
        ticket.status = TicketStatus::Purchased;
        assert!(!ticket.hold_expired(now, Duration::minutes(10)));
    }

    #[test]
    fn active_covers_reserved_and_purchased() {
        let mut ticket = minted(Utc::now());
        assert!(ticket.is_active());
        ticket.status = TicketStatus::Purchased;
        assert!(ticket.is_active());
        ticket.status = TicketStatus::Cancelled;
        assert!(!ticket.is_active());
    }
}
