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

//! Error types for reservation processing.

use thiserror::Error;

/// Reservation processing errors.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketError {
    /// Referenced event does not exist
    #[error("event not found")]
    EventNotFound,

    /// Referenced ticket does not exist
    #[error("ticket not found")]
    TicketNotFound,

    /// Ticket type is not on the event, or has no remaining quantity
    #[error("ticket type not found or sold out")]
    TypeNotFound,

    /// Active tickets for the event already meet its capacity
    #[error("event is at capacity")]
    CapacityFull,

    /// Event creation with more allotted tickets than capacity
    #[error("total ticket allotment exceeds event capacity")]
    CapacityExceeded,

    /// Reservation hold window elapsed before purchase
    #[error("reservation hold has expired")]
    HoldExpired,

    /// Ticket status does not permit the requested transition
    #[error("invalid ticket state for this operation")]
    InvalidState,
}
