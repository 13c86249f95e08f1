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

//! Event and ticket store integration tests.

use boxoffice_rs::{
    Event, EventId, EventStore, Ticket, TicketError, TicketId, TicketStatus, TicketStore,
    TicketType, TicketTypeId,
};
use chrono::{Duration, Utc};
use rust_decimal_macros::dec;

fn make_event(capacity: u32, quantities: &[u32]) -> Event {
    let ticket_types = quantities
        .iter()
        .enumerate()
        .map(|(i, &q)| {
            TicketType::new(
                TicketTypeId(i as u32 + 1),
                format!("tier-{}", i + 1),
                dec!(25.00),
                q,
            )
        })
        .collect();
    Event::new("Union Chapel", Utc::now(), "store fixture", capacity, ticket_types)
}

fn reserved(event: u32, minutes_ago: i64) -> Ticket {
    Ticket::reserved(
        EventId(event),
        TicketTypeId(1),
        Utc::now() - Duration::minutes(minutes_ago),
    )
}

// === Event Store ===

#[test]
fn create_assigns_sequential_ids() {
    let store = EventStore::new();
    let first = store.create(make_event(10, &[5])).unwrap();
    let second = store.create(make_event(20, &[5])).unwrap();

    assert_eq!(first.id, EventId(1));
    assert_eq!(second.id, EventId(2));
    assert_eq!(store.len(), 2);
}

#[test]
fn create_rejects_over_allotment() {
    let store = EventStore::new();
    let result = store.create(make_event(10, &[6, 5]));

    assert_eq!(result.unwrap_err(), TicketError::CapacityExceeded);
    assert!(store.is_empty());
}

#[test]
fn create_accepts_allotment_equal_to_capacity() {
    let store = EventStore::new();
    let event = store.create(make_event(10, &[6, 4])).unwrap();
    assert_eq!(event.total_allotment(), 10);
}

#[test]
fn create_accepts_empty_type_list() {
    let store = EventStore::new();
    let event = store.create(make_event(10, &[])).unwrap();
    assert!(event.ticket_types.is_empty());
}

#[test]
fn get_returns_detached_snapshot() {
    let store = EventStore::new();
    let event = store.create(make_event(10, &[5])).unwrap();

    let mut snapshot = store.get(event.id).unwrap();
    snapshot.venue = "scribbled over".to_string();

    assert_eq!(store.get(event.id).unwrap().venue, "Union Chapel");
}

#[test]
fn update_replaces_body_and_keeps_id() {
    let store = EventStore::new();
    let event = store.create(make_event(10, &[5])).unwrap();

    let mut replacement = make_event(30, &[7]);
    replacement.venue = "Brixton Academy".to_string();
    assert!(store.update(event.id, replacement));

    let updated = store.get(event.id).unwrap();
    assert_eq!(updated.id, event.id);
    assert_eq!(updated.venue, "Brixton Academy");
    assert_eq!(updated.capacity, 30);
    assert_eq!(updated.ticket_types.len(), 1);
}

#[test]
fn update_missing_event_returns_false() {
    let store = EventStore::new();
    assert!(!store.update(EventId(9), make_event(10, &[5])));
}

#[test]
fn update_does_not_revalidate_allotment() {
    let store = EventStore::new();
    let event = store.create(make_event(10, &[5])).unwrap();

    // Over-allotted body goes through: the check is create-time only
    assert!(store.update(event.id, make_event(2, &[50])));
    assert_eq!(store.get(event.id).unwrap().total_allotment(), 50);
}

#[test]
fn get_all_is_ordered_by_id() {
    let store = EventStore::new();
    for capacity in [30, 10, 20] {
        store.create(make_event(capacity, &[])).unwrap();
    }

    let events = store.get_all();
    let ids: Vec<u32> = events.iter().map(|e| e.id.0).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

// === Ticket Store ===

#[test]
fn add_assigns_sequential_ids_and_returns_record() {
    let store = TicketStore::new();
    let first = store.add(reserved(1, 0));
    let second = store.add(reserved(1, 0));

    assert_eq!(first.id, TicketId(1));
    assert_eq!(second.id, TicketId(2));
    assert_eq!(store.get(TicketId(2)).unwrap(), second);
}

#[test]
fn by_event_filters_and_orders() {
    let store = TicketStore::new();
    store.add(reserved(1, 0));
    store.add(reserved(2, 0));
    store.add(reserved(1, 0));

    let tickets = store.by_event(EventId(1));
    assert_eq!(tickets.len(), 2);
    assert_eq!(tickets[0].id, TicketId(1));
    assert_eq!(tickets[1].id, TicketId(3));
}

#[test]
fn active_count_excludes_cancelled() {
    let store = TicketStore::new();
    let held = store.add(reserved(1, 0));
    let sold = store.add(reserved(1, 0));
    let voided = store.add(reserved(1, 0));
    store.add(reserved(2, 0));

    store.get_mut(sold.id).unwrap().status = TicketStatus::Purchased;
    store.get_mut(voided.id).unwrap().status = TicketStatus::Cancelled;

    assert_eq!(store.active_count(EventId(1)), 2);
    assert_eq!(store.get(held.id).unwrap().status, TicketStatus::Reserved);
}

#[test]
fn sweep_cancels_only_stale_holds() {
    let store = TicketStore::new();
    let fresh = store.add(reserved(1, 5));
    let stale = store.add(reserved(1, 11));
    let stale_elsewhere = store.add(reserved(2, 30));

    let expired = store.sweep_expired(Utc::now(), Duration::minutes(10));

    assert_eq!(expired, 2);
    assert_eq!(store.get(fresh.id).unwrap().status, TicketStatus::Reserved);
    assert_eq!(store.get(stale.id).unwrap().status, TicketStatus::Cancelled);
    assert_eq!(
        store.get(stale_elsewhere.id).unwrap().status,
        TicketStatus::Cancelled
    );
}

#[test]
fn sweep_uses_strict_age_comparison() {
    let store = TicketStore::new();
    let now = Utc::now();
    let window = Duration::minutes(10);

    let at_window = store.add(Ticket::reserved(EventId(1), TicketTypeId(1), now - window));
    let past_window = store.add(Ticket::reserved(
        EventId(1),
        TicketTypeId(1),
        now - window - Duration::seconds(1),
    ));

    // A hold aged exactly the window is still valid
    assert_eq!(store.sweep_expired(now, window), 1);
    assert_eq!(store.get(at_window.id).unwrap().status, TicketStatus::Reserved);
    assert_eq!(store.get(past_window.id).unwrap().status, TicketStatus::Cancelled);
}

#[test]
fn sweep_ignores_purchased_and_cancelled() {
    let store = TicketStore::new();
    let sold = store.add(reserved(1, 30));
    let voided = store.add(reserved(1, 30));
    store.get_mut(sold.id).unwrap().status = TicketStatus::Purchased;
    store.get_mut(voided.id).unwrap().status = TicketStatus::Cancelled;

    assert_eq!(store.sweep_expired(Utc::now(), Duration::minutes(10)), 0);
    assert_eq!(store.get(sold.id).unwrap().status, TicketStatus::Purchased);
}
