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

use boxoffice_rs::{Engine, Event, EventId, TicketError, TicketId, TicketType, TicketTypeId};
use chrono::Utc;
use clap::Parser;
use csv::{ReaderBuilder, Trim, Writer};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;
use std::process;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Boxoffice - Replay ticket operations from CSV files
///
/// Reads operations from a CSV file, applies them to a fresh engine, and
/// outputs the resulting ticket table to stdout.
#[derive(Parser, Debug)]
#[command(name = "boxoffice-rs")]
#[command(about = "A ticket reservation engine that replays operation CSVs", long_about = None)]
struct Args {
    /// Path to CSV file with operations
    ///
    /// Expected format: op,event,ticket_type,ticket,venue,capacity,name,price,quantity
    /// Example: cargo run -- operations.csv > tickets.csv
    #[arg(value_name = "FILE")]
    input: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // Open input file
    let file = match File::open(&args.input) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error opening file '{}': {}", args.input.display(), e);
            process::exit(1);
        }
    };

    // Replay operations from CSV
    let engine = match replay_operations(BufReader::new(file)) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Error replaying operations: {}", e);
            process::exit(1);
        }
    };

    // Write results to stdout
    if let Err(e) = write_tickets(&engine, std::io::stdout()) {
        eprintln!("Error writing output: {}", e);
        process::exit(1);
    }
}

/// Raw CSV record matching the input format.
///
/// Fields: `op, event, ticket_type, ticket, venue, capacity, name, price, quantity`
#[derive(Debug, Deserialize)]
struct CsvRecord {
    op: String,
    #[serde(deserialize_with = "csv::invalid_option")]
    event: Option<u32>,
    #[serde(deserialize_with = "csv::invalid_option")]
    ticket_type: Option<u32>,
    #[serde(deserialize_with = "csv::invalid_option")]
    ticket: Option<u32>,
    venue: Option<String>,
    #[serde(deserialize_with = "csv::invalid_option")]
    capacity: Option<u32>,
    name: Option<String>,
    #[serde(deserialize_with = "csv::invalid_option")]
    price: Option<Decimal>,
    #[serde(deserialize_with = "csv::invalid_option")]
    quantity: Option<u32>,
}

/// One replayable operation against the engine.
#[derive(Debug)]
enum Operation {
    CreateEvent {
        venue: String,
        capacity: u32,
    },
    AddType {
        event: EventId,
        name: String,
        price: Decimal,
        quantity: u32,
    },
    Reserve {
        event: EventId,
        ticket_type: TicketTypeId,
    },
    Purchase {
        ticket: TicketId,
    },
    Cancel {
        ticket: TicketId,
    },
}

impl CsvRecord {
    /// Converts a CSV record to an operation.
    ///
    /// Returns `None` for unknown ops or missing required fields.
    fn into_operation(self) -> Option<Operation> {
        match self.op.to_lowercase().as_str() {
            "create_event" => Some(Operation::CreateEvent {
                venue: self.venue.filter(|v| !v.is_empty())?,
                capacity: self.capacity?,
            }),
            "add_type" => Some(Operation::AddType {
                event: EventId(self.event?),
                name: self.name.filter(|n| !n.is_empty())?,
                price: self.price?,
                quantity: self.quantity?,
            }),
            "reserve" => Some(Operation::Reserve {
                event: EventId(self.event?),
                ticket_type: TicketTypeId(self.ticket_type?),
            }),
            "purchase" => Some(Operation::Purchase {
                ticket: TicketId(self.ticket?),
            }),
            "cancel" => Some(Operation::Cancel {
                ticket: TicketId(self.ticket?),
            }),
            _ => None,
        }
    }
}

/// Applies one operation to the engine.
///
/// `add_type` goes through the event store's read-modify-update path: the
/// new type gets the next id scoped to the event, and the replaced body is
/// written back without re-validation, same as any other update.
fn apply(engine: &Engine, operation: Operation) -> Result<(), TicketError> {
    match operation {
        Operation::CreateEvent { venue, capacity } => {
            engine
                .events()
                .create(Event::new(venue, Utc::now(), "", capacity, Vec::new()))?;
            Ok(())
        }
        Operation::AddType {
            event,
            name,
            price,
            quantity,
        } => {
            let mut body = engine
                .events()
                .get(event)
                .ok_or(TicketError::EventNotFound)?;
            let next_id = body.ticket_types.iter().map(|t| t.id.0).max().unwrap_or(0) + 1;
            body.ticket_types
                .push(TicketType::new(TicketTypeId(next_id), name, price, quantity));
            engine.events().update(event, body);
            Ok(())
        }
        Operation::Reserve {
            event,
            ticket_type,
        } => engine.reserve(event, ticket_type).map(|_| ()),
        Operation::Purchase { ticket } => engine.purchase(ticket),
        Operation::Cancel { ticket } => engine.cancel(ticket),
    }
}

/// Replays operations from a CSV reader into a fresh engine.
///
/// Streaming parse; malformed rows and failed operations are skipped with a
/// log line and do not stop the replay.
///
/// # CSV Format
///
/// Expected columns: `op, event, ticket_type, ticket, venue, capacity, name, price, quantity`
///
/// # Example
///
/// ```csv
/// op,event,ticket_type,ticket,venue,capacity,name,price,quantity
/// create_event,,,,Red Rocks,500,,,
/// add_type,1,,,,,GA,45.00,300
/// reserve,1,1,,,,,,
/// purchase,,,1,,,,,
/// ```
///
/// # Errors
///
/// Returns a CSV error if the reader fails or the CSV structure is invalid.
pub fn replay_operations<R: Read>(reader: R) -> Result<Engine, csv::Error> {
    let engine = Engine::new();

    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All) // Handle whitespace in fields like " reserve "
        .flexible(true) // Allow short rows for ops without trailing fields
        .has_headers(true)
        .from_reader(reader);

    for result in rdr.deserialize::<CsvRecord>() {
        match result {
            Ok(record) => {
                let Some(operation) = record.into_operation() else {
                    warn!("skipping invalid operation record");
                    continue;
                };

                if let Err(e) = apply(&engine, operation) {
                    warn!(error = %e, "skipping failed operation");
                }
            }
            Err(e) => {
                warn!(error = %e, "skipping malformed row");
                continue;
            }
        }
    }

    Ok(engine)
}

/// Writes the engine's ticket table to a CSV writer, ordered by ticket id.
///
/// # CSV Format
///
/// Columns: `id, event_id, ticket_type_id, reserved_at, status`
///
/// # Errors
///
/// Returns a CSV error if writing fails.
pub fn write_tickets<W: Write>(engine: &Engine, writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);

    for ticket in engine.tickets().get_all() {
        wtr.serialize(ticket)?;
    }

    wtr.flush()?;
    Ok(())
}
