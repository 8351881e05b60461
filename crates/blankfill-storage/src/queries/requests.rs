// SPDX-FileCopyrightText: 2026 Blankfill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request CRUD operations.
//!
//! Each function is one transaction. Domain outcomes (missing row, rejected
//! transition, duplicate id) are decided inside the transaction and mapped to
//! [`BlankfillError`] variants afterwards; backend failures roll back.

use std::str::FromStr;

use blankfill_core::{BlankfillError, RequestRecord, RequestStatus};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{OptionalExtension, Row, params};
use tracing::debug;

use crate::database::{Database, map_tr_err};

/// Columns selected for every request read, in [`row_to_record`] order.
pub(crate) const COLUMNS: &str = "id, sentence, client, requested_at, updated, status, results";

/// Format a timestamp the way the schema stores it.
pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn conversion_error(
    idx: usize,
    e: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
}

fn parse_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}

/// Decode one row selected with [`COLUMNS`].
pub(crate) fn row_to_record(row: &Row<'_>) -> rusqlite::Result<RequestRecord> {
    let status: String = row.get(5)?;
    let results: String = row.get(6)?;
    Ok(RequestRecord {
        id: row.get(0)?,
        sentence: row.get(1)?,
        client: row.get(2)?,
        requested_at: parse_timestamp(row, 3)?,
        updated: parse_timestamp(row, 4)?,
        status: RequestStatus::from_str(&status).map_err(|e| conversion_error(5, e))?,
        results: serde_json::from_str(&results).map_err(|e| conversion_error(6, e))?,
    })
}

fn fetch(conn: &rusqlite::Connection, id: &str) -> rusqlite::Result<Option<RequestRecord>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM requests WHERE id = ?1"),
        params![id],
        row_to_record,
    )
    .optional()
}

enum Insert {
    Stored(RequestRecord),
    Duplicate,
}

enum Mutation {
    Applied(RequestRecord),
    Missing,
    Rejected(RequestStatus),
}

/// Insert a new request and return it as stored.
pub async fn insert(db: &Database, record: &RequestRecord) -> Result<RequestRecord, BlankfillError> {
    let record = record.clone();
    let id = record.id.clone();
    let results = serde_json::to_string(&record.results).map_err(|e| {
        BlankfillError::UnexpectedStore {
            source: Box::new(e),
        }
    })?;

    let outcome = db
        .transact(move |tx| {
            let inserted = tx.execute(
                "INSERT INTO requests (id, sentence, client, requested_at, updated, status, results)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    record.id,
                    record.sentence,
                    record.client,
                    format_timestamp(&record.requested_at),
                    format_timestamp(&record.updated),
                    record.status.as_str(),
                    results,
                ],
            );
            if let Err(e) = inserted {
                let constraint = matches!(
                    &e,
                    rusqlite::Error::SqliteFailure(err, _)
                        if err.code == rusqlite::ErrorCode::ConstraintViolation
                );
                if constraint && fetch(tx, &record.id)?.is_some() {
                    return Ok(Insert::Duplicate);
                }
                return Err(e);
            }
            let stored = fetch(tx, &record.id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)?;
            Ok(Insert::Stored(stored))
        })
        .await
        .map_err(|e| BlankfillError::UnexpectedStore {
            source: Box::new(e),
        })?;

    match outcome {
        Insert::Stored(stored) => {
            debug!(request_id = %stored.id, "request inserted");
            Ok(stored)
        }
        Insert::Duplicate => Err(BlankfillError::DuplicateKey { id }),
    }
}

/// Fetch a request by ID.
pub async fn get(db: &Database, id: &str) -> Result<RequestRecord, BlankfillError> {
    let key = id.to_string();
    db.transact(move |tx| fetch(tx, &key))
        .await
        .map_err(map_tr_err)?
        .ok_or_else(|| BlankfillError::NotFound { id: id.to_string() })
}

/// Move a request to `status`, refreshing `updated`.
pub async fn update_status(
    db: &Database,
    id: &str,
    status: RequestStatus,
) -> Result<RequestRecord, BlankfillError> {
    let key = id.to_string();
    let outcome = db
        .transact(move |tx| {
            let Some(current) = fetch(tx, &key)? else {
                return Ok(Mutation::Missing);
            };
            if !current.status.can_transition_to(status) {
                return Ok(Mutation::Rejected(current.status));
            }
            tx.execute(
                "UPDATE requests SET status = ?1, updated = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?2",
                params![status.as_str(), key],
            )?;
            let updated = fetch(tx, &key)?.ok_or(rusqlite::Error::QueryReturnedNoRows)?;
            Ok(Mutation::Applied(updated))
        })
        .await
        .map_err(|e| BlankfillError::CriticalStore {
            message: format!("failed to set status of request {id} to {status}"),
            source: Box::new(e),
        })?;

    match outcome {
        Mutation::Applied(record) => {
            debug!(request_id = %id, status = %status, "request status updated");
            Ok(record)
        }
        Mutation::Missing => Err(BlankfillError::NotFound { id: id.to_string() }),
        Mutation::Rejected(from) => Err(BlankfillError::InvalidTransition {
            id: id.to_string(),
            from,
            to: status,
        }),
    }
}

/// Replace the results of a running request, refreshing `updated`.
pub async fn update_results(
    db: &Database,
    id: &str,
    results: &[String],
) -> Result<RequestRecord, BlankfillError> {
    let key = id.to_string();
    let encoded = serde_json::to_string(results).map_err(|e| BlankfillError::CriticalStore {
        message: format!("failed to encode results of request {id}"),
        source: Box::new(e),
    })?;

    let outcome = db
        .transact(move |tx| {
            let Some(current) = fetch(tx, &key)? else {
                return Ok(Mutation::Missing);
            };
            if current.status != RequestStatus::Running {
                return Ok(Mutation::Rejected(current.status));
            }
            tx.execute(
                "UPDATE requests SET results = ?1, updated = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?2",
                params![encoded, key],
            )?;
            let updated = fetch(tx, &key)?.ok_or(rusqlite::Error::QueryReturnedNoRows)?;
            Ok(Mutation::Applied(updated))
        })
        .await
        .map_err(|e| BlankfillError::CriticalStore {
            message: format!("failed to write results of request {id}"),
            source: Box::new(e),
        })?;

    match outcome {
        Mutation::Applied(record) => {
            debug!(request_id = %id, count = record.results.len(), "request results updated");
            Ok(record)
        }
        Mutation::Missing => Err(BlankfillError::NotFound { id: id.to_string() }),
        Mutation::Rejected(status) => Err(BlankfillError::ResultsNotWritable {
            id: id.to_string(),
            status,
        }),
    }
}
