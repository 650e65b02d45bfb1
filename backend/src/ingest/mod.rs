//! Bulk provisioning of accounts from CSV uploads.
//!
//! An upload flows through four stages:
//! - `validator`: structural checks on the raw file, all-or-nothing.
//! - `reconcile`: row-by-row get-or-create of identities and linking of
//!   student or mentor records, each row atomic on its own.
//! - `report`: the counters and row errors rendered as message lines.
//! - `reversal`: deleting a batch removes the accounts it touched and unlinks
//!   their records.
//!
//! `ingest_upload` ties the first three together against one connection.

pub mod reconcile;
pub mod report;
pub mod reversal;
pub mod validator;

use crate::db::batches;
use crate::error::{AppError, AppResult};
use common::model::batch::BatchKind;
use common::reports::UploadReport;
use log::info;
use md5::Context;
use rusqlite::Connection;

/// Warning returned while a batch of the same kind is still on file.
pub fn existing_batch_warning(kind: BatchKind) -> &'static str {
    match kind {
        BatchKind::Students => {
            "You already have an uploaded file. Please delete it before uploading a new one."
        }
        BatchKind::Mentors => {
            "You already have an uploaded mentor file. Please delete it before uploading a new one."
        }
    }
}

pub fn content_md5(bytes: &[u8]) -> String {
    let mut hasher = Context::new();
    hasher.consume(bytes);
    format!("{:x}", hasher.finalize())
}

/// Validates `bytes`, stores them as a new batch and reconciles every row.
///
/// A rejected file leaves nothing behind. Once the batch is stored, row
/// failures only show up in the report.
pub fn ingest_upload(
    conn: &mut Connection,
    kind: BatchKind,
    file_name: &str,
    bytes: &[u8],
) -> AppResult<UploadReport> {
    if batches::exists_for_kind(conn, kind)? {
        return Err(AppError::Conflict(existing_batch_warning(kind).to_string()));
    }

    let csv = validator::validate_upload(file_name, bytes, kind)?;
    let batch_id = batches::insert(conn, kind, file_name, &csv.content, &content_md5(bytes))?;
    info!(
        "stored {} batch {} from '{}' with {} rows",
        kind.as_str(),
        batch_id,
        file_name,
        csv.rows.len()
    );

    let result = reconcile::reconcile(conn, batch_id, &csv, kind)?;
    info!(
        "batch {} processed: {} accounts created, {} updated, {} errors",
        batch_id,
        result.counts.identities_created,
        result.counts.identities_updated,
        result.counts.errors
    );
    Ok(report::upload_report(kind, file_name, batch_id, &csv, &result))
}
