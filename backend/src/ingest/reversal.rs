//! Undoes the account side of an upload: every identity the batch touched is
//! unlinked from its record and deleted, then the batch itself goes.
//! Student and mentor records always survive.

use super::report::file_label;
use crate::db::{batches, identities, mentors, students};
use crate::error::{AppError, AppResult};
use common::model::batch::BatchKind;
use common::model::identity::Identity;
use common::reports::DeletionReport;
use log::{info, warn};
use rusqlite::Connection;

#[derive(Debug)]
pub struct Reversal {
    pub report: DeletionReport,
    /// Identities that no longer exist, for session revocation.
    pub deleted_identities: Vec<i64>,
}

pub fn delete_batch(conn: &mut Connection, kind: BatchKind, batch_id: i64) -> AppResult<Reversal> {
    let batch = batches::find(conn, kind, batch_id)?
        .ok_or_else(|| AppError::NotFound("File not found.".to_string()))?;
    let associated = batches::associated_identities(conn, batch_id)?;

    let mut warnings = Vec::new();
    let mut deleted_identities = Vec::new();
    let mut records_unlinked = 0;

    for identity in &associated {
        match remove_identity(conn, kind, identity) {
            Ok(unlinked) => {
                records_unlinked += unlinked;
                if identity.is_staff {
                    let message = format!("Skipped staff account '{}'.", identity.username);
                    warn!("batch {}: {}", batch_id, message);
                    warnings.push(message);
                } else {
                    deleted_identities.push(identity.id);
                }
            }
            Err(e) => {
                let message = format!("Could not delete account '{}': {}", identity.username, e);
                warn!("batch {}: {}", batch_id, message);
                warnings.push(message);
            }
        }
    }

    batches::delete(conn, batch_id)?;

    let message = deletion_message(kind, &batch.file_name, deleted_identities.len(), records_unlinked);
    info!("{}", message);

    Ok(Reversal {
        report: DeletionReport {
            message,
            identities_deleted: deleted_identities.len(),
            records_unlinked,
            warnings,
        },
        deleted_identities,
    })
}

/// Count sentences are only added when their count is non-zero.
fn deletion_message(kind: BatchKind, file_name: &str, deleted: usize, unlinked: usize) -> String {
    let mut message = format!(
        "{} '{}' has been deleted successfully.",
        file_label(kind),
        file_name
    );
    if deleted > 0 {
        message.push_str(&format!(" {} associated user accounts were deleted.", deleted));
    }
    if unlinked > 0 {
        message.push_str(&format!(
            " {} {} records were unlinked from their user accounts.",
            unlinked,
            kind.record_noun()
        ));
    }
    message
}

/// Unlinks the identity's record and, unless it is staff, deletes the
/// identity, all in one savepoint. Returns how many records were unlinked.
fn remove_identity(conn: &mut Connection, kind: BatchKind, identity: &Identity) -> rusqlite::Result<usize> {
    let savepoint = conn.savepoint()?;
    let unlinked = match kind {
        BatchKind::Students => students::unlink_identity(&savepoint, identity.id)?,
        BatchKind::Mentors => mentors::unlink_identity(&savepoint, identity.id)?,
    };
    if !identity.is_staff {
        identities::delete(&savepoint, identity.id)?;
    }
    savepoint.commit()?;
    Ok(unlinked)
}
