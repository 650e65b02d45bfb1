//! Row-by-row reconciliation of a validated upload against identities and
//! domain records.
//!
//! Each row runs inside its own savepoint: it either applies completely or
//! leaves no trace, and its failure is recorded without stopping the batch.
//! Credentials are overwritten on every run, including rows that change
//! nothing else, so re-uploading a file acts as a password reset.

use super::validator::{CsvRow, ValidatedCsv};
use crate::db::{batches, identities, mentors, students};
use crate::validators;
use common::model::batch::BatchKind;
use common::reports::BatchCounts;
use log::{debug, warn};
use rusqlite::Connection;
use thiserror::Error;

/// A failed row. `index` is 0-based over data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub index: usize,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResult {
    pub counts: BatchCounts,
    pub errors: Vec<RowError>,
    /// Distinct identities touched by successful rows, in first-seen order.
    pub associated: Vec<i64>,
}

#[derive(Debug, Error)]
enum RowFailure {
    #[error("Invalid roll number format: {0}")]
    RollNumber(String),
    #[error("Mentor '{0}' does not exist")]
    UnknownMentor(String),
    #[error("Failed to create {0} record: {1}")]
    CreateRecord(&'static str, rusqlite::Error),
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

/// What one successful row did.
#[derive(Debug, Clone, Copy)]
struct RowOutcome {
    identity_id: i64,
    identity_created: bool,
    linked: bool,
    fields_updated: usize,
    record_created: bool,
}

impl RowOutcome {
    fn new(identity_id: i64, identity_created: bool) -> Self {
        RowOutcome {
            identity_id,
            identity_created,
            linked: false,
            fields_updated: 0,
            record_created: false,
        }
    }
}

impl BatchResult {
    fn record(&mut self, outcome: RowOutcome) {
        let counts = &mut self.counts;
        if outcome.identity_created {
            counts.identities_created += 1;
        } else {
            counts.identities_updated += 1;
        }
        if outcome.linked {
            counts.records_linked += 1;
        }
        if outcome.record_created {
            counts.records_created += 1;
        }
        counts.records_updated += outcome.fields_updated;

        if !self.associated.contains(&outcome.identity_id) {
            self.associated.push(outcome.identity_id);
        }
    }

    fn fail(&mut self, index: usize, message: String) {
        self.counts.errors += 1;
        self.errors.push(RowError { index, message });
    }
}

/// Applies every row of `csv` in order, then marks the batch processed.
///
/// Only a failure to mark the batch is returned as an error; rows committed
/// before it stay associated with the batch.
pub fn reconcile(
    conn: &mut Connection,
    batch_id: i64,
    csv: &ValidatedCsv,
    kind: BatchKind,
) -> rusqlite::Result<BatchResult> {
    let mut result = BatchResult::default();

    for (index, row) in csv.rows.iter().enumerate() {
        match apply_row(conn, batch_id, row, kind) {
            Ok(outcome) => {
                debug!(
                    "batch {} row {}: identity {} (created: {})",
                    batch_id,
                    index + 1,
                    outcome.identity_id,
                    outcome.identity_created
                );
                result.record(outcome);
            }
            Err(e) => {
                warn!("batch {} row {} failed: {}", batch_id, index + 1, e);
                result.fail(index, e.to_string());
            }
        }
    }

    batches::mark_processed(conn, batch_id)?;
    Ok(result)
}

/// Applies one row and associates its identity with the batch in the same
/// savepoint, so a committed row is always reachable by reversal.
fn apply_row(
    conn: &mut Connection,
    batch_id: i64,
    row: &CsvRow,
    kind: BatchKind,
) -> Result<RowOutcome, RowFailure> {
    let savepoint = conn.savepoint()?;
    let outcome = match kind {
        BatchKind::Students => reconcile_student(&savepoint, row)?,
        BatchKind::Mentors => reconcile_mentor(&savepoint, row)?,
    };
    batches::associate(&savepoint, batch_id, &[outcome.identity_id])?;
    savepoint.commit()?;
    Ok(outcome)
}

fn reconcile_student(conn: &Connection, row: &CsvRow) -> Result<RowOutcome, RowFailure> {
    let roll_no = row.get("roll_no").trim();
    let email_id = row.get("email_id").trim();
    let password = row.get("password").trim();
    let mentor_id = row.get("mentor_id").trim();

    validators::validate_roll_number(roll_no).map_err(RowFailure::RollNumber)?;

    let (identity, created) = identities::get_or_create(conn, roll_no, email_id)?;
    identities::set_password(conn, identity.id, password)?;

    if !mentors::exists(conn, mentor_id)? {
        return Err(RowFailure::UnknownMentor(mentor_id.to_string()));
    }

    let mut outcome = RowOutcome::new(identity.id, created);
    match students::find(conn, roll_no)? {
        Some(student) => {
            if student.identity_id != Some(identity.id) {
                students::set_identity(conn, roll_no, Some(identity.id))?;
                outcome.linked = true;
            }
            if student.email_id != email_id {
                students::set_email(conn, roll_no, email_id)?;
                outcome.fields_updated += 1;
            }
            if student.mentor_id.as_deref() != Some(mentor_id) {
                students::set_mentor(conn, roll_no, Some(mentor_id))?;
                outcome.fields_updated += 1;
            }
        }
        None => {
            students::insert(
                conn,
                roll_no,
                students::PLACEHOLDER_NAME,
                email_id,
                Some(identity.id),
                Some(mentor_id),
            )
            .map_err(|e| RowFailure::CreateRecord("student", e))?;
            outcome.record_created = true;
        }
    }
    Ok(outcome)
}

fn reconcile_mentor(conn: &Connection, row: &CsvRow) -> Result<RowOutcome, RowFailure> {
    let mentor_id = row.get("mentor_id").trim();
    let name = row.get("name").trim();
    let email_id = row.get("email_id").trim();
    let password = row.get("password").trim();

    let (identity, created) = identities::get_or_create(conn, mentor_id, email_id)?;
    identities::set_password(conn, identity.id, password)?;

    let mut outcome = RowOutcome::new(identity.id, created);
    match mentors::find(conn, mentor_id)? {
        Some(mentor) => {
            if mentor.identity_id != Some(identity.id) {
                mentors::set_identity(conn, mentor_id, Some(identity.id))?;
                outcome.linked = true;
            }
            if mentor.email != email_id || mentor.name != name {
                mentors::set_name_and_email(conn, mentor_id, name, email_id)?;
                outcome.fields_updated += 1;
            }
        }
        None => {
            mentors::insert(conn, mentor_id, name, email_id, Some(identity.id))
                .map_err(|e| RowFailure::CreateRecord("mentor", e))?;
            outcome.record_created = true;
        }
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_connection;
    use crate::ingest::validator::validate_upload;

    const HEADER: &str = "roll_no,email_id,password,mentor_id";

    fn setup() -> Connection {
        let conn = test_connection();
        mentors::insert(&conn, "M001", "Asha Rao", "asha@x.in", None).unwrap();
        mentors::insert(&conn, "M002", "Vikram Iyer", "vikram@x.in", None).unwrap();
        conn
    }

    fn run(conn: &mut Connection, kind: BatchKind, content: &str) -> (i64, BatchResult) {
        let csv = validate_upload("upload.csv", content.as_bytes(), kind).unwrap();
        let batch_id = batches::insert(conn, kind, "upload.csv", &csv.content, "md5").unwrap();
        let result = reconcile(conn, batch_id, &csv, kind).unwrap();
        (batch_id, result)
    }

    fn three_students() -> String {
        format!(
            "{}\n123A1234,abc@x.in,pw1,M001\n123A1235,abd@x.in,pw2,M001\n123A1236,abe@x.in,pw3,M002\n",
            HEADER
        )
    }

    #[test]
    fn fresh_rows_create_identities_and_records() {
        let mut conn = setup();
        let (batch_id, result) = run(&mut conn, BatchKind::Students, &three_students());

        assert_eq!(result.counts.identities_created, 3);
        assert_eq!(result.counts.identities_updated, 0);
        assert_eq!(result.counts.records_created, 3);
        assert_eq!(result.counts.errors, 0);

        let student = students::find(&conn, "123A1236").unwrap().unwrap();
        assert_eq!(student.name, students::PLACEHOLDER_NAME);
        assert_eq!(student.mentor_id.as_deref(), Some("M002"));
        assert!(student.identity_id.is_some());

        let batch = batches::find(&conn, BatchKind::Students, batch_id).unwrap().unwrap();
        assert!(batch.processed);
        assert_eq!(batch.associated_count, 3);
        assert!(identities::authenticate(&conn, "123A1235", "pw2").unwrap().is_some());
    }

    #[test]
    fn rerun_is_idempotent_but_resets_passwords() {
        let mut conn = setup();
        run(&mut conn, BatchKind::Students, &three_students());
        let changed = three_students().replace("pw1", "new-pw");
        let (_, second) = run(&mut conn, BatchKind::Students, &changed);

        assert_eq!(second.counts.identities_created, 0);
        assert_eq!(second.counts.identities_updated, 3);
        assert_eq!(second.counts.records_linked, 0);
        assert_eq!(second.counts.records_created, 0);
        assert_eq!(second.counts.records_updated, 0);
        assert!(identities::authenticate(&conn, "123A1234", "new-pw").unwrap().is_some());
        assert!(identities::authenticate(&conn, "123A1234", "pw1").unwrap().is_none());
    }

    #[test]
    fn bad_roll_numbers_are_row_errors() {
        let mut conn = setup();
        let content = format!(
            "{}\n123A1234,a1@x.in,pw,M001\n12AA1234,a2@x.in,pw,M001\n123a1234,a3@x.in,pw,M001\n1234A123,a4@x.in,pw,M001\n",
            HEADER
        );
        let (_, result) = run(&mut conn, BatchKind::Students, &content);

        assert_eq!(result.counts.errors, 3);
        assert_eq!(
            result.counts.identities_created + result.counts.identities_updated,
            4 - result.counts.errors
        );
        let indices: Vec<usize> = result.errors.iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert!(result.errors[0].message.starts_with("Invalid roll number format"));
        assert!(identities::find_by_username(&conn, "12AA1234").unwrap().is_none());
    }

    #[test]
    fn existing_record_gets_linked_and_updated() {
        let mut conn = setup();
        students::insert(&conn, "123A1234", "Priya Nair", "old@x.in", None, Some("M001")).unwrap();
        let content = format!("{}\n123A1234,new@x.in,pw,M002\n", HEADER);
        let (_, result) = run(&mut conn, BatchKind::Students, &content);

        assert_eq!(result.counts.records_linked, 1);
        assert_eq!(result.counts.records_updated, 2);
        assert_eq!(result.counts.records_created, 0);
        let student = students::find(&conn, "123A1234").unwrap().unwrap();
        assert_eq!(student.name, "Priya Nair");
        assert_eq!(student.email_id, "new@x.in");
        assert_eq!(student.mentor_id.as_deref(), Some("M002"));
    }

    #[test]
    fn failed_row_leaves_no_trace() {
        let mut conn = setup();
        let content = format!(
            "{}\n123A1234,abc@x.in,pw,M404\n123A1235,abd@x.in,pw,M001\n",
            HEADER
        );
        let (batch_id, result) = run(&mut conn, BatchKind::Students, &content);

        assert_eq!(result.counts.errors, 1);
        assert_eq!(result.errors[0].message, "Mentor 'M404' does not exist");
        assert!(identities::find_by_username(&conn, "123A1234").unwrap().is_none());
        assert!(students::find(&conn, "123A1234").unwrap().is_none());
        let batch = batches::find(&conn, BatchKind::Students, batch_id).unwrap().unwrap();
        assert_eq!(batch.associated_count, 1);
    }

    #[test]
    fn committed_rows_stay_associated_when_marking_fails() {
        let mut conn = setup();
        let csv = validate_upload("upload.csv", three_students().as_bytes(), BatchKind::Students).unwrap();
        let batch_id = batches::insert(&conn, BatchKind::Students, "upload.csv", &csv.content, "md5").unwrap();
        conn.execute_batch(
            "CREATE TRIGGER frozen_batches BEFORE UPDATE ON batches
             BEGIN SELECT RAISE(ABORT, 'frozen'); END;",
        )
        .unwrap();

        assert!(reconcile(&mut conn, batch_id, &csv, BatchKind::Students).is_err());

        let associated = batches::associated_identities(&conn, batch_id).unwrap();
        assert_eq!(associated.len(), 3);
        let batch = batches::find(&conn, BatchKind::Students, batch_id).unwrap().unwrap();
        assert!(!batch.processed);
    }

    #[test]
    fn values_are_trimmed() {
        let mut conn = setup();
        let content = format!("{}\n 123A1234 , abc@x.in ,pw , M001\n", HEADER);
        let (_, result) = run(&mut conn, BatchKind::Students, &content);
        assert_eq!(result.counts.errors, 0);
        assert_eq!(students::find(&conn, "123A1234").unwrap().unwrap().email_id, "abc@x.in");
    }

    #[test]
    fn mentor_rows_overwrite_name_and_email() {
        let mut conn = setup();
        let content = "mentor_id,name,email_id,password\nM001,Asha R. Rao,asha@x.in,pw\nM003,Neha Shah,neha@x.in,pw\n";
        let (_, result) = run(&mut conn, BatchKind::Mentors, content);

        assert_eq!(result.counts.identities_created, 2);
        assert_eq!(result.counts.records_linked, 1);
        assert_eq!(result.counts.records_updated, 1);
        assert_eq!(result.counts.records_created, 1);
        assert_eq!(mentors::find(&conn, "M001").unwrap().unwrap().name, "Asha R. Rao");
        assert_eq!(mentors::find(&conn, "M003").unwrap().unwrap().name, "Neha Shah");
    }
}
