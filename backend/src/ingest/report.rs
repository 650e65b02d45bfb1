//! Renders a reconciliation result as the ordered message lines an admin
//! sees after an upload.

use super::reconcile::BatchResult;
use super::validator::ValidatedCsv;
use common::model::batch::BatchKind;
use common::reports::{ReportMessage, RowErrorView, UploadReport};

/// Prefix of the first line of upload and deletion summaries.
pub fn file_label(kind: BatchKind) -> &'static str {
    match kind {
        BatchKind::Students => "File",
        BatchKind::Mentors => "Mentor file",
    }
}

fn csv_label(kind: BatchKind) -> &'static str {
    match kind {
        BatchKind::Students => "CSV",
        BatchKind::Mentors => "Mentor CSV",
    }
}

pub fn upload_report(
    kind: BatchKind,
    file_name: &str,
    batch_id: i64,
    csv: &ValidatedCsv,
    result: &BatchResult,
) -> UploadReport {
    let noun = kind.record_noun();
    let counts = result.counts;

    let mut messages = vec![
        ReportMessage::success(format!(
            "{} '{}' uploaded successfully!",
            file_label(kind),
            file_name
        )),
        ReportMessage::success(format!(
            "{} contains {} rows with columns: {}",
            csv_label(kind),
            csv.rows.len(),
            csv.columns.join(", ")
        )),
    ];

    let mut push_count = |count: usize, text: String| {
        if count > 0 {
            messages.push(ReportMessage::success(text));
        }
    };
    push_count(
        counts.identities_created,
        format!("Created {} new user accounts successfully.", counts.identities_created),
    );
    push_count(
        counts.records_created,
        format!("Created {} new {} records successfully.", counts.records_created, noun),
    );
    push_count(
        counts.identities_updated,
        format!("Updated {} existing accounts successfully.", counts.identities_updated),
    );
    push_count(
        counts.records_updated,
        format!("Updated {} {} record fields.", counts.records_updated, noun),
    );
    push_count(
        counts.records_linked,
        format!("Linked {} user accounts to {} records.", counts.records_linked, noun),
    );

    let errors: Vec<RowErrorView> = result
        .errors
        .iter()
        .map(|e| RowErrorView {
            row: e.index + 1,
            message: e.message.clone(),
        })
        .collect();
    if !errors.is_empty() {
        messages.push(ReportMessage::error(format!(
            "Encountered {} errors during processing.",
            errors.len()
        )));
        for e in &errors {
            messages.push(ReportMessage::error(format!("Error on row {}: {}", e.row, e.message)));
        }
    }

    UploadReport {
        batch_id,
        counts,
        errors,
        messages,
    }
}
