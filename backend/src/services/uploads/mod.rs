//! # Upload Service Module
//!
//! Admin routes for CSV batches under `/api/admin/uploads/{kind}`, where
//! `kind` is `students` or `mentors`. Each kind holds at most one batch at a
//! time: a new file is refused until the previous one has been deleted.
//!
//! ## Sub-modules:
//! - `upload`: reads the multipart `file` field and runs the ingest pipeline.
//! - `list`: batches of one kind, newest first.
//! - `detail`: one batch with its stored content and associated usernames.
//! - `delete`: batch reversal and revocation of the removed accounts' sessions.

mod delete;
mod detail;
mod list;
mod upload;

use crate::error::{AppError, AppResult};
use actix_web::web::{delete, get, post, scope};
use actix_web::Scope;
use common::model::batch::BatchKind;

const API_PATH: &str = "/api/admin/uploads";

/// # Registered Routes:
///
/// *   **`POST /{kind}`**: multipart upload, returns the `UploadReport`.
/// *   **`GET /{kind}`**: `Vec<BatchSummary>`.
/// *   **`GET /{kind}/{batch_id}`**: `BatchDetail`.
/// *   **`DELETE /{kind}/{batch_id}`**: `DeletionReport`.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/{kind}", post().to(upload::process))
        .route("/{kind}", get().to(list::process))
        .route("/{kind}/{batch_id}", get().to(detail::process))
        .route("/{kind}/{batch_id}", delete().to(delete::process))
}

fn parse_kind(kind: &str) -> AppResult<BatchKind> {
    BatchKind::parse(kind).ok_or_else(|| AppError::NotFound(format!("Unknown upload kind '{}'.", kind)))
}
