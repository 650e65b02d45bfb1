//! # Student Administration Module
//!
//! Admin-only routes under `/api/admin/students` for managing student
//! records by roll number, and for giving a record its login account when no
//! upload provided one.
//!
//! ## Sub-modules:
//! - `crud`: list, fetch, create, edit and delete records.
//! - `account`: creates the `default_<roll number>` account for a record.

mod account;
mod crud;

use actix_web::web::{delete, get, post, put, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/admin/students";

/// # Registered Routes:
///
/// *   **`GET /`**: every student, ordered by roll number.
/// *   **`POST /`**: `NewStudent`; the roll number and email must pass the
///     format checks.
/// *   **`GET /{roll_number}`**, **`PUT /{roll_number}`** (`StudentUpdate`),
///     **`DELETE /{roll_number}`**.
/// *   **`POST /{roll_number}/account`**: creates and links a login account.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(crud::list))
        .route("", post().to(crud::create))
        .route("/{roll_number}", get().to(crud::get))
        .route("/{roll_number}", put().to(crud::update))
        .route("/{roll_number}", delete().to(crud::delete))
        .route("/{roll_number}/account", post().to(account::process))
}
