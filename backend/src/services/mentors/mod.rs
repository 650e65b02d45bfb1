//! # Mentor Administration Module
//!
//! Admin-only routes under `/api/admin/mentors`, keyed by mentor code.
//!
//! ## Sub-modules:
//! - `crud`: list, fetch, create, edit and delete records.
//! - `password`: account creation and password resets for mentors.

mod crud;
mod password;

use actix_web::web::{delete, get, post, put, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/admin/mentors";

/// # Registered Routes:
///
/// *   **`GET /`**, **`POST /`** (`NewMentor`).
/// *   **`GET /{mentor_id}`**, **`PUT /{mentor_id}`** (`MentorUpdate`),
///     **`DELETE /{mentor_id}`**. Deleting a mentor clears it from the
///     students it was assigned to.
/// *   **`POST /{mentor_id}/account`**: `default_<mentor code>` account.
/// *   **`POST /{mentor_id}/password`**: `SetPasswordRequest`.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(crud::list))
        .route("", post().to(crud::create))
        .route("/{mentor_id}", get().to(crud::get))
        .route("/{mentor_id}", put().to(crud::update))
        .route("/{mentor_id}", delete().to(crud::delete))
        .route("/{mentor_id}/account", post().to(password::create_account))
        .route("/{mentor_id}/password", post().to(password::set_password))
}
