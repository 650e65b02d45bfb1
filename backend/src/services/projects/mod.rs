//! # Projects Module
//!
//! Routes under `/api/projects`. Students keep a list of their own projects;
//! their mentor can browse it and grade entries.

mod portfolio;

use actix_web::web::{delete, get, post, put, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/projects";

/// # Registered Routes:
///
/// *   **`GET /me`**, **`POST /me`** (`NewProject`), **`DELETE /me/{project_id}`**:
///     students, own projects only.
/// *   **`GET /students/{roll_number}`**: the student's mentor.
/// *   **`PUT /{project_id}/grade`** (`GradeRequest`): the student's mentor.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/me", get().to(portfolio::own))
        .route("/me", post().to(portfolio::create))
        .route("/me/{project_id}", delete().to(portfolio::delete))
        .route("/students/{roll_number}", get().to(portfolio::for_student))
        .route("/{project_id}/grade", put().to(portfolio::grade))
}
