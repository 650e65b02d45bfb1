//! # Authentication Service Module
//!
//! Routes under `/api/auth`. Logging in through one of the three doors
//! (`student`, `mentor`, `admin`) checks the credential, applies the door's
//! own rule and hands back a bearer token for the `Authorization` header.
//!
//! ## Sub-modules:
//! - `login`: credential check, student auto-linking and session creation.
//! - `logout`: drops the caller's session.

mod login;
mod logout;

use actix_web::web::{post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/auth";

/// # Registered Routes:
///
/// *   **`POST /login/{role}`**: `{username, password}` in, `LoginResponse` out.
/// *   **`POST /logout`**: requires a session, returns `204 No Content`.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/login/{role}", post().to(login::process))
        .route("/logout", post().to(logout::process))
}
