//! # Dashboard Module
//!
//! Routes under `/api/dashboard`: what a student or mentor sees after
//! logging in, and the form a student uses to fill in their own profile.
//!
//! ## Sub-modules:
//! - `student`: own record with mentor contact, and the profile update.
//! - `mentor`: own record with the list of assigned students.

mod mentor;
mod student;

use actix_web::web::{get, put, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/dashboard";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/student", get().to(student::dashboard))
        .route("/student/profile", put().to(student::update_profile))
        .route("/mentor", get().to(mentor::dashboard))
}
