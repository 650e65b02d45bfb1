//! # Marks Module
//!
//! Routes under `/api/marks`. Marks are recorded per student, subject,
//! semester and assessment (IA1 and IA2 out of 20, END_SEM out of 80).
//!
//! - Admins and the student's own mentor enter marks.
//! - Students read their own marks.
//! - Mentors read the marks of students assigned to them; admins read any.

mod record;

use actix_web::web::{get, put, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/marks";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", put().to(record::upsert))
        .route("/me", get().to(record::own))
        .route("/students/{roll_number}", get().to(record::for_student))
}
