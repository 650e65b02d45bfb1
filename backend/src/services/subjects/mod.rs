//! # Subject Catalogue Module
//!
//! Routes under `/api/subjects`. Any logged-in caller can read the catalogue;
//! only admins change it. Subjects are addressed by their code.

mod catalogue;

use actix_web::web::{delete, get, post, put, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/subjects";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(catalogue::list))
        .route("", post().to(catalogue::create))
        .route("/{subject_code}", put().to(catalogue::update))
        .route("/{subject_code}", delete().to(catalogue::delete))
}
