//! Academic record service: role-based logins, student and mentor records,
//! marks and projects, and bulk account provisioning from CSV uploads.
//!
//! `main.rs` boots the server; integration tests mount the same routes
//! through [`configure`].

pub mod config;
pub mod credentials;
pub mod db;
pub mod error;
pub mod guard;
pub mod ingest;
pub mod services;
pub mod session;
pub mod validators;

use crate::config::Config;
use crate::db::Db;
use crate::session::SessionsState;
use actix_web::web;
use std::sync::Arc;

/// Shared by every worker through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub sessions: SessionsState,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: Db, config: Config) -> Self {
        AppState {
            db,
            sessions: SessionsState::default(),
            config: Arc::new(config),
        }
    }
}

/// Registers every API scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(services::auth::configure_routes())
        .service(services::uploads::configure_routes())
        .service(services::students::configure_routes())
        .service(services::mentors::configure_routes())
        .service(services::subjects::configure_routes())
        .service(services::marks::configure_routes())
        .service(services::projects::configure_routes())
        .service(services::dashboard::configure_routes());
}
