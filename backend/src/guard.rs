//! Capability checks wrapped around handlers.
//!
//! A handler that takes a `Guarded<P>` argument only runs when the request
//! carries a live bearer token and the session passes `P::permits`. Missing
//! or unknown tokens end in 401, failed predicates in 403.

use crate::error::AppError;
use crate::session::Session;
use crate::AppState;
use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use common::model::identity::Role;
use futures_util::future::LocalBoxFuture;
use rusqlite::Connection;
use std::marker::PhantomData;

pub const LOGIN_REQUIRED: &str = "Please log in to access this page.";

/// A predicate over the caller's session. Checks may consult the database.
pub trait Policy {
    /// Message of the 403 returned when `permits` is false.
    const DENIED: &'static str;

    fn permits(session: &Session, conn: &Connection) -> rusqlite::Result<bool>;
}

/// Any logged-in caller.
pub struct Authenticated;

pub struct StudentOnly;

pub struct MentorOnly;

/// Staff accounts that logged in through the admin door. The staff flag is
/// re-read on every request.
pub struct AdminOnly;

impl Policy for Authenticated {
    const DENIED: &'static str = LOGIN_REQUIRED;

    fn permits(_session: &Session, _conn: &Connection) -> rusqlite::Result<bool> {
        Ok(true)
    }
}

impl Policy for StudentOnly {
    const DENIED: &'static str = "Access denied. Only students can access this page.";

    fn permits(session: &Session, _conn: &Connection) -> rusqlite::Result<bool> {
        Ok(session.role == Role::Student)
    }
}

impl Policy for MentorOnly {
    const DENIED: &'static str = "Access denied. Only mentors can access this page.";

    fn permits(session: &Session, _conn: &Connection) -> rusqlite::Result<bool> {
        Ok(session.role == Role::Mentor)
    }
}

impl Policy for AdminOnly {
    const DENIED: &'static str = "Access denied. Only administrators can access this page.";

    fn permits(session: &Session, conn: &Connection) -> rusqlite::Result<bool> {
        if session.role != Role::Admin {
            return Ok(false);
        }
        let is_staff = crate::db::identities::find_by_id(conn, session.identity_id)?
            .map(|identity| identity.is_staff)
            .unwrap_or(false);
        Ok(is_staff)
    }
}

/// Extractor proving the caller passed policy `P`.
pub struct Guarded<P> {
    pub session: Session,
    pub token: String,
    policy: PhantomData<P>,
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

impl<P: Policy + 'static> FromRequest for Guarded<P> {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = bearer_token(req);

        Box::pin(async move {
            let state =
                state.ok_or_else(|| AppError::Internal("application state missing".to_string()))?;
            let token = token.ok_or_else(|| AppError::Unauthorized(LOGIN_REQUIRED.to_string()))?;
            let session = state
                .sessions
                .get(&token)
                .await
                .ok_or_else(|| AppError::Unauthorized(LOGIN_REQUIRED.to_string()))?;

            let candidate = session.clone();
            let permitted = state
                .db
                .run(move |conn| Ok(P::permits(&candidate, conn)?))
                .await?;
            if !permitted {
                return Err(AppError::Forbidden(P::DENIED.to_string()));
            }

            Ok(Guarded {
                session,
                token,
                policy: PhantomData,
            })
        })
    }
}
