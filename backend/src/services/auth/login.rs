//! Login through one of the role doors.
//!
//! - Students: the identity must belong to a student record. An identity
//!   created by an upload whose record was unlinked is re-linked by roll
//!   number on the spot.
//! - Mentors: the identity must already be linked to a mentor record.
//! - Admins: the identity must carry the staff flag.

use crate::db::{identities, mentors, students};
use crate::error::{AppError, AppResult};
use crate::session::Session;
use crate::AppState;
use actix_web::{web, HttpResponse};
use common::model::identity::{Identity, Role};
use common::reports::{LoginResponse, ReportMessage};
use common::requests::LoginRequest;
use log::info;
use rusqlite::Connection;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub(crate) async fn process(
    state: web::Data<AppState>,
    role: web::Path<String>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let role = Role::parse(&role)
        .ok_or_else(|| AppError::NotFound(format!("Unknown login role '{}'.", role)))?;
    let request = body.into_inner();

    let (identity, messages) = state
        .db
        .run(move |conn| login(conn, role, &request))
        .await?;

    let token = state
        .sessions
        .open(Session {
            identity_id: identity.id,
            username: identity.username.clone(),
            role,
        })
        .await;
    info!("{} '{}' logged in", role.as_str(), identity.username);

    Ok(HttpResponse::Ok().json(LoginResponse {
        token,
        role,
        username: identity.username,
        messages,
    }))
}

pub(crate) fn login(
    conn: &Connection,
    role: Role,
    request: &LoginRequest,
) -> AppResult<(Identity, Vec<ReportMessage>)> {
    let username = request.username.trim();
    let authenticated = identities::authenticate(conn, username, &request.password)?;
    let mut messages = Vec::new();

    let identity = match role {
        Role::Student => {
            let identity =
                authenticated.ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;
            if students::find_by_identity(conn, identity.id)?.is_none() {
                if students::find(conn, &identity.username)?.is_none() {
                    return Err(AppError::Forbidden(
                        "No student record found with your roll number. Please contact the administrator."
                            .to_string(),
                    ));
                }
                students::set_identity(conn, &identity.username, Some(identity.id))?;
                info!("linked identity '{}' to its student record", identity.username);
                messages.push(ReportMessage::success(
                    "Your account has been linked to your student record.",
                ));
            }
            identity
        }
        Role::Mentor => {
            let identity =
                authenticated.ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;
            if mentors::find_by_identity(conn, identity.id)?.is_none() {
                return Err(AppError::Forbidden(
                    "Your account is not linked to a mentor record.".to_string(),
                ));
            }
            identity
        }
        Role::Admin => authenticated.filter(|identity| identity.is_staff).ok_or_else(|| {
            AppError::Unauthorized("Invalid credentials or insufficient permissions".to_string())
        })?,
    };
    Ok((identity, messages))
}
