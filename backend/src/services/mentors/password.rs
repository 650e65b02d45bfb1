//! Account management for mentor records: the admin can create the
//! `default_<mentor code>` account, or set a new password on an existing one.

use super::crud::find_mentor;
use crate::db::{identities, mentors};
use crate::error::{AppError, AppResult};
use crate::guard::{AdminOnly, Guarded};
use crate::AppState;
use actix_web::{web, HttpResponse};
use common::model::identity::Identity;
use common::requests::SetPasswordRequest;
use log::info;
use rusqlite::Connection;
use serde_json::json;

pub(crate) async fn create_account(
    state: web::Data<AppState>,
    mentor_id: web::Path<String>,
    _caller: Guarded<AdminOnly>,
) -> AppResult<HttpResponse> {
    let mentor_id = mentor_id.into_inner();
    let (identity, password) = state
        .db
        .run(move |conn| create_mentor_account(conn, &mentor_id))
        .await?;
    Ok(HttpResponse::Created().json(json!({
        "identity": identity,
        "message": format!(
            "User created successfully. Username: {}, Default password: {}",
            identity.username, password
        ),
    })))
}

pub(crate) async fn set_password(
    state: web::Data<AppState>,
    mentor_id: web::Path<String>,
    body: web::Json<SetPasswordRequest>,
    _caller: Guarded<AdminOnly>,
) -> AppResult<HttpResponse> {
    let mentor_id = mentor_id.into_inner();
    let request = body.into_inner();
    let message = state
        .db
        .run(move |conn| set_mentor_password(conn, &mentor_id, &request.password))
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "message": message })))
}

fn create_mentor_account(conn: &mut Connection, mentor_id: &str) -> AppResult<(Identity, String)> {
    let mentor = find_mentor(conn, mentor_id)?;
    if mentor.identity_id.is_some() {
        return Err(AppError::Conflict("This mentor already has a user account.".to_string()));
    }
    if identities::find_by_username(conn, mentor_id)?.is_some() {
        return Err(AppError::Conflict(format!(
            "A user with username '{}' already exists.",
            mentor_id
        )));
    }

    let password = format!("default_{}", mentor_id);
    let tx = conn.transaction()?;
    let identity = identities::create(&tx, mentor_id, &mentor.email, &password)?;
    mentors::set_identity(&tx, mentor_id, Some(identity.id))?;
    tx.commit()?;
    info!("created account for mentor {}", mentor_id);
    Ok((identity, password))
}

fn set_mentor_password(conn: &Connection, mentor_id: &str, password: &str) -> AppResult<String> {
    let mentor = find_mentor(conn, mentor_id)?;
    let identity_id = mentor.identity_id.ok_or_else(|| {
        AppError::BadRequest("This mentor does not have a user account.".to_string())
    })?;
    if password.is_empty() {
        return Err(AppError::BadRequest("Password is required.".to_string()));
    }
    identities::set_password(conn, identity_id, password)?;
    info!("password reset for mentor {}", mentor_id);
    Ok(format!("Password for {} has been changed successfully.", mentor.name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_connection;

    #[test]
    fn account_then_password_reset() {
        let mut conn = test_connection();
        mentors::insert(&conn, "M001", "Asha Rao", "asha@x.in", None).unwrap();

        let err = set_mentor_password(&conn, "M001", "new").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let (_, password) = create_mentor_account(&mut conn, "M001").unwrap();
        assert_eq!(password, "default_M001");

        let message = set_mentor_password(&conn, "M001", "new").unwrap();
        assert_eq!(message, "Password for Asha Rao has been changed successfully.");
        assert!(identities::authenticate(&conn, "M001", "new").unwrap().is_some());
    }

    #[test]
    fn unknown_mentor_is_not_found() {
        let conn = test_connection();
        assert!(matches!(
            set_mentor_password(&conn, "M404", "pw"),
            Err(AppError::NotFound(_))
        ));
    }
}
