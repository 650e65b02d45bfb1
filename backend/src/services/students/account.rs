//! `POST /api/admin/students/{roll_number}/account`
//!
//! Gives a record without an account the login `roll number` /
//! `default_<roll number>`.

use super::crud::find_student;
use crate::db::{identities, students};
use crate::error::{AppError, AppResult};
use crate::guard::{AdminOnly, Guarded};
use crate::AppState;
use actix_web::{web, HttpResponse};
use common::model::identity::Identity;
use log::info;
use rusqlite::Connection;
use serde_json::json;

pub(crate) async fn process(
    state: web::Data<AppState>,
    roll_number: web::Path<String>,
    _caller: Guarded<AdminOnly>,
) -> AppResult<HttpResponse> {
    let roll_number = roll_number.into_inner();
    let (identity, password) = state
        .db
        .run(move |conn| create_account(conn, &roll_number))
        .await?;
    Ok(HttpResponse::Created().json(json!({
        "identity": identity,
        "message": format!(
            "User created successfully. Username: {}, Default password: {}",
            identity.username, password
        ),
    })))
}

fn default_password(username: &str) -> String {
    format!("default_{}", username)
}

fn create_account(conn: &mut Connection, roll_number: &str) -> AppResult<(Identity, String)> {
    let student = find_student(conn, roll_number)?;
    if student.identity_id.is_some() {
        return Err(AppError::Conflict("This student already has a user account.".to_string()));
    }
    if identities::find_by_username(conn, roll_number)?.is_some() {
        return Err(AppError::Conflict(format!(
            "A user with username '{}' already exists.",
            roll_number
        )));
    }

    let password = default_password(roll_number);
    let tx = conn.transaction()?;
    let identity = identities::create(&tx, roll_number, &student.email_id, &password)?;
    students::set_identity(&tx, roll_number, Some(identity.id))?;
    tx.commit()?;
    info!("created account for student {}", roll_number);
    Ok((identity, password))
}
