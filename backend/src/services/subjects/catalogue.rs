use crate::db::academics;
use crate::error::{AppError, AppResult};
use crate::guard::{AdminOnly, Authenticated, Guarded};
use crate::AppState;
use actix_web::{web, HttpResponse};
use common::model::academics::Subject;
use common::requests::SubjectPayload;
use log::info;
use rusqlite::Connection;

const SEMESTERS: std::ops::RangeInclusive<u32> = 1..=8;

pub(crate) async fn list(state: web::Data<AppState>, _caller: Guarded<Authenticated>) -> AppResult<HttpResponse> {
    let subjects = state.db.run(|conn| Ok(academics::list_subjects(conn)?)).await?;
    Ok(HttpResponse::Ok().json(subjects))
}

pub(crate) async fn create(
    state: web::Data<AppState>,
    body: web::Json<SubjectPayload>,
    _caller: Guarded<AdminOnly>,
) -> AppResult<HttpResponse> {
    let payload = body.into_inner();
    let subject = state.db.run(move |conn| create_subject(conn, &payload)).await?;
    info!("created subject {}", subject.subject_code);
    Ok(HttpResponse::Created().json(subject))
}

pub(crate) async fn update(
    state: web::Data<AppState>,
    subject_code: web::Path<String>,
    body: web::Json<SubjectPayload>,
    _caller: Guarded<AdminOnly>,
) -> AppResult<HttpResponse> {
    let subject_code = subject_code.into_inner();
    let payload = body.into_inner();
    let subject = state
        .db
        .run(move |conn| update_subject(conn, &subject_code, &payload))
        .await?;
    Ok(HttpResponse::Ok().json(subject))
}

pub(crate) async fn delete(
    state: web::Data<AppState>,
    subject_code: web::Path<String>,
    _caller: Guarded<AdminOnly>,
) -> AppResult<HttpResponse> {
    let subject_code = subject_code.into_inner();
    state
        .db
        .run(move |conn| {
            if academics::delete_subject(conn, &subject_code)? == 0 {
                return Err(not_found());
            }
            Ok(())
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

fn not_found() -> AppError {
    AppError::NotFound("Subject not found.".to_string())
}

fn check_payload(payload: &SubjectPayload) -> AppResult<()> {
    if payload.subject_code.trim().is_empty() || payload.name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Subject code and name are required.".to_string(),
        ));
    }
    if !SEMESTERS.contains(&payload.semester) {
        return Err(AppError::BadRequest(format!(
            "Semester must be between {} and {}.",
            SEMESTERS.start(),
            SEMESTERS.end()
        )));
    }
    Ok(())
}

fn create_subject(conn: &Connection, payload: &SubjectPayload) -> AppResult<Subject> {
    check_payload(payload)?;
    if academics::find_subject(conn, &payload.subject_code)?.is_some() {
        return Err(AppError::Conflict(format!(
            "A subject with code '{}' already exists.",
            payload.subject_code
        )));
    }
    academics::insert_subject(conn, payload)?;
    academics::find_subject(conn, &payload.subject_code)?.ok_or_else(not_found)
}

fn update_subject(conn: &Connection, subject_code: &str, payload: &SubjectPayload) -> AppResult<Subject> {
    check_payload(payload)?;
    if academics::update_subject(conn, subject_code, payload)? == 0 {
        return Err(not_found());
    }
    academics::find_subject(conn, subject_code)?.ok_or_else(not_found)
}
