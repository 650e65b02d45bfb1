use crate::db::{mentors, students};
use crate::error::{AppError, AppResult};
use crate::guard::{AdminOnly, Guarded};
use crate::validators;
use crate::AppState;
use actix_web::{web, HttpResponse};
use common::model::student::Student;
use common::requests::{NewStudent, StudentUpdate};
use log::info;
use rusqlite::Connection;

pub(crate) async fn list(state: web::Data<AppState>, _caller: Guarded<AdminOnly>) -> AppResult<HttpResponse> {
    let all = state.db.run(|conn| Ok(students::list(conn)?)).await?;
    Ok(HttpResponse::Ok().json(all))
}

pub(crate) async fn get(
    state: web::Data<AppState>,
    roll_number: web::Path<String>,
    _caller: Guarded<AdminOnly>,
) -> AppResult<HttpResponse> {
    let roll_number = roll_number.into_inner();
    let student = state
        .db
        .run(move |conn| find_student(conn, &roll_number))
        .await?;
    Ok(HttpResponse::Ok().json(student))
}

pub(crate) async fn create(
    state: web::Data<AppState>,
    body: web::Json<NewStudent>,
    _caller: Guarded<AdminOnly>,
) -> AppResult<HttpResponse> {
    let suffix = state.config.email_suffix.clone();
    let request = body.into_inner();
    let student = state
        .db
        .run(move |conn| create_student(conn, &suffix, &request))
        .await?;
    info!("created student record {}", student.roll_number);
    Ok(HttpResponse::Created().json(student))
}

pub(crate) async fn update(
    state: web::Data<AppState>,
    roll_number: web::Path<String>,
    body: web::Json<StudentUpdate>,
    _caller: Guarded<AdminOnly>,
) -> AppResult<HttpResponse> {
    let suffix = state.config.email_suffix.clone();
    let roll_number = roll_number.into_inner();
    let request = body.into_inner();
    let student = state
        .db
        .run(move |conn| update_student(conn, &suffix, &roll_number, &request))
        .await?;
    Ok(HttpResponse::Ok().json(student))
}

pub(crate) async fn delete(
    state: web::Data<AppState>,
    roll_number: web::Path<String>,
    _caller: Guarded<AdminOnly>,
) -> AppResult<HttpResponse> {
    let roll_number = roll_number.into_inner();
    state
        .db
        .run(move |conn| {
            if students::delete(conn, &roll_number)? == 0 {
                return Err(not_found());
            }
            info!("deleted student record {}", roll_number);
            Ok(())
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

fn not_found() -> AppError {
    AppError::NotFound("Student not found.".to_string())
}

pub(crate) fn find_student(conn: &Connection, roll_number: &str) -> AppResult<Student> {
    students::find(conn, roll_number)?.ok_or_else(not_found)
}

fn check_mentor(conn: &Connection, mentor_id: &str) -> AppResult<()> {
    if mentors::exists(conn, mentor_id)? {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!("Mentor '{}' does not exist", mentor_id)))
    }
}

pub(crate) fn create_student(conn: &Connection, email_suffix: &str, request: &NewStudent) -> AppResult<Student> {
    let roll_number = request.roll_number.trim();
    let email_id = request.email_id.trim();
    validators::validate_roll_number(roll_number).map_err(AppError::BadRequest)?;
    validators::validate_email(email_id, email_suffix).map_err(AppError::BadRequest)?;
    if request.name.trim().is_empty() {
        return Err(AppError::BadRequest("Name is required.".to_string()));
    }
    if students::find(conn, roll_number)?.is_some() {
        return Err(AppError::Conflict(format!(
            "A student with roll number '{}' already exists.",
            roll_number
        )));
    }
    let mentor_id = request.mentor_id.as_deref().map(str::trim).filter(|m| !m.is_empty());
    if let Some(mentor_id) = mentor_id {
        check_mentor(conn, mentor_id)?;
    }

    students::insert(conn, roll_number, request.name.trim(), email_id, None, mentor_id)?;
    find_student(conn, roll_number)
}

/// Applies the fields present in `request`. An empty `mentor_id` clears the
/// assignment.
pub(crate) fn update_student(
    conn: &Connection,
    email_suffix: &str,
    roll_number: &str,
    request: &StudentUpdate,
) -> AppResult<Student> {
    find_student(conn, roll_number)?;

    if let Some(name) = request.name.as_deref().map(str::trim) {
        if name.is_empty() {
            return Err(AppError::BadRequest("Name is required.".to_string()));
        }
        students::set_name(conn, roll_number, name)?;
    }
    if let Some(email_id) = request.email_id.as_deref().map(str::trim) {
        validators::validate_email(email_id, email_suffix).map_err(AppError::BadRequest)?;
        students::set_email(conn, roll_number, email_id)?;
    }
    if let Some(mentor_id) = request.mentor_id.as_deref().map(str::trim) {
        if mentor_id.is_empty() {
            students::set_mentor(conn, roll_number, None)?;
        } else {
            check_mentor(conn, mentor_id)?;
            students::set_mentor(conn, roll_number, Some(mentor_id))?;
        }
    }
    find_student(conn, roll_number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_connection;

    const SUFFIX: &str = "@gst.sies.edu.in";

    fn new_student(roll_number: &str, email_id: &str) -> NewStudent {
        NewStudent {
            roll_number: roll_number.to_string(),
            name: "Priya Nair".to_string(),
            email_id: email_id.to_string(),
            mentor_id: None,
        }
    }

    #[test]
    fn create_checks_formats() {
        let conn = test_connection();
        let bad_roll = create_student(&conn, SUFFIX, &new_student("123a1234", "priya@gst.sies.edu.in"));
        assert!(matches!(bad_roll, Err(AppError::BadRequest(_))));
        let bad_email = create_student(&conn, SUFFIX, &new_student("123A1234", "priya@gmail.com"));
        assert!(matches!(bad_email, Err(AppError::BadRequest(_))));
        let short_local = create_student(&conn, SUFFIX, &new_student("123A1234", "pn@gst.sies.edu.in"));
        assert!(matches!(short_local, Err(AppError::BadRequest(_))));

        let student = create_student(&conn, SUFFIX, &new_student("123A1234", "priya@gst.sies.edu.in")).unwrap();
        assert_eq!(student.identity_id, None);
    }

    #[test]
    fn create_refuses_duplicates_and_unknown_mentors() {
        let conn = test_connection();
        create_student(&conn, SUFFIX, &new_student("123A1234", "priya@gst.sies.edu.in")).unwrap();
        let again = create_student(&conn, SUFFIX, &new_student("123A1234", "other@gst.sies.edu.in"));
        assert!(matches!(again, Err(AppError::Conflict(_))));

        let mut with_mentor = new_student("123A1235", "ravi@gst.sies.edu.in");
        with_mentor.mentor_id = Some("M404".to_string());
        assert!(matches!(
            create_student(&conn, SUFFIX, &with_mentor),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn update_changes_only_given_fields() {
        let conn = test_connection();
        mentors::insert(&conn, "M001", "Asha Rao", "asha@x.in", None).unwrap();
        create_student(&conn, SUFFIX, &new_student("123A1234", "priya@gst.sies.edu.in")).unwrap();

        let updated = update_student(
            &conn,
            SUFFIX,
            "123A1234",
            &StudentUpdate {
                mentor_id: Some("M001".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(updated.mentor_id.as_deref(), Some("M001"));
        assert_eq!(updated.name, "Priya Nair");

        let cleared = update_student(
            &conn,
            SUFFIX,
            "123A1234",
            &StudentUpdate {
                mentor_id: Some(String::new()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(cleared.mentor_id, None);
    }

    #[test]
    fn update_of_missing_student_is_not_found() {
        let conn = test_connection();
        let err = update_student(&conn, SUFFIX, "123A1234", &StudentUpdate::default()).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
