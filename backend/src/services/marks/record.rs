use crate::db::academics;
use crate::error::{AppError, AppResult};
use crate::guard::{Authenticated, Guarded, StudentOnly};
use crate::services::access;
use crate::session::Session;
use crate::AppState;
use actix_web::{web, HttpResponse};
use common::model::academics::Mark;
use common::requests::MarkPayload;
use log::info;
use rusqlite::Connection;

pub(crate) async fn upsert(
    state: web::Data<AppState>,
    body: web::Json<MarkPayload>,
    caller: Guarded<Authenticated>,
) -> AppResult<HttpResponse> {
    let payload = body.into_inner();
    let session = caller.session;
    let marks = state
        .db
        .run(move |conn| record_mark(conn, &session, &payload))
        .await?;
    Ok(HttpResponse::Ok().json(marks))
}

pub(crate) async fn own(state: web::Data<AppState>, caller: Guarded<StudentOnly>) -> AppResult<HttpResponse> {
    let session = caller.session;
    let marks = state
        .db
        .run(move |conn| {
            let student = access::own_student(conn, &session)?;
            Ok(academics::marks_for_student(conn, &student.roll_number)?)
        })
        .await?;
    Ok(HttpResponse::Ok().json(marks))
}

pub(crate) async fn for_student(
    state: web::Data<AppState>,
    roll_number: web::Path<String>,
    caller: Guarded<Authenticated>,
) -> AppResult<HttpResponse> {
    let roll_number = roll_number.into_inner();
    let session = caller.session;
    let marks = state
        .db
        .run(move |conn| {
            let student = access::managed_student(conn, &session, &roll_number)?;
            Ok(academics::marks_for_student(conn, &student.roll_number)?)
        })
        .await?;
    Ok(HttpResponse::Ok().json(marks))
}

/// Stores one mark and returns all of the student's marks.
fn record_mark(conn: &Connection, session: &Session, payload: &MarkPayload) -> AppResult<Vec<Mark>> {
    let student = access::managed_student(conn, session, &payload.roll_number)?;
    if academics::find_subject(conn, &payload.subject_code)?.is_none() {
        return Err(AppError::NotFound("Subject not found.".to_string()));
    }
    if let Some(obtained) = payload.marks_obtained {
        let max = payload.assessment.max_marks();
        if !(0.0..=max).contains(&obtained) {
            return Err(AppError::BadRequest(format!(
                "{} marks must be between 0 and {}.",
                payload.assessment.as_str(),
                max
            )));
        }
    }

    academics::upsert_mark(conn, payload)?;
    info!(
        "'{}' recorded {} {} for {}",
        session.username,
        payload.subject_code,
        payload.assessment.as_str(),
        student.roll_number
    );
    Ok(academics::marks_for_student(conn, &student.roll_number)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{identities, mentors, students, test_connection};
    use common::model::academics::Assessment;
    use common::model::identity::Role;
    use common::requests::SubjectPayload;

    fn setup() -> (Connection, Session) {
        let conn = test_connection();
        let identity = identities::create(&conn, "M001", "a@x.in", "pw").unwrap();
        mentors::insert(&conn, "M001", "Asha Rao", "a@x.in", Some(identity.id)).unwrap();
        students::insert(&conn, "123A1234", "Priya Nair", "p@x.in", None, Some("M001")).unwrap();
        academics::insert_subject(
            &conn,
            &SubjectPayload {
                subject_code: "CS301".to_string(),
                name: "Data Structures".to_string(),
                semester: 3,
                branch: "COMPS".to_string(),
                is_elective: false,
            },
        )
        .unwrap();
        let session = Session {
            identity_id: identity.id,
            username: "M001".to_string(),
            role: Role::Mentor,
        };
        (conn, session)
    }

    fn mark(assessment: Assessment, obtained: f64) -> MarkPayload {
        MarkPayload {
            roll_number: "123A1234".to_string(),
            subject_code: "CS301".to_string(),
            semester: 3,
            assessment,
            marks_obtained: Some(obtained),
        }
    }

    #[test]
    fn mentor_records_and_overwrites() {
        let (conn, session) = setup();
        record_mark(&conn, &session, &mark(Assessment::Ia1, 15.0)).unwrap();
        let marks = record_mark(&conn, &session, &mark(Assessment::Ia1, 18.0)).unwrap();

        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].marks_obtained, Some(18.0));
        assert_eq!(marks[0].max_marks, 20.0);
    }

    #[test]
    fn marks_are_bounded_by_assessment() {
        let (conn, session) = setup();
        assert!(matches!(
            record_mark(&conn, &session, &mark(Assessment::Ia2, 21.0)),
            Err(AppError::BadRequest(_))
        ));
        assert!(record_mark(&conn, &session, &mark(Assessment::EndSem, 80.0)).is_ok());
    }

    #[test]
    fn unknown_subject_is_not_found() {
        let (conn, session) = setup();
        let mut payload = mark(Assessment::Ia1, 10.0);
        payload.subject_code = "CS999".to_string();
        assert!(matches!(
            record_mark(&conn, &session, &payload),
            Err(AppError::NotFound(_))
        ));
    }
}
