use common::model::mentor::Mentor;
use rusqlite::{params, Connection, OptionalExtension, Row};

const COLUMNS: &str = "mentor_id, name, email, identity_id";

fn from_row(row: &Row) -> rusqlite::Result<Mentor> {
    Ok(Mentor {
        mentor_id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        identity_id: row.get(3)?,
    })
}

pub fn find(conn: &Connection, mentor_id: &str) -> rusqlite::Result<Option<Mentor>> {
    conn.query_row(
        &format!("SELECT {} FROM mentors WHERE mentor_id = ?1", COLUMNS),
        params![mentor_id],
        from_row,
    )
    .optional()
}

pub fn find_by_identity(conn: &Connection, identity_id: i64) -> rusqlite::Result<Option<Mentor>> {
    conn.query_row(
        &format!("SELECT {} FROM mentors WHERE identity_id = ?1", COLUMNS),
        params![identity_id],
        from_row,
    )
    .optional()
}

pub fn exists(conn: &Connection, mentor_id: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM mentors WHERE mentor_id = ?1)",
        params![mentor_id],
        |row| row.get(0),
    )
}

pub fn list(conn: &Connection) -> rusqlite::Result<Vec<Mentor>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM mentors ORDER BY mentor_id",
        COLUMNS
    ))?;
    let rows = stmt.query_map([], from_row)?;
    rows.collect()
}

pub fn insert(
    conn: &Connection,
    mentor_id: &str,
    name: &str,
    email: &str,
    identity_id: Option<i64>,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO mentors (mentor_id, name, email, identity_id) VALUES (?1, ?2, ?3, ?4)",
        params![mentor_id, name, email, identity_id],
    )?;
    Ok(())
}

pub fn set_identity(
    conn: &Connection,
    mentor_id: &str,
    identity_id: Option<i64>,
) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE mentors SET identity_id = ?1 WHERE mentor_id = ?2",
        params![identity_id, mentor_id],
    )
}

pub fn set_name_and_email(
    conn: &Connection,
    mentor_id: &str,
    name: &str,
    email: &str,
) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE mentors SET name = ?1, email = ?2 WHERE mentor_id = ?3",
        params![name, email, mentor_id],
    )
}

pub fn unlink_identity(conn: &Connection, identity_id: i64) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE mentors SET identity_id = NULL WHERE identity_id = ?1",
        params![identity_id],
    )
}

pub fn delete(conn: &Connection, mentor_id: &str) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM mentors WHERE mentor_id = ?1", params![mentor_id])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{students, test_connection};

    #[test]
    fn deleting_a_mentor_clears_assignments() {
        let conn = test_connection();
        insert(&conn, "M001", "Asha Rao", "asha@x.in", None).unwrap();
        students::insert(&conn, "123A1234", "A", "a@x.in", None, Some("M001")).unwrap();
        assert!(exists(&conn, "M001").unwrap());
        assert_eq!(students::list_by_mentor(&conn, "M001").unwrap().len(), 1);

        delete(&conn, "M001").unwrap();
        assert!(!exists(&conn, "M001").unwrap());
        let student = students::find(&conn, "123A1234").unwrap().unwrap();
        assert_eq!(student.mentor_id, None);
    }
}
