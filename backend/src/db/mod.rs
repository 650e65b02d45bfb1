//! SQLite persistence.
//!
//! A single connection is shared behind a mutex. Request handlers reach it
//! through [`Db::run`], which moves the work onto actix's blocking pool so the
//! async workers never wait on SQLite. The schema is created on open with
//! `CREATE TABLE IF NOT EXISTS`, so opening an existing file is a no-op.
//!
//! Sub-modules hold the queries for one table family each and work on a
//! plain `&Connection`, which also makes them usable inside savepoints.

pub mod academics;
pub mod batches;
pub mod identities;
pub mod mentors;
pub mod students;

use crate::error::{AppError, AppResult};
use actix_web::web;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS identities(
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL DEFAULT '',
    password_hash TEXT NOT NULL DEFAULT '',
    is_staff INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS mentors(
    mentor_id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    identity_id INTEGER UNIQUE REFERENCES identities(id) ON DELETE SET NULL
);

CREATE TABLE IF NOT EXISTS students(
    roll_number TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email_id TEXT NOT NULL,
    identity_id INTEGER UNIQUE REFERENCES identities(id) ON DELETE SET NULL,
    mentor_id TEXT REFERENCES mentors(mentor_id) ON DELETE SET NULL,
    address TEXT,
    phone_no_student TEXT,
    phone_no_mother TEXT,
    phone_no_father TEXT,
    branch TEXT,
    division TEXT,
    dob TEXT,
    marks_10th REAL,
    marks_12th REAL,
    jee_score REAL,
    cet_score REAL,
    internship_status TEXT NOT NULL DEFAULT 'NOT_STARTED',
    internship_company TEXT,
    internship_role TEXT,
    goals TEXT NOT NULL DEFAULT '',
    strengths TEXT NOT NULL DEFAULT '',
    weaknesses TEXT NOT NULL DEFAULT '',
    achievements TEXT NOT NULL DEFAULT '',
    extracurricular TEXT NOT NULL DEFAULT '',
    suggestions TEXT NOT NULL DEFAULT ''
);
CREATE INDEX IF NOT EXISTS idx_students_mentor ON students(mentor_id);

CREATE TABLE IF NOT EXISTS subjects(
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    subject_code TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    semester INTEGER NOT NULL,
    branch TEXT NOT NULL,
    is_elective INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS marks(
    roll_number TEXT NOT NULL REFERENCES students(roll_number) ON DELETE CASCADE,
    subject_code TEXT NOT NULL REFERENCES subjects(subject_code) ON DELETE CASCADE,
    semester INTEGER NOT NULL,
    assessment TEXT NOT NULL,
    max_marks REAL NOT NULL,
    marks_obtained REAL,
    PRIMARY KEY(roll_number, subject_code, semester, assessment)
);

CREATE TABLE IF NOT EXISTS projects(
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    roll_number TEXT NOT NULL REFERENCES students(roll_number) ON DELETE CASCADE,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    semester INTEGER NOT NULL,
    technologies TEXT NOT NULL DEFAULT '',
    repository_link TEXT,
    grade TEXT
);
CREATE INDEX IF NOT EXISTS idx_projects_student ON projects(roll_number);

CREATE TABLE IF NOT EXISTS batches(
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    kind TEXT NOT NULL,
    file_name TEXT NOT NULL,
    content TEXT NOT NULL,
    content_md5 TEXT NOT NULL,
    uploaded_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    processed INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS batch_identities(
    batch_id INTEGER NOT NULL REFERENCES batches(id) ON DELETE CASCADE,
    identity_id INTEGER NOT NULL REFERENCES identities(id) ON DELETE CASCADE,
    PRIMARY KEY(batch_id, identity_id)
);
";

/// Cloneable handle to the shared connection.
#[derive(Clone)]
pub struct Db {
    conn: Arc<Mutex<Connection>>,
}

impl Db {
    pub fn open(path: &Path) -> AppResult<Db> {
        Db::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> AppResult<Db> {
        Db::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> AppResult<Db> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Db {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs `f` against the connection on the blocking thread pool.
    pub async fn run<T, F>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&mut Connection) -> AppResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.clone();
        web::block(move || db.with_conn(f))
            .await
            .map_err(|e| AppError::Internal(format!("blocking task failed: {}", e)))?
    }

    /// Runs `f` against the connection on the current thread.
    pub fn with_conn<T, F>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&mut Connection) -> AppResult<T>,
    {
        let mut conn = self
            .conn
            .lock()
            .map_err(|_| AppError::Internal("database lock poisoned".to_string()))?;
        f(&mut conn)
    }
}

#[cfg(test)]
pub(crate) fn test_connection() -> Connection {
    let conn = Connection::open_in_memory().expect("open in-memory db");
    conn.execute_batch("PRAGMA foreign_keys = ON;").expect("enable fks");
    conn.execute_batch(SCHEMA).expect("create schema");
    conn
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_is_idempotent() {
        let conn = test_connection();
        conn.execute_batch(SCHEMA).unwrap();
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN
                 ('identities','students','mentors','batches','batch_identities')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 5);
    }

    #[test]
    fn with_conn_sees_the_schema() {
        let db = Db::open_in_memory().unwrap();
        let count: i64 = db
            .with_conn(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM identities", [], |row| row.get(0))?)
            })
            .unwrap();
        assert_eq!(count, 0);
    }
}
