use crate::credentials;
use common::model::identity::Identity;
use rusqlite::{params, Connection, OptionalExtension, Row};

const COLUMNS: &str = "id, username, email, is_staff";

fn from_row(row: &Row) -> rusqlite::Result<Identity> {
    Ok(Identity {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        is_staff: row.get::<_, i64>(3)? != 0,
    })
}

pub fn find_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<Identity>> {
    conn.query_row(
        &format!("SELECT {} FROM identities WHERE id = ?1", COLUMNS),
        params![id],
        from_row,
    )
    .optional()
}

pub fn find_by_username(conn: &Connection, username: &str) -> rusqlite::Result<Option<Identity>> {
    conn.query_row(
        &format!("SELECT {} FROM identities WHERE username = ?1", COLUMNS),
        params![username],
        from_row,
    )
    .optional()
}

/// Returns the identity with this username, creating it with `email` if it
/// does not exist yet. The flag is `true` when the row was inserted.
pub fn get_or_create(
    conn: &Connection,
    username: &str,
    email: &str,
) -> rusqlite::Result<(Identity, bool)> {
    let inserted = conn.execute(
        "INSERT INTO identities (username, email) VALUES (?1, ?2)
         ON CONFLICT(username) DO NOTHING",
        params![username, email],
    )?;
    let identity = conn.query_row(
        &format!("SELECT {} FROM identities WHERE username = ?1", COLUMNS),
        params![username],
        from_row,
    )?;
    Ok((identity, inserted == 1))
}

pub fn create(
    conn: &Connection,
    username: &str,
    email: &str,
    password: &str,
) -> rusqlite::Result<Identity> {
    conn.execute(
        "INSERT INTO identities (username, email, password_hash) VALUES (?1, ?2, ?3)",
        params![username, email, credentials::hash_password(password)],
    )?;
    let id = conn.last_insert_rowid();
    Ok(Identity {
        id,
        username: username.to_string(),
        email: email.to_string(),
        is_staff: false,
    })
}

/// Replaces the stored credential. Previous values are not consulted.
pub fn set_password(conn: &Connection, id: i64, password: &str) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE identities SET password_hash = ?1 WHERE id = ?2",
        params![credentials::hash_password(password), id],
    )
}

/// Looks up `username` and checks `password` against its credential.
pub fn authenticate(
    conn: &Connection,
    username: &str,
    password: &str,
) -> rusqlite::Result<Option<Identity>> {
    let found = conn
        .query_row(
            &format!(
                "SELECT {}, password_hash FROM identities WHERE username = ?1",
                COLUMNS
            ),
            params![username],
            |row| Ok((from_row(row)?, row.get::<_, String>(4)?)),
        )
        .optional()?;

    Ok(found.and_then(|(identity, hash)| {
        credentials::verify_password(password, &hash).then_some(identity)
    }))
}

/// Creates the staff account or resets its password and staff flag.
pub fn ensure_staff(conn: &Connection, username: &str, password: &str) -> rusqlite::Result<Identity> {
    let (identity, _) = get_or_create(conn, username, "")?;
    conn.execute(
        "UPDATE identities SET is_staff = 1, password_hash = ?1 WHERE id = ?2",
        params![credentials::hash_password(password), identity.id],
    )?;
    Ok(Identity {
        is_staff: true,
        ..identity
    })
}

pub fn delete(conn: &Connection, id: i64) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM identities WHERE id = ?1", params![id])
}
