use common::model::batch::{BatchDetail, BatchKind, BatchSummary};
use common::model::identity::Identity;
use rusqlite::{params, Connection, OptionalExtension, Row};

const SUMMARY_SQL: &str = "SELECT b.id, b.kind, b.file_name, b.content_md5, b.uploaded_at, b.processed,
        (SELECT COUNT(*) FROM batch_identities bi WHERE bi.batch_id = b.id)
     FROM batches b";

fn summary_from_row(row: &Row) -> rusqlite::Result<BatchSummary> {
    let kind: String = row.get(1)?;
    let kind = BatchKind::parse(&kind).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            rusqlite::types::Type::Text,
            format!("unknown batch kind '{}'", kind).into(),
        )
    })?;
    Ok(BatchSummary {
        id: row.get(0)?,
        kind,
        file_name: row.get(2)?,
        content_md5: row.get(3)?,
        uploaded_at: row.get(4)?,
        processed: row.get::<_, i64>(5)? != 0,
        associated_count: row.get::<_, i64>(6)? as usize,
    })
}

pub fn exists_for_kind(conn: &Connection, kind: BatchKind) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM batches WHERE kind = ?1)",
        params![kind.as_str()],
        |row| row.get(0),
    )
}

pub fn insert(
    conn: &Connection,
    kind: BatchKind,
    file_name: &str,
    content: &str,
    content_md5: &str,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO batches (kind, file_name, content, content_md5) VALUES (?1, ?2, ?3, ?4)",
        params![kind.as_str(), file_name, content, content_md5],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Adds identities to the batch's associated set. Already associated ones are
/// ignored, so the set only grows.
pub fn associate(conn: &Connection, batch_id: i64, identity_ids: &[i64]) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare(
        "INSERT OR IGNORE INTO batch_identities (batch_id, identity_id) VALUES (?1, ?2)",
    )?;
    for identity_id in identity_ids {
        stmt.execute(params![batch_id, identity_id])?;
    }
    Ok(())
}

pub fn mark_processed(conn: &Connection, batch_id: i64) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE batches SET processed = 1 WHERE id = ?1",
        params![batch_id],
    )
}

/// Batches of one kind, newest first.
pub fn list(conn: &Connection, kind: BatchKind) -> rusqlite::Result<Vec<BatchSummary>> {
    let mut stmt = conn.prepare(&format!("{} WHERE b.kind = ?1 ORDER BY b.id DESC", SUMMARY_SQL))?;
    let rows = stmt.query_map(params![kind.as_str()], summary_from_row)?;
    rows.collect()
}

pub fn find(conn: &Connection, kind: BatchKind, batch_id: i64) -> rusqlite::Result<Option<BatchSummary>> {
    conn.query_row(
        &format!("{} WHERE b.kind = ?1 AND b.id = ?2", SUMMARY_SQL),
        params![kind.as_str(), batch_id],
        summary_from_row,
    )
    .optional()
}

pub fn detail(conn: &Connection, kind: BatchKind, batch_id: i64) -> rusqlite::Result<Option<BatchDetail>> {
    let Some(summary) = find(conn, kind, batch_id)? else {
        return Ok(None);
    };
    let content: String = conn.query_row(
        "SELECT content FROM batches WHERE id = ?1",
        params![batch_id],
        |row| row.get(0),
    )?;
    let associated_usernames = associated_identities(conn, batch_id)?
        .into_iter()
        .map(|identity| identity.username)
        .collect();
    Ok(Some(BatchDetail {
        summary,
        content,
        associated_usernames,
    }))
}

pub fn associated_identities(conn: &Connection, batch_id: i64) -> rusqlite::Result<Vec<Identity>> {
    let mut stmt = conn.prepare(
        "SELECT i.id, i.username, i.email, i.is_staff
         FROM batch_identities bi JOIN identities i ON i.id = bi.identity_id
         WHERE bi.batch_id = ?1
         ORDER BY i.username",
    )?;
    let rows = stmt.query_map(params![batch_id], |row| {
        Ok(Identity {
            id: row.get(0)?,
            username: row.get(1)?,
            email: row.get(2)?,
            is_staff: row.get::<_, i64>(3)? != 0,
        })
    })?;
    rows.collect()
}

pub fn delete(conn: &Connection, batch_id: i64) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM batches WHERE id = ?1", params![batch_id])
}
