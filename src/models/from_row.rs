use rusqlite::{Connection, OptionalExtension, Params, Row};

pub trait FromSqliteRow: Sized {
    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}

/// Run `sql` and map every row.
pub fn query_all<T: FromSqliteRow, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> rusqlite::Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, T::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Run `sql` and map the first row, if any.
pub fn query_optional<T: FromSqliteRow, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> rusqlite::Result<Option<T>> {
    let mut stmt = conn.prepare(sql)?;
    stmt.query_row(params, T::from_row).optional()
}
