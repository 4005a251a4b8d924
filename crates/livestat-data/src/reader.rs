//! SQL dump loading for livestat.
//!
//! Executes a monitoring-database dump against an in-memory SQLite database
//! and reads the two polling tables back as ordered row vectors.

use std::path::Path;

use livestat_core::error::{LiveStatError, Result};
use livestat_core::models::{BilibiliSample, DouyinSample};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, Row};
use tracing::{debug, warn};

// ── Tables ────────────────────────────────────────────────────────────────────

pub const BILIBILI_TABLE: &str = "BLUsers";
pub const DOUYIN_TABLE: &str = "DYUsers";

const BILIBILI_QUERY: &str = "
    SELECT record_time, name, uid, room_id, live_status, title,
           live_time, attention, onlineNum, guardNum
    FROM BLUsers
    ORDER BY uid, record_time";

const DOUYIN_QUERY: &str = "
    SELECT record_time, sec_uid, nickname, live_status,
           follower_count, max_follower_count, total_favorited
    FROM DYUsers
    ORDER BY sec_uid, record_time";

// ── DumpSnapshot ──────────────────────────────────────────────────────────────

/// Every row of both polling tables, ordered by `(streamer, record_time)`.
#[derive(Debug, Clone, Default)]
pub struct DumpSnapshot {
    pub bilibili: Vec<BilibiliSample>,
    /// Empty when the dump has no `DYUsers` table.
    pub douyin: Vec<DouyinSample>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Read the dump at `path` and load both tables.
pub fn load_dump(path: &Path) -> Result<DumpSnapshot> {
    let script = std::fs::read_to_string(path).map_err(|source| LiveStatError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let conn = load_script(&script)?;
    read_snapshot(&conn)
}

/// Execute `script` in a fresh in-memory database.
///
/// Any statement failure aborts the whole load.
pub fn load_script(script: &str) -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch(script)?;
    Ok(conn)
}

/// Read both tables from an already-populated connection.
pub fn read_snapshot(conn: &Connection) -> Result<DumpSnapshot> {
    let bilibili = read_bilibili(conn)?;
    let douyin = read_douyin(conn)?;
    debug!(
        "Loaded {} {} rows and {} {} rows",
        bilibili.len(),
        BILIBILI_TABLE,
        douyin.len(),
        DOUYIN_TABLE
    );
    Ok(DumpSnapshot { bilibili, douyin })
}

/// All `BLUsers` rows ordered by `(uid, record_time)`.
pub fn read_bilibili(conn: &Connection) -> Result<Vec<BilibiliSample>> {
    let query_err = |source| LiveStatError::Query {
        table: BILIBILI_TABLE,
        source,
    };

    let mut stmt = conn.prepare(BILIBILI_QUERY).map_err(query_err)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(BilibiliSample {
                record_time: key_column(row, 0, BILIBILI_TABLE, "record_time")?,
                name: text_column(row, 1)?,
                uid: key_column(row, 2, BILIBILI_TABLE, "uid")?,
                room_id: int_column(row, 3)?.unwrap_or(0),
                live_status: int_column(row, 4)?.unwrap_or(0),
                title: text_column(row, 5)?,
                live_time: int_column(row, 6)?,
                attention: int_column(row, 7)?.unwrap_or(0),
                online_num: int_column(row, 8)?.unwrap_or(0),
                guard_num: int_column(row, 9)?.unwrap_or(0),
            })
        })
        .map_err(query_err)?;

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(query_err)
}

/// All `DYUsers` rows ordered by `(sec_uid, record_time)`.
///
/// Older dumps predate the Douyin poller; a missing table yields no rows.
pub fn read_douyin(conn: &Connection) -> Result<Vec<DouyinSample>> {
    let query_err = |source| LiveStatError::Query {
        table: DOUYIN_TABLE,
        source,
    };

    if !table_exists(conn, DOUYIN_TABLE).map_err(query_err)? {
        warn!("{} table not present in dump, skipping", DOUYIN_TABLE);
        return Ok(Vec::new());
    }

    let mut stmt = conn.prepare(DOUYIN_QUERY).map_err(query_err)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(DouyinSample {
                record_time: key_column(row, 0, DOUYIN_TABLE, "record_time")?,
                sec_uid: text_column(row, 1)?,
                nickname: text_column(row, 2)?,
                live_status: int_column(row, 3)?.unwrap_or(0),
                follower_count: int_column(row, 4)?.unwrap_or(0),
                max_follower_count: int_column(row, 5)?.unwrap_or(0),
                total_favorited: int_column(row, 6)?.unwrap_or(0),
            })
        })
        .map_err(query_err)?;

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(query_err)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn table_exists(conn: &Connection, name: &str) -> rusqlite::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Read an integer column under SQLite's loose typing.
///
/// Dumps sometimes quote numeric values; numeric text is parsed, reals are
/// truncated, and NULL or unparseable text becomes `None`.
fn int_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<i64>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i),
        ValueRef::Real(f) => Some(f as i64),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => std::str::from_utf8(bytes)
            .ok()
            .and_then(|s| s.trim().parse::<i64>().ok()),
    })
}

/// Read an identity or time column, falling back to `0` with a warning.
///
/// A zero here merges the row into streamer `0` or stamps it at the epoch.
fn key_column(
    row: &Row<'_>,
    idx: usize,
    table: &str,
    column: &str,
) -> rusqlite::Result<i64> {
    match int_column(row, idx)? {
        Some(value) => Ok(value),
        None => {
            warn!(
                "{}.{} holds {:?}, which is not an integer; using 0",
                table,
                column,
                row.get_ref(idx)?
            );
            Ok(0)
        }
    }
}

/// Read a text column, rendering numbers as decimal and NULL as empty.
fn text_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            String::from_utf8_lossy(bytes).into_owned()
        }
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
