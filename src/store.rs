use crate::error::Result;
use crate::model::RawPost;
use rusqlite::Connection;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

const SELECT_ALL: &str = "SELECT id, created, user_name, user_location, text, \
     repost_count, follower_count FROM posts";

/// Load all posts from the local SQLite capture database, deduplicated by
/// post id (first copy wins). `exclude_date` drops one calendar date
/// entirely (`YYYY-MM-DD`), e.g. a partial capture day.
pub fn load_posts(path: &Path, exclude_date: Option<&str>) -> Result<Vec<RawPost>> {
    let conn = Connection::open(path)?;

    let mut rows = Vec::new();
    let mut push_row = |row: &rusqlite::Row<'_>| -> rusqlite::Result<()> {
        rows.push(RawPost {
            id: row.get(0)?,
            created: row.get(1)?,
            user_name: row.get(2)?,
            user_location: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            text: row.get(4)?,
            repost_count: row.get::<_, Option<i64>>(5)?.unwrap_or(0),
            follower_count: row.get::<_, Option<i64>>(6)?.unwrap_or(0),
        });
        Ok(())
    };

    match exclude_date {
        Some(date) => {
            let query = format!("{SELECT_ALL} WHERE date(created) != ?1");
            let mut stmt = conn.prepare(&query)?;
            let mut result = stmt.query([date])?;
            while let Some(row) = result.next()? {
                push_row(row)?;
            }
        }
        None => {
            let mut stmt = conn.prepare(SELECT_ALL)?;
            let mut result = stmt.query([])?;
            while let Some(row) = result.next()? {
                push_row(row)?;
            }
        }
    }

    // Upstream captures can record the same post twice; keep the first copy.
    let mut seen = HashSet::new();
    let before = rows.len();
    rows.retain(|post| seen.insert(post.id.clone()));
    if rows.len() < before {
        debug!(dropped = before - rows.len(), "deduplicated posts by id");
    }

    info!(posts = rows.len(), db = %path.display(), "loaded post capture");
    Ok(rows)
}
