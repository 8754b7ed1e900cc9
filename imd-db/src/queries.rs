//! Read queries for the SQLite backend.
//!
//! The importer itself only writes; these back the CLI summary and tests.

use rusqlite::{params, Connection, OptionalExtension};

use crate::repository::RepoError;

/// A stored group row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRow {
    pub id: String,
    pub slug: String,
    pub name_ja: String,
    pub status: String,
    pub updated_at: String,
}

/// A stored `external_ids` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalLinkRow {
    pub service: String,
    pub external_id: Option<String>,
    pub url: Option<String>,
}

/// A stored `group_profiles` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRow {
    pub locale: String,
    pub body: String,
    pub updated_at: String,
}

/// Row counts for the three group tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub groups: i64,
    pub external_ids: i64,
    pub group_profiles: i64,
}

/// Find a group by slug.
pub fn find_group_by_slug(conn: &Connection, slug: &str) -> Result<Option<GroupRow>, RepoError> {
    conn.query_row(
        "SELECT id, slug, name_ja, status, updated_at FROM groups WHERE slug = ?1",
        params![slug],
        |row| {
            Ok(GroupRow {
                id: row.get(0)?,
                slug: row.get(1)?,
                name_ja: row.get(2)?,
                status: row.get(3)?,
                updated_at: row.get(4)?,
            })
        },
    )
    .optional()
    .map_err(Into::into)
}

/// All external links for a group, ordered by service name.
pub fn external_links_for_group(
    conn: &Connection,
    group_id: &str,
) -> Result<Vec<ExternalLinkRow>, RepoError> {
    let mut stmt = conn.prepare(
        "SELECT service, external_id, url FROM external_ids
         WHERE group_id = ?1 ORDER BY service",
    )?;
    let rows = stmt.query_map(params![group_id], |row| {
        Ok(ExternalLinkRow {
            service: row.get(0)?,
            external_id: row.get(1)?,
            url: row.get(2)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// All profiles for a group, ordered by locale.
pub fn profiles_for_group(conn: &Connection, group_id: &str) -> Result<Vec<ProfileRow>, RepoError> {
    let mut stmt = conn.prepare(
        "SELECT locale, body, updated_at FROM group_profiles
         WHERE group_id = ?1 ORDER BY locale",
    )?;
    let rows = stmt.query_map(params![group_id], |row| {
        Ok(ProfileRow {
            locale: row.get(0)?,
            body: row.get(1)?,
            updated_at: row.get(2)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Count rows in each group table.
pub fn table_counts(conn: &Connection) -> Result<TableCounts, RepoError> {
    let count = |table: &str| -> Result<i64, rusqlite::Error> {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
    };
    Ok(TableCounts {
        groups: count("groups")?,
        external_ids: count("external_ids")?,
        group_profiles: count("group_profiles")?,
    })
}
