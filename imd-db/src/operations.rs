//! Upsert operations for the SQLite backend.

use imd_catalog::types::*;
use rusqlite::{params, Connection};

use crate::repository::{RepoError, iso_timestamp};

// ── Group Operations ────────────────────────────────────────────────────────

/// Insert or update a group by slug. Returns the group's id.
pub fn upsert_group(conn: &Connection, group: &GroupRecord) -> Result<GroupId, RepoError> {
    let id: String = conn.query_row(
        "INSERT INTO groups (slug, name_ja, status, updated_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(slug) DO UPDATE SET
             name_ja = excluded.name_ja,
             status = excluded.status,
             updated_at = excluded.updated_at
         RETURNING id",
        params![
            group.slug,
            group.name_ja,
            group.status.as_str(),
            iso_timestamp(&group.updated_at),
        ],
        |row| row.get(0),
    )?;
    Ok(GroupId(id))
}

// ── External Link Operations ────────────────────────────────────────────────

/// Insert or update the link for a (group, service) pair.
pub fn upsert_external_link(
    conn: &Connection,
    group_id: &GroupId,
    link: &ExternalLink,
) -> Result<(), RepoError> {
    conn.execute(
        "INSERT INTO external_ids (group_id, service, external_id, url)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(group_id, service) DO UPDATE SET
             external_id = excluded.external_id,
             url = excluded.url",
        params![
            group_id.as_str(),
            link.service.as_str(),
            link.external_id,
            link.url,
        ],
    )?;
    Ok(())
}

// ── Profile Operations ──────────────────────────────────────────────────────

/// Insert or update the profile for a (group, locale) pair.
pub fn upsert_profile(
    conn: &Connection,
    group_id: &GroupId,
    profile: &GroupProfile,
    updated_at: &chrono::DateTime<chrono::Utc>,
) -> Result<(), RepoError> {
    conn.execute(
        "INSERT INTO group_profiles (group_id, locale, body, updated_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(group_id, locale) DO UPDATE SET
             body = excluded.body,
             updated_at = excluded.updated_at",
        params![
            group_id.as_str(),
            profile.locale.as_str(),
            profile.body,
            iso_timestamp(updated_at),
        ],
    )?;
    Ok(())
}
