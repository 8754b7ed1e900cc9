//! `GroupRepository` backed by a local SQLite database.

use chrono::{DateTime, Utc};
use imd_catalog::types::{ExternalLink, GroupId, GroupProfile, GroupRecord};
use rusqlite::Connection;

use crate::operations;
use crate::queries::{self, TableCounts};
use crate::repository::{GroupRepository, RepoError};
use crate::schema::{self, SchemaError};

/// Writes groups into a SQLite file (or in-memory database).
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Open or create the database at `path`.
    pub fn open(path: &std::path::Path) -> Result<Self, SchemaError> {
        Ok(Self {
            conn: schema::open_database(path)?,
        })
    }

    /// An empty in-memory database.
    pub fn in_memory() -> Result<Self, SchemaError> {
        Ok(Self {
            conn: schema::open_memory()?,
        })
    }

    /// Wrap an already-open connection. The schema must exist.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn counts(&self) -> Result<TableCounts, RepoError> {
        queries::table_counts(&self.conn)
    }
}

impl GroupRepository for SqliteRepository {
    fn upsert_group(&self, group: &GroupRecord) -> Result<GroupId, RepoError> {
        operations::upsert_group(&self.conn, group)
    }

    fn upsert_external_link(
        &self,
        group_id: &GroupId,
        link: &ExternalLink,
    ) -> Result<(), RepoError> {
        operations::upsert_external_link(&self.conn, group_id, link)
    }

    fn upsert_profile(
        &self,
        group_id: &GroupId,
        profile: &GroupProfile,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepoError> {
        operations::upsert_profile(&self.conn, group_id, profile, &updated_at)
    }
}
