//! The write interface the importer drives.

use chrono::{DateTime, SecondsFormat, Utc};
use imd_catalog::types::{ExternalLink, GroupId, GroupProfile, GroupRecord};
use thiserror::Error;

/// Errors from any repository backend.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server error (HTTP {status}): {message}")]
    Status { status: u16, message: String },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Upsert returned no id for group '{slug}'")]
    MissingId { slug: String },
}

/// Idempotent writes for the three group tables.
///
/// Every method is an upsert on the table's natural key: `groups` on slug,
/// `external_ids` on (group, service), `group_profiles` on (group, locale).
/// Writing the same record twice leaves one row holding the latest values.
pub trait GroupRepository {
    /// Insert or update a group and return its durable id.
    fn upsert_group(&self, group: &GroupRecord) -> Result<GroupId, RepoError>;

    /// Insert or update the link for `link.service` on a group.
    fn upsert_external_link(&self, group_id: &GroupId, link: &ExternalLink)
    -> Result<(), RepoError>;

    /// Insert or update the profile for `profile.locale` on a group.
    fn upsert_profile(
        &self,
        group_id: &GroupId,
        profile: &GroupProfile,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepoError>;
}

impl<R: GroupRepository + ?Sized> GroupRepository for Box<R> {
    fn upsert_group(&self, group: &GroupRecord) -> Result<GroupId, RepoError> {
        (**self).upsert_group(group)
    }

    fn upsert_external_link(
        &self,
        group_id: &GroupId,
        link: &ExternalLink,
    ) -> Result<(), RepoError> {
        (**self).upsert_external_link(group_id, link)
    }

    fn upsert_profile(
        &self,
        group_id: &GroupId,
        profile: &GroupProfile,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepoError> {
        (**self).upsert_profile(group_id, profile, updated_at)
    }
}

/// Format a timestamp the way the backend stores it
/// (`2025-01-15T12:00:00.000Z`).
pub fn iso_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
