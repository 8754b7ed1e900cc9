//! `GroupRepository` backed by a Supabase project's PostgREST API.
//!
//! Upserts are `POST /rest/v1/<table>?on_conflict=<cols>` with
//! `Prefer: resolution=merge-duplicates`, so a row whose key already exists is
//! updated in place. The target schema is selected per request with the
//! `Content-Profile`/`Accept-Profile` headers.

use std::time::Duration;

use chrono::{DateTime, Utc};
use imd_catalog::types::{ExternalLink, GroupId, GroupProfile, GroupRecord};
use reqwest::blocking::{Client, Request};
use serde::{Deserialize, Serialize};

use crate::repository::{GroupRepository, RepoError, iso_timestamp};

pub const DEFAULT_SCHEMA: &str = "imd";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for a Supabase project.
#[derive(Debug, Clone)]
pub struct PostgrestConfig {
    /// Project URL, e.g. `https://abcd.supabase.co`.
    pub url: String,
    /// Service role key; sent as both `apikey` and bearer token.
    pub service_role_key: String,
    pub schema: String,
    pub timeout: Duration,
}

impl PostgrestConfig {
    pub fn new(url: impl Into<String>, service_role_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            service_role_key: service_role_key.into(),
            schema: DEFAULT_SCHEMA.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.url.trim_end_matches('/'), table)
    }
}

#[derive(Debug, Serialize)]
struct GroupPayload<'a> {
    slug: &'a str,
    name_ja: &'a str,
    status: &'a str,
    updated_at: String,
}

#[derive(Debug, Serialize)]
struct ExternalLinkPayload<'a> {
    group_id: &'a str,
    service: &'a str,
    external_id: Option<&'a str>,
    url: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct ProfilePayload<'a> {
    group_id: &'a str,
    locale: &'a str,
    body: &'a str,
    updated_at: String,
}

#[derive(Debug, Deserialize)]
struct IdRow {
    id: serde_json::Value,
}

/// Blocking PostgREST client implementing the group upserts.
pub struct PostgrestRepository {
    http: Client,
    config: PostgrestConfig,
}

impl PostgrestRepository {
    pub fn new(config: PostgrestConfig) -> Result<Self, RepoError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &PostgrestConfig {
        &self.config
    }

    /// Build the upsert request for a table without sending it.
    ///
    /// With `return_id`, the response body is a JSON array holding the
    /// upserted row's `id`; otherwise the body is empty.
    pub fn build_upsert<T: Serialize>(
        &self,
        table: &str,
        on_conflict: &str,
        payload: &T,
        return_id: bool,
    ) -> Result<Request, RepoError> {
        let prefer = if return_id {
            "resolution=merge-duplicates,return=representation"
        } else {
            "resolution=merge-duplicates,return=minimal"
        };

        let mut query = vec![("on_conflict", on_conflict)];
        if return_id {
            query.push(("select", "id"));
        }

        let key = &self.config.service_role_key;
        let request = self
            .http
            .post(self.config.table_url(table))
            .query(&query)
            .header("apikey", key)
            .bearer_auth(key)
            .header("Content-Profile", &self.config.schema)
            .header("Accept-Profile", &self.config.schema)
            .header("Prefer", prefer)
            .json(payload)
            .build()?;
        Ok(request)
    }

    /// Send a request and return the body, mapping non-2xx responses to
    /// [`RepoError::Status`].
    fn send(&self, request: Request) -> Result<String, RepoError> {
        let url = request.url().path().to_string();
        let resp = self.http.execute(request)?;
        let status = resp.status();
        let text = resp.text()?;
        if !status.is_success() {
            log::debug!("PostgREST {} returned {}: {}", url, status, text);
            return Err(RepoError::Status {
                status: status.as_u16(),
                message: truncate(&text, 200),
            });
        }
        Ok(text)
    }
}

impl GroupRepository for PostgrestRepository {
    fn upsert_group(&self, group: &GroupRecord) -> Result<GroupId, RepoError> {
        let payload = GroupPayload {
            slug: &group.slug,
            name_ja: &group.name_ja,
            status: group.status.as_str(),
            updated_at: iso_timestamp(&group.updated_at),
        };
        let request = self.build_upsert("groups", "slug", &payload, true)?;
        let body = self.send(request)?;
        parse_group_id(&body, &group.slug)
    }

    fn upsert_external_link(
        &self,
        group_id: &GroupId,
        link: &ExternalLink,
    ) -> Result<(), RepoError> {
        let payload = ExternalLinkPayload {
            group_id: group_id.as_str(),
            service: link.service.as_str(),
            external_id: link.external_id.as_deref(),
            url: link.url.as_deref(),
        };
        let request = self.build_upsert("external_ids", "group_id,service", &payload, false)?;
        self.send(request)?;
        Ok(())
    }

    fn upsert_profile(
        &self,
        group_id: &GroupId,
        profile: &GroupProfile,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepoError> {
        let payload = ProfilePayload {
            group_id: group_id.as_str(),
            locale: profile.locale.as_str(),
            body: &profile.body,
            updated_at: iso_timestamp(&updated_at),
        };
        let request = self.build_upsert("group_profiles", "group_id,locale", &payload, false)?;
        self.send(request)?;
        Ok(())
    }
}

/// Pull the group id out of a `return=representation` response body.
///
/// PostgREST answers with an array of rows; ids may be UUID strings or
/// integers depending on the column type.
pub fn parse_group_id(body: &str, slug: &str) -> Result<GroupId, RepoError> {
    let rows: Vec<IdRow> = serde_json::from_str(body)?;
    let id = rows.into_iter().next().and_then(|row| match row.id {
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    });
    id.map(GroupId).ok_or_else(|| RepoError::MissingId {
        slug: slug.to_string(),
    })
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("abc", 5), "abc");
        assert_eq!(truncate("グループ名", 2), "グル...");
    }
}
