//! A repository that records writes instead of performing them.

use std::cell::RefCell;

use chrono::{DateTime, Utc};
use imd_catalog::types::{ExternalLink, GroupId, GroupProfile, GroupRecord, Locale, Service};

use crate::repository::{GroupRepository, RepoError};

/// One write a real backend would have received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedWrite {
    Group { slug: String, name_ja: String },
    ExternalLink {
        group_id: GroupId,
        service: Service,
        external_id: Option<String>,
        url: Option<String>,
    },
    Profile { group_id: GroupId, locale: Locale },
}

/// Logs and records every upsert. Group ids are derived from the slug, so
/// dependent writes stay attributable.
#[derive(Debug, Default)]
pub struct DryRunRepository {
    writes: RefCell<Vec<PlannedWrite>>,
}

impl DryRunRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes recorded so far, in call order.
    pub fn writes(&self) -> Vec<PlannedWrite> {
        self.writes.borrow().clone()
    }
}

impl GroupRepository for DryRunRepository {
    fn upsert_group(&self, group: &GroupRecord) -> Result<GroupId, RepoError> {
        log::info!(
            "[dry-run] groups <- slug=\"{}\" name_ja=\"{}\" status={}",
            group.slug,
            group.name_ja,
            group.status.as_str()
        );
        self.writes.borrow_mut().push(PlannedWrite::Group {
            slug: group.slug.clone(),
            name_ja: group.name_ja.clone(),
        });
        Ok(GroupId(format!("dry-run:{}", group.slug)))
    }

    fn upsert_external_link(
        &self,
        group_id: &GroupId,
        link: &ExternalLink,
    ) -> Result<(), RepoError> {
        log::info!(
            "[dry-run] external_ids <- group={} service={} external_id={:?} url={:?}",
            group_id,
            link.service,
            link.external_id,
            link.url
        );
        self.writes.borrow_mut().push(PlannedWrite::ExternalLink {
            group_id: group_id.clone(),
            service: link.service,
            external_id: link.external_id.clone(),
            url: link.url.clone(),
        });
        Ok(())
    }

    fn upsert_profile(
        &self,
        group_id: &GroupId,
        profile: &GroupProfile,
        _updated_at: DateTime<Utc>,
    ) -> Result<(), RepoError> {
        log::info!(
            "[dry-run] group_profiles <- group={} locale={} ({} chars)",
            group_id,
            profile.locale,
            profile.body.chars().count()
        );
        self.writes.borrow_mut().push(PlannedWrite::Profile {
            group_id: group_id.clone(),
            locale: profile.locale,
        });
        Ok(())
    }
}
