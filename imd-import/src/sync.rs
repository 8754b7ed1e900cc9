//! Sync master sheet rows into the group tables.
//!
//! Each row is handled on its own, in file order: the group is upserted
//! first, then its external links, then its profiles. A failed group upsert
//! abandons the row; a failed link or profile upsert is logged and the rest
//! of the row still goes through. No failure stops the batch.

use chrono::{DateTime, Utc};
use imd_catalog::mapping::{RowPlan, RowSkip, map_row};
use imd_catalog::types::{GroupId, MasterRow};
use imd_db::GroupRepository;

use crate::progress::SyncProgress;

/// Source of `updated_at` timestamps.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to one instant.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Counters for one sync run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncStats {
    pub rows_total: u64,
    pub skipped_invalid_slug: u64,
    pub skipped_missing_name: u64,
    pub groups_upserted: u64,
    pub groups_failed: u64,
    pub links_upserted: u64,
    pub links_failed: u64,
    pub profiles_upserted: u64,
    pub profiles_failed: u64,
}

impl SyncStats {
    pub fn rows_skipped(&self) -> u64 {
        self.skipped_invalid_slug + self.skipped_missing_name
    }

    /// Total failed upserts across all three tables.
    pub fn failures(&self) -> u64 {
        self.groups_failed + self.links_failed + self.profiles_failed
    }
}

/// How one row ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Skipped(RowSkip),
    GroupFailed { slug: String },
    Synced {
        slug: String,
        group_id: GroupId,
        links_failed: usize,
        profiles_failed: usize,
    },
}

/// Sync every row into `repo`, returning counters for the run.
pub fn sync_rows(
    repo: &dyn GroupRepository,
    rows: &[MasterRow],
    clock: &dyn Clock,
    progress: Option<&dyn SyncProgress>,
) -> SyncStats {
    let mut stats = SyncStats {
        rows_total: rows.len() as u64,
        ..Default::default()
    };

    if let Some(p) = progress {
        p.on_phase(&format!("Syncing {} row(s)", rows.len()));
    }

    for (i, row) in rows.iter().enumerate() {
        let outcome = sync_row(repo, row, clock, &mut stats);

        if let Some(p) = progress {
            let slug = match &outcome {
                RowOutcome::Skipped(_) => None,
                RowOutcome::GroupFailed { slug } | RowOutcome::Synced { slug, .. } => {
                    Some(slug.as_str())
                }
            };
            p.on_row(i + 1, rows.len(), slug);
        }
    }

    if let Some(p) = progress {
        p.on_complete("Import complete");
    }

    stats
}

/// Sync a single row. Never fails: every error is logged and counted.
pub fn sync_row(
    repo: &dyn GroupRepository,
    row: &MasterRow,
    clock: &dyn Clock,
    stats: &mut SyncStats,
) -> RowOutcome {
    let plan = match map_row(row, clock.now()) {
        Ok(plan) => plan,
        Err(skip) => {
            match skip {
                RowSkip::InvalidSlug { .. } => stats.skipped_invalid_slug += 1,
                RowSkip::MissingName { .. } => stats.skipped_missing_name += 1,
            }
            log::warn!("Skipping row: {}", skip);
            return RowOutcome::Skipped(skip);
        }
    };

    let RowPlan {
        group,
        external_links,
        profiles,
    } = plan;
    let slug = group.slug.clone();

    let group_id = match repo.upsert_group(&group) {
        Ok(id) => {
            stats.groups_upserted += 1;
            log::info!("groups upsert ok slug=\"{}\" id=\"{}\"", slug, id);
            id
        }
        Err(e) => {
            stats.groups_failed += 1;
            log::error!("groups upsert failed slug=\"{}\": {}", slug, e);
            return RowOutcome::GroupFailed { slug };
        }
    };

    let mut links_failed = 0;
    for link in &external_links {
        match repo.upsert_external_link(&group_id, link) {
            Ok(()) => {
                stats.links_upserted += 1;
                log::info!(
                    "external_ids upsert ok slug=\"{}\" service=\"{}\"",
                    slug,
                    link.service
                );
            }
            Err(e) => {
                stats.links_failed += 1;
                links_failed += 1;
                log::error!(
                    "external_ids upsert failed slug=\"{}\" service=\"{}\": {}",
                    slug,
                    link.service,
                    e
                );
            }
        }
    }

    let mut profiles_failed = 0;
    for profile in &profiles {
        match repo.upsert_profile(&group_id, profile, clock.now()) {
            Ok(()) => {
                stats.profiles_upserted += 1;
                log::info!(
                    "group_profiles upsert ok slug=\"{}\" locale=\"{}\"",
                    slug,
                    profile.locale
                );
            }
            Err(e) => {
                stats.profiles_failed += 1;
                profiles_failed += 1;
                log::error!(
                    "group_profiles upsert failed slug=\"{}\" locale=\"{}\": {}",
                    slug,
                    profile.locale,
                    e
                );
            }
        }
    }

    RowOutcome::Synced {
        slug,
        group_id,
        links_failed,
        profiles_failed,
    }
}
