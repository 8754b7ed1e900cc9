use std::cell::RefCell;

use chrono::{DateTime, TimeZone, Utc};
use imd_catalog::types::*;
use imd_catalog::parse_master_csv;
use imd_db::*;
use imd_import::*;

const SHEET: &str = "\
nameJapanese,nameEnglish,slug,spotifyId,youtubeLink,websiteLink,xLink,instagramLink,tiktokLink,calendarLink,profileJa,profileEn,importFlag
グループA,Group A,group-a,abc123,https://youtube.com/@a,https://a.example.com,https://x.com/group_a,@group_a,https://www.tiktok.com/@group_a,https://cal.example.com/a,本文A,Profile A,1
グループB,Group B,Group B,,,,,,,,本文B,,1
,Nameless,nameless,,,https://n.example.com,,,,,,,1
グループC,Group C,group-c,,,,https://x.com/group_c,,,,,Profile C,0
";

fn clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap())
}

fn rows() -> Vec<MasterRow> {
    parse_master_csv(SHEET).unwrap()
}

/// Wraps a repository and fails selected writes.
struct FailingRepo<R> {
    inner: R,
    fail_group_slug: Option<&'static str>,
    fail_service: Option<Service>,
    fail_locale: Option<Locale>,
    calls: RefCell<Vec<String>>,
}

impl<R> FailingRepo<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            fail_group_slug: None,
            fail_service: None,
            fail_locale: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    fn injected() -> RepoError {
        RepoError::Status {
            status: 500,
            message: "injected failure".to_string(),
        }
    }
}

impl<R: GroupRepository> GroupRepository for FailingRepo<R> {
    fn upsert_group(&self, group: &GroupRecord) -> Result<GroupId, RepoError> {
        self.calls.borrow_mut().push(format!("group:{}", group.slug));
        if self.fail_group_slug == Some(group.slug.as_str()) {
            return Err(Self::injected());
        }
        self.inner.upsert_group(group)
    }

    fn upsert_external_link(
        &self,
        group_id: &GroupId,
        link: &ExternalLink,
    ) -> Result<(), RepoError> {
        self.calls.borrow_mut().push(format!("link:{}", link.service));
        if self.fail_service == Some(link.service) {
            return Err(Self::injected());
        }
        self.inner.upsert_external_link(group_id, link)
    }

    fn upsert_profile(
        &self,
        group_id: &GroupId,
        profile: &GroupProfile,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepoError> {
        self.calls.borrow_mut().push(format!("profile:{}", profile.locale));
        if self.fail_locale == Some(profile.locale) {
            return Err(Self::injected());
        }
        self.inner.upsert_profile(group_id, profile, updated_at)
    }
}

#[test]
fn full_sync_counts() {
    let repo = SqliteRepository::in_memory().unwrap();
    let stats = sync_rows(&repo, &rows(), &clock(), Some(&SilentProgress));

    assert_eq!(
        stats,
        SyncStats {
            rows_total: 4,
            skipped_invalid_slug: 1,
            skipped_missing_name: 1,
            groups_upserted: 2,
            groups_failed: 0,
            links_upserted: 8,
            links_failed: 0,
            profiles_upserted: 3,
            profiles_failed: 0,
        }
    );
    assert_eq!(stats.rows_skipped(), 2);
    assert_eq!(stats.failures(), 0);
}

#[test]
fn writes_land_in_tables() {
    let repo = SqliteRepository::in_memory().unwrap();
    sync_rows(&repo, &rows(), &clock(), None);

    let group = find_group_by_slug(repo.connection(), "group-a")
        .unwrap()
        .unwrap();
    assert_eq!(group.name_ja, "グループA");
    assert_eq!(group.status, "active");
    assert_eq!(group.updated_at, "2025-01-15T12:00:00.000Z");

    let links = external_links_for_group(repo.connection(), &group.id).unwrap();
    assert_eq!(links.len(), 7);
    let spotify = links.iter().find(|l| l.service == "spotify").unwrap();
    assert_eq!(spotify.external_id.as_deref(), Some("abc123"));
    assert_eq!(
        spotify.url.as_deref(),
        Some("https://open.spotify.com/artist/abc123")
    );
    let instagram = links.iter().find(|l| l.service == "instagram").unwrap();
    assert_eq!(instagram.external_id.as_deref(), Some("group_a"));

    let profiles = profiles_for_group(repo.connection(), &group.id).unwrap();
    assert_eq!(profiles.len(), 2);
}

#[test]
fn second_run_is_idempotent() {
    let repo = SqliteRepository::in_memory().unwrap();
    sync_rows(&repo, &rows(), &clock(), None);
    let first = repo.counts().unwrap();
    let first_id = find_group_by_slug(repo.connection(), "group-a")
        .unwrap()
        .unwrap()
        .id;

    sync_rows(&repo, &rows(), &clock(), None);
    assert_eq!(repo.counts().unwrap(), first);
    assert_eq!(
        first,
        TableCounts {
            groups: 2,
            external_ids: 8,
            group_profiles: 3,
        }
    );
    let second_id = find_group_by_slug(repo.connection(), "group-a")
        .unwrap()
        .unwrap()
        .id;
    assert_eq!(first_id, second_id);
}

#[test]
fn invalid_slug_writes_nothing() {
    let repo = FailingRepo::new(SqliteRepository::in_memory().unwrap());
    let row = rows().remove(1);
    let mut stats = SyncStats::default();

    let outcome = sync_row(&repo, &row, &clock(), &mut stats);

    assert!(matches!(
        outcome,
        RowOutcome::Skipped(imd_catalog::RowSkip::InvalidSlug { .. })
    ));
    assert!(repo.calls.borrow().is_empty());
    assert_eq!(stats.skipped_invalid_slug, 1);
}

#[test]
fn group_failure_writes_no_dependents() {
    let mut repo = FailingRepo::new(SqliteRepository::in_memory().unwrap());
    repo.fail_group_slug = Some("group-a");

    let stats = sync_rows(&repo, &rows(), &clock(), None);

    assert_eq!(stats.groups_failed, 1);
    assert_eq!(stats.groups_upserted, 1);
    // Only group-c's single link and profile went through
    assert_eq!(stats.links_upserted, 1);
    assert_eq!(stats.profiles_upserted, 1);

    let calls = repo.calls.borrow();
    assert_eq!(
        *calls,
        vec!["group:group-a", "group:group-c", "link:x", "profile:en"]
    );
    assert_eq!(
        find_group_by_slug(repo.inner.connection(), "group-a").unwrap(),
        None
    );
}

#[test]
fn link_failure_does_not_block_other_writes() {
    let mut repo = FailingRepo::new(SqliteRepository::in_memory().unwrap());
    repo.fail_service = Some(Service::Website);

    let row = rows().remove(0);
    let mut stats = SyncStats::default();
    let outcome = sync_row(&repo, &row, &clock(), &mut stats);

    match outcome {
        RowOutcome::Synced {
            links_failed,
            profiles_failed,
            ..
        } => {
            assert_eq!(links_failed, 1);
            assert_eq!(profiles_failed, 0);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(stats.links_upserted, 6);
    assert_eq!(stats.links_failed, 1);
    assert_eq!(stats.profiles_upserted, 2);

    let counts = repo.inner.counts().unwrap();
    assert_eq!(counts.external_ids, 6);
    assert_eq!(counts.group_profiles, 2);
}

#[test]
fn profile_failure_is_independent() {
    let mut repo = FailingRepo::new(SqliteRepository::in_memory().unwrap());
    repo.fail_locale = Some(Locale::Ja);

    let stats = sync_rows(&repo, &rows(), &clock(), None);
    assert_eq!(stats.profiles_failed, 1);
    assert_eq!(stats.profiles_upserted, 2);
    assert_eq!(stats.links_failed, 0);
}

#[test]
fn writes_follow_dependency_order() {
    let repo = FailingRepo::new(SqliteRepository::in_memory().unwrap());
    let row = rows().remove(0);
    sync_row(&repo, &row, &clock(), &mut SyncStats::default());

    let calls = repo.calls.borrow();
    assert_eq!(
        *calls,
        vec![
            "group:group-a",
            "link:spotify",
            "link:youtube_channel",
            "link:website",
            "link:x",
            "link:instagram",
            "link:tiktok",
            "link:schedule",
            "profile:ja",
            "profile:en",
        ]
    );
}

#[test]
fn dry_run_records_plan() {
    let repo = DryRunRepository::new();
    let stats = sync_rows(&repo, &rows(), &clock(), None);
    assert_eq!(stats.groups_upserted, 2);
    assert_eq!(repo.writes().len(), 2 + 8 + 3);
}

#[test]
fn row_of_empty_cells_is_counted_as_skip() {
    let rows = parse_master_csv("nameJapanese,slug\n,\nA,a\n").unwrap();
    let repo = DryRunRepository::new();
    let stats = sync_rows(&repo, &rows, &clock(), None);

    assert_eq!(stats.rows_total, 2);
    assert_eq!(stats.skipped_invalid_slug, 1);
    assert_eq!(stats.groups_upserted, 1);
}

#[test]
fn log_progress_reports_without_changing_stats() {
    let row = rows().remove(0);
    let many: Vec<MasterRow> = std::iter::repeat_n(row, 120).collect();
    let repo = DryRunRepository::new();

    let stats = sync_rows(&repo, &many, &clock(), Some(&LogProgress));
    assert_eq!(stats.rows_total, 120);
    assert_eq!(stats.groups_upserted, 120);
}
