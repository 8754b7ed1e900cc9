use chrono::{TimeZone, Utc};
use imd_catalog::types::*;
use imd_db::*;

fn at(hour: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, hour, 0, 0).unwrap()
}

fn test_group() -> GroupRecord {
    GroupRecord {
        slug: "test-group".to_string(),
        name_ja: "テストグループ".to_string(),
        status: GroupStatus::Active,
        updated_at: at(12),
    }
}

fn x_link(handle: &str) -> ExternalLink {
    ExternalLink {
        service: Service::X,
        external_id: Some(handle.to_string()),
        url: Some(format!("https://x.com/{handle}")),
    }
}

#[test]
fn upsert_and_find_group() {
    let repo = SqliteRepository::in_memory().unwrap();
    let id = repo.upsert_group(&test_group()).unwrap();

    let row = find_group_by_slug(repo.connection(), "test-group")
        .unwrap()
        .unwrap();
    assert_eq!(row.id, id.as_str());
    assert_eq!(row.name_ja, "テストグループ");
    assert_eq!(row.status, "active");
    assert_eq!(row.updated_at, "2025-01-15T12:00:00.000Z");

    assert_eq!(find_group_by_slug(repo.connection(), "other").unwrap(), None);
}

#[test]
fn upsert_group_keeps_id_and_overwrites_fields() {
    let repo = SqliteRepository::in_memory().unwrap();
    let first = repo.upsert_group(&test_group()).unwrap();

    let mut renamed = test_group();
    renamed.name_ja = "新しい名前".to_string();
    renamed.updated_at = at(13);
    let second = repo.upsert_group(&renamed).unwrap();

    assert_eq!(first, second);
    let row = find_group_by_slug(repo.connection(), "test-group")
        .unwrap()
        .unwrap();
    assert_eq!(row.name_ja, "新しい名前");
    assert_eq!(row.updated_at, "2025-01-15T13:00:00.000Z");
    assert_eq!(repo.counts().unwrap().groups, 1);
}

#[test]
fn distinct_slugs_get_distinct_ids() {
    let repo = SqliteRepository::in_memory().unwrap();
    let a = repo.upsert_group(&test_group()).unwrap();
    let mut other = test_group();
    other.slug = "other-group".to_string();
    let b = repo.upsert_group(&other).unwrap();
    assert_ne!(a, b);
}

#[test]
fn external_link_unique_per_service() {
    let repo = SqliteRepository::in_memory().unwrap();
    let id = repo.upsert_group(&test_group()).unwrap();

    repo.upsert_external_link(&id, &x_link("old_handle")).unwrap();
    repo.upsert_external_link(&id, &x_link("new_handle")).unwrap();
    repo.upsert_external_link(
        &id,
        &ExternalLink {
            service: Service::Website,
            external_id: None,
            url: Some("https://example.com".to_string()),
        },
    )
    .unwrap();

    let links = external_links_for_group(repo.connection(), id.as_str()).unwrap();
    assert_eq!(links.len(), 2);
    assert_eq!(links[0].service, "website");
    assert_eq!(links[0].external_id, None);
    assert_eq!(links[1].service, "x");
    assert_eq!(links[1].external_id.as_deref(), Some("new_handle"));
}

#[test]
fn profile_unique_per_locale() {
    let repo = SqliteRepository::in_memory().unwrap();
    let id = repo.upsert_group(&test_group()).unwrap();

    let ja = GroupProfile {
        locale: Locale::Ja,
        body: "古い本文".to_string(),
    };
    repo.upsert_profile(&id, &ja, at(12)).unwrap();

    let ja_updated = GroupProfile {
        locale: Locale::Ja,
        body: "新しい本文".to_string(),
    };
    repo.upsert_profile(&id, &ja_updated, at(14)).unwrap();

    let en = GroupProfile {
        locale: Locale::En,
        body: "English".to_string(),
    };
    repo.upsert_profile(&id, &en, at(14)).unwrap();

    let profiles = profiles_for_group(repo.connection(), id.as_str()).unwrap();
    assert_eq!(profiles.len(), 2);
    assert_eq!(profiles[0].locale, "en");
    assert_eq!(profiles[1].locale, "ja");
    assert_eq!(profiles[1].body, "新しい本文");
    assert_eq!(profiles[1].updated_at, "2025-01-15T14:00:00.000Z");
}

#[test]
fn link_for_unknown_group_is_rejected() {
    let repo = SqliteRepository::in_memory().unwrap();
    let missing = GroupId("does-not-exist".to_string());
    let err = repo.upsert_external_link(&missing, &x_link("h")).unwrap_err();
    assert!(matches!(err, RepoError::Sqlite(_)));
}

#[test]
fn table_counts_after_writes() {
    let repo = SqliteRepository::in_memory().unwrap();
    let id = repo.upsert_group(&test_group()).unwrap();
    repo.upsert_external_link(&id, &x_link("h")).unwrap();
    assert_eq!(
        repo.counts().unwrap(),
        TableCounts {
            groups: 1,
            external_ids: 1,
            group_profiles: 0,
        }
    );
}

#[test]
fn reopened_file_keeps_groups() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("imd.db");

    let id = {
        let repo = SqliteRepository::open(&path).unwrap();
        repo.upsert_group(&test_group()).unwrap()
    };

    let repo = SqliteRepository::from_connection(imd_db::schema::open_database(&path).unwrap());
    assert_eq!(repo.counts().unwrap().groups, 1);
    assert_eq!(repo.upsert_group(&test_group()).unwrap(), id);
}
