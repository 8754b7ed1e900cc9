use chrono::Utc;
use imd_catalog::types::*;
use imd_db::*;

#[test]
fn records_writes_in_order() {
    let repo = DryRunRepository::new();
    let id = repo
        .upsert_group(&GroupRecord {
            slug: "abc".to_string(),
            name_ja: "エービーシー".to_string(),
            status: GroupStatus::Active,
            updated_at: Utc::now(),
        })
        .unwrap();
    assert_eq!(id.as_str(), "dry-run:abc");

    repo.upsert_external_link(
        &id,
        &ExternalLink {
            service: Service::Website,
            external_id: None,
            url: Some("https://example.com".to_string()),
        },
    )
    .unwrap();
    repo.upsert_profile(
        &id,
        &GroupProfile {
            locale: Locale::En,
            body: "Hello".to_string(),
        },
        Utc::now(),
    )
    .unwrap();

    let writes = repo.writes();
    assert_eq!(writes.len(), 3);
    assert!(matches!(writes[0], PlannedWrite::Group { ref slug, .. } if slug == "abc"));
    assert!(matches!(
        writes[1],
        PlannedWrite::ExternalLink {
            service: Service::Website,
            ..
        }
    ));
    assert_eq!(
        writes[2],
        PlannedWrite::Profile {
            group_id: id,
            locale: Locale::En,
        }
    );
}
