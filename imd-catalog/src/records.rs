//! Build `external_ids` and `group_profiles` records from a master row.

use crate::normalize::{extract_handle, extract_spotify_id, non_blank, spotify_artist_url};
use crate::types::{ExternalLink, GroupProfile, Locale, MasterRow, Service};

/// Build one external link per populated service cell.
///
/// Output order is fixed: spotify, youtube_channel, website, x, instagram,
/// tiktok, schedule.
pub fn build_external_records(row: &MasterRow) -> Vec<ExternalLink> {
    let mut links = Vec::new();

    if let Some(value) = non_blank(row.spotify_id.as_deref()) {
        let id = extract_spotify_id(value);
        let url = if value.contains("http") {
            value.to_string()
        } else {
            spotify_artist_url(&id)
        };
        links.push(ExternalLink {
            service: Service::Spotify,
            external_id: Some(id),
            url: Some(url),
        });
    }

    let url_only = [
        (Service::YoutubeChannel, row.youtube_link.as_deref()),
        (Service::Website, row.website_link.as_deref()),
    ];
    for (service, cell) in url_only {
        if let Some(value) = non_blank(cell) {
            links.push(url_link(service, value));
        }
    }

    let social = [
        (Service::X, row.x_link.as_deref()),
        (Service::Instagram, row.instagram_link.as_deref()),
        (Service::Tiktok, row.tiktok_link.as_deref()),
    ];
    for (service, cell) in social {
        if let Some(value) = non_blank(cell) {
            links.push(ExternalLink {
                service,
                external_id: extract_handle(value),
                url: Some(value.to_string()),
            });
        }
    }

    if let Some(value) = non_blank(row.calendar_link.as_deref()) {
        links.push(url_link(Service::Schedule, value));
    }

    links
}

fn url_link(service: Service, value: &str) -> ExternalLink {
    ExternalLink {
        service,
        external_id: None,
        url: Some(value.to_string()),
    }
}

/// Build the Japanese and English profile bodies, in that order, skipping
/// blank cells.
pub fn build_profile_records(row: &MasterRow) -> Vec<GroupProfile> {
    [
        (Locale::Ja, row.profile_ja.as_deref()),
        (Locale::En, row.profile_en.as_deref()),
    ]
    .into_iter()
    .filter_map(|(locale, cell)| {
        non_blank(cell).map(|body| GroupProfile {
            locale,
            body: body.to_string(),
        })
    })
    .collect()
}
