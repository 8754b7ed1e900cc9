//! Map a master row to the set of writes it produces.

use chrono::{DateTime, Utc};

use crate::normalize::{non_blank, normalize_slug};
use crate::records::{build_external_records, build_profile_records};
use crate::types::{ExternalLink, GroupProfile, GroupRecord, GroupStatus, MasterRow};

/// Everything one valid row writes: the group, then its dependents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowPlan {
    pub group: GroupRecord,
    pub external_links: Vec<ExternalLink>,
    pub profiles: Vec<GroupProfile>,
}

/// Why a row produced no writes at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowSkip {
    /// Slug cell empty or not matching `[a-z0-9-]+`.
    InvalidSlug { name: Option<String> },
    /// Slug was fine but `nameJapanese` is empty.
    MissingName { slug: String },
}

impl std::fmt::Display for RowSkip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSlug { name } => write!(
                f,
                "missing or invalid slug (nameJapanese=\"{}\")",
                name.as_deref().unwrap_or("")
            ),
            Self::MissingName { slug } => write!(f, "missing nameJapanese (slug=\"{slug}\")"),
        }
    }
}

/// Validate a row and build its group, link, and profile records.
///
/// `now` becomes the group's `updated_at`.
pub fn map_row(row: &MasterRow, now: DateTime<Utc>) -> Result<RowPlan, RowSkip> {
    let Some(slug) = normalize_slug(row.slug.as_deref()) else {
        return Err(RowSkip::InvalidSlug {
            name: row.name_japanese.clone(),
        });
    };

    let Some(name_ja) = non_blank(row.name_japanese.as_deref()) else {
        return Err(RowSkip::MissingName { slug });
    };

    Ok(RowPlan {
        group: GroupRecord {
            slug,
            name_ja: name_ja.to_string(),
            status: GroupStatus::Active,
            updated_at: now,
        },
        external_links: build_external_records(row),
        profiles: build_profile_records(row),
    })
}
