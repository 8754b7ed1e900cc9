//! Data model types for the group catalog.
//!
//! These types mirror the three tables the importer writes: `groups`,
//! `external_ids`, and `group_profiles`, plus the raw spreadsheet row they
//! are built from.

use chrono::{DateTime, Utc};
use serde::Deserialize;

// ── Master Sheet Row ────────────────────────────────────────────────────────

/// One row of the master profile sheet, keyed by the sheet's header names.
///
/// Empty cells deserialize to `None`. Columns not listed here are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MasterRow {
    pub name_japanese: Option<String>,
    pub name_english: Option<String>,
    pub name_reading: Option<String>,
    pub members: Option<String>,
    pub location: Option<String>,
    pub agency: Option<String>,
    pub profile_ja: Option<String>,
    pub profile_en: Option<String>,
    pub youtube_link: Option<String>,
    pub spotify_id: Option<String>,
    pub website_link: Option<String>,
    pub x_link: Option<String>,
    pub instagram_link: Option<String>,
    pub tiktok_link: Option<String>,
    pub calendar_link: Option<String>,
    pub slug: Option<String>,
    pub import_flag: Option<String>,
}

impl MasterRow {
    /// Whether the row is marked for import.
    ///
    /// Only the literal `"0"` counts as unflagged; any other non-empty value
    /// (including `"false"`) is treated as flagged.
    pub fn is_flagged(&self) -> bool {
        match self.import_flag.as_deref().map(str::trim) {
            Some(flag) => !flag.is_empty() && flag != "0",
            None => false,
        }
    }
}

// ── Group ───────────────────────────────────────────────────────────────────

/// Publication status of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupStatus {
    Active,
}

impl GroupStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
        }
    }
}

/// A group row, keyed by `slug`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRecord {
    pub slug: String,
    pub name_ja: String,
    pub status: GroupStatus,
    pub updated_at: DateTime<Utc>,
}

/// Durable identifier the backend assigns to a group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupId(pub String);

impl GroupId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ── External Links ──────────────────────────────────────────────────────────

/// Third-party service an external link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Spotify,
    YoutubeChannel,
    Website,
    X,
    Instagram,
    Tiktok,
    Schedule,
}

impl Service {
    /// Value stored in the `service` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spotify => "spotify",
            Self::YoutubeChannel => "youtube_channel",
            Self::Website => "website",
            Self::X => "x",
            Self::Instagram => "instagram",
            Self::Tiktok => "tiktok",
            Self::Schedule => "schedule",
        }
    }
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An `external_ids` row without its owning group, unique per (group, service).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalLink {
    pub service: Service,
    pub external_id: Option<String>,
    pub url: Option<String>,
}

// ── Profiles ────────────────────────────────────────────────────────────────

/// Locale of a profile body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locale {
    Ja,
    En,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ja => "ja",
            Self::En => "en",
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `group_profiles` row without its owning group, unique per (group, locale).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupProfile {
    pub locale: Locale,
    pub body: String,
}
