//! Persistence backends for the group catalog.
//!
//! All backends implement [`GroupRepository`]: a Supabase/PostgREST client
//! for the hosted database, SQLite for local runs and tests, and a dry-run
//! recorder that writes nothing.

pub mod dry_run;
pub mod operations;
pub mod postgrest;
pub mod queries;
pub mod repository;
pub mod schema;
pub mod sqlite;

pub use dry_run::{DryRunRepository, PlannedWrite};
pub use postgrest::{PostgrestConfig, PostgrestRepository};
pub use queries::{
    ExternalLinkRow, GroupRow, ProfileRow, TableCounts, external_links_for_group,
    find_group_by_slug, profiles_for_group, table_counts,
};
pub use repository::{GroupRepository, RepoError, iso_timestamp};
pub use schema::{SchemaError, open_database, open_memory};
pub use sqlite::SqliteRepository;
