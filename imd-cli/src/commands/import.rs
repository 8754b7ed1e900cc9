use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use imd_catalog::load_master_csv;
use imd_db::{DryRunRepository, GroupRepository, PostgrestRepository, SqliteRepository};
use imd_import::{LogProgress, SyncStats, SystemClock, sync_rows};

use crate::cli_types::{Backend, ImportArgs};
use crate::config::{ImportConfig, Overrides};
use crate::error::CliError;

/// Import the master sheet into the selected backend.
///
/// Configuration and input problems abort before the first write. Once the
/// loop starts, per-row failures are only logged and counted.
pub(crate) fn run_import(args: ImportArgs) -> Result<(), CliError> {
    let overrides = Overrides {
        csv_path: args.csv.clone(),
        flagged_only: args.flagged_only,
        schema: args.schema.clone(),
    };
    let config = ImportConfig::load(&overrides)?;

    // Build the backend first so missing credentials fail before the sheet is read
    let backend = if args.dry_run {
        Target::DryRun(DryRunRepository::new())
    } else {
        match args.backend {
            Backend::Postgrest => {
                let pg = config.postgrest()?;
                log::debug!("PostgREST target: {} (schema {})", pg.url, pg.schema);
                let repo = PostgrestRepository::new(pg)
                    .map_err(|e| CliError::database(format!("Failed to create HTTP client: {e}")))?;
                Target::Postgrest(repo)
            }
            Backend::Sqlite => {
                let repo = SqliteRepository::open(&args.db).map_err(|e| {
                    CliError::database(format!(
                        "Failed to open database at {}: {}",
                        args.db.display(),
                        e
                    ))
                })?;
                Target::Sqlite(repo)
            }
        }
    };

    let csv_path = config.csv_path();
    let flagged_only = config.flagged_only();
    log::info!(
        "{}",
        format!("Importing {} into {}", csv_path.display(), backend.describe(&args))
            .if_supports_color(Stderr, |t| t.bold()),
    );

    let rows = load_master_csv(&csv_path, flagged_only)?;
    log::info!(
        "Loaded {} row(s){}",
        rows.len(),
        if flagged_only { " (importFlag only)" } else { "" }
    );

    let stats = sync_rows(backend.repo(), &rows, &SystemClock, Some(&LogProgress));
    print_summary(&stats);

    match &backend {
        Target::Sqlite(repo) => match repo.counts() {
            Ok(counts) => log::info!(
                "  Database now holds {} group(s), {} link(s), {} profile(s)",
                counts.groups,
                counts.external_ids,
                counts.group_profiles,
            ),
            Err(e) => log::warn!("Could not count rows: {e}"),
        },
        Target::DryRun(repo) => {
            log::info!("  Dry run: {} write(s) planned, none performed", repo.writes().len());
        }
        Target::Postgrest(_) => {}
    }

    Ok(())
}

enum Target {
    Postgrest(PostgrestRepository),
    Sqlite(SqliteRepository),
    DryRun(DryRunRepository),
}

impl Target {
    fn repo(&self) -> &dyn GroupRepository {
        match self {
            Self::Postgrest(r) => r,
            Self::Sqlite(r) => r,
            Self::DryRun(r) => r,
        }
    }

    fn describe(&self, args: &ImportArgs) -> String {
        match self {
            Self::Postgrest(r) => format!("{} (schema {})", r.config().url, r.config().schema),
            Self::Sqlite(_) => args.db.display().to_string(),
            Self::DryRun(_) => "dry run".to_string(),
        }
    }
}

fn print_summary(stats: &SyncStats) {
    log::info!("");
    log::info!("{}", "Summary".if_supports_color(Stderr, |t| t.bold()));
    log::info!("  Rows read:        {}", stats.rows_total);
    log::info!(
        "  Rows skipped:     {} (invalid slug: {}, missing name: {})",
        stats.rows_skipped(),
        stats.skipped_invalid_slug,
        stats.skipped_missing_name,
    );
    log::info!(
        "  Groups:           {} upserted, {} failed",
        stats.groups_upserted,
        stats.groups_failed,
    );
    log::info!(
        "  External links:   {} upserted, {} failed",
        stats.links_upserted,
        stats.links_failed,
    );
    log::info!(
        "  Profiles:         {} upserted, {} failed",
        stats.profiles_upserted,
        stats.profiles_failed,
    );

    if stats.failures() > 0 {
        log::warn!(
            "  {} {} write(s) failed; see errors above",
            "\u{26A0}".if_supports_color(Stderr, |t| t.yellow()),
            stats.failures(),
        );
    }
}
