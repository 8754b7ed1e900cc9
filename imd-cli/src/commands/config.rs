use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use crate::config::{ConfigSource, ImportConfig, Overrides, Setting, config_path};
use crate::error::CliError;

fn mask_value(s: &str) -> String {
    if s.chars().count() <= 4 {
        "****".to_string()
    } else {
        let head: String = s.chars().take(4).collect();
        format!("{head}****")
    }
}

fn describe<T: ToString>(setting: &Setting<T>, is_secret: bool) -> Option<String> {
    setting.value.as_ref().map(|v| {
        let s = v.to_string();
        if is_secret { mask_value(&s) } else { s }
    })
}

/// Show resolved settings and their sources.
pub(crate) fn run_config_show() -> Result<(), CliError> {
    let config = ImportConfig::load(&Overrides::default())?;

    log::info!(
        "{}",
        "imd-sync Configuration".if_supports_color(Stderr, |t| t.bold()),
    );
    log::info!("");

    match config_path() {
        Some(p) if p.exists() => {
            log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stderr, |t| t.cyan()),
                "(exists)".if_supports_color(Stderr, |t| t.green()),
            );
        }
        Some(p) => {
            log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stderr, |t| t.cyan()),
                "(not found)".if_supports_color(Stderr, |t| t.dimmed()),
            );
        }
        None => {
            log::info!(
                "  Config file: {}",
                "could not determine path".if_supports_color(Stderr, |t| t.red()),
            );
        }
    }
    log::info!("");

    let csv_path = config.csv_path.value.as_ref().map(|p| p.display().to_string());
    let fields: [(&str, Option<String>, &ConfigSource); 6] = [
        (
            "supabase_url",
            describe(&config.supabase_url, false),
            &config.supabase_url.source,
        ),
        (
            "service_role_key",
            describe(&config.service_role_key, true),
            &config.service_role_key.source,
        ),
        ("schema", describe(&config.schema, false), &config.schema.source),
        (
            "timeout_secs",
            describe(&config.timeout_secs, false),
            &config.timeout_secs.source,
        ),
        ("csv_path", csv_path, &config.csv_path.source),
        (
            "flagged_only",
            describe(&config.flagged_only, false),
            &config.flagged_only.source,
        ),
    ];

    for (name, value, source) in fields {
        let source_str = format!("({})", source);
        match value {
            Some(v) => log::info!(
                "  {:<18} {} {}",
                name,
                v,
                source_str.if_supports_color(Stderr, |t| t.dimmed()),
            ),
            None => log::info!(
                "  {:<18} {} {}",
                name,
                "-".if_supports_color(Stderr, |t| t.red()),
                source_str.if_supports_color(Stderr, |t| t.dimmed()),
            ),
        }
    }

    Ok(())
}

/// Print the config file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    let path = config_path()
        .ok_or_else(|| CliError::config("Could not determine config directory"))?;
    println!("{}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_secrets() {
        assert_eq!(mask_value("abc"), "****");
        assert_eq!(mask_value("eyJhbGciOi"), "eyJh****");
    }
}
