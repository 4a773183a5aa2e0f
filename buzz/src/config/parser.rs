//! INI parsing: the single place where key names map to struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};

use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [api] section
    if let Some(section) = ini.section(Some("api")) {
        if let Some(v) = section.get("base_url") {
            let v = v.trim();
            if !v.is_empty() {
                if !(v.starts_with("http://") || v.starts_with("https://")) {
                    return Err(invalid(
                        "api",
                        "base_url",
                        v,
                        "must start with http:// or https://",
                    ));
                }
                config.api.base_url = Some(v.to_string());
            }
        }
    }

    // [location] section
    if let Some(section) = ini.section(Some("location")) {
        let location = &mut config.location;
        if let Some(v) = positive::<f64>(section, "location", "distance_threshold")? {
            location.distance_threshold_m = v;
        }
        if let Some(v) = positive::<u64>(section, "location", "time_threshold_ms")? {
            location.time_threshold_ms = v;
        }
        if let Some(v) = positive::<u64>(section, "location", "initial_backoff_ms")? {
            location.initial_backoff_ms = v;
        }
        if let Some(v) = positive::<u64>(section, "location", "max_backoff_ms")? {
            location.max_backoff_ms = v;
        }
        if let Some(v) = section.get("background_updates") {
            location.background_updates = parse_bool(v);
        }

        if location.max_backoff_ms < location.initial_backoff_ms {
            return Err(invalid(
                "location",
                "max_backoff_ms",
                &location.max_backoff_ms.to_string(),
                "must not be less than initial_backoff_ms",
            ));
        }
    }

    // [background] section
    if let Some(section) = ini.section(Some("background")) {
        if let Some(v) = non_empty(section, "notification_title") {
            config.background.notification_title = v;
        }
        if let Some(v) = non_empty(section, "notification_body") {
            config.background.notification_body = v;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = non_empty(section, "file") {
            config.logging.file = expand_tilde(&v);
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn non_empty(section: &Properties, key: &str) -> Option<String> {
    section
        .get(key)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parse a strictly positive number. Empty values are treated as unset.
fn positive<T>(
    section: &Properties,
    section_name: &str,
    key: &str,
) -> Result<Option<T>, ConfigFileError>
where
    T: FromStr + PartialOrd + Default,
{
    let Some(raw) = non_empty(section, key) else {
        return Ok(None);
    };
    match raw.parse::<T>() {
        Ok(v) if v > T::default() => Ok(Some(v)),
        _ => Err(invalid(section_name, key, &raw, "must be a positive number")),
    }
}

/// Parse a boolean the permissive way: true, 1, yes and on are truthy.
pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

/// Expand `~` to the home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
