//! INI serialization: produces the commented file written to `config.ini`.

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let base_url = config.api.base_url.as_deref().unwrap_or("");
    let background_updates = if config.location.background_updates {
        "true"
    } else {
        "false"
    };

    format!(
        r#"[api]
; Backend base URL. Leave empty to use http://localhost:5000.
; The BUZZ_API_BASE_URL environment variable takes precedence.
base_url = {base_url}

[location]
; Minimum movement in meters before a new update is sent.
distance_threshold = {distance}
; Maximum time between updates while stationary, in milliseconds.
time_threshold_ms = {time}
; Retry delay after the first failed send, in milliseconds.
initial_backoff_ms = {initial}
; Upper bound for the retry delay, in milliseconds.
max_backoff_ms = {max}
; Keep reporting while the app is in the background (where supported).
background_updates = {background_updates}

[background]
; Notification shown while background location sharing is active.
notification_title = {title}
notification_body = {body}

[logging]
; Log file location.
file = {log_file}
"#,
        distance = config.location.distance_threshold_m,
        time = config.location.time_threshold_ms,
        initial = config.location.initial_backoff_ms,
        max = config.location.max_backoff_ms,
        title = config.background.notification_title,
        body = config.background.notification_body,
        log_file = config.logging.file.display(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_every_section() {
        let text = to_config_string(&ConfigFile::default());
        for section in ["[api]", "[location]", "[background]", "[logging]"] {
            assert!(text.contains(section), "missing {section}");
        }
        assert!(text.contains("distance_threshold = 25"));
        assert!(text.contains("time_threshold_ms = 15000"));
        assert!(text.contains("background_updates = false"));
    }
}
