//! Run configuration: compiled defaults, optional JSON settings file,
//! environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`Settings::default()`]
//! 2. If the settings file exists, its values override the defaults
//! 3. Apply `OWNER_CHANGE_*` environment variable overrides (highest
//!    priority); invalid values are ignored with a warning

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use owner_change_client::{DEFAULT_DATAGREPPER_URL, SortOrder};

use crate::errors::{Result, SettingsError};

/// Default lookback window: seven days.
pub const DEFAULT_LOOKBACK_SECONDS: u64 = 7 * 24 * 60 * 60;

/// Topic carrying ownership transfer events.
pub const OWNER_UPDATE_TOPIC: &str = "org.fedoraproject.prod.pkgdb.owner.update";

/// Topic carrying retire/unretire lifecycle events.
pub const PACKAGE_RETIRE_TOPIC: &str = "org.fedoraproject.prod.pkgdb.package.retire";

/// Everything one run needs, passed explicitly into the pipeline.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Settings {
    /// Base URL of the event history service.
    pub datagrepper_url: String,
    /// Lookback window in seconds.
    pub lookback_seconds: u64,
    /// Topics to query, in query order.
    pub topic_list: Vec<String>,
    /// Events per page (the service caps this at 100).
    pub page_size: u32,
    /// Wire sort order.
    pub order: SortOrder,
    /// Print the report instead of emailing it.
    pub print_only: bool,
    /// Email delivery settings.
    pub email: EmailSettings,
}

/// Where and through which relay the report email goes.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EmailSettings {
    /// Report recipient address.
    pub recipient: String,
    /// Envelope sender address.
    pub sender: String,
    /// SMTP relay host.
    pub relay_host: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            datagrepper_url: DEFAULT_DATAGREPPER_URL.to_string(),
            lookback_seconds: DEFAULT_LOOKBACK_SECONDS,
            topic_list: vec![
                OWNER_UPDATE_TOPIC.to_string(),
                PACKAGE_RETIRE_TOPIC.to_string(),
            ],
            page_size: 100,
            order: SortOrder::Ascending,
            print_only: false,
            email: EmailSettings::default(),
        }
    }
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            recipient: String::new(),
            sender: String::new(),
            relay_host: "localhost".to_string(),
        }
    }
}

/// Resolve the default settings file path (`~/.owner-change/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".owner-change").join("settings.json")
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<Settings> {
    let mut settings = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)?
    } else {
        debug!(?path, "settings file not found, using defaults");
        Settings::default()
    };
    apply_env_overrides(&mut settings);
    validate(&settings)?;
    Ok(settings)
}

fn validate(settings: &Settings) -> Result<()> {
    if settings.topic_list.is_empty() {
        return Err(SettingsError::InvalidValue(
            "topic-list must name at least one topic".to_string(),
        ));
    }
    if settings.page_size == 0 || settings.page_size > 100 {
        return Err(SettingsError::InvalidValue(format!(
            "page-size must be between 1 and 100, got {}",
            settings.page_size
        )));
    }
    Ok(())
}

/// Apply `OWNER_CHANGE_*` environment variable overrides.
///
/// Invalid values are ignored (fall back to file/default) with a warning.
pub fn apply_env_overrides(settings: &mut Settings) {
    if let Some(v) = read_env_string("OWNER_CHANGE_URL") {
        settings.datagrepper_url = v;
    }
    if let Some(v) = read_env_u64("OWNER_CHANGE_LOOKBACK_SECONDS", 1, 365 * 24 * 60 * 60) {
        settings.lookback_seconds = v;
    }
    if let Some(v) = read_env_string("OWNER_CHANGE_TOPICS") {
        settings.topic_list = v
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect();
    }
    if let Some(v) = read_env_u32("OWNER_CHANGE_PAGE_SIZE", 1, 100) {
        settings.page_size = v;
    }
    if let Some(v) = read_env_string("OWNER_CHANGE_ORDER") {
        match serde_json::from_value(serde_json::Value::String(v.clone())) {
            Ok(order) => settings.order = order,
            Err(_) => {
                tracing::warn!(value = %v, "invalid OWNER_CHANGE_ORDER, ignoring");
            }
        }
    }
    if let Some(v) = read_env_string("OWNER_CHANGE_RECIPIENT") {
        settings.email.recipient = v;
    }
    if let Some(v) = read_env_string("OWNER_CHANGE_SENDER") {
        settings.email.sender = v;
    }
    if let Some(v) = read_env_string("OWNER_CHANGE_RELAY_HOST") {
        settings.email.relay_host = v;
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `u32` within a range.
pub fn parse_u32_range(val: &str, min: u32, max: u32) -> Option<u32> {
    let n: u32 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ── Env var readers (thin wrappers) ─────────────────────────────────────────

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn read_env_u64(name: &str, min: u64, max: u64) -> Option<u64> {
    let val = std::env::var(name).ok()?;
    let result = parse_u64_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u64 env var, ignoring");
    }
    result
}

fn read_env_u32(name: &str, min: u32, max: u32) -> Option<u32> {
    let val = std::env::var(name).ok()?;
    let result = parse_u32_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u32 env var, ignoring");
    }
    result
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_a_week_of_both_topics() {
        let settings = Settings::default();
        assert_eq!(settings.lookback_seconds, 604_800);
        assert_eq!(settings.page_size, 100);
        assert_eq!(settings.order, SortOrder::Ascending);
        assert_eq!(settings.topic_list.len(), 2);
        assert_eq!(settings.email.relay_host, "localhost");
        assert!(!settings.print_only);
    }

    #[test]
    fn load_missing_file_returns_defaults() {
        let path = Path::new("/nonexistent/settings.json");
        let settings = load_settings_from_path(path).unwrap();
        assert_eq!(settings.lookback_seconds, DEFAULT_LOOKBACK_SECONDS);
    }

    #[test]
    fn load_empty_json_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{}").unwrap();

        let settings = load_settings_from_path(&path).unwrap();
        assert_eq!(settings.datagrepper_url, DEFAULT_DATAGREPPER_URL);
        assert_eq!(settings.page_size, 100);
    }

    #[test]
    fn load_partial_json_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"lookback-seconds": 3600, "email": {"recipient": "devel@example.org"}}"#,
        )
        .unwrap();

        let settings = load_settings_from_path(&path).unwrap();
        assert_eq!(settings.lookback_seconds, 3600);
        assert_eq!(settings.email.recipient, "devel@example.org");
        // Untouched keys keep their defaults.
        assert_eq!(settings.page_size, 100);
        assert_eq!(settings.email.relay_host, "localhost");
    }

    #[test]
    fn load_invalid_json_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not valid json").unwrap();

        let result = load_settings_from_path(&path);
        assert!(matches!(result.unwrap_err(), SettingsError::Json(_)));
    }

    #[test]
    fn load_rejects_empty_topic_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"topic-list": []}"#).unwrap();

        let result = load_settings_from_path(&path);
        assert!(matches!(result.unwrap_err(), SettingsError::InvalidValue(_)));
    }

    #[test]
    fn load_rejects_oversized_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"page-size": 500}"#).unwrap();

        let result = load_settings_from_path(&path);
        assert!(matches!(result.unwrap_err(), SettingsError::InvalidValue(_)));
    }

    #[test]
    fn order_parses_wire_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"order": "desc"}"#).unwrap();

        let settings = load_settings_from_path(&path).unwrap();
        assert_eq!(settings.order, SortOrder::Descending);
    }

    #[test]
    fn settings_path_under_home() {
        let path = settings_path();
        assert!(path.to_string_lossy().contains(".owner-change"));
        assert!(path.to_string_lossy().ends_with("settings.json"));
    }

    // ── parse helpers ───────────────────────────────────────────────

    #[test]
    fn parse_u64_valid() {
        assert_eq!(parse_u64_range("3600", 1, 604_800), Some(3600));
        assert_eq!(parse_u64_range("1", 1, 604_800), Some(1));
    }

    #[test]
    fn parse_u64_out_of_range() {
        assert_eq!(parse_u64_range("0", 1, 604_800), None);
        assert_eq!(parse_u64_range("700000", 1, 604_800), None);
    }

    #[test]
    fn parse_u64_invalid() {
        assert_eq!(parse_u64_range("abc", 1, 604_800), None);
        assert_eq!(parse_u64_range("", 1, 604_800), None);
    }

    #[test]
    fn parse_u32_valid_and_bounds() {
        assert_eq!(parse_u32_range("100", 1, 100), Some(100));
        assert_eq!(parse_u32_range("101", 1, 100), None);
        assert_eq!(parse_u32_range("not_a_number", 1, 100), None);
    }
}
