use log::LevelFilter;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_TEAMS_FILE: &str = "bracket-teams.json";
pub const DEFAULT_STEP_MS: u64 = 250;
const MIN_STEP_MS: u64 = 10;

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: LevelFilter,
    pub teams_file: PathBuf,
    /// Base URL of a `team-server`. Metadata is mirrored there when set.
    pub teams_url: Option<String>,
    pub step_interval: Duration,
    pub seed: Option<u64>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: LevelFilter::Info,
            teams_file: PathBuf::from(DEFAULT_TEAMS_FILE),
            teams_url: None,
            step_interval: Duration::from_millis(DEFAULT_STEP_MS),
            seed: None,
        }
    }
}

impl AppSettings {
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Blank and unparsable values fall
    /// back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let step_ms = get("BRACKET_STEP_MS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_STEP_MS)
            .max(MIN_STEP_MS);

        Self {
            full_screen: false,
            log_level: get("BRACKET_LOG")
                .and_then(|v| LevelFilter::from_str(&v).ok())
                .unwrap_or(defaults.log_level),
            teams_file: get("BRACKET_TEAMS_FILE").map(PathBuf::from).unwrap_or(defaults.teams_file),
            teams_url: get("BRACKET_TEAMS_URL"),
            step_interval: Duration::from_millis(step_ms),
            seed: get("BRACKET_SEED").and_then(|v| v.parse().ok()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> AppSettings {
        let env: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppSettings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let s = settings(&[]);
        assert_eq!(s.teams_file, PathBuf::from("bracket-teams.json"));
        assert_eq!(s.step_interval, Duration::from_millis(250));
        assert_eq!(s.log_level, LevelFilter::Info);
        assert!(s.teams_url.is_none());
        assert!(s.seed.is_none());
    }

    #[test]
    fn reads_every_key() {
        let s = settings(&[
            ("BRACKET_TEAMS_FILE", "/tmp/teams.json"),
            ("BRACKET_TEAMS_URL", "http://127.0.0.1:8788"),
            ("BRACKET_STEP_MS", "40"),
            ("BRACKET_SEED", "2025"),
            ("BRACKET_LOG", "debug"),
        ]);
        assert_eq!(s.teams_file, PathBuf::from("/tmp/teams.json"));
        assert_eq!(s.teams_url.as_deref(), Some("http://127.0.0.1:8788"));
        assert_eq!(s.step_interval, Duration::from_millis(40));
        assert_eq!(s.seed, Some(2025));
        assert_eq!(s.log_level, LevelFilter::Debug);
    }

    #[test]
    fn step_interval_is_clamped() {
        assert_eq!(settings(&[("BRACKET_STEP_MS", "0")]).step_interval, Duration::from_millis(10));
        assert_eq!(settings(&[("BRACKET_STEP_MS", "fast")]).step_interval, Duration::from_millis(250));
    }

    #[test]
    fn blank_values_are_ignored() {
        let s = settings(&[("BRACKET_TEAMS_URL", "  "), ("BRACKET_SEED", "abc"), ("BRACKET_LOG", "loud")]);
        assert!(s.teams_url.is_none());
        assert!(s.seed.is_none());
        assert_eq!(s.log_level, LevelFilter::Info);
    }
}
