use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use match_core::DEFAULT_CELEBRATION_WINDOW;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "image_match.toml";
pub const DEFAULT_DATASET_PATH: &str = "assets/images.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub dataset_path: PathBuf,
    pub celebration_window: Duration,
    pub shuffle_seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            celebration_window: DEFAULT_CELEBRATION_WINDOW,
            shuffle_seed: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    dataset_path: Option<PathBuf>,
    celebration_secs: Option<u64>,
    shuffle_seed: Option<u64>,
}

/// Defaults, then the config file, then environment variables.
///
/// An explicit `config_path` must exist; the default file is optional.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let (path, required) = match config_path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    if required || path.exists() {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid config file '{}'", path.display()))?;
    }

    apply_env(&mut settings, |name| std::env::var(name).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;

    if let Some(v) = file_cfg.dataset_path {
        settings.dataset_path = v;
    }
    if let Some(v) = file_cfg.celebration_secs {
        settings.celebration_window = Duration::from_secs(v);
    }
    if let Some(v) = file_cfg.shuffle_seed {
        settings.shuffle_seed = Some(v);
    }

    Ok(())
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("DATASET_PATH") {
        settings.dataset_path = PathBuf::from(v);
    }
    if let Some(v) = lookup("APP__DATASET_PATH") {
        settings.dataset_path = PathBuf::from(v);
    }

    if let Some(v) = lookup("APP__CELEBRATION_SECS") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.celebration_window = Duration::from_secs(parsed),
            Err(_) => tracing::warn!(value = %v, "ignoring non-numeric APP__CELEBRATION_SECS"),
        }
    }

    if let Some(v) = lookup("APP__SHUFFLE_SEED") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.shuffle_seed = Some(parsed),
            Err(_) => tracing::warn!(value = %v, "ignoring non-numeric APP__SHUFFLE_SEED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, io::Write};

    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_match_widget_behavior() {
        let settings = Settings::default();
        assert_eq!(settings.dataset_path, PathBuf::from("assets/images.json"));
        assert_eq!(settings.celebration_window, Duration::from_secs(10));
        assert_eq!(settings.shuffle_seed, None);
    }

    #[test]
    fn default_dataset_path_points_at_bundled_sample() {
        let bundled = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../..")
            .join(Settings::default().dataset_path);
        assert!(bundled.is_file(), "missing {}", bundled.display());
    }

    #[test]
    fn file_overrides_defaults() {
        let mut settings = Settings::default();
        apply_file(
            &mut settings,
            "dataset_path = \"assets/pairs.json\"\ncelebration_secs = 4\nshuffle_seed = 99\n",
        )
        .expect("apply file");

        assert_eq!(settings.dataset_path, PathBuf::from("assets/pairs.json"));
        assert_eq!(settings.celebration_window, Duration::from_secs(4));
        assert_eq!(settings.shuffle_seed, Some(99));
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        let mut settings = Settings::default();
        assert!(apply_file(&mut settings, "bind_addr = \"0.0.0.0\"\n").is_err());
    }

    #[test]
    fn env_overrides_file_and_app_prefix_wins() {
        let mut settings = Settings::default();
        apply_file(&mut settings, "dataset_path = \"from-file.json\"\n").expect("apply file");

        apply_env(
            &mut settings,
            env_from(&[
                ("DATASET_PATH", "plain.json"),
                ("APP__DATASET_PATH", "prefixed.json"),
                ("APP__CELEBRATION_SECS", "2"),
            ]),
        );

        assert_eq!(settings.dataset_path, PathBuf::from("prefixed.json"));
        assert_eq!(settings.celebration_window, Duration::from_secs(2));
    }

    #[test]
    fn malformed_numeric_env_is_ignored() {
        let mut settings = Settings::default();
        apply_env(
            &mut settings,
            env_from(&[
                ("APP__CELEBRATION_SECS", "soon"),
                ("APP__SHUFFLE_SEED", "-1"),
            ]),
        );

        assert_eq!(settings.celebration_window, DEFAULT_CELEBRATION_WINDOW);
        assert_eq!(settings.shuffle_seed, None);
    }

    #[test]
    fn explicit_config_file_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "celebration_secs = 1").expect("write config");

        let settings = load_settings(Some(file.path())).expect("load settings");
        assert_eq!(settings.celebration_window, Duration::from_secs(1));
    }

    #[test]
    fn missing_explicit_config_file_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = load_settings(Some(&dir.path().join("nope.toml"))).expect_err("missing file");
        assert!(err.to_string().contains("nope.toml"));
    }
}
