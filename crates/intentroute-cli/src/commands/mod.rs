pub mod chat;
pub mod evaluate;
pub mod providers;

use std::path::Path;

use anyhow::Context;
use intentroute_runtime::RuntimeConfig;

/// Settings from `path`, or the defaults when no file was given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<RuntimeConfig> {
    match path {
        Some(path) => RuntimeConfig::from_yaml_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        None => Ok(RuntimeConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_gives_defaults() {
        assert_eq!(load_config(None).unwrap(), RuntimeConfig::default());
    }

    #[test]
    fn bad_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        std::fs::write(&path, "providers:\n  openai: {}\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(format!("{:#}", err).contains("settings.yaml"));
    }
}
