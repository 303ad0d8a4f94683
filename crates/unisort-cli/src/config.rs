//! Configuration file support for unisort
//!
//! Loads `.unisort.toml` from current directory or parent directories.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use unisort_rules::{RulesOptions, SortOptions};

pub const CONFIG_FILE_NAME: &str = ".unisort.toml";

/// Configuration file structure
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub rules: RulesConfig,
    pub paths: PathsConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// If set, only these rules will run
    pub enabled: Option<Vec<String>>,
    /// Rules to exclude (applied after enabled)
    pub disabled: Vec<String>,
    /// Options for the sort_union_types rule
    pub sort_union_types: SortOptions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Glob patterns to exclude from processing
    pub exclude: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "text", "json" or "diff"
    pub format: Option<String>,
}

impl Config {
    /// Load config from `.unisort.toml` searching from current directory upward
    pub fn load() -> Result<Option<(Config, PathBuf)>> {
        Self::load_from(std::env::current_dir()?)
    }

    /// Load config searching from the given directory upward
    pub fn load_from(start_dir: PathBuf) -> Result<Option<(Config, PathBuf)>> {
        let mut current = Some(start_dir.as_path());

        while let Some(dir) = current {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                let config = Self::load_path(&config_path)?;
                return Ok(Some((config, config_path)));
            }
            current = dir.parent();
        }

        Ok(None)
    }

    /// Load config from a specific path
    pub fn load_path(path: &Path) -> Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Rule options as resolved from the file
    pub fn rules_options(&self) -> RulesOptions {
        RulesOptions {
            sort_union_types: self.rules.sort_union_types,
        }
    }

    /// Rules to run: `--rule` flags win, otherwise `enabled` (or every
    /// rule) minus `disabled`
    pub fn effective_rules(&self, all_rules: &[&str], cli_rules: &[String]) -> HashSet<String> {
        if !cli_rules.is_empty() {
            return cli_rules.iter().cloned().collect();
        }

        let candidates: Vec<String> = match &self.rules.enabled {
            Some(enabled) => enabled.clone(),
            None => all_rules.iter().map(|rule| rule.to_string()).collect(),
        };

        candidates
            .into_iter()
            .filter(|rule| !self.rules.disabled.contains(rule))
            .collect()
    }

    /// Whether `path` matches any `[paths] exclude` pattern
    pub fn should_exclude(&self, path: &Path) -> bool {
        self.paths
            .exclude
            .iter()
            .any(|pattern| exclude_pattern_matches(pattern, path))
    }
}

/// Globs match the whole path or the file name; a trailing `/` names a
/// directory anywhere in the path
fn exclude_pattern_matches(pattern: &str, path: &Path) -> bool {
    if let Some(dir) = pattern.strip_suffix('/') {
        return path
            .parent()
            .is_some_and(|parent| parent.components().any(|c| c.as_os_str() == dir));
    }

    let Ok(glob) = glob::Pattern::new(pattern) else {
        tracing::warn!(pattern, "ignoring invalid exclude pattern");
        return false;
    };

    glob.matches_path(path)
        || path
            .file_name()
            .is_some_and(|name| glob.matches(&name.to_string_lossy()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use unisort_rules::{SortOrder, SortType};

    fn create_config(dir: &Path, content: &str) {
        fs::write(dir.join(CONFIG_FILE_NAME), content).unwrap();
    }

    #[test]
    fn test_load_basic_config() {
        let temp = TempDir::new().unwrap();
        create_config(
            temp.path(),
            r#"
[rules]
enabled = ["sort_union_types"]

[rules.sort_union_types]
type = "natural"
order = "desc"

[paths]
exclude = ["vendor/", "*.generated.php"]

[output]
format = "json"
"#,
        );

        let (config, path) = Config::load_from(temp.path().to_path_buf())
            .unwrap()
            .unwrap();

        assert_eq!(path, temp.path().join(CONFIG_FILE_NAME));
        assert_eq!(
            config.rules.enabled,
            Some(vec!["sort_union_types".to_string()])
        );
        assert_eq!(
            config.rules_options().sort_union_types,
            SortOptions::new(SortType::Natural, SortOrder::Desc)
        );
        assert_eq!(
            config.paths.exclude,
            vec!["vendor/".to_string(), "*.generated.php".to_string()]
        );
        assert_eq!(config.output.format, Some("json".to_string()));
    }

    #[test]
    fn test_load_empty_config() {
        let temp = TempDir::new().unwrap();
        create_config(temp.path(), "");

        let (config, _) = Config::load_from(temp.path().to_path_buf())
            .unwrap()
            .unwrap();

        assert!(config.rules.enabled.is_none());
        assert!(config.rules.disabled.is_empty());
        assert_eq!(config.rules.sort_union_types, SortOptions::default());
        assert!(config.paths.exclude.is_empty());
        assert!(config.output.format.is_none());
    }

    #[test]
    fn test_config_found_in_parent() {
        let temp = TempDir::new().unwrap();
        create_config(temp.path(), "[rules]\ndisabled = []\n");
        let nested = temp.path().join("src").join("Domain");
        fs::create_dir_all(&nested).unwrap();

        let (_, path) = Config::load_from(nested).unwrap().unwrap();
        assert_eq!(path, temp.path().join(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_unknown_rule_option_rejected() {
        let temp = TempDir::new().unwrap();
        create_config(
            temp.path(),
            "[rules.sort_union_types]\ntype = \"natural\"\nignore_case = true\n",
        );

        assert!(Config::load_from(temp.path().to_path_buf()).is_err());
    }

    #[test]
    fn test_invalid_rule_option_value_rejected() {
        let temp = TempDir::new().unwrap();
        create_config(temp.path(), "[rules.sort_union_types]\ntype = \"random\"\n");

        let err = Config::load_path(&temp.path().join(CONFIG_FILE_NAME)).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse"));
    }

    #[test]
    fn test_no_config_found() {
        let temp = TempDir::new().unwrap();
        let result = Config::load_from(temp.path().to_path_buf()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_effective_rules_cli_override() {
        let config = Config::default();
        let all_rules = &["sort_union_types"];
        let cli_rules = vec!["sort_union_types".to_string()];

        let effective = config.effective_rules(all_rules, &cli_rules);

        assert_eq!(effective.len(), 1);
        assert!(effective.contains("sort_union_types"));
    }

    #[test]
    fn test_effective_rules_with_disabled() {
        let config = Config {
            rules: RulesConfig {
                disabled: vec!["sort_union_types".to_string()],
                ..Default::default()
            },
            ..Default::default()
        };

        let effective = config.effective_rules(&["sort_union_types"], &[]);
        assert!(effective.is_empty());
    }

    #[test]
    fn test_should_exclude_glob() {
        let config = Config {
            paths: PathsConfig {
                exclude: vec!["*.generated.php".to_string()],
            },
            ..Default::default()
        };

        assert!(config.should_exclude(Path::new("foo.generated.php")));
        assert!(!config.should_exclude(Path::new("foo.php")));
    }

    #[test]
    fn test_effective_rules_enabled_list() {
        let config = Config {
            rules: RulesConfig {
                enabled: Some(vec!["sort_union_types".to_string()]),
                disabled: vec!["other".to_string()],
                ..Default::default()
            },
            ..Default::default()
        };

        let effective = config.effective_rules(&["sort_union_types", "other"], &[]);
        assert_eq!(effective.len(), 1);
        assert!(effective.contains("sort_union_types"));
    }

    #[test]
    fn test_invalid_exclude_pattern_is_ignored() {
        let config = Config {
            paths: PathsConfig {
                exclude: vec!["[".to_string()],
            },
            ..Default::default()
        };

        assert!(!config.should_exclude(Path::new("src/a.php")));
    }

    #[test]
    fn test_should_exclude_directory() {
        let config = Config {
            paths: PathsConfig {
                exclude: vec!["vendor/".to_string()],
            },
            ..Default::default()
        };

        assert!(config.should_exclude(Path::new("project/vendor/autoload.php")));
        assert!(config.should_exclude(Path::new("vendor/package/file.php")));
        assert!(!config.should_exclude(Path::new("src/vendor.php")));
    }
}
