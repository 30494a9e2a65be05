mod schema;

pub use schema::{Config, Settings, DEFAULT_FUZZY_THRESHOLD};

use anyhow::{anyhow, Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use strsim::levenshtein;
use thiserror::Error;

use crate::filter::LabelFilter;

const CONFIG_ENV_VAR: &str = "LFILTER_CONFIG";

/// prefix marking a saved filter reference on the command line
pub const SAVED_FILTER_PREFIX: char = '@';

pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var(CONFIG_ENV_VAR) {
        return Ok(PathBuf::from(path));
    }

    Ok(dirs::home_dir()
        .ok_or_else(|| anyhow!("Could not find home directory"))?
        .join(".lfilter")
        .join("config.json"))
}

/// config path from --config, falling back to env var and default location
pub fn get_config_path_with_override(path: Option<&Path>) -> Result<PathBuf> {
    match path {
        Some(p) => Ok(p.to_path_buf()),
        None => get_config_path(),
    }
}

/// load config, returning defaults when the file does not exist
pub fn load_with_override(path: Option<&Path>) -> Result<Config> {
    let path = get_config_path_with_override(path)?;

    if !path.exists() {
        return Ok(Config::default());
    }

    load_from(&path)
}

pub fn load_from(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = json5::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(config)
}

pub fn save_with_override(config: &Config, path: Option<&Path>) -> Result<()> {
    let path = get_config_path_with_override(path)?;

    // ensure directory exists
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let content = serde_json::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(&path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    Ok(())
}

/// Verify configuration file and return a list of errors
pub fn verify(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(anyhow!("config file not found: {}", path.display()));
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: Config = match json5::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            return Err(anyhow!("invalid JSON: {}", e));
        }
    };

    Ok(validate(&config))
}

/// check saved filter names and expressions
pub fn validate(config: &Config) -> Vec<String> {
    let mut errors = Vec::new();

    for (name, expression) in &config.filters {
        let prefix = format!("filters.{}", name);

        if let Err(e) = validate_filter_name(name) {
            errors.push(format!("{}: {}", prefix, e));
        }

        if let Err(e) = LabelFilter::new(expression.as_str()) {
            errors.push(format!("{}: {}", prefix, e));
        }
    }

    errors
}

fn validate_filter_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("filter name must not be empty".to_string());
    }
    if name.starts_with(SAVED_FILTER_PREFIX) {
        return Err(format!(
            "filter name must not start with '{}'",
            SAVED_FILTER_PREFIX
        ));
    }
    if name.chars().any(char::is_whitespace) {
        return Err("filter name must not contain whitespace".to_string());
    }
    Ok(())
}

pub fn set_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    if let Some(name) = key.strip_prefix("filters.") {
        validate_filter_name(name).map_err(|e| anyhow!(e))?;
        LabelFilter::new(value).with_context(|| format!("Invalid filter for '{}'", name))?;
        config.filters.insert(name.to_string(), value.to_string());
        return Ok(());
    }

    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["settings", "fuzzy_threshold"] => {
            config.settings.fuzzy_threshold = value
                .parse()
                .with_context(|| format!("Invalid number: {}", value))?;
        }
        ["settings", "warn_unknown_labels"] => {
            config.settings.warn_unknown_labels = parse_bool(value)?;
        }
        _ => {
            return Err(anyhow!(
                "Unknown config key: {}. Valid keys: settings.fuzzy_threshold, settings.warn_unknown_labels, filters.<name>",
                key
            ));
        }
    }

    Ok(())
}

/// remove a saved filter, returning its expression
pub fn remove_filter(config: &mut Config, name: &str) -> Result<String> {
    config
        .filters
        .remove(name)
        .ok_or_else(|| anyhow!("No saved filter named '{}'", name))
}

/// generates a default config with example saved filters
pub fn default_with_examples() -> Config {
    let mut config = Config::default();
    for (name, expression) in [
        ("controllers", "role=controller"),
        ("rack1-controllers", "role=controller and rack=1"),
        ("active", "not decommissioned"),
    ] {
        config
            .filters
            .insert(name.to_string(), expression.to_string());
    }
    config
}

/// a `@name` argument that names no saved filter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown saved filter '{prefix}{name}'", prefix = SAVED_FILTER_PREFIX)]
pub struct UnknownFilter {
    pub name: String,
    /// saved filter names close to the requested one
    pub suggestions: Vec<String>,
}

/// expand a `@name` argument into its saved expression; other text is returned as is
pub fn resolve_filter<'a>(config: &'a Config, argument: &'a str) -> Result<&'a str, UnknownFilter> {
    let Some(name) = argument.strip_prefix(SAVED_FILTER_PREFIX) else {
        return Ok(argument);
    };

    config
        .filters
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| UnknownFilter {
            name: name.to_string(),
            suggestions: suggest(
                name,
                config.filters.keys().map(String::as_str),
                config.settings.fuzzy_threshold,
            ),
        })
}

/// candidates within `threshold` edits of `query` (or prefixed by it), closest first
pub fn suggest<'a>(
    query: &str,
    candidates: impl IntoIterator<Item = &'a str>,
    threshold: usize,
) -> Vec<String> {
    let query_lower = query.to_lowercase();

    let mut scored: Vec<(usize, &str)> = candidates
        .into_iter()
        .filter(|c| *c != query)
        .filter_map(|c| {
            let c_lower = c.to_lowercase();
            if !query_lower.is_empty() && c_lower.starts_with(&query_lower) {
                return Some((0, c));
            }
            let distance = levenshtein(&query_lower, &c_lower);
            (distance <= threshold).then_some((distance, c))
        })
        .collect();

    scored.sort();
    scored.dedup();
    scored.into_iter().map(|(_, c)| c.to_string()).collect()
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(anyhow!(
            "Invalid boolean value: {}. Use true/false, yes/no, 1/0, or on/off",
            value
        )),
    }
}
