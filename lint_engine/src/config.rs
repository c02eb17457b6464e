//! Layered check selection — CLI > environment > config file > defaults.
//!
//! Each layer is an optional-value provider ([`ConfigLayer`]); resolution is
//! per-field first-`Some`, never a mutable-dict merge. A layer that supplies
//! only `include` does not shadow a lower layer's `fail_fast`.
//!
//! When the same check name lands in both the resolved include and the
//! resolved exclude — whatever layers they came from — exclude wins. An
//! unknown check name anywhere is a usage error, not a warning.

use std::path::Path;

use serde::Deserialize;

use crate::types::CheckName;

/// Environment variable: comma-separated checks to run.
pub const ENV_INCLUDE: &str = "CHECKS_INCLUDE";
/// Environment variable: comma-separated checks to skip.
pub const ENV_EXCLUDE: &str = "CHECKS_EXCLUDE";
/// Environment variable: truthy string enabling fail-fast.
pub const ENV_FAIL_FAST: &str = "CHECKS_FAIL_FAST";

/// Errors in CLI/env/config-file input. Fatal: the process reports the
/// offending value and exits with the usage exit code before any file is
/// checked.
#[derive(Debug, thiserror::Error)]
pub enum UsageError {
    /// A check name outside the fixed universe appeared in an include or
    /// exclude list.
    #[error("unknown check name '{0}' in {1}")]
    UnknownCheck(String, &'static str),

    /// An environment boolean was neither truthy nor falsy.
    #[error("invalid boolean value '{1}' for {0}")]
    InvalidBool(String, String),

    /// A config file could not be read.
    #[error("failed to read config file '{0}': {1}")]
    ConfigRead(String, String),

    /// A config file could not be parsed.
    #[error("failed to parse config file '{0}': {1}")]
    ConfigParse(String, String),

    /// No input files were given.
    #[error("no input files given")]
    NoInputFiles,
}

/// One layer's worth of settings. `None` means "this layer says nothing
/// about this field" and resolution falls through to the next layer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigLayer {
    /// Checks to run; restricts the active set to these names.
    pub include: Option<Vec<String>>,
    /// Checks to remove from the active set.
    pub exclude: Option<Vec<String>>,
    /// Stop the whole run at the first fail-status finding.
    pub fail_fast: Option<bool>,
}

impl ConfigLayer {
    /// Load the config-file layer. `.yml`/`.yaml` extensions parse as YAML,
    /// anything else as JSON; both map to the same logical structure.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::ConfigRead`] when the file cannot be read and
    /// [`UsageError::ConfigParse`] when it cannot be deserialized.
    pub fn from_file(path: &Path) -> Result<Self, UsageError> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path)
            .map_err(|e| UsageError::ConfigRead(display.clone(), e.to_string()))?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml"));

        if is_yaml {
            serde_yaml::from_str(&content)
                .map_err(|e| UsageError::ConfigParse(display, e.to_string()))
        } else {
            serde_json::from_str(&content)
                .map_err(|e| UsageError::ConfigParse(display, e.to_string()))
        }
    }

    /// Load the environment layer from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::InvalidBool`] when `CHECKS_FAIL_FAST` is set to
    /// something neither truthy nor falsy.
    pub fn from_env() -> Result<Self, UsageError> {
        Self::from_env_with(|var| std::env::var(var).ok())
    }

    /// Environment layer with an injectable variable lookup, so tests never
    /// mutate process-global state.
    pub(crate) fn from_env_with(
        get: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, UsageError> {
        let include = get(ENV_INCLUDE).and_then(|v| split_csv(&v));
        let exclude = get(ENV_EXCLUDE).and_then(|v| split_csv(&v));
        let fail_fast = match get(ENV_FAIL_FAST) {
            Some(raw) if raw.trim().is_empty() => None,
            Some(raw) => Some(parse_bool(ENV_FAIL_FAST, &raw)?),
            None => None,
        };
        Ok(Self {
            include,
            exclude,
            fail_fast,
        })
    }
}

/// Split a comma-separated list, trimming entries and dropping empties.
/// A blank string counts as "nothing supplied", not an empty list.
#[must_use]
pub fn split_csv(value: &str) -> Option<Vec<String>> {
    let parts: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_owned)
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts)
    }
}

/// Parse a truthy/falsy env string: `1/true/yes/on` and `0/false/no/off`,
/// case-insensitive. Anything else is a usage error.
fn parse_bool(var: &str, raw: &str) -> Result<bool, UsageError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(UsageError::InvalidBool(var.to_owned(), raw.to_owned())),
    }
}

/// Resolved settings for one invocation. Built once from the merged layers
/// and never mutated during the run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Active checks in declared run order. May be empty: the run then
    /// executes nothing and exits 0.
    pub checks: Vec<CheckName>,
    /// Stop the whole run at the first fail-status finding.
    pub fail_fast: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            checks: CheckName::ALL.to_vec(),
            fail_fast: false,
        }
    }
}

/// Resolve the final [`RunConfig`] from layers ordered highest-precedence
/// first (CLI, then env, then config file).
///
/// Each field resolves independently to the first layer that supplies it.
/// Include restricts to the named set, exclude removes from whatever the
/// active set is (the full universe when no include applies), and exclude
/// wins when both name the same check.
///
/// # Errors
///
/// Returns [`UsageError::UnknownCheck`] for any name outside the fixed
/// check universe in the resolved include or exclude.
pub fn resolve(layers: &[ConfigLayer]) -> Result<RunConfig, UsageError> {
    let include = first_value(layers, |layer| layer.include.as_ref());
    let exclude = first_value(layers, |layer| layer.exclude.as_ref());
    let fail_fast = first_value(layers, |layer| layer.fail_fast.as_ref())
        .copied()
        .unwrap_or(false);

    let included: Vec<CheckName> = match include {
        Some(names) => parse_names(names, "include")?,
        None => CheckName::ALL.to_vec(),
    };
    let excluded: Vec<CheckName> = match exclude {
        Some(names) => parse_names(names, "exclude")?,
        None => Vec::new(),
    };

    // Declared order filtered by membership keeps the run order stable no
    // matter how the user ordered the lists.
    let checks: Vec<CheckName> = CheckName::ALL
        .into_iter()
        .filter(|check| included.contains(check) && !excluded.contains(check))
        .collect();

    Ok(RunConfig { checks, fail_fast })
}

fn first_value<'a, T>(
    layers: &'a [ConfigLayer],
    field: impl Fn(&'a ConfigLayer) -> Option<&'a T>,
) -> Option<&'a T> {
    layers.iter().find_map(field)
}

fn parse_names(names: &[String], list: &'static str) -> Result<Vec<CheckName>, UsageError> {
    names
        .iter()
        .map(|name| {
            CheckName::parse(name).ok_or_else(|| UsageError::UnknownCheck(name.clone(), list))
        })
        .collect()
}
