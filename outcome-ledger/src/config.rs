// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for outcome-ledger.
//!
//! Built-in defaults are embedded from `default-config.toml`. A config file,
//! if present, overrides individual settings; unknown keys are reported as
//! warnings rather than rejected.

use crate::errors::ConfigError;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::{collections::BTreeSet, io};
use tracing::{debug, warn};

/// Special value for `--config` that skips loading a config file entirely.
pub const CONFIG_NONE: &str = "none";

/// The config file looked up by [`ConfigLocation::Default`], relative to the
/// base directory.
pub const DEFAULT_CONFIG_PATH: &str = ".config/outcome-ledger.toml";

/// Specifies where to load configuration from.
#[derive(Clone, Copy, Debug)]
pub enum ConfigLocation<'a> {
    /// Use [`DEFAULT_CONFIG_PATH`] under the base directory, if it exists.
    Default,

    /// Skip config loading entirely, using only built-in defaults.
    Isolated,

    /// Load config from an explicit path. The file must exist.
    Explicit(&'a Utf8Path),
}

impl<'a> ConfigLocation<'a> {
    /// Creates a config location from a CLI or environment variable value.
    ///
    /// Returns `Default` if `None`, `Isolated` if `"none"`, otherwise
    /// `Explicit` with the path.
    pub fn from_cli_or_env(s: Option<&'a str>) -> Self {
        match s {
            None => Self::Default,
            Some(s) if s == CONFIG_NONE => Self::Isolated,
            Some(s) => Self::Explicit(Utf8Path::new(s)),
        }
    }
}

/// Where a result's full name comes from when the report doesn't carry one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FullNameFallback {
    /// Use the full name of the test tree node with the same id, or the id if
    /// there is no such node.
    Tree,

    /// Use the id.
    Id,
}

/// Resolved configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Settings for result bookkeeping.
    pub results: ResultsConfig,
}

/// Resolved `[results]` settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultsConfig {
    /// Discard all results on reload instead of remapping them.
    pub clear_on_reload: bool,

    /// Where full names come from when a report omits them.
    pub full_name_fallback: FullNameFallback,
}

impl LedgerConfig {
    /// The embedded default config TOML.
    const DEFAULT_CONFIG: &'static str = include_str!("../default-config.toml");

    /// Returns the built-in defaults.
    pub fn defaults() -> Self {
        Self::resolve(DefaultConfig::from_embedded(), None)
    }

    /// Loads configuration from `location`, resolving the default location
    /// against `base_dir`.
    pub fn load(location: ConfigLocation<'_>, base_dir: &Utf8Path) -> Result<Self, ConfigError> {
        Self::load_with_warnings(location, base_dir, &mut DefaultConfigWarnings)
    }

    fn load_with_warnings(
        location: ConfigLocation<'_>,
        base_dir: &Utf8Path,
        warnings: &mut impl ConfigWarnings,
    ) -> Result<Self, ConfigError> {
        let user_config = match location {
            ConfigLocation::Isolated => {
                debug!("config: skipping (isolated)");
                None
            }
            ConfigLocation::Explicit(path) => {
                debug!("config: loading from explicit path {path}");
                match DeserializedConfig::from_path_with_warnings(path, warnings)? {
                    Some(config) => Some(config),
                    None => {
                        return Err(ConfigError::FileNotFound {
                            path: path.to_owned(),
                        });
                    }
                }
            }
            ConfigLocation::Default => {
                let path: Utf8PathBuf = base_dir.join(DEFAULT_CONFIG_PATH);
                DeserializedConfig::from_path_with_warnings(&path, warnings)?
            }
        };

        Ok(Self::resolve(DefaultConfig::from_embedded(), user_config))
    }

    fn resolve(defaults: DefaultConfig, user: Option<DeserializedConfig>) -> Self {
        let user_results = user.map(|config| config.results).unwrap_or_default();
        Self {
            results: ResultsConfig {
                clear_on_reload: user_results
                    .clear_on_reload
                    .unwrap_or(defaults.results.clear_on_reload),
                full_name_fallback: user_results
                    .full_name_fallback
                    .unwrap_or(defaults.results.full_name_fallback),
            },
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self::defaults()
    }
}

/// Handling for config warnings: logged by default, collected in tests.
trait ConfigWarnings {
    fn unknown_config_keys(&mut self, config_file: &Utf8Path, unknown: &BTreeSet<String>);
}

struct DefaultConfigWarnings;

impl ConfigWarnings for DefaultConfigWarnings {
    fn unknown_config_keys(&mut self, config_file: &Utf8Path, unknown: &BTreeSet<String>) {
        let mut unknown_str = String::new();
        if unknown.len() == 1 {
            // Print this on the same line.
            unknown_str.push_str("key: ");
            unknown_str.extend(unknown.iter().map(String::as_str));
        } else {
            unknown_str.push_str("keys:\n");
            for ignored_key in unknown {
                unknown_str.push_str("\n  - ");
                unknown_str.push_str(ignored_key);
            }
        }

        warn!("in config file {config_file}, ignoring unknown configuration {unknown_str}");
    }
}

/// Config file contents. Every field is optional.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct DeserializedConfig {
    #[serde(default)]
    results: DeserializedResultsConfig,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct DeserializedResultsConfig {
    clear_on_reload: Option<bool>,
    full_name_fallback: Option<FullNameFallback>,
}

impl DeserializedConfig {
    /// Returns `Ok(None)` if the file does not exist.
    fn from_path_with_warnings(
        path: &Utf8Path,
        warnings: &mut impl ConfigWarnings,
    ) -> Result<Option<Self>, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!("config: file does not exist at {path}");
                return Ok(None);
            }
            Err(error) => {
                return Err(ConfigError::Read {
                    path: path.to_owned(),
                    error,
                });
            }
        };

        let (config, unknown) =
            Self::deserialize_toml(&contents).map_err(|error| ConfigError::Parse {
                path: path.to_owned(),
                error,
            })?;

        if !unknown.is_empty() {
            warnings.unknown_config_keys(path, &unknown);
        }

        debug!("config: loaded successfully from {path}");
        Ok(Some(config))
    }

    fn deserialize_toml(contents: &str) -> Result<(Self, BTreeSet<String>), toml::de::Error> {
        let deserializer = toml::Deserializer::parse(contents)?;
        let mut unknown = BTreeSet::new();
        let config: DeserializedConfig = serde_ignored::deserialize(deserializer, |path| {
            unknown.insert(path.to_string());
        })?;
        Ok((config, unknown))
    }
}

/// The embedded defaults. Every field is required.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct DefaultConfig {
    results: DefaultResultsConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct DefaultResultsConfig {
    clear_on_reload: bool,
    full_name_fallback: FullNameFallback,
}

impl DefaultConfig {
    /// Panics if the embedded TOML is invalid or contains unknown keys.
    fn from_embedded() -> Self {
        let deserializer = toml::Deserializer::parse(LedgerConfig::DEFAULT_CONFIG)
            .expect("embedded default config should parse");
        let mut unknown = BTreeSet::new();
        let config: DefaultConfig =
            serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
                unknown.insert(path.to_string());
            })
            .expect("embedded default config should be valid");

        if !unknown.is_empty() {
            panic!(
                "found unknown keys in default config: {}",
                unknown.into_iter().collect::<Vec<_>>().join(", ")
            );
        }

        config
    }
}
