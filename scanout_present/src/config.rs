// Copyright 2026 the Scanout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Process configuration, read from the environment once at startup.

use std::env;
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

/// Environment variable naming the directory for per-frame PNG dumps.
pub const DUMP_PATH_ENV: &str = "SCANOUT_DUMP_PNG_PATH";

/// Environment variable holding the FPS reporting interval in whole
/// seconds; `0` (or unset) disables reporting.
pub const FPS_INTERVAL_ENV: &str = "SCANOUT_FPS_INTERVAL";

/// Environment variable enabling debug verbosity when set non-empty.
pub const DEBUG_ENV: &str = "SCANOUT_DEBUG";

/// Immutable presentation configuration.
///
/// Built exactly once at startup (before any device access) and passed by
/// reference into the compositor; there is no global mutable configuration
/// state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PresentConfig {
    /// Directory receiving `dump_<seq>.png` frame dumps; [`None`] disables.
    pub dump_path: Option<PathBuf>,
    /// FPS reporting interval in seconds; 0 disables.
    pub fps_interval_seconds: u64,
    /// Debug verbosity requested.
    pub debug: bool,
}

impl PresentConfig {
    /// Reads the configuration from the process environment.
    ///
    /// A malformed [`FPS_INTERVAL_ENV`] value is a fatal startup error:
    /// construction fails before any device is touched.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var_os(name))
    }

    /// Like [`PresentConfig::from_env`] with an injected variable lookup.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<OsString>,
    ) -> Result<Self, ConfigError> {
        let dump_path = lookup(DUMP_PATH_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        let fps_interval_seconds = match lookup(FPS_INTERVAL_ENV) {
            None => 0,
            Some(raw) => {
                let text = raw.to_str().ok_or_else(|| ConfigError::FpsInterval {
                    value: raw.to_string_lossy().into_owned(),
                })?;
                text.trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::FpsInterval {
                        value: text.to_owned(),
                    })?
            }
        };

        let debug = lookup(DEBUG_ENV).is_some_and(|value| !value.is_empty());

        Ok(Self {
            dump_path,
            fps_interval_seconds,
            debug,
        })
    }
}

/// A malformed environment value, fatal at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// [`FPS_INTERVAL_ENV`] was not a non-negative integer.
    FpsInterval {
        /// The rejected value.
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FpsInterval { value } => write!(
                f,
                "{FPS_INTERVAL_ENV} must be a non-negative integer number of seconds, got {value:?}"
            ),
        }
    }
}

impl core::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::{ConfigError, DEBUG_ENV, DUMP_PATH_ENV, FPS_INTERVAL_ENV, PresentConfig};
    use std::ffi::OsString;
    use std::path::Path;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
        move |name| {
            pairs
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| OsString::from(value))
        }
    }

    #[test]
    fn empty_environment_disables_everything() {
        let config = PresentConfig::from_lookup(|_| None).expect("valid");
        assert_eq!(config, PresentConfig::default());
    }

    #[test]
    fn values_are_read_once_into_an_immutable_struct() {
        let vars = [
            (DUMP_PATH_ENV, "/tmp/frames"),
            (FPS_INTERVAL_ENV, "5"),
            (DEBUG_ENV, "1"),
        ];
        let config = PresentConfig::from_lookup(lookup_from(&vars)).expect("valid");
        assert_eq!(config.dump_path.as_deref(), Some(Path::new("/tmp/frames")));
        assert_eq!(config.fps_interval_seconds, 5);
        assert!(config.debug);
    }

    #[test]
    fn zero_interval_means_disabled_not_error() {
        let vars = [(FPS_INTERVAL_ENV, "0")];
        let config = PresentConfig::from_lookup(lookup_from(&vars)).expect("valid");
        assert_eq!(config.fps_interval_seconds, 0);
    }

    #[test]
    fn malformed_fps_interval_is_fatal() {
        for bad in ["abc", "-1", "1.5", ""] {
            let vars = [(FPS_INTERVAL_ENV, bad)];
            let error = PresentConfig::from_lookup(lookup_from(&vars))
                .expect_err("malformed interval must fail");
            assert_eq!(
                error,
                ConfigError::FpsInterval {
                    value: bad.to_owned()
                }
            );
        }
    }

    #[test]
    fn empty_dump_path_is_treated_as_unset() {
        let vars = [(DUMP_PATH_ENV, "")];
        let config = PresentConfig::from_lookup(lookup_from(&vars)).expect("valid");
        assert_eq!(config.dump_path, None);
    }
}
