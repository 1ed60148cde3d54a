//! Error types for layered flag resolution.
//!
//! Resolution is fail-fast: the first error aborts the run and is returned
//! to the caller with enough context (flag name, source key, underlying
//! cause) to diagnose without re-running. Nothing is logged internally and
//! nothing is retried. Note that resolution is not transactional, so flags
//! assigned before the failing one keep their new values.

use core::fmt;

use camino::Utf8PathBuf;

use crate::registry::SetError;

/// An error produced while resolving flags from the three sources.
///
/// Each variant corresponds to one failure point in the resolution state
/// machine; no later phase runs once one of these is returned.
#[derive(Debug)]
#[non_exhaustive]
pub enum ResolveError {
    /// The registry rejected the raw command-line arguments (phase A).
    CommandlineParse {
        /// The registry's own parse error.
        source: SetError,
    },

    /// A flag's mutator rejected a value discovered in the environment
    /// (phase B). Earlier environment assignments are not rolled back.
    EnvSet {
        /// The flag being assigned.
        flag: String,
        /// The environment variable the value came from.
        env_key: String,
        /// The rejection reported by the flag's mutator.
        source: SetError,
    },

    /// The resolved config file path could not be opened (phase C).
    ///
    /// A missing file only produces this error when missing-file tolerance
    /// is disabled.
    ConfigFileOpen {
        /// The path that failed to open.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The config reader encountered malformed content (phase C). Entries
    /// emitted before the malformed one remain applied.
    ConfigFileParse {
        /// 1-based line number of the offending input.
        line: usize,
        /// Description of the malformed content.
        message: String,
    },

    /// A config entry named no registered flag, under either the flag's own
    /// name or its environment-style spelling, and undefined-flag tolerance
    /// is disabled (phase C).
    ConfigFlagUndefined {
        /// The config key as written in the file.
        key: String,
    },

    /// A config entry resolved to two distinct flags through the two lookup
    /// strategies (phase C). Always fatal; the resolver never guesses.
    ConfigFlagAmbiguous {
        /// The config key as written in the file.
        key: String,
        /// The first matching flag name.
        first: String,
        /// The second, different matching flag name.
        second: String,
    },

    /// A flag's mutator rejected a config file value (phase C).
    ConfigSet {
        /// The flag being assigned.
        flag: String,
        /// The config key as written in the file.
        key: String,
        /// The rejection reported by the flag's mutator.
        source: SetError,
    },
}

impl ResolveError {
    /// Shorthand for a [`ResolveError::ConfigFileParse`] at the given line.
    pub fn config_parse(line: usize, message: impl Into<String>) -> Self {
        ResolveError::ConfigFileParse {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::CommandlineParse { source } => {
                write!(f, "error parsing commandline args: {source}")
            }
            ResolveError::EnvSet {
                flag,
                env_key,
                source,
            } => {
                write!(
                    f,
                    "error setting flag {flag:?} from env var {env_key:?}: {source}"
                )
            }
            ResolveError::ConfigFileOpen { path, source } => {
                write!(f, "error opening config file {path}: {source}")
            }
            ResolveError::ConfigFileParse { line, message } => {
                write!(f, "error parsing config file: line {line}: {message}")
            }
            ResolveError::ConfigFlagUndefined { key } => {
                write!(f, "config file flag {key:?} not defined in flag set")
            }
            ResolveError::ConfigFlagAmbiguous { key, first, second } => {
                write!(
                    f,
                    "config file flag {key:?} is ambiguous: matches {first:?} and {second:?}"
                )
            }
            ResolveError::ConfigSet { flag, key, source } => {
                write!(
                    f,
                    "error setting flag {flag:?} from config file key {key:?}: {source}"
                )
            }
        }
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResolveError::CommandlineParse { source }
            | ResolveError::EnvSet { source, .. }
            | ResolveError::ConfigSet { source, .. } => Some(&**source),
            ResolveError::ConfigFileOpen { source, .. } => Some(source),
            ResolveError::ConfigFileParse { .. }
            | ResolveError::ConfigFlagUndefined { .. }
            | ResolveError::ConfigFlagAmbiguous { .. } => None,
        }
    }
}
