//! The precedence resolver.
//!
//! [`resolve`] runs three ordered phases against the caller's registry:
//! command-line arguments first, then environment variables, then the
//! config file. Each phase fully completes (or fails) before the next
//! begins, and a flag assigned by an earlier phase is never reassigned by
//! a later one. The whole run is synchronous and single-threaded; the only
//! I/O is the blocking read of the config file.
//!
//! Resolution is not transactional. A failure partway through the
//! environment or config phase leaves the registry holding whatever values
//! were assigned before the failing one; callers that need atomicity must
//! snapshot and restore the registry themselves.

use std::fs::File;
use std::io;

use camino::Utf8PathBuf;

use crate::error::ResolveError;
use crate::mapper::NameMapping;
use crate::options::Options;
use crate::provided::ProvidedSet;
use crate::registry::FlagRegistry;

/// Resolve the registry's flags from `args`, the environment, and the
/// config file, in that priority order.
///
/// Environment variables are only consulted when `options` carries an env
/// prefix or no-prefix mode; the config file is only read when a path
/// resolves (explicit option, or the current value of the designated
/// config-file flag) and a reader is configured.
///
/// Returns at the first error; see [`ResolveError`] for the failure points.
pub fn resolve(
    registry: &mut dyn FlagRegistry,
    args: &[&str],
    options: &Options,
) -> Result<(), ResolveError> {
    let mapping = NameMapping::from_registry(&*registry, &options.env_prefix, options.env_no_prefix);

    // First priority: commandline flags (explicit user preference).
    registry
        .parse_args(args)
        .map_err(|source| ResolveError::CommandlineParse { source })?;

    let mut provided = ProvidedSet::new();
    provided.record(&*registry);

    // Second priority: environment variables (session).
    let parse_env = !options.env_prefix.is_empty() || options.env_no_prefix;
    if parse_env {
        let mut names = Vec::new();
        registry.visit_all(&mut |name| names.push(name.to_string()));

        for name in &names {
            if provided.contains(name) {
                continue;
            }
            // The mapping was built from the same enumeration; a miss here
            // means the mapping construction is broken, not that the input
            // is bad.
            let Some(env_key) = mapping.env_key_for(name) else {
                panic!("flag {name:?} missing from flag/env mapping");
            };
            let Some(value) = options.env_source().get(env_key) else {
                continue;
            };
            if value.is_empty() {
                continue;
            }
            for token in maybe_split(&value, options.env_split.as_deref()) {
                registry.set(name, token).map_err(|source| ResolveError::EnvSet {
                    flag: name.clone(),
                    env_key: env_key.to_string(),
                    source,
                })?;
            }
        }
        provided.record(&*registry);
    }

    // Third priority: config file (host). An empty path, from either
    // source, means no config file; an empty explicit path still lets the
    // designated flag supply one.
    let mut config_file = options
        .config_file
        .clone()
        .filter(|path| !path.as_str().is_empty());
    if config_file.is_none() {
        if let Some(flag) = &options.config_file_flag {
            config_file = registry
                .value(flag)
                .filter(|path| !path.is_empty())
                .map(Utf8PathBuf::from);
        }
    }

    if let (Some(path), Some(reader)) = (config_file, options.config_reader.as_deref()) {
        match File::open(path.as_std_path()) {
            Ok(mut file) => {
                let mut sink = |name: &str, value: &str| -> Result<(), ResolveError> {
                    apply_config_entry(registry, &mapping, &provided, options, name, value)
                };
                reader.read(&mut file, &mut sink)?;
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound
                && options.allow_missing_config_file => {}
            Err(err) => {
                return Err(ResolveError::ConfigFileOpen { path, source: err });
            }
        }
        provided.record(&*registry);
    }

    Ok(())
}

/// Outcome of resolving a config file key against the registry.
enum FileKeyMatch {
    /// No flag matches under either lookup strategy.
    NotFound,
    /// Exactly one flag matches, possibly through both strategies.
    Unique(String),
    /// Two distinct flags match; never guessed between.
    Ambiguous { first: String, second: String },
}

/// Resolve a config file key through the two independent strategies:
/// direct lookup by flag name, and lookup by env key (so config keys may
/// be written in environment style). Candidates that denote the same flag
/// reconcile to a unique match.
fn match_file_key(
    registry: &dyn FlagRegistry,
    mapping: &NameMapping,
    key: &str,
) -> FileKeyMatch {
    let mut candidates: Vec<&str> = Vec::new();
    if registry.value(key).is_some() {
        candidates.push(key);
    }
    for flag in mapping.env_style_candidates(key) {
        if !candidates.contains(&flag.as_str()) {
            candidates.push(flag);
        }
    }

    match candidates.as_slice() {
        [] => FileKeyMatch::NotFound,
        [flag] => FileKeyMatch::Unique(flag.to_string()),
        [first, second, ..] => FileKeyMatch::Ambiguous {
            first: first.to_string(),
            second: second.to_string(),
        },
    }
}

fn apply_config_entry(
    registry: &mut dyn FlagRegistry,
    mapping: &NameMapping,
    provided: &ProvidedSet,
    options: &Options,
    name: &str,
    value: &str,
) -> Result<(), ResolveError> {
    if provided.contains(name) {
        return Ok(());
    }

    let flag = match match_file_key(&*registry, mapping, name) {
        FileKeyMatch::NotFound if options.ignore_undefined_config_flags => return Ok(()),
        FileKeyMatch::NotFound => {
            return Err(ResolveError::ConfigFlagUndefined {
                key: name.to_string(),
            });
        }
        FileKeyMatch::Ambiguous { first, second } => {
            return Err(ResolveError::ConfigFlagAmbiguous {
                key: name.to_string(),
                first,
                second,
            });
        }
        FileKeyMatch::Unique(flag) => flag,
    };

    // The key may differ textually from the flag's own name while still
    // denoting a flag an earlier phase already set.
    if provided.contains(&flag) {
        return Ok(());
    }

    registry.set(&flag, value).map_err(|source| ResolveError::ConfigSet {
        flag: flag.clone(),
        key: name.to_string(),
        source,
    })
}

fn maybe_split<'a>(value: &'a str, delimiter: Option<&str>) -> Vec<&'a str> {
    match delimiter {
        Some(delim) if !delim.is_empty() => value.split(delim).collect(),
        _ => vec![value],
    }
}
