//! Mapping between flag names and environment variable keys.
//!
//! Every flag name derives exactly one environment key: uppercase the name,
//! replace the separator characters `-`, `.` and `/` with `_`, and prepend
//! `PREFIX_` unless no-prefix mode is on. The derivation is a pure function,
//! so the same inputs always yield the same key.
//!
//! [`NameMapping`] snapshots both directions of the mapping for one
//! resolution run. Nothing stops two flags from deriving the same key
//! (`a-b` and `a.b` both become `A_B`); the mapping records every flag per
//! key and lets the config-file phase report such collisions as ambiguity
//! when a key is actually looked up.

use indexmap::IndexMap;

use crate::registry::FlagRegistry;

/// Derive the environment variable key for a flag name.
///
/// ```
/// use strata::env_key;
///
/// assert_eq!(env_key("log-level", "APP", false), "APP_LOG_LEVEL");
/// assert_eq!(env_key("log-level", "APP", true), "LOG_LEVEL");
/// assert_eq!(env_key("db.pool/size", "", false), "DB_POOL_SIZE");
/// ```
pub fn env_key(name: &str, prefix: &str, no_prefix: bool) -> String {
    let key = name.to_uppercase().replace(['-', '.', '/'], "_");
    if no_prefix || prefix.is_empty() {
        key
    } else {
        format!("{}_{}", prefix.to_uppercase(), key)
    }
}

/// The bidirectional flag/env-key lookup table for one resolution run.
///
/// Built once per run from the registry's full enumeration and discarded at
/// the end; it holds no state across runs.
#[derive(Debug)]
pub struct NameMapping {
    flag_to_env: IndexMap<String, String>,
    env_to_flags: IndexMap<String, Vec<String>>,
    prefix: String,
    no_prefix: bool,
}

impl NameMapping {
    /// Build the mapping from every flag the registry enumerates.
    ///
    /// Construction cannot fail; colliding env keys are recorded and only
    /// surface later, at lookup time.
    pub fn from_registry(registry: &dyn FlagRegistry, prefix: &str, no_prefix: bool) -> Self {
        let mut flag_to_env = IndexMap::new();
        let mut env_to_flags: IndexMap<String, Vec<String>> = IndexMap::new();
        registry.visit_all(&mut |name| {
            let key = env_key(name, prefix, no_prefix);
            env_to_flags
                .entry(key.clone())
                .or_default()
                .push(name.to_string());
            flag_to_env.insert(name.to_string(), key);
        });
        Self {
            flag_to_env,
            env_to_flags,
            prefix: prefix.to_string(),
            no_prefix,
        }
    }

    /// The derived env key for a registered flag.
    pub fn env_key_for(&self, flag: &str) -> Option<&str> {
        self.flag_to_env.get(flag).map(String::as_str)
    }

    /// The flags whose derived env key is exactly `key`.
    pub fn flags_for_env(&self, key: &str) -> &[String] {
        self.env_to_flags.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The flags a config-file key denotes when read in environment style.
    ///
    /// Tries the key verbatim as an env key first (`APP_LOG_LEVEL` written
    /// directly in a config file), then falls back to the key's own derived
    /// env key, so `log_level` still finds the flag `log-level`.
    pub fn env_style_candidates(&self, key: &str) -> &[String] {
        let direct = self.flags_for_env(key);
        if !direct.is_empty() {
            return direct;
        }
        let derived = env_key(key, &self.prefix, self.no_prefix);
        self.env_to_flags
            .get(&derived)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
