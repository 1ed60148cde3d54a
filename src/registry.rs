//! The flag registry contract, plus an in-memory reference registry.
//!
//! The registry owns the flags: their names, their typed values, and the
//! validation/conversion applied when a raw string is assigned. Resolution
//! never creates or destroys flags, it only assigns values through
//! [`FlagRegistry::set`] and observes them through the visit methods.
//!
//! [`MemFlags`] is a minimal conforming registry, good enough for small
//! tools and for exercising the resolver in tests and examples.

use indexmap::IndexMap;

/// Error produced by a registry while parsing arguments or assigning a
/// flag value.
pub type SetError = Box<dyn std::error::Error + Send + Sync>;

/// An enumerable set of named, string-convertible flags.
///
/// All visit methods must enumerate in a stable deterministic order (for
/// [`MemFlags`], lexical by name); the resolver relies on that order for
/// reproducible runs.
pub trait FlagRegistry {
    /// Parse raw command-line arguments using the registry's native syntax,
    /// assigning values and marking the named flags explicitly set.
    fn parse_args(&mut self, args: &[&str]) -> Result<(), SetError>;

    /// Current rendered value of the named flag, or `None` when no such
    /// flag is registered.
    fn value(&self, name: &str) -> Option<String>;

    /// Assign a raw value to the named flag, running its
    /// validator/converter, and mark the flag explicitly set on success.
    fn set(&mut self, name: &str, value: &str) -> Result<(), SetError>;

    /// Visit only the flags explicitly set so far, in stable order.
    fn visit(&self, visitor: &mut dyn FnMut(&str));

    /// Visit every registered flag, in stable order.
    fn visit_all(&self, visitor: &mut dyn FnMut(&str));
}

// ============================================================================
// MemFlags
// ============================================================================

/// A small in-memory flag registry.
///
/// Flags are declared up front with a name, a kind, and a default value.
/// Assignments run the kind's converter: booleans accept `true`/`false`/
/// `1`/`0`, unsigned integers must parse, text accepts anything, and list
/// flags accumulate every assigned value.
///
/// ```
/// use strata::{FlagRegistry, MemFlags};
///
/// let mut flags = MemFlags::new()
///     .text("log-level", "info")
///     .uint("port", 8080);
///
/// flags.set("port", "9090").unwrap();
/// assert_eq!(flags.value("port"), Some("9090".to_string()));
/// assert!(flags.set("port", "not-a-port").is_err());
/// ```
#[derive(Debug, Default)]
pub struct MemFlags {
    flags: IndexMap<String, MemFlag>,
}

#[derive(Debug)]
struct MemFlag {
    value: FlagValue,
    provided: bool,
}

#[derive(Debug, Clone)]
enum FlagValue {
    Text(String),
    Bool(bool),
    Uint(u64),
    List(Vec<String>),
}

impl FlagValue {
    fn assign(&mut self, raw: &str) -> Result<(), SetError> {
        match self {
            FlagValue::Text(v) => {
                *v = raw.to_string();
            }
            FlagValue::Bool(v) => {
                *v = match raw {
                    "true" | "1" => true,
                    "false" | "0" => false,
                    _ => return Err(format!("invalid boolean value {raw:?}").into()),
                };
            }
            FlagValue::Uint(v) => {
                *v = raw
                    .parse()
                    .map_err(|err| format!("invalid unsigned integer {raw:?}: {err}"))?;
            }
            FlagValue::List(v) => {
                v.push(raw.to_string());
            }
        }
        Ok(())
    }

    fn render(&self) -> String {
        match self {
            FlagValue::Text(v) => v.clone(),
            FlagValue::Bool(v) => v.to_string(),
            FlagValue::Uint(v) => v.to_string(),
            FlagValue::List(v) => v.join(","),
        }
    }
}

impl MemFlags {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a text flag with a default value.
    pub fn text(self, name: impl Into<String>, default: impl Into<String>) -> Self {
        self.declare(name, FlagValue::Text(default.into()))
    }

    /// Declare a boolean flag with a default value.
    pub fn boolean(self, name: impl Into<String>, default: bool) -> Self {
        self.declare(name, FlagValue::Bool(default))
    }

    /// Declare an unsigned integer flag with a default value.
    pub fn uint(self, name: impl Into<String>, default: u64) -> Self {
        self.declare(name, FlagValue::Uint(default))
    }

    /// Declare a list flag. Every assignment appends one element, so
    /// repeated `--name` arguments and delimiter-split environment values
    /// accumulate.
    pub fn list(self, name: impl Into<String>) -> Self {
        self.declare(name, FlagValue::List(Vec::new()))
    }

    fn declare(mut self, name: impl Into<String>, value: FlagValue) -> Self {
        self.flags.insert(
            name.into(),
            MemFlag {
                value,
                provided: false,
            },
        );
        self
    }

    /// Current rendered value of the named flag, or `None` when no such
    /// flag is registered. List flags render joined by `,`.
    pub fn value(&self, name: &str) -> Option<String> {
        self.flags.get(name).map(|f| f.value.render())
    }

    /// The accumulated elements of a list flag, or `None` for other kinds.
    pub fn values(&self, name: &str) -> Option<&[String]> {
        match self.flags.get(name) {
            Some(MemFlag {
                value: FlagValue::List(v),
                ..
            }) => Some(v),
            _ => None,
        }
    }

    /// Whether the named flag has been explicitly set.
    pub fn is_provided(&self, name: &str) -> bool {
        self.flags.get(name).is_some_and(|f| f.provided)
    }

    fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.flags.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl FlagRegistry for MemFlags {
    /// Parse arguments of the form `--name value`, `--name=value`, or
    /// `-name value`. Boolean flags may omit the value, which assigns
    /// `true`. A bare `--` or the first non-flag argument ends parsing;
    /// anything after it is ignored. Unknown flags and flags missing a
    /// required value are parse errors.
    fn parse_args(&mut self, args: &[&str]) -> Result<(), SetError> {
        let mut i = 0;
        while i < args.len() {
            let arg = args[i];
            i += 1;

            if arg == "--" {
                break;
            }
            let Some(stripped) = arg.strip_prefix("--").or_else(|| arg.strip_prefix('-')) else {
                break;
            };

            let (name, inline) = match stripped.split_once('=') {
                Some((n, v)) => (n, Some(v)),
                None => (stripped, None),
            };
            if name.is_empty() {
                return Err(format!("bad flag syntax: {arg:?}").into());
            }
            let Some(flag) = self.flags.get_mut(name) else {
                return Err(format!("flag provided but not defined: -{name}").into());
            };

            let value = match inline {
                Some(v) => v,
                None if matches!(flag.value, FlagValue::Bool(_)) => "true",
                None => {
                    let Some(next) = args.get(i).copied() else {
                        return Err(format!("flag needs an argument: -{name}").into());
                    };
                    i += 1;
                    next
                }
            };

            flag.value.assign(value)?;
            flag.provided = true;
        }
        Ok(())
    }

    fn value(&self, name: &str) -> Option<String> {
        MemFlags::value(self, name)
    }

    fn set(&mut self, name: &str, value: &str) -> Result<(), SetError> {
        let Some(flag) = self.flags.get_mut(name) else {
            return Err(format!("no such flag {name:?}").into());
        };
        flag.value.assign(value)?;
        flag.provided = true;
        Ok(())
    }

    fn visit(&self, visitor: &mut dyn FnMut(&str)) {
        for name in self.sorted_names() {
            if self.flags[name].provided {
                visitor(name);
            }
        }
    }

    fn visit_all(&self, visitor: &mut dyn FnMut(&str)) {
        for name in self.sorted_names() {
            visitor(name);
        }
    }
}
