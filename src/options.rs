//! Resolution options.
//!
//! Every knob of a resolution run lives in [`Options`], assembled by the
//! chained [`OptionsBuilder`] before [`resolve`](crate::resolve) is called
//! and immutable from then on; the resolver only ever reads it.

use camino::Utf8PathBuf;

use crate::env::{EnvSource, StdEnv};
use crate::reader::ConfigReader;

/// The assembled set of options for one resolution run.
///
/// All options default to off: with a fresh `Options` the resolver parses
/// the command line and nothing else.
pub struct Options {
    pub(crate) config_file: Option<Utf8PathBuf>,
    pub(crate) config_file_flag: Option<String>,
    pub(crate) config_reader: Option<Box<dyn ConfigReader>>,
    pub(crate) allow_missing_config_file: bool,
    pub(crate) env_prefix: String,
    pub(crate) env_no_prefix: bool,
    pub(crate) env_split: Option<String>,
    pub(crate) ignore_undefined_config_flags: bool,
    env_source: Option<Box<dyn EnvSource>>,
}

impl Options {
    /// Start building a set of options.
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::default()
    }

    /// The env source to read from, or the process environment if none was
    /// overridden.
    pub(crate) fn env_source(&self) -> &dyn EnvSource {
        self.env_source.as_deref().unwrap_or(&StdEnv)
    }
}

impl Default for Options {
    fn default() -> Self {
        Options::builder().build()
    }
}

/// Builder for [`Options`].
#[derive(Default)]
pub struct OptionsBuilder {
    config_file: Option<Utf8PathBuf>,
    config_file_flag: Option<String>,
    config_reader: Option<Box<dyn ConfigReader>>,
    allow_missing_config_file: bool,
    env_prefix: String,
    env_no_prefix: bool,
    env_split: Option<String>,
    ignore_undefined_config_flags: bool,
    env_source: Option<Box<dyn EnvSource>>,
}

impl OptionsBuilder {
    /// Read the given path as the config file, overriding
    /// [`config_file_flag`](Self::config_file_flag). Requires a
    /// [`config_reader`](Self::config_reader).
    ///
    /// Config files should generally stay user-specifiable, so prefer
    /// `config_file_flag`; this override exists for tools that fix the
    /// path themselves.
    pub fn config_file(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Treat the named flag's current value as the config file path when no
    /// explicit path was given. Requires a
    /// [`config_reader`](Self::config_reader).
    ///
    /// To get a default config file, give the flag that default value, and
    /// consider [`allow_missing_config_file`](Self::allow_missing_config_file).
    pub fn config_file_flag(mut self, name: impl Into<String>) -> Self {
        self.config_file_flag = Some(name.into());
        self
    }

    /// The reader that interprets the config file. Without one, the config
    /// file phase is skipped entirely.
    pub fn config_reader(mut self, reader: impl ConfigReader + 'static) -> Self {
        self.config_reader = Some(Box::new(reader));
        self
    }

    /// Permit a config file path that names a nonexistent file. By default
    /// a missing config file is an error.
    pub fn allow_missing_config_file(mut self) -> Self {
        self.allow_missing_config_file = true;
        self
    }

    /// Set flags from environment variables named `PREFIX_` followed by the
    /// capitalized flag name, with `-`, `.` and `/` replaced by `_`. By
    /// default flags are not set from the environment at all.
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Set flags from environment variables derived without any prefix.
    /// Wins over [`env_prefix`](Self::env_prefix) when both are given.
    pub fn env_no_prefix(mut self) -> Self {
        self.env_no_prefix = true;
        self
    }

    /// Split environment values on the given delimiter and assign each
    /// token to the flag separately, in order. Useful for flags that
    /// accumulate repeated values.
    pub fn env_split(mut self, delimiter: impl Into<String>) -> Self {
        self.env_split = Some(delimiter.into());
        self
    }

    /// Silently skip config file entries that match no registered flag. By
    /// default such entries are errors. Does not apply to command-line
    /// arguments, which are always checked by the registry itself.
    pub fn ignore_undefined_config_flags(mut self) -> Self {
        self.ignore_undefined_config_flags = true;
        self
    }

    /// Read environment variables from a custom source instead of the
    /// process environment (for testing).
    pub fn env_source(mut self, source: impl EnvSource + 'static) -> Self {
        self.env_source = Some(Box::new(source));
        self
    }

    /// Finalize the options.
    pub fn build(self) -> Options {
        Options {
            config_file: self.config_file,
            config_file_flag: self.config_file_flag,
            config_reader: self.config_reader,
            allow_missing_config_file: self.allow_missing_config_file,
            env_prefix: self.env_prefix,
            env_no_prefix: self.env_no_prefix,
            env_split: self.env_split,
            ignore_undefined_config_flags: self.ignore_undefined_config_flags,
            env_source: self.env_source,
        }
    }
}
