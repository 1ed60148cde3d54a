//! Pluggable config file readers.
//!
//! A [`ConfigReader`] decodes a byte stream into an ordered sequence of
//! `(name, value)` pairs, invoking the sink callback once per pair in
//! source order. The reader must stop at the first error returned by
//! either itself or the sink and propagate it.
//!
//! [`PlainReader`] is the bundled line-oriented reader; any other format
//! can be plugged in by implementing the trait.

use std::io::{BufRead, BufReader, Read};

use crate::error::ResolveError;

/// Callback invoked once per discovered config entry, in source order.
pub type Sink<'a> = dyn FnMut(&str, &str) -> Result<(), ResolveError> + 'a;

/// Decodes config file bytes into ordered `(name, value)` entries.
pub trait ConfigReader {
    /// Read `input` to the end, feeding each entry to `sink`.
    ///
    /// Malformed content is reported as [`ResolveError::ConfigFileParse`];
    /// errors returned by the sink are propagated unchanged. Either way the
    /// first error aborts the remaining input.
    fn read(&self, input: &mut dyn Read, sink: &mut Sink<'_>) -> Result<(), ResolveError>;
}

/// Line-oriented `name = value` reader.
///
/// - surrounding whitespace is trimmed; empty lines and lines starting
///   with `#` are skipped
/// - each remaining line must contain `=`; the first occurrence splits
///   name from value, and both sides are trimmed
/// - an empty name or an empty value is a format error
/// - a space followed by `#` starts an inline comment; the value is
///   truncated there
/// - a value that is a valid double-quoted literal is unquoted, with its
///   escapes interpreted; anything else is taken verbatim
///
/// ```
/// # use strata::{ConfigReader, PlainReader};
/// let input = "\
/// ## listener
/// port = 8080
/// greeting = \"hello world\" # quoted values may hold spaces
/// ";
/// let mut entries = Vec::new();
/// let mut sink = |name: &str, value: &str| -> Result<(), strata::ResolveError> {
///     entries.push((name.to_string(), value.to_string()));
///     Ok(())
/// };
/// PlainReader.read(&mut input.as_bytes(), &mut sink).unwrap();
/// assert_eq!(entries[0], ("port".to_string(), "8080".to_string()));
/// assert_eq!(entries[1], ("greeting".to_string(), "hello world".to_string()));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainReader;

impl ConfigReader for PlainReader {
    fn read(&self, input: &mut dyn Read, sink: &mut Sink<'_>) -> Result<(), ResolveError> {
        let reader = BufReader::new(input);
        for (idx, line) in reader.lines().enumerate() {
            let lineno = idx + 1;
            let line = line.map_err(|err| ResolveError::config_parse(lineno, err.to_string()))?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((name, value)) = line.split_once('=') else {
                return Err(ResolveError::config_parse(
                    lineno,
                    format!("invalid line: {line:?}"),
                ));
            };
            let name = name.trim();
            let mut value = value.trim();
            if name.is_empty() || value.is_empty() {
                return Err(ResolveError::config_parse(
                    lineno,
                    format!("invalid line: {line:?}"),
                ));
            }

            if let Some(i) = value.find(" #") {
                value = value[..i].trim();
            }

            match unquote(value) {
                Some(unquoted) => sink(name, &unquoted)?,
                None => sink(name, value)?,
            }
        }
        Ok(())
    }
}

/// Interpret `input` as a double-quoted string literal.
///
/// Returns `None` when the input is not a syntactically valid literal, in
/// which case the caller uses it verbatim.
fn unquote(input: &str) -> Option<String> {
    let inner = input.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next()? {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                'r' => out.push('\r'),
                '\\' => out.push('\\'),
                '"' => out.push('"'),
                '\'' => out.push('\''),
                '0' => out.push('\0'),
                _ => return None,
            },
            // An unescaped quote means the literal ended early.
            '"' => return None,
            c => out.push(c),
        }
    }
    Some(out)
}
