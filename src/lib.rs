#![warn(missing_docs)]
#![deny(unsafe_code)]
#![doc = include_str!("../README.md")]

mod driver;
mod env;
mod error;
mod mapper;
mod options;
mod provided;
mod reader;
mod registry;

// ==========================================
// PUBLIC INTERFACE
// ==========================================

pub use driver::resolve;
pub use env::{EnvSource, MockEnv, StdEnv};
pub use error::ResolveError;
pub use mapper::{env_key, NameMapping};
pub use options::{Options, OptionsBuilder};
pub use provided::ProvidedSet;
pub use reader::{ConfigReader, PlainReader, Sink};
pub use registry::{FlagRegistry, MemFlags, SetError};
