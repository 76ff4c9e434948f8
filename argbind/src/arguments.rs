use std::ffi::{OsStr, OsString};

use crate::{
    config::{Config, program_name},
    errors::ParseError,
    parser::Parser,
};

/// Helper type for loading arguments from the environment.
///
/// This type exists for roughly two purposes: to provide a convenient owned
/// container for args retrieved from [`std::env`], and to derive a [`Config`]
/// whose program name comes from the loaded `argv[0]`.
#[derive(Debug, Clone)]
pub struct LoadedArguments {
    arguments: Vec<OsString>,
}

impl LoadedArguments {
    pub fn from_env() -> Self {
        Self {
            arguments: std::env::args_os().collect(),
        }
    }

    /// Load arguments from anywhere. The first one is the program path.
    pub fn new<I>(arguments: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<OsString>,
    {
        Self {
            arguments: arguments.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn argv0(&self) -> Option<&OsStr> {
        self.arguments.first().map(OsString::as_os_str)
    }

    /// Everything after `argv[0]`
    #[must_use]
    pub fn args(&self) -> &[OsString] {
        self.arguments.get(1..).unwrap_or(&[])
    }

    /// A [`Config`] with the program name taken from `argv[0]`
    #[must_use]
    pub fn config(&self) -> Config {
        Config {
            program: self.argv0().map(program_name),
            version: None,
        }
    }

    pub fn parse_into(&self, parser: &mut Parser<'_>) -> Result<(), ParseError> {
        parser.parse(self.args())
    }
}
