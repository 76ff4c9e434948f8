/*!
Parser configuration: the program name and version shown in usage text.
*/

use std::{ffi::OsStr, path::Path, sync::OnceLock};

static VERSION: OnceLock<String> = OnceLock::new();

/**
Set the process-wide version string. Every [`Parser`][crate::Parser] built
afterwards gets a `--version` option, unless its [`Config`] carries its own
version.

This can only be done once; later calls return the rejected version as an
error.
*/
pub fn set_version(version: impl Into<String>) -> Result<(), String> {
    VERSION.set(version.into())
}

/// The process-wide version string, if one was set.
#[inline]
#[must_use]
pub fn version() -> Option<&'static str> {
    VERSION.get().map(String::as_str)
}

/// The program name as it appears at the start of usage text: the final
/// component of `argv0`.
#[must_use]
pub fn program_name(argv0: &OsStr) -> String {
    Path::new(argv0)
        .file_name()
        .unwrap_or(argv0)
        .to_string_lossy()
        .into_owned()
}

/// Settings that apply to a whole [`Parser`][crate::Parser], rather than to
/// one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// The program name used in usage text. When absent, it's derived from
    /// the process's `argv[0]`.
    pub program: Option<String>,

    /// The version. Takes precedence over [`set_version`].
    pub version: Option<String>,
}

impl Config {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_program(self, program: impl Into<String>) -> Self {
        Self {
            program: Some(program.into()),
            ..self
        }
    }

    #[must_use]
    pub fn with_version(self, version: impl Into<String>) -> Self {
        Self {
            version: Some(version.into()),
            ..self
        }
    }

    pub(crate) fn resolve_program(&self) -> String {
        match self.program {
            Some(ref program) => program.clone(),
            None => std::env::args_os()
                .next()
                .map(|argv0| program_name(&argv0))
                .unwrap_or_default(),
        }
    }

    pub(crate) fn resolve_version(&self) -> Option<String> {
        self.version
            .clone()
            .or_else(|| version().map(str::to_owned))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_name_is_the_base_name() {
        assert_eq!(program_name(OsStr::new("/usr/local/bin/example")), "example");
        assert_eq!(program_name(OsStr::new("example")), "example");
        assert_eq!(program_name(OsStr::new("./bin/tool")), "tool");
    }

    #[test]
    fn explicit_program_wins() {
        let config = Config::new().with_program("myprogram");
        assert_eq!(config.resolve_program(), "myprogram");
    }

    #[test]
    fn program_falls_back_to_argv0() {
        let argv0 = std::env::args_os().next().unwrap();
        let expected = program_name(&argv0);

        assert!(!expected.is_empty());
        assert!(!expected.contains('/'));
        assert_eq!(Config::new().resolve_program(), expected);
    }

    #[test]
    fn explicit_version_wins() {
        let config = Config::new().with_version("2.0.0");
        assert_eq!(config.resolve_version().as_deref(), Some("2.0.0"));
    }
}
