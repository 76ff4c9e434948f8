use std::{
    fmt::Display,
    io::{self, Write as _},
};

use indent_write::io::IndentWriter;
use lazy_format::lazy_format;

use crate::spec::{ArgumentSpec, Repetition, Requirement};

const INDENT: &str = "  ";

/// The column, counted from the start of the line, where help text begins
const HELP_COLUMN: usize = 25;

/// The ` PLACEHOLDER` suffix of an option label, or nothing for flags
#[derive(Clone, Copy)]
struct Placeholder<'a>(Option<&'a str>);

impl<'a> Placeholder<'a> {
    fn of(spec: &'a ArgumentSpec) -> Self {
        Self(spec.takes_value().then(|| spec.placeholder()))
    }
}

impl Display for Placeholder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(placeholder) => write!(f, " {placeholder}"),
            None => Ok(()),
        }
    }
}

fn option_synopsis(spec: &ArgumentSpec) -> impl Display + '_ {
    let name = spec.name();
    let placeholder = Placeholder::of(spec);

    lazy_format!(match (spec.requirement()) {
        Requirement::Optional => " [--{name}{placeholder}]",
        Requirement::Mandatory => " --{name}{placeholder}",
    })
}

fn positional_synopsis(spec: &ArgumentSpec) -> impl Display + '_ {
    let placeholder = spec.placeholder();

    lazy_format!(match ((spec.requirement(), spec.repetition())) {
        (Requirement::Mandatory, Repetition::Single) => " {placeholder}",
        (Requirement::Optional, Repetition::Single) => " [{placeholder}]",
        (Requirement::Mandatory, Repetition::Multiple) => " {placeholder} [{placeholder} ...]",
        (Requirement::Optional, Repetition::Multiple) => " [{placeholder} [{placeholder} ...]]",
    })
}

/// `--name NAME, -n NAME`
fn option_label(spec: &ArgumentSpec) -> impl Display + '_ {
    let name = spec.name();
    let placeholder = Placeholder::of(spec);
    let aliases = lazy_format!(", -{alias}{placeholder}" for alias in spec.aliases());

    lazy_format!("--{name}{placeholder}{aliases}")
}

/// Write the one-line synopsis. Options come first, then positionals, each
/// in declaration order; the builtin options are left out.
pub fn print_usage(
    out: &mut (impl io::Write + ?Sized),
    program: &str,
    specs: &[ArgumentSpec],
) -> io::Result<()> {
    write!(out, "usage: {program}")?;

    specs
        .iter()
        .filter(|spec| !spec.is_positional() && spec.builtin_kind().is_none())
        .try_for_each(|spec| write!(out, "{}", option_synopsis(spec)))?;

    specs
        .iter()
        .filter(|spec| spec.is_positional())
        .try_for_each(|spec| write!(out, "{}", positional_synopsis(spec)))?;

    writeln!(out)
}

/*
Overall structure:

usage: program [--flag] [--option OPTION] INPUT

positional arguments:
  input                  help text

options:
  --flag, -f             help text
  --option OPTION, -o OPTION
                         help text [default: value]
  --help, -h             display this help and exit
*/
pub fn print_help(
    out: &mut (impl io::Write + ?Sized),
    program: &str,
    specs: &[ArgumentSpec],
) -> io::Result<()> {
    print_usage(out, program, specs)?;

    let positionals = specs.iter().filter(|spec| spec.is_positional());
    let options = specs.iter().filter(|spec| !spec.is_positional());

    maybe_section(out, "positional arguments", positionals, |out, spec| {
        describe(out, spec.name(), spec)
    })?;

    maybe_section(out, "options", options, |out, spec| {
        describe(out, option_label(spec), spec)
    })
}

pub fn print_version(
    out: &mut (impl io::Write + ?Sized),
    program: &str,
    version: Option<&str>,
) -> io::Result<()> {
    match version {
        Some(version) => writeln!(out, "{program} {version}"),
        None => writeln!(out, "{program}"),
    }
}

/// Write a section by writing a newline, then the `header`, then an
/// indented `body`.
fn section<O: io::Write + ?Sized, T>(
    out: &mut O,
    header: &str,
    body: impl FnOnce(IndentWriter<&mut O>) -> io::Result<T>,
) -> io::Result<T> {
    writeln!(out, "\n{header}:")?;
    body(IndentWriter::new(INDENT, out))
}

/// Write an optional section, only if the iterator is not empty.
/// Otherwise identical to `section`.
fn maybe_section<O: io::Write + ?Sized, I: IntoIterator>(
    out: &mut O,
    header: &str,
    items: I,
    body: impl Fn(&mut IndentWriter<&mut O>, I::Item) -> io::Result<()>,
) -> io::Result<()> {
    let mut items = items.into_iter();

    match items.next() {
        None => Ok(()),
        Some(first) => section(out, header, |mut out| {
            body(&mut out, first)?;
            items.try_for_each(|item| body(&mut out, item))
        }),
    }
}

/// Describe an argument by printing its label, followed by its help text
/// and default in the help column.
///
/// If the label is short enough, the help goes on the same line; otherwise
/// it goes on the next line, still aligned to the help column. `out` is
/// expected to already be indented by [`INDENT`].
fn describe(
    out: &mut (impl io::Write + ?Sized),
    label: impl Display,
    spec: &ArgumentSpec,
) -> io::Result<()> {
    /// Helper type that counts the bytes that flow through it. We use this
    /// to detect if we need any newlines here in `describe`
    struct IoByteCounter<'a, T: io::Write + ?Sized> {
        inner: &'a mut T,
        count: &'a mut usize,
    }

    impl<T: io::Write + ?Sized> io::Write for IoByteCounter<'_, T> {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let n = self.inner.write(buf)?;
            *self.count += n;
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            self.inner.flush()
        }
    }

    let mut count = 0;

    write!(
        IoByteCounter {
            inner: &mut *out,
            count: &mut count,
        },
        "{label}"
    )?;

    let help = spec.help();

    let description = lazy_format!(match ((help, spec.default_value())) {
        (help, None) => "{help}",
        ("", Some(default)) => "[default: {default}]",
        (help, Some(default)) => "{help} [default: {default}]",
    });

    if help.is_empty() && spec.default_value().is_none() {
        return writeln!(out);
    }

    let column = HELP_COLUMN - INDENT.len();

    if count + INDENT.len() + 2 < HELP_COLUMN {
        write!(out, "{:width$}", "", width = column - count)?;
    } else {
        write!(out, "\n{:column$}", "")?;
    }

    writeln!(out, "{description}")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        spec::{Builtin, Kind},
        value::ValueKind,
    };

    fn option(name: &str, aliases: &[char], value: ValueKind, help: &str) -> ArgumentSpec {
        ArgumentSpec {
            field: name.to_owned(),
            kind: Kind::Option,
            name: name.to_owned(),
            placeholder: name.to_uppercase(),
            aliases: aliases.to_vec(),
            value,
            requirement: Requirement::Optional,
            env: None,
            default: None,
            help: help.to_owned(),
            builtin: None,
        }
    }

    fn render(spec: &ArgumentSpec) -> String {
        let mut out = Vec::new();
        describe(&mut out, option_label(spec), spec).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn labels() {
        use crate::value::ScalarKind;

        let flag = option("verbose", &['v'], ValueKind::FLAG, "");
        assert_eq!(option_label(&flag).to_string(), "--verbose, -v");

        let value = option(
            "optimize",
            &['O', 'o'],
            ValueKind::Scalar(ScalarKind::Integer),
            "",
        );
        assert_eq!(
            option_label(&value).to_string(),
            "--optimize OPTIMIZE, -O OPTIMIZE, -o OPTIMIZE"
        );
    }

    #[test]
    fn short_label_shares_the_line() {
        let spec = option("verbose", &['v'], ValueKind::FLAG, "verbosity level");
        assert_eq!(render(&spec), "--verbose, -v          verbosity level\n");
    }

    #[test]
    fn long_label_wraps() {
        let spec = option("a-fairly-long-flag", &['f'], ValueKind::FLAG, "text");
        assert_eq!(
            render(&spec),
            "--a-fairly-long-flag, -f\n                       text\n"
        );
    }

    #[test]
    fn the_boundary_label_wraps() {
        // 21 characters, plus the indent and two spaces of gutter, reaches
        // the help column exactly
        let spec = option("abcdefghijklmnopqrs", &[], ValueKind::FLAG, "text");
        assert_eq!(
            render(&spec),
            "--abcdefghijklmnopqrs\n                       text\n"
        );

        let spec = option("abcdefghijklmnopqr", &[], ValueKind::FLAG, "text");
        assert_eq!(render(&spec), "--abcdefghijklmnopqr   text\n");
    }

    #[test]
    fn bare_label() {
        let spec = option("quiet", &[], ValueKind::FLAG, "");
        assert_eq!(render(&spec), "--quiet\n");
    }

    #[test]
    fn default_without_help() {
        let mut spec = option("level", &[], ValueKind::FLAG, "");
        spec.default = Some("true".to_owned());
        assert_eq!(render(&spec), "--level                [default: true]\n");
    }

    #[test]
    fn version_line() {
        let mut out = Vec::new();
        print_version(&mut out, "example", Some("1.0.0")).unwrap();
        assert_eq!(out, b"example 1.0.0\n");

        let mut out = Vec::new();
        print_version(&mut out, "example", None).unwrap();
        assert_eq!(out, b"example\n");
    }

    #[test]
    fn builtins_stay_out_of_the_synopsis() {
        let specs = [
            option("verbose", &['v'], ValueKind::FLAG, ""),
            ArgumentSpec::builtin(Builtin::Help),
            ArgumentSpec::builtin(Builtin::Version),
        ];

        let mut out = Vec::new();
        print_usage(&mut out, "example", &specs).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "usage: example [--verbose]\n");
    }
}
