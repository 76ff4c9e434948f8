/*!
Descriptions of the arguments a [`Parser`][crate::Parser] recognizes. One
[`ArgumentSpec`] exists per bound field, plus the built-in `--help` and
`--version` options.
*/

use crate::value::ValueKind;

/// Whether an argument is given by position or by a `--name` flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Positional,
    Option,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Optional,
    Mandatory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repetition {
    Single,
    Multiple,
}

/// Options that the binder adds on its own, after every field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// `--help`, `-h`
    Help,

    /// `--version`, only present if a version string is configured
    Version,
}

/// A fully resolved description of a single argument.
#[derive(Debug, Clone)]
pub struct ArgumentSpec {
    pub(crate) field: String,
    pub(crate) kind: Kind,
    pub(crate) name: String,
    pub(crate) placeholder: String,
    pub(crate) aliases: Vec<char>,
    pub(crate) value: ValueKind,
    pub(crate) requirement: Requirement,
    pub(crate) env: Option<String>,
    pub(crate) default: Option<String>,
    pub(crate) help: String,
    pub(crate) builtin: Option<Builtin>,
}

impl ArgumentSpec {
    pub(crate) fn builtin(builtin: Builtin) -> Self {
        let (name, aliases, help) = match builtin {
            Builtin::Help => ("help", vec!['h'], "display this help and exit"),
            Builtin::Version => ("version", vec![], "output version information and exit"),
        };

        Self {
            field: name.to_owned(),
            kind: Kind::Option,
            name: name.to_owned(),
            placeholder: name.to_uppercase(),
            aliases,
            value: ValueKind::FLAG,
            requirement: Requirement::Optional,
            env: None,
            default: None,
            help: help.to_owned(),
            builtin: Some(builtin),
        }
    }

    /// The name of the struct field this argument writes to.
    #[inline]
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub fn is_positional(&self) -> bool {
        self.kind == Kind::Positional
    }

    /// The long name, used as `--name` for options and as the row label for
    /// positionals.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The upper-case name, used in usage text (`--name NAME`, `INPUT`)
    #[inline]
    #[must_use]
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    #[inline]
    #[must_use]
    pub fn aliases(&self) -> &[char] {
        &self.aliases
    }

    #[inline]
    #[must_use]
    pub fn value(&self) -> ValueKind {
        self.value
    }

    /// Options that don't take a value are boolean flags
    #[inline]
    #[must_use]
    pub fn takes_value(&self) -> bool {
        !self.value.is_flag()
    }

    #[inline]
    #[must_use]
    pub fn requirement(&self) -> Requirement {
        self.requirement
    }

    #[inline]
    #[must_use]
    pub fn repetition(&self) -> Repetition {
        match self.value {
            ValueKind::Sequence(_) => Repetition::Multiple,
            _ => Repetition::Single,
        }
    }

    /// A sequence-typed positional, which soaks up all trailing positionals
    #[inline]
    #[must_use]
    pub fn is_variadic(&self) -> bool {
        self.is_positional() && self.repetition() == Repetition::Multiple
    }

    #[inline]
    #[must_use]
    pub fn env(&self) -> Option<&str> {
        self.env.as_deref()
    }

    /// The field's value at bind time, rendered for display. `None` if the
    /// field held its zero value.
    #[inline]
    #[must_use]
    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn help(&self) -> &str {
        &self.help
    }

    #[inline]
    #[must_use]
    pub fn builtin_kind(&self) -> Option<Builtin> {
        self.builtin
    }

    /// How this argument is referred to in error messages: `--name` for
    /// options, `NAME` for positionals.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.kind {
            Kind::Positional => self.placeholder.clone(),
            Kind::Option => format!("--{}", self.name),
        }
    }
}
