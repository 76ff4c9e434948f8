/*!
Error types. [`BindError`] covers problems with the shape of the destination
record, found once when a [`Parser`][crate::Parser] is built; [`ParseError`]
covers problems with an actual command line.
*/

use thiserror::Error;

use crate::{tag::TagErrorKind, value::ValueKind};

/// The destination record can't be turned into a parser. These are
/// programming errors rather than user errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum BindError {
    #[error("field {field}: malformed tag: {kind} (in {fragment:?})")]
    MalformedTag {
        field: String,
        fragment: String,
        kind: TagErrorKind,
    },

    /// The long name, whether derived from the field or given with
    /// `--NAME`, couldn't be spelled as `--NAME` on a command line.
    #[error("field {field}: {name:?} isn't a valid argument name")]
    InvalidName { field: String, name: String },

    #[error("field {field}: {type_name} fields can't be bound to arguments")]
    UnsupportedFieldType {
        field: String,
        type_name: &'static str,
    },

    /// Two arguments share a long name or a short alias. `other` is the
    /// field that claimed `name` first.
    #[error("field {field}: {name} is already used by {other}")]
    DuplicateName {
        field: String,
        name: String,
        other: String,
    },

    /// A variadic positional must be the last positional, and there can only
    /// be one.
    #[error("field {field}: positional arguments can't follow the variadic positional {variadic}")]
    InvalidVariadicPlacement { field: String, variadic: String },
}

/// A single token couldn't be converted to its field's type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: can't parse {token:?} as {kind}: {message}")]
pub struct ConversionError {
    pub field: String,
    pub token: String,
    pub kind: ValueKind,
    pub message: String,
}

/// Something was wrong with the command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("{name} is required")]
    MissingRequiredValue { field: String, name: String },

    #[error("unrecognized option {option}")]
    UnknownOption { option: String },

    #[error("unexpected positional argument {token:?}")]
    UnexpectedPositional { token: String },

    #[error("{option} requires a value")]
    MissingOptionValue { option: String },

    #[error("argument {token:?} is not valid UTF-8")]
    InvalidUtf8 { token: String },

    /// `--help` or `-h` appeared. The caller should print help and exit
    /// successfully.
    #[error("help was requested")]
    HelpRequested,

    /// `--version` appeared.
    #[error("version was requested")]
    VersionRequested,
}

impl ParseError {
    /// True for the two "errors" that are actually requests for output
    #[inline]
    #[must_use]
    pub fn is_request(&self) -> bool {
        matches!(self, ParseError::HelpRequested | ParseError::VersionRequested)
    }
}
