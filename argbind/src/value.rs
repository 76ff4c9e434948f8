/*!
Conversion of command-line tokens into typed field values.

Every bindable field implements [`Value`], which is object safe so that a
[`Parser`][crate::Parser] can hold a `&mut dyn Value` for each field. The set
of supported types is closed: strings, integers, floating point numbers,
booleans (the [`Scalar`] types), and `Vec`s of any of those.
*/

use core::fmt::{self, Display};
use std::{
    collections::{BTreeMap, HashMap},
    path::PathBuf,
};

use joinery::JoinableIterator;

/// The kind of a single value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    String,
    Integer,
    Float,
    Boolean,
}

impl Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScalarKind::String => "string",
            ScalarKind::Integer => "integer",
            ScalarKind::Float => "floating-point number",
            ScalarKind::Boolean => "boolean",
        })
    }
}

/// The kind of value a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Scalar(ScalarKind),
    Sequence(ScalarKind),

    /// A type that can't be bound to command-line arguments. The binder
    /// rejects fields of this kind.
    Unsupported(&'static str),
}

impl ValueKind {
    pub const FLAG: Self = Self::Scalar(ScalarKind::Boolean);

    /// Boolean scalars are flags: their presence alone sets them.
    #[inline]
    #[must_use]
    pub const fn is_flag(self) -> bool {
        matches!(self, Self::Scalar(ScalarKind::Boolean))
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Scalar(kind) => write!(f, "{kind}"),
            ValueKind::Sequence(kind) => write!(f, "list of {kind}"),
            ValueKind::Unsupported(name) => write!(f, "unsupported type {name}"),
        }
    }
}

/// A token couldn't be converted. The field isn't known at this level;
/// the caller attaches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    pub token: String,
    pub message: String,
}

/**
A single-valued type that can be parsed from one token.

Scalars know how to detect their zero value (used to decide whether a field
has a default worth displaying) and how to render themselves for help text.
*/
pub trait Scalar: Sized {
    const KIND: ScalarKind;

    fn convert(token: &str) -> Result<Self, String>;

    fn is_zero(&self) -> bool;

    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

/**
A field that a [`Parser`][crate::Parser] can write to.

This trait is implemented for every [`Scalar`] type and for `Vec`s of them.
It's also implemented for maps, which report themselves as
[`ValueKind::Unsupported`], so that a field of one of those types is rejected
when the parser is constructed rather than when it's first used.
*/
pub trait Value {
    fn kind(&self) -> ValueKind;

    fn is_zero(&self) -> bool;

    /// Render the current value, the way it appears in `[default: ...]`
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;

    /**
    Overwrite this value from a list of tokens. Scalars use the last token;
    sequences are replaced by the conversion of every token. On failure, the
    value is left untouched.
    */
    fn assign(&mut self, tokens: &[&str]) -> Result<(), Rejected>;
}

/// Adapter to [`Display`] a [`Value`] or [`Scalar`].
pub struct Rendered<'a, T: ?Sized>(pub &'a T);

impl<T: Value + ?Sized> Display for Rendered<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.render(f)
    }
}

struct RenderedScalar<'a, T>(&'a T);

impl<T: Scalar> Display for RenderedScalar<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.render(f)
    }
}

fn convert<T: Scalar>(token: &str) -> Result<T, Rejected> {
    T::convert(token).map_err(|message| Rejected {
        token: token.to_owned(),
        message,
    })
}

/// Parse a boolean the way environment variables and `--flag=value` usually
/// spell them.
fn parse_bool(token: &str) -> Result<bool, String> {
    match token.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Ok(true),
        "false" | "f" | "0" | "no" | "n" => Ok(false),
        _ => Err("expected true or false".to_owned()),
    }
}

macro_rules! scalar {
    ($($type:ty => $kind:ident, |$token:ident| $convert:expr, |$zero:ident| $is_zero:expr, |$this:ident, $f:ident| $render:expr;)*) => {
        $(
            impl Scalar for $type {
                const KIND: ScalarKind = ScalarKind::$kind;

                #[inline]
                fn convert($token: &str) -> Result<Self, String> {
                    $convert
                }

                #[inline]
                fn is_zero(&self) -> bool {
                    let $zero = self;
                    $is_zero
                }

                #[inline]
                fn render(&self, $f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    let $this = self;
                    $render
                }
            }

            impl Value for $type {
                #[inline]
                fn kind(&self) -> ValueKind {
                    ValueKind::Scalar(<$type as Scalar>::KIND)
                }

                #[inline]
                fn is_zero(&self) -> bool {
                    Scalar::is_zero(self)
                }

                #[inline]
                fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    Scalar::render(self, f)
                }

                fn assign(&mut self, tokens: &[&str]) -> Result<(), Rejected> {
                    if let Some(token) = tokens.last() {
                        *self = convert(token)?;
                    }

                    Ok(())
                }
            }
        )*
    };
}

macro_rules! from_str {
    ($kind:ident, $zero_value:expr; $($type:ty)*) => {
        scalar! {$(
            $type => $kind,
                |token| token.parse().map_err(|err| ::std::string::ToString::to_string(&err)),
                |value| *value == $zero_value,
                |value, f| write!(f, "{value}");
        )*}
    };
}

from_str! { Integer, 0; u8 u16 u32 u64 u128 usize i8 i16 i32 i64 i128 isize }
from_str! { Float, 0.0; f32 f64 }

scalar! {
    String => String,
        |token| Ok(token.to_owned()),
        |value| value.is_empty(),
        |value, f| f.write_str(value);

    PathBuf => String,
        |token| Ok(PathBuf::from(token)),
        |value| value.as_os_str().is_empty(),
        |value, f| write!(f, "{}", value.display());

    bool => Boolean,
        |token| parse_bool(token),
        |value| !*value,
        |value, f| write!(f, "{value}");
}

impl<T: Scalar> Value for Vec<T> {
    #[inline]
    fn kind(&self) -> ValueKind {
        ValueKind::Sequence(T::KIND)
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.iter().map(RenderedScalar).join_with(' '))
    }

    fn assign(&mut self, tokens: &[&str]) -> Result<(), Rejected> {
        *self = tokens.iter().map(|token| convert(token)).collect::<Result<_, _>>()?;
        Ok(())
    }
}

macro_rules! unsupported {
    ($($type:ident <$($param:ident),*> => $name:literal,)*) => {
        $(
            impl<$($param),*> Value for $type<$($param),*> {
                #[inline]
                fn kind(&self) -> ValueKind {
                    ValueKind::Unsupported($name)
                }

                #[inline]
                fn is_zero(&self) -> bool {
                    self.is_empty()
                }

                fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str($name)
                }

                fn assign(&mut self, tokens: &[&str]) -> Result<(), Rejected> {
                    Err(Rejected {
                        token: tokens.last().copied().unwrap_or_default().to_owned(),
                        message: concat!("can't assign to a ", $name).to_owned(),
                    })
                }
            }
        )*
    };
}

unsupported! {
    HashMap<K, V, S> => "map",
    BTreeMap<K, V> => "map",
}
