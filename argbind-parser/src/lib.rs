#![no_std]

/*!
Low-level classification of command-line tokens. Takes care of distinctions
between flags, options, and positionals, of where an option finds its value,
and of the `--` terminator. No type handling happens here, and nothing is
allocated; usually this is too low level to use directly, and `argbind` drives
it on your behalf.
*/

use ::core::{
    fmt::{self, Debug, Write},
    iter::Peekable,
    str,
};

/**
A single, raw token passed in from the command line.

This type is used in two ways: to indicate long command line options, and to
indicate values themselves. For instance, given
`--workers 4 --name=foo input.txt`, `workers`, `4`, `name`, `foo`, and
`input.txt` would all be passed as [`Arg`] values to the relevant visitor
methods.

An [`Arg`] is just a byte slice, since that's what the OS gives us; callers
decide what to do with non-UTF-8 input.
*/
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Arg<'arg>(&'arg [u8]);

impl<'arg> Arg<'arg> {
    #[inline]
    #[must_use]
    pub const fn new(bytes: &'arg [u8]) -> Self {
        Self(bytes)
    }

    #[inline]
    #[must_use]
    pub const fn bytes(&self) -> &'arg [u8] {
        self.0
    }

    /// Get this argument as a `str`, if it's valid UTF-8
    #[inline]
    pub fn as_str(&self) -> Option<&'arg str> {
        str::from_utf8(self.0).ok()
    }
}

/**
Debug-print an arg. This implementation does its best to treat the arg as a
string, but includes non-utf-8 bytes in their hex representation as needed.
 */
impl Debug for Arg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_bytes(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
            f.write_char('[')?;

            let mut bytes = bytes.iter().copied();

            if let Some(b) = bytes.next() {
                write!(f, "{b:#x}")?;
                bytes.try_for_each(|b| write!(f, ",{b:#x}"))?;
            }

            f.write_char(']')
        }

        if self.0.is_empty() {
            return f.write_str("\"\"");
        }

        self.0.utf8_chunks().enumerate().try_for_each(|(i, chunk)| {
            if i > 0 {
                write!(f, "..")?
            }

            match (chunk.valid(), chunk.invalid()) {
                (s, b"") => write!(f, "{s:?}"),
                ("", b) => write_bytes(f, b),
                (s, b) => {
                    write!(f, "{s:?}..")?;
                    write_bytes(f, b)
                }
            }
        })
    }
}

/**
The [`ArgumentsParser`] type operates by passing arguments it finds into a
[`Visitor`], to be handled.
 */
pub trait Visitor<'arg> {
    type Value;

    /// A positional argument.
    fn visit_positional(self, argument: Arg<'arg>) -> Self::Value;

    /// A long option that definitely has a value, because it was given
    /// as `--option=value`
    fn visit_long_option(self, option: Arg<'arg>, argument: Arg<'arg>) -> Self::Value;

    /// A long option or flag, such as `--option`
    fn visit_long(self, option: Arg<'arg>, arg: impl ArgAccess<'arg>) -> Self::Value;

    /// A short option or flag, such as `-o`
    fn visit_short(self, option: u8, arg: impl ArgAccess<'arg>) -> Self::Value;
}

/**
[`ArgAccess`] allows a visitor to decide if a given option needs a value,
based on the identity of the option.

Consider `--verbose input.txt`. Is this a flag followed by a positional, or a
single option with a value? The [`ArgumentsParser`] can't independently
classify it, so instead a visitor requests a value via this trait only for
options that need one, and the parser takes care of determining where that
value comes from.
*/
pub trait ArgAccess<'arg>: Sized {
    /**
    Get a single value for the current option. This should only be called by
    options that need it; flags should simply ignore it, so that the next
    command line token is handled independently.

    This returns [`None`] if the tokens are exhausted, if the next token looks
    like an option itself, or if it's a raw `--` (which is consumed, and
    switches the parser into positional-only mode).
    */
    fn take(self) -> Option<Arg<'arg>>;

    /**
    Get every value for the current option: each following token, up to the
    next one that looks like an option (or `--`), is passed to `each`. Returns
    the number of values taken.
    */
    fn take_each(self, each: impl FnMut(Arg<'arg>)) -> usize;
}

/// True if this token should be interpreted as an option rather than as a
/// value. `-` alone and negative numbers like `-3` or `-.5` are values.
#[inline]
#[must_use]
pub fn looks_like_option(token: &[u8]) -> bool {
    matches!(token, [b'-', next, ..] if !next.is_ascii_digit() && *next != b'.')
}

#[derive(Debug, Clone)]
enum State<'arg> {
    Ready,
    PositionalOnly,
    /// The remainder of a short cluster like `-vw4`. Never empty.
    ShortInProgress(&'arg [u8]),
}

/**
An `ArgumentsParser` is the main entry point into `argbind_parser`. It parses
tokens in each call to `next_arg`, sending them to the given [`Visitor`]. It
handles distinguishing flags, options, and positionals; logic related to how
options get their values, and the `--` terminator.

`argbind-parser` operates entirely on borrowed data, because command-line
arguments can be loaded early on in `main` and then handled in a borrowed form
for the rest of the program. The ubiquitous `'arg` lifetime refers to this
borrowed command line data.
*/
#[derive(Debug, Clone)]
pub struct ArgumentsParser<'arg, I>
where
    I: Iterator<Item = &'arg [u8]>,
{
    state: State<'arg>,
    args: Peekable<I>,
}

impl<'arg, I> ArgumentsParser<'arg, I>
where
    I: Iterator<Item = &'arg [u8]>,
{
    /**
    Create a new [`ArgumentsParser`] from an iterator of byte slices, where
    each byte slice is a single token received from the command line. This
    list should *exclude* the name of the program, which is commonly passed as
    the first element of the process arguments.
     */
    #[inline]
    #[must_use]
    pub fn new(args: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            state: State::Ready,
            args: args.into_iter().peekable(),
        }
    }

    /// Put `self` into a `PositionalOnly` state, then process a positional
    /// argument
    #[inline]
    fn positional_only_arg<V>(&mut self, visitor: V) -> Option<V::Value>
    where
        V: Visitor<'arg>,
    {
        debug_assert!(!matches!(self.state, State::ShortInProgress(_)));

        self.state = State::PositionalOnly;
        self.args
            .next()
            .map(Arg)
            .map(|arg| visitor.visit_positional(arg))
    }

    /// Put `self` into a `Ready` state, then return a StandardArgAccess
    #[inline]
    fn standard_arg(&mut self) -> StandardArgAccess<'_, 'arg, I> {
        debug_assert!(!matches!(self.state, State::PositionalOnly));

        self.state = State::Ready;
        StandardArgAccess { parent: self }
    }

    /// Put `self` into a `ShortInProgress` state, then return a ShortArgAccess.
    /// `short` must be non-empty.
    #[inline]
    fn short_arg(&mut self, short: &'arg [u8]) -> ShortArgAccess<'_, 'arg> {
        debug_assert!(!matches!(self.state, State::PositionalOnly));
        debug_assert!(!short.is_empty());

        self.state = State::ShortInProgress(short);
        ShortArgAccess {
            short,
            state: &mut self.state,
        }
    }

    /// Handle getting the value for a `-s` short option. If there is
    /// remaining content in the cluster, it's a candidate for the value;
    /// otherwise, the next token is the candidate.
    #[inline]
    fn handle_short_argument<V>(&mut self, option: u8, rest: &'arg [u8], visitor: V) -> V::Value
    where
        V: Visitor<'arg>,
    {
        match rest {
            [] => visitor.visit_short(option, self.standard_arg()),
            rest => visitor.visit_short(option, self.short_arg(rest)),
        }
    }

    /// Classify the next token and hand it to the `visitor`. Returns `None`
    /// once all tokens are exhausted.
    pub fn next_arg<V>(&mut self, visitor: V) -> Option<V::Value>
    where
        V: Visitor<'arg>,
    {
        match self.state {
            State::Ready => match self.args.next()? {
                b"--" => self.positional_only_arg(visitor),
                argument if !looks_like_option(argument) => {
                    Some(visitor.visit_positional(Arg(argument)))
                }
                [b'-', b'-', option @ ..] => Some(match split_once(option, b'=') {
                    Some((option, argument)) => {
                        visitor.visit_long_option(Arg(option), Arg(argument))
                    }
                    None => visitor.visit_long(Arg(option), self.standard_arg()),
                }),
                &[b'-', option, ref rest @ ..] => {
                    Some(self.handle_short_argument(option, rest, visitor))
                }
                positional => Some(visitor.visit_positional(Arg(positional))),
            },
            State::PositionalOnly => self.positional_only_arg(visitor),
            State::ShortInProgress(short) => match short {
                &[option, ref rest @ ..] => Some(self.handle_short_argument(option, rest, visitor)),
                [] => {
                    self.state = State::Ready;
                    self.next_arg(visitor)
                }
            },
        }
    }
}

/// ArgAccess implementation that gets the next token from the list.
/// Handles logic around `--` and option-looking tokens.
struct StandardArgAccess<'a, 'arg, I>
where
    I: Iterator<Item = &'arg [u8]>,
{
    parent: &'a mut ArgumentsParser<'arg, I>,
}

impl<'arg, I> StandardArgAccess<'_, 'arg, I>
where
    I: Iterator<Item = &'arg [u8]>,
{
    fn next_value(&mut self) -> Option<Arg<'arg>> {
        match *self.parent.args.peek()? {
            b"--" => None,
            token if looks_like_option(token) => None,
            _ => self.parent.args.next().map(Arg),
        }
    }
}

impl<'arg, I> ArgAccess<'arg> for StandardArgAccess<'_, 'arg, I>
where
    I: Iterator<Item = &'arg [u8]>,
{
    fn take(mut self) -> Option<Arg<'arg>> {
        if let Some(&b"--") = self.parent.args.peek() {
            self.parent.args.next();
            self.parent.state = State::PositionalOnly;
            return None;
        }

        self.next_value()
    }

    fn take_each(mut self, mut each: impl FnMut(Arg<'arg>)) -> usize {
        let mut count = 0;

        while let Some(arg) = self.next_value() {
            each(arg);
            count += 1;
        }

        count
    }
}

/// ArgAccess implementation that gets the remainder of a short cluster.
/// Handles things like `-w4` and `-w=4`, which are equivalent to `-w 4`.
struct ShortArgAccess<'a, 'arg> {
    short: &'arg [u8],
    state: &'a mut State<'arg>,
}

impl<'arg> ArgAccess<'arg> for ShortArgAccess<'_, 'arg> {
    fn take(self) -> Option<Arg<'arg>> {
        debug_assert!(
            matches!(*self.state, State::ShortInProgress(short) if short == self.short)
        );

        *self.state = State::Ready;

        Some(Arg(match self.short {
            [b'=', value @ ..] => value,
            value => value,
        }))
    }

    fn take_each(self, mut each: impl FnMut(Arg<'arg>)) -> usize {
        match self.take() {
            Some(arg) => {
                each(arg);
                1
            }
            None => 0,
        }
    }
}

fn split_once(input: &[u8], delimiter: u8) -> Option<(&[u8], &[u8])> {
    memchr::memchr(delimiter, input).map(|i| (&input[..i], &input[i + 1..]))
}
