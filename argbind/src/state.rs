/*!
The in-progress state of a parse. Tokens are classified by
[`argbind_parser`], then collected here per argument; nothing is converted or
written to a field until every token has been seen.
*/

use std::collections::HashMap;

use argbind_parser::{Arg, ArgAccess, Visitor};

use crate::{
    errors::ParseError,
    spec::{ArgumentSpec, Builtin, Repetition},
};

/// Render a token for use in an error message
fn lossy(arg: Arg<'_>) -> String {
    String::from_utf8_lossy(arg.bytes()).into_owned()
}

fn text(arg: Arg<'_>) -> Result<&str, ParseError> {
    arg.as_str()
        .ok_or_else(|| ParseError::InvalidUtf8 { token: lossy(arg) })
}

pub(crate) struct State<'p> {
    specs: &'p [ArgumentSpec],
    names: &'p HashMap<String, usize>,
    aliases: &'p HashMap<char, usize>,
    positionals: &'p [usize],

    /// Tokens seen for each spec, or `None` if it never appeared
    explicit: Vec<Option<Vec<String>>>,

    /// The next positional to fill
    cursor: usize,

    help: bool,
    version: bool,
}

impl<'p> State<'p> {
    pub fn new(
        specs: &'p [ArgumentSpec],
        names: &'p HashMap<String, usize>,
        aliases: &'p HashMap<char, usize>,
        positionals: &'p [usize],
    ) -> Self {
        Self {
            specs,
            names,
            aliases,
            positionals,
            explicit: vec![None; specs.len()],
            cursor: 0,
            help: false,
            version: false,
        }
    }

    /// If `--help` or `--version` appeared, the corresponding error. Help
    /// takes precedence.
    pub fn request(&self) -> Option<ParseError> {
        match (self.help, self.version) {
            (true, _) => Some(ParseError::HelpRequested),
            (false, true) => Some(ParseError::VersionRequested),
            (false, false) => None,
        }
    }

    pub fn into_explicit(self) -> Vec<Option<Vec<String>>> {
        self.explicit
    }

    fn push(&mut self, index: usize, token: &str) {
        self.explicit[index]
            .get_or_insert_with(Vec::new)
            .push(token.to_owned());
    }

    /// Find a non-positional spec by its long name
    fn long(&self, option: Arg<'_>) -> Result<usize, ParseError> {
        let name = text(option)?;

        self.names
            .get(name)
            .copied()
            .filter(|&index| !self.specs[index].is_positional())
            .ok_or_else(|| ParseError::UnknownOption {
                option: format!("--{name}"),
            })
    }

    fn short(&self, option: u8) -> Result<usize, ParseError> {
        self.aliases
            .get(&char::from(option))
            .copied()
            .ok_or_else(|| ParseError::UnknownOption {
                option: format!("-{}", option.escape_ascii()),
            })
    }

    /// Handle a builtin option, if `index` is one. Returns true if it was.
    fn builtin(&mut self, index: usize) -> bool {
        match self.specs[index].builtin_kind() {
            Some(Builtin::Help) => self.help = true,
            Some(Builtin::Version) => self.version = true,
            None => return false,
        }

        log::trace!("{} requested", self.specs[index].name());
        true
    }

    /// An option appeared without an attached `=value`; get its value(s)
    /// from `arg`, if it needs any.
    fn option<'arg>(
        &mut self,
        index: usize,
        display: impl FnOnce() -> String,
        arg: impl ArgAccess<'arg>,
    ) -> Result<(), ParseError> {
        if self.builtin(index) {
            return Ok(());
        }

        let specs = self.specs;
        let spec = &specs[index];

        if !spec.takes_value() {
            self.push(index, "true");
            return Ok(());
        }

        match spec.repetition() {
            Repetition::Single => {
                let value = arg
                    .take()
                    .ok_or_else(|| ParseError::MissingOptionValue { option: display() })?;

                let value = text(value)?;
                log::trace!("{} = {value:?}", spec.display_name());
                self.push(index, value);
            }
            Repetition::Multiple => {
                let mut values = Vec::new();
                let mut error = None;

                arg.take_each(|value| match text(value) {
                    Ok(value) => values.push(value.to_owned()),
                    Err(err) => {
                        error.get_or_insert(err);
                    }
                });

                if let Some(error) = error {
                    return Err(error);
                }

                log::trace!("{} += {values:?}", spec.display_name());
                self.explicit[index]
                    .get_or_insert_with(Vec::new)
                    .extend(values);
            }
        }

        Ok(())
    }

    /// An option appeared with an attached value, like `--name=value`
    fn option_with_value(&mut self, index: usize, value: Arg<'_>) -> Result<(), ParseError> {
        if self.builtin(index) {
            return Ok(());
        }

        let value = text(value)?;
        log::trace!("{} = {value:?}", self.specs[index].display_name());
        self.push(index, value);
        Ok(())
    }
}

impl<'arg> Visitor<'arg> for &mut State<'_> {
    type Value = Result<(), ParseError>;

    fn visit_positional(self, argument: Arg<'arg>) -> Self::Value {
        let Some(&index) = self.positionals.get(self.cursor) else {
            return Err(ParseError::UnexpectedPositional {
                token: lossy(argument),
            });
        };

        let value = text(argument)?;
        log::trace!("{} = {value:?}", self.specs[index].display_name());
        self.push(index, value);

        if !self.specs[index].is_variadic() {
            self.cursor += 1;
        }

        Ok(())
    }

    fn visit_long_option(self, option: Arg<'arg>, argument: Arg<'arg>) -> Self::Value {
        let index = self.long(option)?;
        self.option_with_value(index, argument)
    }

    fn visit_long(self, option: Arg<'arg>, arg: impl ArgAccess<'arg>) -> Self::Value {
        let index = self.long(option)?;
        self.option(index, || format!("--{}", lossy(option)), arg)
    }

    fn visit_short(self, option: u8, arg: impl ArgAccess<'arg>) -> Self::Value {
        let index = self.short(option)?;
        self.option(index, || format!("-{}", char::from(option)), arg)
    }
}
