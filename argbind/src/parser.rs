use std::{
    collections::HashMap,
    ffi::{OsStr, OsString},
    io,
};

use argbind_parser::ArgumentsParser;

use crate::{
    binder::{Args, Binder},
    build,
    config::Config,
    errors::{BindError, ParseError},
    printers,
    spec::ArgumentSpec,
    state::State,
    value::Value,
};

/**
A parser bound to a particular destination record.

The parser holds the record mutably borrowed for as long as it exists; once
it's dropped, the record can be read again, with whatever values the last
[`parse`][Parser::parse] wrote into it.
*/
pub struct Parser<'a> {
    specs: Vec<ArgumentSpec>,
    slots: Vec<&'a mut dyn Value>,
    names: HashMap<String, usize>,
    aliases: HashMap<char, usize>,
    positionals: Vec<usize>,
    program: String,
    version: Option<String>,
}

impl<'a> Parser<'a> {
    /// Bind `args` and build a parser for it. Fails if any field is
    /// malformed, or if the fields together are inconsistent (duplicate names,
    /// a misplaced variadic positional, and so on).
    pub fn new(config: Config, args: &'a mut (impl Args + ?Sized)) -> Result<Self, BindError> {
        let mut binder = Binder::new();
        args.bind(&mut binder)?;
        binder.finish(&config)
    }

    pub(crate) fn from_parts(
        specs: Vec<ArgumentSpec>,
        slots: Vec<&'a mut dyn Value>,
        names: HashMap<String, usize>,
        aliases: HashMap<char, usize>,
        program: String,
        version: Option<String>,
    ) -> Self {
        let positionals = specs
            .iter()
            .enumerate()
            .filter(|(_, spec)| spec.is_positional())
            .map(|(index, _)| index)
            .collect();

        Self {
            specs,
            slots,
            names,
            aliases,
            positionals,
            program,
            version,
        }
    }

    /// Every argument, in declaration order, followed by the builtin options
    #[inline]
    #[must_use]
    pub fn specs(&self) -> &[ArgumentSpec] {
        &self.specs
    }

    pub fn positionals(&self) -> impl Iterator<Item = &ArgumentSpec> {
        self.positionals.iter().map(|&index| &self.specs[index])
    }

    pub fn options(&self) -> impl Iterator<Item = &ArgumentSpec> {
        self.specs.iter().filter(|spec| !spec.is_positional())
    }

    /// Look up an option by its long name (without the leading `--`)
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&ArgumentSpec> {
        self.names.get(name).map(|&index| &self.specs[index])
    }

    /// Look up an option by its short alias
    #[must_use]
    pub fn lookup_alias(&self, alias: char) -> Option<&ArgumentSpec> {
        self.aliases.get(&alias).map(|&index| &self.specs[index])
    }

    #[inline]
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[inline]
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Write the one-line usage synopsis
    pub fn write_usage(&self, out: &mut (impl io::Write + ?Sized)) -> io::Result<()> {
        printers::print_usage(out, &self.program, &self.specs)
    }

    /// Write the full help text: the synopsis, then a row for every argument
    pub fn write_help(&self, out: &mut (impl io::Write + ?Sized)) -> io::Result<()> {
        printers::print_help(out, &self.program, &self.specs)
    }

    /// Write `<program> <version>`. If there's no version, this writes just
    /// the program name; there's no `--version` option in that case, so
    /// there's usually no reason to call this.
    pub fn write_version(&self, out: &mut (impl io::Write + ?Sized)) -> io::Result<()> {
        printers::print_version(out, &self.program, self.version.as_deref())
    }

    /**
    Parse a command line into the bound record, consulting the process
    environment for fields with an `env` directive. `args` should *exclude*
    the program name.

    If `--help` or `--version` appears anywhere, the parse stops with
    [`ParseError::HelpRequested`] or [`ParseError::VersionRequested`], even
    if there were other problems with the command line. Otherwise, the first
    problem found is returned.
    */
    pub fn parse<I>(&mut self, args: I) -> Result<(), ParseError>
    where
        I: IntoIterator,
        I::Item: AsRef<OsStr>,
    {
        self.parse_with_env(args, |var| std::env::var_os(var))
    }

    /// Same as [`parse`][Parser::parse], but with environment variables
    /// fetched from `lookup`.
    pub fn parse_with_env<I>(
        &mut self,
        args: I,
        lookup: impl FnMut(&str) -> Option<OsString>,
    ) -> Result<(), ParseError>
    where
        I: IntoIterator,
        I::Item: AsRef<OsStr>,
    {
        let args: Vec<I::Item> = args.into_iter().collect();
        let explicit = self.gather(args.iter().map(|arg| arg.as_ref().as_encoded_bytes()))?;

        build::resolve(&self.specs, &mut self.slots, explicit, lookup)
    }

    /// Run every token through the state, gathering explicit values per
    /// argument.
    fn gather<'arg>(
        &self,
        args: impl Iterator<Item = &'arg [u8]>,
    ) -> Result<Vec<Option<Vec<String>>>, ParseError> {
        let mut tokens = ArgumentsParser::new(args);
        let mut state = State::new(&self.specs, &self.names, &self.aliases, &self.positionals);
        let mut error = None;

        while let Some(result) = tokens.next_arg(&mut state) {
            if let Err(err) = result {
                log::debug!("{err}");
                error.get_or_insert(err);
            }
        }

        if let Some(request) = state.request() {
            return Err(request);
        }

        match error {
            Some(error) => Err(error),
            None => Ok(state.into_explicit()),
        }
    }
}
