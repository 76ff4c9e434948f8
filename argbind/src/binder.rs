/*!
Binding a destination record to a set of [`ArgumentSpec`]s.

A type becomes bindable by implementing [`Args`], usually through
`#[derive(Args)]`. The implementation hands each of its fields, in declaration
order, to a [`Binder`], which parses the field's tag, inspects its type, and
checks the field against everything bound before it. The first problem found
fails the whole bind.
*/

use std::collections::HashMap;

use crate::{
    config::Config,
    errors::BindError,
    parser::Parser,
    spec::{ArgumentSpec, Builtin, Kind, Repetition, Requirement},
    tag::{EnvSource, Tag, is_valid_long},
    value::{Rendered, Value, ValueKind},
};

/**
A record whose fields can be populated from command-line arguments.

Implementations call [`Binder::field`] or [`Binder::bind_field`] once for each
field that should be bound, in the order the fields should appear in usage
text. This is usually derived:

```
#[derive(argbind::Args, Default)]
struct Arguments {
    #[arg("positional,help:file to read")]
    input: String,

    #[arg("-v,help:say more")]
    verbose: bool,
}

let mut arguments = Arguments::default();
let config = argbind::Config::new().with_program("example");
let mut parser = argbind::Parser::new(config, &mut arguments).unwrap();
parser.parse(["-v", "in.txt"]).unwrap();
drop(parser);

assert_eq!(arguments.input, "in.txt");
assert!(arguments.verbose);
```
*/
pub trait Args {
    fn bind<'a>(&'a mut self, binder: &mut Binder<'a>) -> Result<(), BindError>;
}

/// Everything the derive knows about a field: its name, its tag, and its
/// doc comment, one entry per line.
#[derive(Debug, Clone, Copy)]
pub struct FieldInfo {
    pub name: &'static str,
    pub tag: &'static str,
    pub docs: &'static [&'static str],
}

/// Collects [`ArgumentSpec`]s for the fields of an [`Args`] type.
pub struct Binder<'a> {
    specs: Vec<ArgumentSpec>,
    slots: Vec<&'a mut dyn Value>,
    names: HashMap<String, usize>,
    aliases: HashMap<char, usize>,
    variadic: Option<usize>,
}

impl<'a> Binder<'a> {
    pub(crate) fn new() -> Self {
        Self {
            specs: Vec::new(),
            slots: Vec::new(),
            names: HashMap::new(),
            aliases: HashMap::new(),
            variadic: None,
        }
    }

    /// Bind a single field, given its name and its tag string.
    pub fn field(
        &mut self,
        name: &str,
        tag: &str,
        value: &'a mut dyn Value,
    ) -> Result<(), BindError> {
        self.bind(name, tag, &[], value)
    }

    /// Bind a single field, given everything the derive knows about it. If
    /// the tag has no `help:` directive, the doc comment is used instead.
    pub fn bind_field(&mut self, info: FieldInfo, value: &'a mut dyn Value) -> Result<(), BindError> {
        self.bind(info.name, info.tag, info.docs, value)
    }

    fn bind(
        &mut self,
        field: &str,
        tag: &str,
        docs: &[&str],
        value: &'a mut dyn Value,
    ) -> Result<(), BindError> {
        let tag = Tag::parse(tag).map_err(|err| BindError::MalformedTag {
            field: field.to_owned(),
            fragment: err.fragment,
            kind: err.kind,
        })?;

        if tag.ignore {
            log::debug!("ignoring field {field}");
            return Ok(());
        }

        let kind = value.kind();

        if let ValueKind::Unsupported(type_name) = kind {
            return Err(BindError::UnsupportedFieldType {
                field: field.to_owned(),
                type_name,
            });
        }

        let name = tag.long.unwrap_or_else(|| field.to_lowercase());

        if !is_valid_long(&name) {
            return Err(BindError::InvalidName {
                field: field.to_owned(),
                name,
            });
        }

        let placeholder = name.to_uppercase();

        let default = match value.is_zero() {
            true => None,
            false => Some(Rendered(&*value).to_string()),
        };

        let spec_kind = match tag.positional {
            true => Kind::Positional,
            false => Kind::Option,
        };

        let repetition = match kind {
            ValueKind::Sequence(_) => Repetition::Multiple,
            _ => Repetition::Single,
        };

        // Only single-valued positionals with nothing preset are implicitly
        // required.
        let requirement = match (tag.required, spec_kind, repetition, &default) {
            (true, ..) | (false, Kind::Positional, Repetition::Single, None) => {
                Requirement::Mandatory
            }
            _ => Requirement::Optional,
        };

        let env = tag.env.map(|env| match env {
            EnvSource::Derived => placeholder.replace('-', "_"),
            EnvSource::Named(name) => name,
        });

        let help = match tag.help {
            Some(help) => help,
            None => docs
                .iter()
                .map(|line| line.trim())
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        };

        let spec = ArgumentSpec {
            field: field.to_owned(),
            kind: spec_kind,
            name,
            placeholder,
            aliases: tag.aliases,
            value: kind,
            requirement,
            env,
            default,
            help,
            builtin: None,
        };

        if spec.is_positional() {
            if let Some(variadic) = self.variadic {
                return Err(BindError::InvalidVariadicPlacement {
                    field: spec.field,
                    variadic: self.specs[variadic].field.clone(),
                });
            }

            if spec.is_variadic() {
                self.variadic = Some(self.specs.len());
            }
        }

        log::debug!(
            "binding field {field} as {} ({}, {:?})",
            spec.display_name(),
            spec.value,
            spec.requirement,
        );

        self.register(spec)?;
        self.slots.push(value);

        Ok(())
    }

    /// Index a spec's name and aliases, then add it to the list.
    fn register(&mut self, spec: ArgumentSpec) -> Result<(), BindError> {
        let index = self.specs.len();

        let duplicate = |name: String, other: usize| BindError::DuplicateName {
            field: spec.field.clone(),
            name,
            other: self.specs[other].field.clone(),
        };

        if let Some(&other) = self.names.get(&spec.name) {
            return Err(duplicate(spec.name.clone(), other));
        }

        if let Some((alias, &other)) = spec
            .aliases
            .iter()
            .find_map(|alias| self.aliases.get(alias).map(|other| (alias, other)))
        {
            return Err(duplicate(format!("-{alias}"), other));
        }

        self.names.insert(spec.name.clone(), index);
        self.aliases
            .extend(spec.aliases.iter().map(|&alias| (alias, index)));
        self.specs.push(spec);

        Ok(())
    }

    /// Add `--help` and, if there's a version, `--version`, then produce
    /// the finished parser.
    pub(crate) fn finish(mut self, config: &Config) -> Result<Parser<'a>, BindError> {
        let version = config.resolve_version();

        self.register(ArgumentSpec::builtin(Builtin::Help))?;

        if version.is_some() {
            self.register(ArgumentSpec::builtin(Builtin::Version))?;
        }

        Ok(Parser::from_parts(
            self.specs,
            self.slots,
            self.names,
            self.aliases,
            config.resolve_program(),
            version,
        ))
    }
}
