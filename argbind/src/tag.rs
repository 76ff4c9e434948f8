/*!
The tag grammar. Every bound field carries a tag string, like
`"positional,help:list of outputs"` or `"-w,env:WORKERS"`, which is parsed
into a [`Tag`].

A tag is a comma-separated list of directives:

- `positional`: the field is a positional argument rather than an option
- `required`: the field must be given a value
- `-x`: a short alias; may be repeated to add more aliases
- `--name`: override the long name, which is otherwise derived from the field
- `help:TEXT`: help text, which runs to the next unescaped comma. Whitespace
  at either end of the text is trimmed; whitespace inside it is kept as is.
- `env:NAME`: an environment variable to consult when the argument is absent
- `env`: same, with the variable named after the placeholder (`-` becomes `_`)

A backslash escapes the character after it, so `help:a\, b` is the help text
`a, b`. The tag `-` on its own means the field is ignored entirely. Unknown
directives are rejected rather than silently ignored, so that typos surface
immediately.
*/

use thiserror::Error;

/// Where the value of an `env` directive comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvSource {
    /// A bare `env`; named after the argument's placeholder
    Derived,

    /// `env:NAME`
    Named(String),
}

/// A parsed tag string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag {
    pub ignore: bool,
    pub positional: bool,
    pub required: bool,
    pub long: Option<String>,
    pub aliases: Vec<char>,
    pub env: Option<EnvSource>,
    pub help: Option<String>,
}

/// A tag failed to parse. Includes the offending directive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} (in {fragment:?})")]
pub struct TagError {
    pub fragment: String,
    pub kind: TagErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TagErrorKind {
    #[error("empty directive")]
    Empty,

    #[error("unrecognized directive")]
    UnknownDirective,

    #[error("unrecognized key")]
    UnknownKey,

    #[error("directive appears more than once")]
    Duplicate,

    #[error("directive requires a value after ':'")]
    MissingValue,

    #[error("short aliases must be a single ASCII character, other than '-', '.' or a digit")]
    InvalidAlias,

    #[error("long names must start with a letter and contain no '=' or whitespace")]
    InvalidLong,

    #[error("'-' ignores a field and can't be combined with other directives")]
    IgnoreWithDirectives,

    #[error("trailing '\\' escapes nothing")]
    DanglingEscape,

    #[error("positional arguments can't have aliases or long names")]
    PositionalWithFlagName,
}

impl TagErrorKind {
    fn at(self, fragment: &str) -> TagError {
        TagError {
            fragment: fragment.to_owned(),
            kind: self,
        }
    }
}

/// Split a tag on unescaped commas, resolving escapes along the way.
fn split_directives(raw: &str) -> Result<Vec<String>, TagError> {
    let mut directives = Vec::new();
    let mut current = String::new();
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => current.push(escaped),
                None => return Err(TagErrorKind::DanglingEscape.at(raw)),
            },
            ',' => directives.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }

    directives.push(current);
    Ok(directives)
}

fn set_once<T>(slot: &mut Option<T>, value: T, fragment: &str) -> Result<(), TagError> {
    match slot {
        Some(_) => Err(TagErrorKind::Duplicate.at(fragment)),
        None => {
            *slot = Some(value);
            Ok(())
        }
    }
}

fn flag_once(flag: &mut bool, fragment: &str) -> Result<(), TagError> {
    match std::mem::replace(flag, true) {
        true => Err(TagErrorKind::Duplicate.at(fragment)),
        false => Ok(()),
    }
}

fn parse_alias(fragment: &str) -> Result<char, TagError> {
    let mut chars = fragment.chars();

    match (chars.next(), chars.next()) {
        // `-3` and `-.5` are classified as values, so digits and `.` can't
        // start a short option
        (Some(c), None)
            if c.is_ascii_graphic() && c != '-' && c != '.' && !c.is_ascii_digit() =>
        {
            Ok(c)
        }
        _ => Err(TagErrorKind::InvalidAlias.at(fragment)),
    }
}

/// True if `long` can be matched as `--long` on the command line: it starts
/// with a letter, and has no `=` or whitespace.
pub(crate) fn is_valid_long(long: &str) -> bool {
    long.starts_with(|c: char| c.is_alphabetic())
        && !long.contains('=')
        && !long.contains(char::is_whitespace)
}

fn parse_long(long: &str, fragment: &str) -> Result<String, TagError> {
    match is_valid_long(long) {
        true => Ok(long.to_owned()),
        false => Err(TagErrorKind::InvalidLong.at(fragment)),
    }
}

impl Tag {
    /// Parse a tag string. An empty (or all-whitespace) tag is valid, and
    /// describes an option with no aliases, environment variable, or help.
    pub fn parse(raw: &str) -> Result<Self, TagError> {
        let mut tag = Tag::default();

        match raw.trim() {
            "" => return Ok(tag),
            "-" => {
                tag.ignore = true;
                return Ok(tag);
            }
            _ => {}
        }

        for directive in split_directives(raw)? {
            tag.apply(&directive)?;
        }

        if tag.positional && (!tag.aliases.is_empty() || tag.long.is_some()) {
            return Err(TagErrorKind::PositionalWithFlagName.at(raw));
        }

        Ok(tag)
    }

    fn apply(&mut self, directive: &str) -> Result<(), TagError> {
        let trimmed = directive.trim();

        if let Some((key, value)) = trimmed.split_once(':') {
            return match key.trim_end() {
                "help" => set_once(&mut self.help, value.trim().to_owned(), directive),
                "env" => match value.trim() {
                    "" => Err(TagErrorKind::MissingValue.at(directive)),
                    name => set_once(
                        &mut self.env,
                        EnvSource::Named(name.to_owned()),
                        directive,
                    ),
                },
                _ => Err(TagErrorKind::UnknownKey.at(directive)),
            };
        }

        match trimmed {
            "" => Err(TagErrorKind::Empty.at(directive)),
            "positional" => flag_once(&mut self.positional, directive),
            "required" => flag_once(&mut self.required, directive),
            "env" => set_once(&mut self.env, EnvSource::Derived, directive),
            "-" => Err(TagErrorKind::IgnoreWithDirectives.at(directive)),
            long if long.starts_with("--") => {
                let long = parse_long(&long[2..], directive)?;
                set_once(&mut self.long, long, directive)
            }
            short if short.starts_with('-') => {
                let alias = parse_alias(&short[1..])?;
                if !self.aliases.contains(&alias) {
                    self.aliases.push(alias);
                }
                Ok(())
            }
            _ => Err(TagErrorKind::UnknownDirective.at(directive)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_kind(raw: &str) -> TagErrorKind {
        Tag::parse(raw).unwrap_err().kind
    }

    #[test]
    fn empty_tag_is_a_plain_option() {
        assert_eq!(Tag::parse("").unwrap(), Tag::default());
        assert_eq!(Tag::parse("  ").unwrap(), Tag::default());
    }

    #[test]
    fn ignore() {
        let tag = Tag::parse("-").unwrap();
        assert!(tag.ignore);
        assert_eq!(error_kind("-,positional"), TagErrorKind::IgnoreWithDirectives);
    }

    #[test]
    fn full_tag() {
        let tag = Tag::parse("-w,env:WORKERS,help:number of workers to start").unwrap();

        assert_eq!(
            tag,
            Tag {
                aliases: vec!['w'],
                env: Some(EnvSource::Named("WORKERS".to_owned())),
                help: Some("number of workers to start".to_owned()),
                ..Tag::default()
            }
        );
    }

    #[test]
    fn directive_order_is_insignificant() {
        assert_eq!(
            Tag::parse("help:list of outputs,positional").unwrap(),
            Tag::parse("positional,help:list of outputs").unwrap(),
        );
    }

    #[test]
    fn aliases_accumulate() {
        let tag = Tag::parse("-v,--verbose-mode,-V,-v").unwrap();
        assert_eq!(tag.aliases, ['v', 'V']);
        assert_eq!(tag.long.as_deref(), Some("verbose-mode"));
    }

    #[test]
    fn help_text_escapes() {
        let tag = Tag::parse(r"help:first\, second: third,required").unwrap();
        assert_eq!(tag.help.as_deref(), Some("first, second: third"));
        assert!(tag.required);

        assert_eq!(error_kind(r"help:oops\"), TagErrorKind::DanglingEscape);
    }

    #[test]
    fn whitespace_around_directives() {
        let tag = Tag::parse("positional, help:spaced out, env").unwrap();
        assert!(tag.positional);
        assert_eq!(tag.help.as_deref(), Some("spaced out"));
        assert_eq!(tag.env, Some(EnvSource::Derived));
    }

    #[test]
    fn help_text_is_trimmed_at_both_ends() {
        let tag = Tag::parse("help:  two  spaces  ,positional").unwrap();
        assert_eq!(tag.help.as_deref(), Some("two  spaces"));

        assert_eq!(
            Tag::parse("help:   padded").unwrap().help,
            Tag::parse("help:padded   ").unwrap().help,
        );
    }

    #[test]
    fn duplicates_are_rejected() {
        assert_eq!(error_kind("positional,positional"), TagErrorKind::Duplicate);
        assert_eq!(error_kind("help:a,help:b"), TagErrorKind::Duplicate);
        assert_eq!(error_kind("env,env:X"), TagErrorKind::Duplicate);
        assert_eq!(error_kind("--a,--b"), TagErrorKind::Duplicate);
    }

    #[test]
    fn unknown_directives_fail_closed() {
        let err = Tag::parse("positional,halp:typo").unwrap_err();
        assert_eq!(err.kind, TagErrorKind::UnknownKey);
        assert_eq!(err.fragment, "halp:typo");

        assert_eq!(error_kind("positonal"), TagErrorKind::UnknownDirective);
        assert_eq!(error_kind("positional,,-v"), TagErrorKind::Empty);
        assert_eq!(error_kind("env:"), TagErrorKind::MissingValue);
    }

    #[test]
    fn bad_aliases() {
        assert_eq!(error_kind("-vv"), TagErrorKind::InvalidAlias);
        assert_eq!(error_kind("-1"), TagErrorKind::InvalidAlias);
        assert_eq!(error_kind("-."), TagErrorKind::InvalidAlias);
        assert_eq!(error_kind("--=x"), TagErrorKind::InvalidLong);
        assert_eq!(error_kind("--9lives"), TagErrorKind::InvalidLong);
    }

    #[test]
    fn positionals_have_no_flag_names() {
        assert_eq!(
            error_kind("positional,-i"),
            TagErrorKind::PositionalWithFlagName
        );
    }
}
