/*!
Resolving collected tokens into field values.

Each field takes its value from the first of these that is present:

1. Tokens given explicitly on the command line
2. The field's environment variable, if it has one. Sequence fields split the
   variable's value on commas.
3. Whatever the field held when the parser was built

A required field that gets nothing from the first two is an error.
*/

use std::ffi::OsString;

use crate::{
    errors::{ConversionError, ParseError},
    spec::{ArgumentSpec, Repetition, Requirement},
    value::{Rejected, Value},
};

/// Split an environment variable's value into tokens for `spec`.
fn env_tokens(spec: &ArgumentSpec, raw: &str) -> Vec<String> {
    match (spec.repetition(), raw) {
        (Repetition::Multiple, "") => Vec::new(),
        (Repetition::Multiple, raw) => raw.split(',').map(str::to_owned).collect(),
        (Repetition::Single, raw) => vec![raw.to_owned()],
    }
}

fn assign(spec: &ArgumentSpec, slot: &mut dyn Value, tokens: &[String]) -> Result<(), ParseError> {
    let tokens: Vec<&str> = tokens.iter().map(String::as_str).collect();

    slot.assign(&tokens)
        .map_err(|Rejected { token, message }| ConversionError {
            field: spec.field().to_owned(),
            token,
            kind: spec.value(),
            message,
        })
        .map_err(ParseError::from)
}

/// Apply the precedence rules to every bound field, in declaration order.
/// Stops at the first failure.
pub(crate) fn resolve(
    specs: &[ArgumentSpec],
    slots: &mut [&mut dyn Value],
    explicit: Vec<Option<Vec<String>>>,
    mut lookup: impl FnMut(&str) -> Option<OsString>,
) -> Result<(), ParseError> {
    specs
        .iter()
        .zip(slots.iter_mut())
        .zip(explicit)
        .try_for_each(|((spec, slot), explicit)| {
            if let Some(tokens) = explicit {
                log::trace!("{}: using {} explicit token(s)", spec.field(), tokens.len());
                return assign(spec, &mut **slot, &tokens);
            }

            if let Some(var) = spec.env() {
                if let Some(raw) = lookup(var) {
                    let raw = raw.into_string().map_err(|raw| ParseError::InvalidUtf8 {
                        token: raw.to_string_lossy().into_owned(),
                    })?;

                    log::trace!("{}: using ${var}", spec.field());
                    return assign(spec, &mut **slot, &env_tokens(spec, &raw));
                }
            }

            match spec.requirement() {
                Requirement::Mandatory => Err(ParseError::MissingRequiredValue {
                    field: spec.field().to_owned(),
                    name: spec.display_name(),
                }),
                Requirement::Optional => Ok(()),
            }
        })
}
