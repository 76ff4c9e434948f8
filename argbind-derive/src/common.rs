use itertools::Itertools as _;
use proc_macro2::TokenStream as TokenStream2;
use quote::ToTokens;
use syn::{Attribute, Expr, Field, Ident, LitStr, spanned::Spanned as _};

/// An identifier, along with its string form. Raw identifiers (`r#type`) are
/// stored without the `r#`, since that's the name users expect to see.
pub struct IdentString<'a> {
    raw: &'a Ident,
    string: String,
}

impl<'a> IdentString<'a> {
    pub fn new(ident: &'a Ident) -> Self {
        let string = ident.to_string();

        Self {
            string: match string.strip_prefix("r#") {
                Some(unraw) => unraw.to_owned(),
                None => string,
            },
            raw: ident,
        }
    }

    pub fn as_str(&self) -> &str {
        self.string.as_str()
    }
}

impl ToTokens for IdentString<'_> {
    fn to_tokens(&self, tokens: &mut TokenStream2) {
        self.raw.to_tokens(tokens);
    }
}

/// Collect the lines of a doc comment, one per `#[doc]` attribute.
pub fn compute_docs(attrs: &[Attribute]) -> syn::Result<Vec<String>> {
    attrs
        .iter()
        .filter_map(|attr| match attr.meta {
            syn::Meta::NameValue(ref meta) => Some(meta),
            _ => None,
        })
        .filter(|meta| meta.path.is_ident("doc"))
        .map(|meta| match meta.value {
            Expr::Lit(ref lit) => match lit.lit {
                syn::Lit::Str(ref lit) => Ok(lit.value()),
                _ => Err(syn::Error::new(meta.span(), "malformed #[doc] attribute")),
            },
            Expr::Macro(ref expr) => Err(syn::Error::new(
                expr.span(),
                "macro #[doc] attributes aren't supported",
            )),
            _ => Err(syn::Error::new(meta.span(), "malformed #[doc] attribute")),
        })
        .collect()
}

/// Find the tag string in `#[arg("...")]`, if there is one. At most one
/// `#[arg]` attribute is allowed per field.
pub fn compute_tag(attrs: &[Attribute]) -> syn::Result<Option<LitStr>> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("arg"))
        .at_most_one()
        .map_err(|mut attrs| {
            let second = attrs.nth(1).map(|attr| attr.span());
            syn::Error::new(
                second.unwrap_or_else(proc_macro2::Span::call_site),
                "a field can only have one #[arg] attribute; combine the directives with commas",
            )
        })?
        .map(|attr| attr.parse_args::<LitStr>())
        .transpose()
}

pub struct ParsedFieldInfo<'a> {
    pub ident: IdentString<'a>,
    pub tag: LitStr,
    pub docs: Vec<String>,
}

impl<'a> ParsedFieldInfo<'a> {
    /// Parse a field. Returns `None` for fields tagged `#[arg("-")]`, which
    /// aren't bound at all.
    pub fn from_field(field: &'a Field) -> syn::Result<Option<Self>> {
        let ident = field
            .ident
            .as_ref()
            .map(IdentString::new)
            .ok_or_else(|| syn::Error::new(field.span(), "fields must be named"))?;

        let tag = compute_tag(&field.attrs)?
            .unwrap_or_else(|| LitStr::new("", ident.raw.span()));

        if tag.value().trim() == "-" {
            return Ok(None);
        }

        let docs = compute_docs(&field.attrs)?;

        Ok(Some(Self { ident, tag, docs }))
    }
}

#[cfg(test)]
mod tests {
    use syn::{FieldsNamed, parse_quote};

    use super::*;

    fn fields(fields: FieldsNamed) -> Vec<Field> {
        fields.named.into_iter().collect()
    }

    #[test]
    fn raw_identifiers() {
        let ident: Ident = parse_quote!(r#type);
        assert_eq!(IdentString::new(&ident).as_str(), "type");
    }

    #[test]
    fn docs_and_tag() {
        let fields = fields(parse_quote!({
            /// number of workers
            /// to start
            #[arg("-w,env:WORKERS")]
            workers: u32,
        }));

        let info = ParsedFieldInfo::from_field(&fields[0]).unwrap().unwrap();
        assert_eq!(info.ident.as_str(), "workers");
        assert_eq!(info.tag.value(), "-w,env:WORKERS");
        assert_eq!(info.docs, [" number of workers", " to start"]);
    }

    #[test]
    fn untagged_fields_get_an_empty_tag() {
        let fields = fields(parse_quote!({ name: String }));
        let info = ParsedFieldInfo::from_field(&fields[0]).unwrap().unwrap();
        assert_eq!(info.tag.value(), "");
        assert!(info.docs.is_empty());
    }

    #[test]
    fn ignored_fields() {
        let fields = fields(parse_quote!({
            #[arg("-")]
            cache: std::collections::HashMap<String, String>,
        }));

        assert!(ParsedFieldInfo::from_field(&fields[0]).unwrap().is_none());
    }

    #[test]
    fn one_attribute_per_field() {
        let fields = fields(parse_quote!({
            #[arg("positional")]
            #[arg("help:input file")]
            input: String,
        }));

        assert!(ParsedFieldInfo::from_field(&fields[0]).is_err());
    }

    #[test]
    fn tags_must_be_strings() {
        let fields = fields(parse_quote!({
            #[arg(positional)]
            input: String,
        }));

        assert!(ParsedFieldInfo::from_field(&fields[0]).is_err());
    }
}
