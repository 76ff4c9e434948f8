use itertools::Itertools as _;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{DeriveInput, Field, Fields, Generics, spanned::Spanned as _};

use crate::common::ParsedFieldInfo;

/// Lifetimes are fine, but a field whose type depends on a type or const
/// parameter can't be checked against the closed set of bindable types.
fn check_generics(generics: &Generics) -> syn::Result<()> {
    if let Some(param) = generics.const_params().next() {
        return Err(syn::Error::new(
            param.span(),
            "const generics aren't supported by argbind",
        ));
    }

    if let Some(param) = generics.type_params().next() {
        return Err(syn::Error::new(
            param.span(),
            "generic types aren't supported by argbind",
        ));
    }

    Ok(())
}

pub fn derive_args_result(item: TokenStream2) -> syn::Result<TokenStream2> {
    let input: DeriveInput = syn::parse2(item)?;
    check_generics(&input.generics)?;

    let fields: Vec<&Field> = match input.data {
        syn::Data::Struct(ref data) => match data.fields {
            Fields::Named(ref fields) => fields.named.iter().collect(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(ref fields) => {
                return Err(syn::Error::new(
                    fields.span(),
                    "can't derive `Args` on a tuple struct; fields need names",
                ));
            }
        },
        syn::Data::Enum(_) => {
            return Err(syn::Error::new(
                input.span(),
                "can't derive `Args` on an enum",
            ));
        }
        syn::Data::Union(_) => {
            return Err(syn::Error::new(
                input.span(),
                "can't derive `Args` on a union",
            ));
        }
    };

    let fields: Vec<ParsedFieldInfo> = fields
        .into_iter()
        .map(ParsedFieldInfo::from_field)
        .flatten_ok()
        .try_collect()?;

    let bindings = fields.iter().map(|field| {
        let ident = &field.ident;
        let name = field.ident.as_str();
        let tag = &field.tag;
        let docs = &field.docs;

        quote! {
            binder.bind_field(
                ::argbind::FieldInfo {
                    name: #name,
                    tag: #tag,
                    docs: &[#(#docs),*],
                },
                &mut self.#ident,
            )?;
        }
    });

    let name = &input.ident;
    let (impl_generics, type_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics ::argbind::binder::Args for #name #type_generics #where_clause {
            #[allow(unused_variables)]
            fn bind<'__argbind>(
                &'__argbind mut self,
                binder: &mut ::argbind::Binder<'__argbind>,
            ) -> ::core::result::Result<(), ::argbind::BindError> {
                #(#bindings)*
                ::core::result::Result::Ok(())
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use quote::quote;

    use super::*;

    fn error(input: TokenStream2) -> String {
        derive_args_result(input).unwrap_err().to_string()
    }

    #[test]
    fn rejects_non_structs() {
        assert!(error(quote! { enum Mode { Fast, Slow } }).contains("enum"));
        assert!(error(quote! { struct Pair(String, String); }).contains("tuple struct"));
    }

    #[test]
    fn rejects_type_generics() {
        assert!(error(quote! { struct Args<T> { value: T } }).contains("generic types"));
        assert!(error(quote! { struct Args<const N: usize> { value: u32 } }).contains("const"));
    }

    #[test]
    fn allows_lifetimes_and_unit_structs() {
        assert!(derive_args_result(quote! { struct Args<'a> { #[arg("-")] name: &'a str } }).is_ok());
        assert!(derive_args_result(quote! { struct Empty; }).is_ok());
    }

    #[test]
    fn ignored_fields_are_left_out() {
        let output = derive_args_result(quote! {
            struct Args {
                #[arg("positional")]
                input: String,
                #[arg("-")]
                cache: Vec<u8>,
            }
        })
        .unwrap()
        .to_string();

        assert!(output.contains("input"));
        assert!(!output.contains("cache"));
    }
}
