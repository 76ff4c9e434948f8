/*!
`#[derive(Args)]` for the `argbind` crate. Use it through `argbind`, which
re-exports it.

Every named field is bound in declaration order. A field's tag string comes
from `#[arg("...")]` (fields without one are plain options), and its doc
comment becomes its help text unless the tag has a `help:` directive. Fields
tagged `#[arg("-")]` are skipped entirely, so they can be of any type.
*/

mod args;
mod common;

use proc_macro::TokenStream;

#[proc_macro_derive(Args, attributes(arg))]
pub fn derive_args(item: TokenStream) -> TokenStream {
    match args::derive_args_result(item.into()) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
