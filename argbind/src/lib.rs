/*!
Declarative command-line argument binding. Describe your arguments as a
struct, tag each field with a short string, and `argbind` takes care of the
rest: flags and positionals, environment variable fallbacks, and usage and
help text.

```
use argbind::{Args, Config, Parser};

#[derive(Args, Default)]
struct Arguments {
    #[arg("positional")]
    input: String,

    #[arg("positional,help:list of outputs")]
    output: Vec<String>,

    #[arg("-v,help:verbosity level")]
    verbose: bool,

    #[arg("-w,env:WORKERS,help:number of workers to start")]
    workers: u32,
}

let mut arguments = Arguments::default();
let mut parser = Parser::new(Config::new().with_program("example"), &mut arguments).unwrap();

let mut usage = Vec::new();
parser.write_usage(&mut usage).unwrap();
assert_eq!(
    usage,
    b"usage: example [--verbose] [--workers WORKERS] INPUT [OUTPUT [OUTPUT ...]]\n"
);

parser
    .parse_with_env(["-v", "in.txt", "a.out", "b.out"], |_| None)
    .unwrap();
drop(parser);

assert!(arguments.verbose);
assert_eq!(arguments.output, ["a.out", "b.out"]);
```

The tag grammar is described in the [`tag`] module. Fields can be of any type
implementing [`Value`]: strings and paths, integers, floats, booleans (which
become flags), and `Vec`s of any of those.
*/

pub mod arguments;
pub mod binder;
mod build;
pub mod config;
pub mod errors;
pub mod parser;
mod printers;
pub mod spec;
mod state;
pub mod tag;
pub mod value;

pub use argbind_derive::Args;
pub use argbind_parser::Arg;

pub use crate::{
    arguments::LoadedArguments,
    binder::{Args, Binder, FieldInfo},
    config::{Config, set_version, version},
    errors::{BindError, ConversionError, ParseError},
    parser::Parser,
    spec::ArgumentSpec,
    value::{Scalar, Value},
};
