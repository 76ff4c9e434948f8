use argbind::{Args, BindError, Binder, Config, LoadedArguments, Parser};
use pretty_assertions::assert_eq;

#[derive(Args, Default)]
struct Example {
    #[arg("positional")]
    input: String,

    #[arg("positional,help:list of outputs")]
    output: Vec<String>,

    #[arg("help:name to use")]
    name: String,

    #[arg("help:secret value")]
    value: i32,

    #[arg("-v,help:verbosity level")]
    verbose: bool,

    #[arg("help:dataset to use")]
    dataset: String,

    #[arg("-O,help:optimization level")]
    optimize: i32,

    #[arg("help:Ids")]
    ids: Vec<i64>,

    #[arg("help:Values")]
    values: Vec<f64>,

    #[arg("-w,env:WORKERS,help:number of workers to start")]
    workers: i32,
}

fn example() -> Example {
    Example {
        name: "Foo Bar".to_owned(),
        value: 42,
        values: vec![3.14, 42.0, 256.0],
        ..Example::default()
    }
}

/// A config whose program name comes from an `argv[0]`, the way a real
/// program would get it.
fn config() -> Config {
    LoadedArguments::new(["/usr/local/bin/example"]).config()
}

fn render(write: impl FnOnce(&mut Vec<u8>) -> std::io::Result<()>) -> String {
    let mut out = Vec::new();
    write(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

const EXPECTED_USAGE: &str = "usage: example [--name NAME] [--value VALUE] [--verbose] [--dataset DATASET] [--optimize OPTIMIZE] [--ids IDS] [--values VALUES] [--workers WORKERS] INPUT [OUTPUT [OUTPUT ...]]\n";

const EXPECTED_HELP: &str = "\
usage: example [--name NAME] [--value VALUE] [--verbose] [--dataset DATASET] [--optimize OPTIMIZE] [--ids IDS] [--values VALUES] [--workers WORKERS] INPUT [OUTPUT [OUTPUT ...]]

positional arguments:
  input
  output                 list of outputs

options:
  --name NAME            name to use [default: Foo Bar]
  --value VALUE          secret value [default: 42]
  --verbose, -v          verbosity level
  --dataset DATASET      dataset to use
  --optimize OPTIMIZE, -O OPTIMIZE
                         optimization level
  --ids IDS              Ids
  --values VALUES        Values [default: [3.14 42 256]]
  --workers WORKERS, -w WORKERS
                         number of workers to start
  --help, -h             display this help and exit
";

#[test]
fn write_usage() {
    let mut args = example();
    let parser = Parser::new(config(), &mut args).unwrap();

    assert_eq!(render(|out| parser.write_usage(out)), EXPECTED_USAGE);
}

#[test]
fn write_help() {
    let mut args = example();
    let parser = Parser::new(config(), &mut args).unwrap();

    assert_eq!(render(|out| parser.write_help(out)), EXPECTED_HELP);
}

#[test]
fn defaults_are_captured_at_bind_time() {
    let mut args = example();
    let mut parser = Parser::new(config(), &mut args).unwrap();

    parser
        .parse_with_env(["in", "--value", "7", "--values", "1"], |_| None)
        .unwrap();

    assert_eq!(render(|out| parser.write_help(out)), EXPECTED_HELP);
    drop(parser);

    assert_eq!(args.value, 7);
    assert_eq!(args.values, [1.0]);
}

struct LongPositional {
    value: String,
}

impl Args for LongPositional {
    fn bind<'a>(&'a mut self, binder: &mut Binder<'a>) -> Result<(), BindError> {
        binder.field(
            "VeryLongPositionalWithHelp",
            "positional,help:this positional argument is very long",
            &mut self.value,
        )
    }
}

#[test]
fn long_positional_with_help() {
    let expected = "\
usage: example VERYLONGPOSITIONALWITHHELP

positional arguments:
  verylongpositionalwithhelp
                         this positional argument is very long

options:
  --help, -h             display this help and exit
";

    let mut args = LongPositional {
        value: String::new(),
    };
    let parser = Parser::new(config(), &mut args).unwrap();

    assert_eq!(render(|out| parser.write_help(out)), expected);
}

#[derive(Args)]
struct Empty {}

#[test]
fn program_name() {
    let expected = "\
usage: myprogram

options:
  --help, -h             display this help and exit
";

    let mut args = Empty {};
    let parser = Parser::new(config().with_program("myprogram"), &mut args).unwrap();

    assert_eq!(render(|out| parser.write_help(out)), expected);
}

#[derive(Args, Default)]
struct Verbose {
    #[arg("-v,help:verbosity level")]
    verbose: bool,
}

#[test]
fn version_in_help() {
    let expected = "\
usage: example [--verbose]

options:
  --verbose, -v          verbosity level
  --help, -h             display this help and exit
  --version              output version information and exit
";

    let mut args = Verbose::default();
    let parser = Parser::new(config().with_version("1.2.3"), &mut args).unwrap();

    assert_eq!(render(|out| parser.write_help(out)), expected);
}

#[test]
fn write_version() {
    let mut args = Empty {};
    let parser = Parser::new(config().with_version("1.0.0"), &mut args).unwrap();
    assert_eq!(render(|out| parser.write_version(out)), "example 1.0.0\n");
}

#[test]
fn version_with_program_name() {
    let config = Config::new()
        .with_program("myprogram")
        .with_version("1.0.0");
    let mut args = Empty {};
    let parser = Parser::new(config, &mut args).unwrap();

    assert_eq!(render(|out| parser.write_version(out)), "myprogram 1.0.0\n");
}

#[test]
fn no_version() {
    let mut args = Empty {};
    let parser = Parser::new(config(), &mut args).unwrap();

    assert!(parser.lookup("version").is_none());
    assert_eq!(render(|out| parser.write_version(out)), "example\n");
}

/// Doc comments stand in for missing `help:` directives
#[derive(Args, Default)]
struct Documented {
    /// the file to read
    #[arg("positional")]
    input: String,

    /// how many times
    /// to repeat it
    #[arg("-r")]
    repeat: u32,

    /// ignored, since there's explicit help
    #[arg("-q,help:say less")]
    quiet: bool,

    #[arg("required,help:API token")]
    token: String,

    #[arg("positional,help:extra files")]
    rest: Vec<String>,
}

#[test]
fn documented_fields() {
    let expected = "\
usage: example [--repeat REPEAT] [--quiet] --token TOKEN INPUT [REST [REST ...]]

positional arguments:
  input                  the file to read
  rest                   extra files

options:
  --repeat REPEAT, -r REPEAT
                         how many times to repeat it
  --quiet, -q            say less
  --token TOKEN          API token
  --help, -h             display this help and exit
";

    let mut args = Documented::default();
    let parser = Parser::new(config(), &mut args).unwrap();

    assert_eq!(render(|out| parser.write_help(out)), expected);
}

#[derive(Args)]
struct Preset {
    #[arg("positional")]
    input: String,

    #[arg("positional,required")]
    files: Vec<String>,
}

#[test]
fn preset_and_required_positionals() {
    let mut args = Preset {
        input: "in.txt".to_owned(),
        files: Vec::new(),
    };
    let parser = Parser::new(config(), &mut args).unwrap();

    assert_eq!(
        render(|out| parser.write_usage(out)),
        "usage: example [INPUT] FILES [FILES ...]\n"
    );
}
