use std::{
    io::{self, Write as _},
    path::PathBuf,
    process::ExitCode,
    time::SystemTime,
};

use anyhow::Context as _;
use argbind::{Args, LoadedArguments, ParseError, Parser};

#[derive(Args, Debug, Default)]
struct Arguments {
    #[arg("positional,help:file to read")]
    input: PathBuf,

    #[arg("positional,help:list of outputs")]
    output: Vec<String>,

    #[arg("help:name to use")]
    name: String,

    #[arg("-v,help:verbosity level")]
    verbose: bool,

    #[arg("-O,help:optimization level")]
    optimize: u8,

    /// Ids to process
    ids: Vec<i64>,

    #[arg("-w,env:WORKERS,help:number of workers to start")]
    workers: u32,

    /// Weights, separated by commas when given through DEMO_WEIGHTS
    #[arg("--weight,env:DEMO_WEIGHTS")]
    weights: Vec<f64>,

    #[arg("-")]
    started: Option<SystemTime>,
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();

    let loaded = LoadedArguments::from_env();
    let config = loaded.config().with_version(env!("CARGO_PKG_VERSION"));

    let mut arguments = Arguments {
        name: "Foo Bar".to_owned(),
        workers: 4,
        started: Some(SystemTime::now()),
        ..Arguments::default()
    };

    let mut parser =
        Parser::new(config, &mut arguments).context("argument definitions are invalid")?;

    match loaded.parse_into(&mut parser) {
        Ok(()) => {}
        Err(ParseError::HelpRequested) => {
            parser.write_help(&mut io::stdout().lock())?;
            return Ok(ExitCode::SUCCESS);
        }
        Err(ParseError::VersionRequested) => {
            parser.write_version(&mut io::stdout().lock())?;
            return Ok(ExitCode::SUCCESS);
        }
        Err(err) => {
            let mut stderr = io::stderr().lock();
            parser.write_usage(&mut stderr)?;
            writeln!(stderr, "error: {err}")?;
            return Ok(ExitCode::FAILURE);
        }
    }

    drop(parser);

    log::info!(
        "parsed {} output(s) with {} worker(s)",
        arguments.output.len(),
        arguments.workers
    );

    println!("{arguments:#?}");
    Ok(ExitCode::SUCCESS)
}
