//! HQL Splitter entry point.

use hql_splitter::audit::RunLogger;
use hql_splitter::config::{Config, OutputFormat};
use hql_splitter::context::EngineContext;
use hql_splitter::decision::Decision;
use hql_splitter::guard::check_statements;
use hql_splitter::input::ScriptSource;
use hql_splitter::output::{format_rejection, format_statements};
use hql_splitter::script::split_statements;

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Splits HiveQL scripts into executable statements.
#[derive(clap::Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Print statements as JSON lines.
    #[arg(long)]
    json: bool,

    /// Build the engine context in this directory and print it.
    #[arg(long, value_name = "DIR")]
    context: Option<PathBuf>,

    /// Script to split (stdin if absent or `-`).
    script: Option<String>,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(a) => a,
        Err(e) => {
            // --help and --version land here too.
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    // Load config (user + project in cwd)
    let cwd = std::env::current_dir().ok();
    let config = match Config::load(cwd.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(dir) = &args.context {
        return print_context(dir, &config);
    }

    let compiled = match config.compile() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let source = ScriptSource::from_arg(args.script.as_deref());
    let script = match source.read() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let statements = split_statements(&script);
    let decision = check_statements(&statements, &compiled);

    // Run log (if enabled); failures here never change the outcome
    if compiled.raw.audit.enabled
        && let Some(path) = &compiled.raw.audit.path
        && let Ok(mut logger) = RunLogger::open(Path::new(path))
    {
        let _ = logger.log_run(&source.to_string(), &statements, &decision);
    }

    match &decision {
        Decision::Accept => {
            let format = if args.json {
                OutputFormat::Json
            } else {
                compiled.raw.output_format()
            };
            match format_statements(&statements, format) {
                Ok(out) => {
                    print!("{}", out);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("error: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Decision::Reject(info) => {
            eprintln!("{}", format_rejection(info));
            ExitCode::from(2)
        }
    }
}

fn print_context(dir: &Path, config: &Config) -> ExitCode {
    let ctx = match EngineContext::init(dir, &config.overrides) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    match serde_json::to_string_pretty(&ctx) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
