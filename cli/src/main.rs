use clap::Parser;
use lazylam::{Error, Prelude, RunOptions, execute, render_error};
use miette::{IntoDiagnostic, Result, WrapErr, miette};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

/// lazylam - a lazy lambda calculus interpreter
#[derive(Parser, Debug)]
#[command(name = "lazylam")]
#[command(about = "Run lazylam programs", long_about = None)]
struct Args {
    /// Program file (if neither a file nor -e is given, reads from stdin)
    file: Option<PathBuf>,

    /// Program text to run
    #[arg(short = 'e', long = "expr", conflicts_with = "file")]
    expression: Option<String>,

    /// Wrap the program in the standard prelude
    #[arg(long)]
    prelude: bool,

    /// Wall-clock limit for evaluation, in seconds
    #[arg(long, value_name = "SECS", default_value_t = 600.0)]
    time_limit: f64,

    /// Expression to splice into the end of the program's definitions
    #[arg(long, value_name = "TEXT")]
    inject: Option<String>,

    /// Render compile errors with a source snippet
    #[arg(long)]
    fancy: bool,
}

fn read_program(args: &Args) -> Result<(String, String)> {
    if let Some(text) = &args.expression {
        return Ok(("<EXPR>".to_string(), text.clone()));
    }
    if let Some(path) = &args.file {
        let text = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("cannot read {}", path.display()))?;
        return Ok((path.display().to_string(), text));
    }
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .into_diagnostic()
        .wrap_err("cannot read program from stdin")?;
    Ok(("<STDIN>".to_string(), text))
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging subscriber
    use tracing_subscriber::{EnvFilter, fmt};

    // Use RUST_LOG to control log level, default to WARN if not set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let time_limit = Duration::try_from_secs_f64(args.time_limit)
        .map_err(|_| miette!("invalid time limit: {}", args.time_limit))?;

    let mut options = RunOptions::default().with_time_limit(time_limit);
    if args.prelude {
        options = options.with_prelude(Prelude::Standard);
    }
    if let Some(body) = &args.inject {
        options = options.with_inject_body(body.as_str());
    }

    let (name, text) = read_program(&args)?;
    tracing::debug!(source = %name, bytes = text.len(), "Running program");

    let outcome = execute(&name, &text, &options);
    match &outcome.result {
        Err(err @ Error::Compile(_)) if args.fancy => render_error(err),
        _ => println!("{}", outcome),
    }

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
