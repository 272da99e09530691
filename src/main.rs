use std::{
    io::{self, IsTerminal},
    process::ExitCode,
};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use weatherman::{run, validate, Palette};

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("weatherman=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(io::stderr)
                .compact(),
        )
        .init();
}

fn main() -> ExitCode {
    setup_logging();

    let request = match validate(std::env::args().skip(1)) {
        Ok(request) => request,
        Err(e) => {
            println!("{e}");
            return ExitCode::from(1);
        }
    };

    let stdout = io::stdout();
    let palette = if stdout.is_terminal() {
        Palette::Ansi
    } else {
        Palette::Plain
    };

    let outcome = match run(&request, palette, stdout.lock()) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Could not write the report: {e}");
            return ExitCode::from(2);
        }
    };

    if outcome.is_success() {
        return ExitCode::SUCCESS;
    }
    for (command, e) in outcome.failures {
        eprintln!("{command} failed:");
        eprintln!("{:?}", miette::Report::new(e));
    }
    ExitCode::from(2)
}
