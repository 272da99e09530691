use std::io::{self, Write};

use tracing::error;

use crate::{
    args::{Command, Request},
    loader::{LoadError, ObservationLoader},
    render::{render, Palette},
    stats::{self, Summary},
};

/// What went wrong while running a request. Commands that produced a report,
/// even an empty one, are not listed.
#[derive(Debug, Default)]
pub struct Outcome {
    pub failures: Vec<(Command, LoadError)>,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Loads and aggregates the observations needed by one command.
pub fn summarize(loader: &ObservationLoader, command: Command) -> Result<Summary, LoadError> {
    let summary = match command {
        Command::Extremes { year } => {
            Summary::Extremes(stats::yearly_extremes(&loader.load_year(year)?))
        }
        Command::Averages { year, month } => {
            Summary::Averages(stats::monthly_averages(&loader.load_month(year, month)?))
        }
        Command::Daily { year, month } => {
            Summary::Daily(stats::daily_temperatures(&loader.load_month(year, month)?))
        }
    };
    Ok(summary)
}

/// Runs every command in order and writes their reports to `out`.
///
/// A command that fails to load its files doesn't stop the following ones.
pub fn run(request: &Request, palette: Palette, mut out: impl Write) -> io::Result<Outcome> {
    let loader = ObservationLoader::new(&request.dir);
    let mut outcome = Outcome::default();

    for &command in &request.commands {
        match summarize(&loader, command) {
            Ok(summary) => writeln!(out, "{}", render(&summary, palette))?,
            Err(e) => {
                error!(%command, error = %e, "command failed");
                outcome.failures.push((command, e));
            }
        }
    }
    out.flush()?;

    Ok(outcome)
}
