use std::{fmt, path::PathBuf};

use logos::Logos;
use miette::Diagnostic;
use thiserror::Error;
use time::Month;

pub const USAGE: &str =
    "Usage: weatherman /path/to/files-dir -e 2002 | -a 2002/3 | -c 2002/12 [...]";

/// The dataset only covers these years.
pub const FIRST_YEAR: i32 = 1996;
pub const LAST_YEAR: i32 = 2011;

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
enum Token {
    #[regex("199[6-9]|200[0-9]|201[01]")]
    Year,
    #[token("/")]
    Slash,
    #[regex("0?[1-9]|1[0-2]")]
    Month,
}

/// One report to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `-e YYYY`
    Extremes { year: i32 },
    /// `-a YYYY/MM`
    Averages { year: i32, month: Month },
    /// `-c YYYY/MM`
    Daily { year: i32, month: Month },
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Extremes { year } => write!(f, "-e {year}"),
            Command::Averages { year, month } => write!(f, "-a {year}/{}", *month as u8),
            Command::Daily { year, month } => write!(f, "-c {year}/{}", *month as u8),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub dir: PathBuf,
    pub commands: Vec<Command>,
}

#[derive(Debug, Error, Diagnostic)]
pub enum ValidationError {
    #[error("{}", USAGE)]
    #[diagnostic(code(weatherman::args::usage))]
    Usage,
    #[error("Error: {} is not a valid directory", .0.display())]
    #[diagnostic(code(weatherman::args::path))]
    Path(PathBuf),
    #[error("Error: Year must be between 1996 and 2011")]
    #[diagnostic(code(weatherman::args::year), help("the observations cover 1996 to 2011"))]
    YearRange(String),
    #[error("Error: Year/Month must be provided in YYYY/MM format after {command} option")]
    #[diagnostic(code(weatherman::args::date), help("for example 2002/3 or 2002/03"))]
    DateFormat { command: String, value: String },
    #[error("Invalid option: {0}")]
    #[diagnostic(code(weatherman::args::command), help("expected one of -e, -a or -c"))]
    UnknownCommand(String),
}

/// Validates the arguments following the program name:
/// `<dir> <command> <value> [<command> <value> ...]`.
///
/// Every pair is checked before anything runs, the first invalid one fails
/// the whole request.
pub fn validate<I, S>(args: I) -> Result<Request, ValidationError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(Into::into).collect();
    let (dir, pairs) = match args.split_first() {
        Some((dir, pairs)) if pairs.len() >= 2 && pairs.len() % 2 == 0 => (dir, pairs),
        _ => return Err(ValidationError::Usage),
    };

    let dir = PathBuf::from(dir);
    if !dir.is_dir() {
        return Err(ValidationError::Path(dir));
    }

    let commands = pairs
        .chunks_exact(2)
        .map(|pair| parse_command(&pair[0], &pair[1]))
        .collect::<Result<_, _>>()?;

    Ok(Request { dir, commands })
}

fn parse_command(command: &str, value: &str) -> Result<Command, ValidationError> {
    let date_error = || ValidationError::DateFormat {
        command: command.to_string(),
        value: value.to_string(),
    };

    match command {
        "-e" => parse_year(value)
            .map(|year| Command::Extremes { year })
            .ok_or_else(|| ValidationError::YearRange(value.to_string())),
        "-a" => parse_year_month(value)
            .map(|(year, month)| Command::Averages { year, month })
            .ok_or_else(date_error),
        "-c" => parse_year_month(value)
            .map(|(year, month)| Command::Daily { year, month })
            .ok_or_else(date_error),
        other => Err(ValidationError::UnknownCommand(other.to_string())),
    }
}

fn tokens(value: &str) -> Option<Vec<(Token, &str)>> {
    let mut lexer = Token::lexer(value);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next() {
        tokens.push((token.ok()?, lexer.slice()));
    }
    Some(tokens)
}

/// Accepts exactly `YYYY` within the covered years.
pub fn parse_year(value: &str) -> Option<i32> {
    match tokens(value)?.as_slice() {
        [(Token::Year, year)] => year.parse().ok(),
        _ => None,
    }
}

/// Accepts exactly `YYYY/M` or `YYYY/MM` within the covered years.
pub fn parse_year_month(value: &str) -> Option<(i32, Month)> {
    match tokens(value)?.as_slice() {
        [(Token::Year, year), (Token::Slash, _), (Token::Month, month)] => {
            let month = month.parse::<u8>().ok()?;
            Some((year.parse().ok()?, Month::try_from(month).ok()?))
        }
        _ => None,
    }
}
