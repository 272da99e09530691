//! Discovery and parsing of the observation files.
//!
//! Files are named `lahore_weather_<year>_<Mon>.<ext>` and hold one CSV row
//! per day. Two header dialects exist in the wild, they only differ by the
//! name of the date column.

use std::{
    fs::{self, File},
    io,
    path::PathBuf,
};

use csv::StringRecord;
use miette::Diagnostic;
use thiserror::Error;
use time::{Date, Month};
use tracing::{debug, warn};

use crate::Observation;

pub const FILE_PREFIX: &str = "lahore_weather";

const MAX_TEMPERATURE: &str = "Max TemperatureC";
const MEAN_TEMPERATURE: &str = "Mean TemperatureC";
const MIN_TEMPERATURE: &str = "Min TemperatureC";
const MAX_HUMIDITY: &str = "Max Humidity";
const MEAN_HUMIDITY: &str = "Mean Humidity";
const MIN_HUMIDITY: &str = "Min Humidity";

#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    #[error("Could not list {}", dir.display())]
    #[diagnostic(code(weatherman::load::read_dir))]
    ReadDir {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Could not open {}", path.display())]
    #[diagnostic(code(weatherman::load::open), help("check the file permissions"))]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Could not read {}", path.display())]
    #[diagnostic(code(weatherman::load::read))]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Name of the date column, the only thing telling the two dialects apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Pakistan standard time.
    Pkt,
    /// Pakistan summer time.
    Pkst,
}

impl Dialect {
    pub fn date_column(self) -> &'static str {
        match self {
            Dialect::Pkt => "PKT",
            Dialect::Pkst => "PKST",
        }
    }

    pub fn detect(headers: &StringRecord) -> Option<Self> {
        [Dialect::Pkt, Dialect::Pkst]
            .into_iter()
            .find(|dialect| headers.iter().any(|h| h == dialect.date_column()))
    }
}

/// Column positions of one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Schema {
    dialect: Dialect,
    date: usize,
    max_temperature: usize,
    mean_temperature: usize,
    min_temperature: usize,
    max_humidity: usize,
    mean_humidity: usize,
    min_humidity: usize,
}

impl Schema {
    fn detect(headers: &StringRecord) -> Option<Self> {
        let column = |name: &str| headers.iter().position(|h| h == name);
        let dialect = Dialect::detect(headers)?;

        Some(Self {
            dialect,
            date: column(dialect.date_column())?,
            max_temperature: column(MAX_TEMPERATURE)?,
            mean_temperature: column(MEAN_TEMPERATURE)?,
            min_temperature: column(MIN_TEMPERATURE)?,
            max_humidity: column(MAX_HUMIDITY)?,
            mean_humidity: column(MEAN_HUMIDITY)?,
            min_humidity: column(MIN_HUMIDITY)?,
        })
    }

    /// `None` as soon as one field is missing or unparsable.
    fn observation(&self, record: &StringRecord) -> Option<Observation> {
        let reading = |idx: usize| {
            record
                .get(idx)?
                .parse::<f32>()
                .ok()
                .filter(|value| value.is_finite())
        };

        Some(Observation {
            date: parse_date(record.get(self.date)?)?,
            max_temperature: reading(self.max_temperature)?,
            mean_temperature: reading(self.mean_temperature)?,
            min_temperature: reading(self.min_temperature)?,
            max_humidity: reading(self.max_humidity)?,
            mean_humidity: reading(self.mean_humidity)?,
            min_humidity: reading(self.min_humidity)?,
        })
    }
}

/// Parses `YYYY-MM-DD`. The data files don't pad months and days, both forms
/// are accepted.
fn parse_date(s: &str) -> Option<Date> {
    let mut parts = s.split('-');
    let year = parts.next()?.parse().ok()?;
    let month = Month::try_from(parts.next()?.parse::<u8>().ok()?).ok()?;
    let day = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Date::from_calendar_date(year, month, day).ok()
}

pub fn month_abbreviation(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

/// Parses one observation file.
///
/// Rows with a missing or malformed reading are skipped, and a file without
/// the expected columns yields nothing. Only I/O errors are reported.
pub fn parse_observations(input: impl io::Read) -> io::Result<Vec<Observation>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(e) => return io_error(e).map(|()| Vec::new()),
    };
    if let Some(first) = headers.get(0) {
        let first = first.trim_start_matches('\u{feff}').to_string();
        headers = std::iter::once(first.as_str())
            .chain(headers.iter().skip(1))
            .collect();
    }

    let Some(schema) = Schema::detect(&headers) else {
        warn!(?headers, "unknown schema, ignoring the file");
        return Ok(Vec::new());
    };

    let mut observations = Vec::new();
    let mut skipped = 0usize;
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                io_error(e)?;
                skipped += 1;
                continue;
            }
        };
        match schema.observation(&record) {
            Some(observation) => observations.push(observation),
            None => skipped += 1,
        }
    }
    debug!(dialect = ?schema.dialect, kept = observations.len(), skipped, "parsed observations");

    Ok(observations)
}

/// Keeps the I/O errors, swallows the malformed CSV ones.
fn io_error(e: csv::Error) -> io::Result<()> {
    match e.into_kind() {
        csv::ErrorKind::Io(e) => Err(e),
        _ => Ok(()),
    }
}

/// Loads the observations of a directory, one year or one month at a time.
///
/// Nothing is cached, each call lists the directory again.
#[derive(Debug, Clone)]
pub struct ObservationLoader {
    dir: PathBuf,
}

impl ObservationLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn load_year(&self, year: i32) -> Result<Vec<Observation>, LoadError> {
        self.load(&format!("{FILE_PREFIX}_{year}"))
    }

    pub fn load_month(&self, year: i32, month: Month) -> Result<Vec<Observation>, LoadError> {
        self.load(&format!(
            "{FILE_PREFIX}_{year}_{}",
            month_abbreviation(month)
        ))
    }

    /// Concatenates every file starting with `prefix`, in directory order.
    fn load(&self, prefix: &str) -> Result<Vec<Observation>, LoadError> {
        let read_dir_error = |source| LoadError::ReadDir {
            dir: self.dir.clone(),
            source,
        };

        let mut observations = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(read_dir_error)? {
            let entry = entry.map_err(read_dir_error)?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if !name.starts_with(prefix) {
                continue;
            }

            let path = entry.path();
            debug!(path = %path.display(), "loading observations");
            let file = File::open(&path).map_err(|source| LoadError::Open {
                path: path.clone(),
                source,
            })?;
            let mut parsed =
                parse_observations(file).map_err(|source| LoadError::Read { path, source })?;
            observations.append(&mut parsed);
        }

        Ok(observations)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::fixtures::LAHORE_2002_JAN;

    fn date(year: i32, month: Month, day: u8) -> Date {
        Date::from_calendar_date(year, month, day).unwrap()
    }

    /// Orders by date, then by every reading, to compare loads as multisets.
    fn sorted(mut observations: Vec<Observation>) -> Vec<Observation> {
        observations.sort_by(|left, right| {
            left.date
                .cmp(&right.date)
                .then(left.max_temperature.total_cmp(&right.max_temperature))
                .then(left.mean_temperature.total_cmp(&right.mean_temperature))
                .then(left.min_temperature.total_cmp(&right.min_temperature))
                .then(left.max_humidity.total_cmp(&right.max_humidity))
                .then(left.mean_humidity.total_cmp(&right.mean_humidity))
                .then(left.min_humidity.total_cmp(&right.min_humidity))
        });
        observations
    }

    #[test]
    fn parse_pkt_file() {
        let observations = parse_observations(LAHORE_2002_JAN.as_bytes()).unwrap();
        assert_eq!(observations.len(), 3);
        assert_eq!(
            observations[1],
            Observation {
                date: date(2002, Month::January, 2),
                max_temperature: 15.0,
                mean_temperature: 8.0,
                min_temperature: 2.0,
                max_humidity: 90.0,
                mean_humidity: 70.0,
                min_humidity: 50.0,
            }
        );
    }

    #[test]
    fn parse_pkst_file_with_extra_columns_and_padded_headers() {
        let input = "
PKST,Max TemperatureC, Mean TemperatureC ,Min TemperatureC,Dew PointC, Max Humidity, Mean Humidity, Min Humidity, Events
2006-7-1,38,33,28,26,84,63,42,Rain
2006-7-2,36,32,27,25,89,70,51,
<!-- 0.262:1 -->
";
        let observations = parse_observations(input.as_bytes()).unwrap();
        assert_eq!(observations.len(), 2);
        assert_eq!(observations[0].date, date(2006, Month::July, 1));
        assert_eq!(observations[0].max_humidity, 84.0);
        assert_eq!(observations[1].min_humidity, 51.0);
    }

    #[test]
    fn dialects_are_told_apart_by_the_date_column() {
        let pkt = StringRecord::from(vec!["PKT", "Max Humidity"]);
        let pkst = StringRecord::from(vec!["Max Humidity", "PKST"]);
        let none = StringRecord::from(vec!["Date", "Max Humidity"]);
        assert_eq!(Dialect::detect(&pkt), Some(Dialect::Pkt));
        assert_eq!(Dialect::detect(&pkst), Some(Dialect::Pkst));
        assert_eq!(Dialect::detect(&none), None);
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let mut input = String::from(
            "PKT,Max TemperatureC,Mean TemperatureC,Min TemperatureC,Max Humidity,Mean Humidity,Min Humidity\n",
        );
        for day in 1..=10 {
            if day == 4 {
                input.push_str("2002-01-04,hot,5,0,80,60,40\n");
            } else {
                input.push_str(&format!("2002-01-{day:02},10,5,0,80,60,40\n"));
            }
        }
        assert_eq!(parse_observations(input.as_bytes()).unwrap().len(), 9);
    }

    #[test]
    fn rows_with_missing_or_invalid_fields_are_skipped() {
        let input = "\
PKT,Max TemperatureC,Mean TemperatureC,Min TemperatureC,Max Humidity,Mean Humidity,Min Humidity
2002-01-01,10,5,0,80,,40
2002-02-30,10,5,0,80,60,40
2002-01-03,NaN,5,0,80,60,40
2002-01-04,10,5
not a date,10,5,0,80,60,40
2002-01-06,10,5,0,180,60,40
";
        let observations = parse_observations(input.as_bytes()).unwrap();
        assert_eq!(observations.len(), 1);
        // out of range humidity is passed through
        assert_eq!(observations[0].max_humidity, 180.0);
    }

    #[test]
    fn file_without_the_expected_columns_is_empty() {
        let input = "Date,Temperature\n2002-01-01,10\n";
        assert!(parse_observations(input.as_bytes()).unwrap().is_empty());
        assert!(parse_observations("".as_bytes()).unwrap().is_empty());

        let partial = "PKT,Max TemperatureC\n2002-01-01,10\n";
        assert!(parse_observations(partial.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn byte_order_mark_is_ignored() {
        let input = format!("\u{feff}{LAHORE_2002_JAN}");
        assert_eq!(parse_observations(input.as_bytes()).unwrap().len(), 3);
    }

    fn write(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join(name), content).unwrap();
    }

    #[test]
    fn load_by_year_and_month_prefix() {
        let dir = TempDir::new().unwrap();
        write(&dir, "lahore_weather_2002_Jan.txt", LAHORE_2002_JAN);
        write(
            &dir,
            "lahore_weather_2002_Feb.tsv",
            "PKT,Max TemperatureC,Mean TemperatureC,Min TemperatureC,Max Humidity,Mean Humidity,Min Humidity\n2002-2-1,20,15,10,60,50,40\n",
        );
        write(
            &dir,
            "lahore_weather_2003_Jan.txt",
            "PKT,Max TemperatureC,Mean TemperatureC,Min TemperatureC,Max Humidity,Mean Humidity,Min Humidity\n2003-1-1,20,15,10,60,50,40\n",
        );
        write(&dir, "karachi_weather_2002_Jan.txt", LAHORE_2002_JAN);

        let loader = ObservationLoader::new(dir.path());
        assert_eq!(loader.load_year(2002).unwrap().len(), 4);
        assert_eq!(loader.load_year(2003).unwrap().len(), 1);
        assert_eq!(loader.load_month(2002, Month::January).unwrap().len(), 3);
        assert_eq!(loader.load_month(2002, Month::February).unwrap().len(), 1);
        assert!(loader.load_month(2002, Month::March).unwrap().is_empty());
        assert!(loader.load_year(1996).unwrap().is_empty());
    }

    #[test]
    fn duplicate_files_are_concatenated() {
        let dir = TempDir::new().unwrap();
        write(&dir, "lahore_weather_2002_Jan.txt", LAHORE_2002_JAN);
        write(&dir, "lahore_weather_2002_Jan.csv", LAHORE_2002_JAN);

        let loader = ObservationLoader::new(dir.path());
        assert_eq!(loader.load_month(2002, Month::January).unwrap().len(), 6);
    }

    #[test]
    fn loading_twice_gives_the_same_observations() {
        let dir = TempDir::new().unwrap();
        write(&dir, "lahore_weather_2002_Jan.txt", LAHORE_2002_JAN);
        write(
            &dir,
            "lahore_weather_2002_Mar.txt",
            "PKST,Max TemperatureC,Mean TemperatureC,Min TemperatureC,Max Humidity,Mean Humidity,Min Humidity\n2002-3-1,25,20,15,70,50,30\n",
        );

        let loader = ObservationLoader::new(dir.path());
        let first = sorted(loader.load_year(2002).unwrap());
        let second = sorted(loader.load_year(2002).unwrap());
        assert_eq!(first.len(), 4);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_directory_yields_nothing() {
        let dir = TempDir::new().unwrap();
        let loader = ObservationLoader::new(dir.path());
        assert!(loader.load_year(2002).unwrap().is_empty());
        assert!(loader.load_month(2002, Month::January).unwrap().is_empty());
    }

    #[test]
    fn vanished_directory_is_a_load_error() {
        let dir = TempDir::new().unwrap();
        let loader = ObservationLoader::new(dir.path().join("gone"));
        assert!(matches!(
            loader.load_year(2002),
            Err(LoadError::ReadDir { .. })
        ));
    }

    #[test]
    fn unreadable_match_is_a_load_error() {
        let dir = TempDir::new().unwrap();
        write(&dir, "lahore_weather_2002_Jan.txt", LAHORE_2002_JAN);
        // a directory can be opened but not read
        fs::create_dir(dir.path().join("lahore_weather_2002_Feb")).unwrap();

        let loader = ObservationLoader::new(dir.path());
        assert!(matches!(
            loader.load_year(2002),
            Err(LoadError::Open { .. } | LoadError::Read { .. })
        ));
        assert_eq!(loader.load_month(2002, Month::January).unwrap().len(), 3);
    }
}
