use time::Date;

use crate::stats::{Averages, DailyTemperatures, Extreme, Extremes, Summary};

pub const NO_EXTREMES: &str = "No data available for extremes for given input.";
pub const NO_AVERAGES: &str = "No data available for averages for given input.";
pub const NO_DAILY: &str = "No data available for daily temperatures for given month.";

/// Longest bar drawn, readings above it are clamped.
pub const MAX_BAR: usize = 100;

const BLUE: &str = "\x1b[34m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// How the daily bars are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    /// Blue `*` for the minimum, red `*` for the maximum.
    Ansi,
    /// `-` for the minimum, `+` for the maximum, no escape codes.
    Plain,
}

impl Palette {
    fn min_bar(self, temperature: f32) -> String {
        match self {
            Palette::Ansi => format!("{BLUE}{}{RESET}", "*".repeat(bar_length(temperature))),
            Palette::Plain => "-".repeat(bar_length(temperature)),
        }
    }

    fn max_bar(self, temperature: f32) -> String {
        match self {
            Palette::Ansi => format!("{RED}{}{RESET}", "*".repeat(bar_length(temperature))),
            Palette::Plain => "+".repeat(bar_length(temperature)),
        }
    }
}

/// Negative temperatures get an empty bar.
fn bar_length(temperature: f32) -> usize {
    temperature.round().clamp(0.0, MAX_BAR as f32) as usize
}

/// Whole degrees are printed without decimals.
fn temperature(value: f32) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

/// `January 02`
fn day_of_year(date: Date) -> String {
    format!("{} {:02}", date.month(), date.day())
}

pub fn render_extremes(extremes: &Extremes) -> String {
    let Extremes {
        highest: Some(highest),
        lowest: Some(lowest),
        most_humid: Some(most_humid),
    } = extremes
    else {
        return NO_EXTREMES.to_string();
    };
    let line = |label: &str, extreme: &Extreme, unit: &str| {
        format!(
            "{label}: {:.1}{unit} on {}",
            extreme.value,
            day_of_year(extreme.date)
        )
    };

    [
        line("Highest", highest, "C"),
        line("Lowest", lowest, "C"),
        line("Humidity", most_humid, "%"),
    ]
    .join("\n")
}

pub fn render_averages(averages: &Averages) -> String {
    let Averages {
        max_temperature: Some(max_temperature),
        min_temperature: Some(min_temperature),
        mean_humidity: Some(mean_humidity),
    } = averages
    else {
        return NO_AVERAGES.to_string();
    };

    format!(
        "Average highest: {max_temperature:.1}C\n\
         Average lowest: {min_temperature:.1}C\n\
         Average humidity: {mean_humidity:.1}%"
    )
}

pub fn render_daily(daily: &DailyTemperatures, palette: Palette) -> String {
    if daily.entries.is_empty() {
        return NO_DAILY.to_string();
    }

    daily
        .entries
        .iter()
        .map(|entry| {
            format!(
                "{:02} {}C {}{} {}C",
                entry.date.day(),
                temperature(entry.min_temperature),
                palette.min_bar(entry.min_temperature),
                palette.max_bar(entry.max_temperature),
                temperature(entry.max_temperature),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render(summary: &Summary, palette: Palette) -> String {
    match summary {
        Summary::Extremes(extremes) => render_extremes(extremes),
        Summary::Averages(averages) => render_averages(averages),
        Summary::Daily(daily) => render_daily(daily, palette),
    }
}
