use std::cmp::Ordering;

use time::Date;

use crate::Observation;

/// A reading and the day it was observed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extreme {
    pub value: f32,
    pub date: Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extremes {
    pub highest: Option<Extreme>,
    pub lowest: Option<Extreme>,
    pub most_humid: Option<Extreme>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Averages {
    pub max_temperature: Option<f32>,
    pub min_temperature: Option<f32>,
    pub mean_humidity: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyEntry {
    pub date: Date,
    pub max_temperature: f32,
    pub min_temperature: f32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DailyTemperatures {
    // Kept in loading order
    pub entries: Vec<DailyEntry>,
}

/// The outcome of one command.
#[derive(Debug, Clone, PartialEq)]
pub enum Summary {
    Extremes(Extremes),
    Averages(Averages),
    Daily(DailyTemperatures),
}

/// First observation whose reading compares as `wanted` against every
/// previous best. Ties keep the earliest observation.
fn first_extreme(
    observations: &[Observation],
    retrieve: fn(&Observation) -> f32,
    wanted: Ordering,
) -> Option<Extreme> {
    observations.iter().fold(None, |best, observation| {
        let value = retrieve(observation);
        match best {
            Some(best @ Extreme { value: current, .. })
                if value.partial_cmp(&current) != Some(wanted) =>
            {
                Some(best)
            }
            _ => Some(Extreme {
                value,
                date: observation.date,
            }),
        }
    })
}

fn mean(observations: &[Observation], retrieve: fn(&Observation) -> f32) -> Option<f32> {
    if observations.is_empty() {
        return None;
    }
    Some(observations.iter().map(retrieve).sum::<f32>() / observations.len() as f32)
}

pub fn yearly_extremes(observations: &[Observation]) -> Extremes {
    Extremes {
        highest: first_extreme(observations, |o| o.max_temperature, Ordering::Greater),
        lowest: first_extreme(observations, |o| o.min_temperature, Ordering::Less),
        most_humid: first_extreme(observations, |o| o.max_humidity, Ordering::Greater),
    }
}

/// The observations are expected to already belong to a single month.
pub fn monthly_averages(observations: &[Observation]) -> Averages {
    Averages {
        max_temperature: mean(observations, |o| o.max_temperature),
        min_temperature: mean(observations, |o| o.min_temperature),
        mean_humidity: mean(observations, |o| o.mean_humidity),
    }
}

pub fn daily_temperatures(observations: &[Observation]) -> DailyTemperatures {
    DailyTemperatures {
        entries: observations
            .iter()
            .map(|o| DailyEntry {
                date: o.date,
                max_temperature: o.max_temperature,
                min_temperature: o.min_temperature,
            })
            .collect(),
    }
}
