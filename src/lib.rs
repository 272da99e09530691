//! Reports over the daily weather observations recorded in Lahore.
//!
//! The binary validates a command line into an [`args::Request`], then for
//! every command loads the matching observation files with
//! [`loader::ObservationLoader`], aggregates them with [`stats`] and prints
//! the text produced by [`render`].

use time::Date;

pub mod args;
pub mod loader;
pub mod render;
pub mod run;
pub mod stats;

pub use args::{validate, Command, Request, ValidationError};
pub use loader::{parse_observations, Dialect, LoadError, ObservationLoader};
pub use render::Palette;
pub use run::{run, Outcome};
pub use stats::Summary;

/// The readings of a single day.
///
/// Rows that miss any of these values are dropped while loading, so every
/// field is always present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub date: Date,

    pub max_temperature: f32,
    pub mean_temperature: f32,
    pub min_temperature: f32,

    pub max_humidity: f32,
    pub mean_humidity: f32,
    pub min_humidity: f32,
}
