pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{CsvOptions, CsvSource};
pub use config::StepperConfig;
pub use crate::core::{catalog::SchemaCatalog, stepper::Stepper};
pub use domain::model::{Dataset, NormalForm, Record, StepResult};
pub use utils::error::{NormalizeError, Result};
