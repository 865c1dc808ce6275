pub mod catalog;
pub mod decompose;
pub mod inference;
pub mod redundancy;
pub mod sample;
pub mod stepper;

pub use crate::domain::model::{Dataset, NormalForm, Record, StepResult};
pub use crate::domain::ports::{DatasetSource, Decomposer};
pub use crate::utils::error::Result;
