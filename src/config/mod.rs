pub mod toml_config;

pub use toml_config::StepperConfig;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "nf-stepper")]
#[command(about = "Walk a dataset from unnormalized to 5NF one step at a time")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// CSV file to load instead of the built-in medical sample
    #[arg(short, long)]
    pub data: Option<String>,

    /// Number of normalization steps to take
    #[arg(short, long, default_value = "5")]
    pub steps: u8,

    /// Print each step result as JSON
    #[arg(long)]
    pub json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl crate::utils::validation::Validate for CliConfig {
    fn validate(&self) -> crate::utils::error::Result<()> {
        use crate::utils::validation::{validate_path, validate_range};

        if let Some(path) = &self.config {
            validate_path("config", path)?;
        }
        if let Some(path) = &self.data {
            validate_path("data", path)?;
        }
        validate_range("steps", self.steps, 0, 5)
    }
}
