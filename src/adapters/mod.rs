// Adapters layer: concrete implementations for external collaborators (upload parsing, ...)

pub mod csv_source;

pub use csv_source::{parse_csv, CsvOptions, CsvSource};
