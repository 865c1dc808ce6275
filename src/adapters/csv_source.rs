use crate::domain::model::Dataset;
use crate::domain::ports::DatasetSource;
use crate::utils::error::{NormalizeError, Result};
use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct CsvOptions {
    pub delimiter: u8,
    /// 這些欄位會嘗試轉成數字，失敗時保留原字串
    pub numeric_fields: Vec<String>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            numeric_fields: Vec::new(),
        }
    }
}

impl CsvOptions {
    pub fn from_config(config: &crate::config::StepperConfig) -> Self {
        Self {
            delimiter: config.csv_delimiter(),
            numeric_fields: config.upload.numeric_fields.clone(),
        }
    }
}

/// 從本機檔案讀取上傳的 CSV
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    options: CsvOptions,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>, options: CsvOptions) -> Self {
        Self {
            path: path.into(),
            options,
        }
    }
}

impl DatasetSource for CsvSource {
    async fn read_dataset(&self) -> Result<Dataset> {
        tracing::debug!("Reading upload from {}", self.path.display());
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| NormalizeError::ParseFailure {
                message: format!("cannot read {}: {}", self.path.display(), e),
            })?;
        parse_csv(&bytes, &self.options)
    }
}

/// 解析含標題列的分隔文字。任何讀取錯誤都會轉成 `ParseFailure`。
pub fn parse_csv(bytes: &[u8], options: &CsvOptions) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let fields: Vec<String> = reader
        .headers()
        .map_err(parse_failure)?
        .iter()
        .map(str::to_string)
        .collect();

    if fields.iter().all(String::is_empty) {
        return Err(NormalizeError::ParseFailure {
            message: "missing header row".to_string(),
        });
    }

    let numeric: HashSet<&str> = options.numeric_fields.iter().map(String::as_str).collect();
    let mut rows = Vec::new();
    for row in reader.records() {
        let row = row.map_err(parse_failure)?;
        let values = fields
            .iter()
            .zip(row.iter())
            .map(|(field, raw)| {
                if numeric.contains(field.as_str()) {
                    coerce_number(raw)
                } else {
                    serde_json::Value::String(raw.to_string())
                }
            })
            .collect();
        rows.push(values);
    }

    tracing::debug!("Parsed {} rows with {} columns", rows.len(), fields.len());
    Dataset::from_rows(fields, rows)
}

fn coerce_number(raw: &str) -> serde_json::Value {
    if let Ok(n) = raw.parse::<i64>() {
        return serde_json::Value::from(n);
    }
    raw.parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(serde_json::Value::Number)
        .unwrap_or_else(|| serde_json::Value::String(raw.to_string()))
}

fn parse_failure(e: csv::Error) -> NormalizeError {
    NormalizeError::ParseFailure {
        message: e.to_string(),
    }
}
