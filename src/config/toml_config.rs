use crate::core::redundancy::{LevelRule, RedundancyPolicy, RedundancyRule};
use crate::utils::error::{NormalizeError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepperConfig {
    pub session: SessionConfig,
    pub inference: InferenceConfig,
    pub upload: UploadConfig,
    pub redundancy: Vec<LevelRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// 範例資料集的起始冗餘分數
    pub initial_redundancy: u32,
    /// 多值欄位的分隔符
    pub delimiter: String,
    /// 需要同步拆分的平行多值欄位
    pub multi_valued_groups: Vec<Vec<String>>,
    /// 是否自動拆分其他含分隔符的字串欄位
    pub detect_multi_valued: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub distinct_threshold: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// 上傳時要轉成數字的欄位
    pub numeric_fields: Vec<String>,
    pub csv_delimiter: String,
}

impl Default for StepperConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            inference: InferenceConfig::default(),
            upload: UploadConfig::default(),
            redundancy: RedundancyPolicy::medical().rules().to_vec(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initial_redundancy: 15,
            delimiter: ",".to_string(),
            multi_valued_groups: vec![vec![
                "Treatment_ID".to_string(),
                "Treatment_Name".to_string(),
            ]],
            detect_multi_valued: true,
        }
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            distinct_threshold: crate::core::inference::DEFAULT_DISTINCT_THRESHOLD,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            numeric_fields: Vec::new(),
            csv_delimiter: ",".to_string(),
        }
    }
}

impl StepperConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(NormalizeError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| NormalizeError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${NUMERIC_FIELD})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| NormalizeError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("session.delimiter", &self.session.delimiter)?;

        for group in &self.session.multi_valued_groups {
            validation::validate_positive_number("session.multi_valued_groups", group.len(), 1)?;
            validation::validate_unique("session.multi_valued_groups", group)?;
        }

        validation::validate_positive_number(
            "inference.distinct_threshold",
            self.inference.distinct_threshold,
            1,
        )?;

        if self.upload.csv_delimiter.len() != 1 || !self.upload.csv_delimiter.is_ascii() {
            return Err(NormalizeError::InvalidConfigValueError {
                field: "upload.csv_delimiter".to_string(),
                value: self.upload.csv_delimiter.clone(),
                reason: "CSV delimiter must be a single ASCII character".to_string(),
            });
        }

        let levels: Vec<u8> = self.redundancy.iter().map(|r| r.level).collect();
        for level in &levels {
            validation::validate_range("redundancy.level", *level, 1, 5)?;
        }
        validation::validate_unique("redundancy.level", &levels)?;

        // 只有 1NF 會去重，其他層級的移除筆數恆為 0
        if let Some(misplaced) = self
            .redundancy
            .iter()
            .find(|r| r.rule == RedundancyRule::RemovedDuplicates && r.level != 1)
        {
            return Err(NormalizeError::InvalidConfigValueError {
                field: "redundancy.rule".to_string(),
                value: format!("removed_duplicates at level {}", misplaced.level),
                reason: "removed_duplicates only applies at level 1".to_string(),
            });
        }

        // 5NF 必須歸零
        if let Some(last) = self.redundancy.iter().find(|r| r.level == 5) {
            if last.rule != RedundancyRule::Absolute(0) {
                return Err(NormalizeError::InvalidConfigValueError {
                    field: "redundancy.rule".to_string(),
                    value: format!("{:?}", last.rule),
                    reason: "level 5 must set the redundancy to absolute 0".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn redundancy_policy(&self) -> RedundancyPolicy {
        RedundancyPolicy::new(self.redundancy.clone())
    }

    pub fn csv_delimiter(&self) -> u8 {
        self.upload.csv_delimiter.bytes().next().unwrap_or(b',')
    }
}

impl Validate for StepperConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_toml_uses_medical_defaults() {
        let config = StepperConfig::from_toml_str("").unwrap();

        assert_eq!(config, StepperConfig::default());
        assert_eq!(config.session.initial_redundancy, 15);
        assert_eq!(config.redundancy_policy(), RedundancyPolicy::medical());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[session]
initial_redundancy = 8
delimiter = ";"
multi_valued_groups = [["tags"]]
detect_multi_valued = false

[inference]
distinct_threshold = 4

[upload]
numeric_fields = ["price", "qty"]
csv_delimiter = "\t"

[[redundancy]]
level = 1
rule = "removed_duplicates"

[[redundancy]]
level = 2
rule = { decrement = 3 }

[[redundancy]]
level = 5
rule = { absolute = 0 }
"#;

        let config = StepperConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.session.initial_redundancy, 8);
        assert_eq!(config.session.delimiter, ";");
        assert!(!config.session.detect_multi_valued);
        assert_eq!(config.inference.distinct_threshold, 4);
        assert_eq!(config.csv_delimiter(), b'\t');
        assert_eq!(config.redundancy.len(), 3);
        assert_eq!(config.redundancy[0].rule, RedundancyRule::RemovedDuplicates);
        assert_eq!(config.redundancy[1].rule, RedundancyRule::Decrement(3));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("NF_STEPPER_TEST_NUMERIC", "Age");

        let toml_content = r#"
[upload]
numeric_fields = ["${NF_STEPPER_TEST_NUMERIC}"]
"#;

        let config = StepperConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.upload.numeric_fields, vec!["Age".to_string()]);

        std::env::remove_var("NF_STEPPER_TEST_NUMERIC");
    }

    #[test]
    fn test_fifth_level_must_reach_zero() {
        let toml_content = r#"
[[redundancy]]
level = 5
rule = { decrement = 1 }
"#;

        let config = StepperConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_out_of_range_and_repeated_levels_are_rejected() {
        let out_of_range = StepperConfig::from_toml_str(
            r#"
[[redundancy]]
level = 6
rule = { decrement = 1 }
"#,
        )
        .unwrap();
        assert!(out_of_range.validate().is_err());

        let repeated = StepperConfig::from_toml_str(
            r#"
[[redundancy]]
level = 2
rule = { decrement = 1 }

[[redundancy]]
level = 2
rule = { decrement = 2 }
"#,
        )
        .unwrap();
        assert!(repeated.validate().is_err());
    }

    #[test]
    fn test_removed_duplicates_only_allowed_at_first_level() {
        let config = StepperConfig::from_toml_str(
            r#"
[[redundancy]]
level = 3
rule = "removed_duplicates"
"#,
        )
        .unwrap();

        let err = config.validate().unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidConfigValueError { .. }));
        assert!(err.to_string().contains("level 3"));
    }

    #[test]
    fn test_whitespace_split_delimiter_is_accepted() {
        let config = StepperConfig::from_toml_str("[session]\ndelimiter = \"\\t\"\n").unwrap();

        assert_eq!(config.session.delimiter, "\t");
        assert!(config.validate().is_ok());

        let empty = StepperConfig::from_toml_str("[session]\ndelimiter = \"\"\n").unwrap();
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = StepperConfig::from_toml_str("[session\n");
        assert!(matches!(result, Err(NormalizeError::ConfigError { .. })));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[inference]\ndistinct_threshold = 3\n")
            .unwrap();

        let config = StepperConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.inference.distinct_threshold, 3);
    }
}
