use crate::utils::error::{NormalizeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

/// 一筆扁平資料列：欄位名稱 → 純量值或以分隔符串接的多值字串
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub data: HashMap<String, serde_json::Value>,
    /// 分解後此列在畫面上歸屬的資料表，不屬於欄位集合
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
}

impl Record {
    pub fn new(data: HashMap<String, serde_json::Value>) -> Self {
        Self { data, table: None }
    }

    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.data.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(|v| v.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// 欄位順序（來源資料或 CSV 標題列順序）
    pub fields: Vec<String>,
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn new(fields: Vec<String>, records: Vec<Record>) -> Self {
        Self { fields, records }
    }

    /// 由欄位清單與逐列值建立資料集，列長度不符即視為格式錯誤
    pub fn from_rows(fields: Vec<String>, rows: Vec<Vec<serde_json::Value>>) -> Result<Self> {
        let mut records = Vec::with_capacity(rows.len());
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != fields.len() {
                return Err(NormalizeError::MalformedDataset {
                    message: format!(
                        "row {} has {} values but {} fields are declared",
                        index + 1,
                        row.len(),
                        fields.len()
                    ),
                });
            }
            let data = fields.iter().cloned().zip(row).collect();
            records.push(Record::new(data));
        }
        Ok(Self { fields, records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    /// 每筆記錄的欄位集合必須與 `fields` 完全相同
    pub fn validate(&self) -> Result<()> {
        let declared: HashSet<&str> = self.fields.iter().map(String::as_str).collect();
        if declared.len() != self.fields.len() {
            return Err(NormalizeError::MalformedDataset {
                message: "duplicate column names".to_string(),
            });
        }

        for (index, record) in self.records.iter().enumerate() {
            let actual: HashSet<&str> = record.data.keys().map(String::as_str).collect();
            if actual != declared {
                let mut missing: Vec<&str> = declared.difference(&actual).copied().collect();
                let mut extra: Vec<&str> = actual.difference(&declared).copied().collect();
                missing.sort_unstable();
                extra.sort_unstable();
                return Err(NormalizeError::MalformedDataset {
                    message: format!(
                        "record {} does not match the field set (missing: [{}], unexpected: [{}])",
                        index + 1,
                        missing.join(", "),
                        extra.join(", ")
                    ),
                });
            }
        }
        Ok(())
    }

    /// 以欄位順序串出記錄的比較鍵，供去重與基數計算使用
    pub fn row_key(&self, record: &Record) -> Vec<String> {
        self.fields
            .iter()
            .map(|f| record.get(f).map(value_key).unwrap_or_default())
            .collect()
    }

    pub fn duplicate_count(&self) -> usize {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter(|r| !seen.insert(self.row_key(r)))
            .count()
    }
}

pub(crate) fn value_key(value: &serde_json::Value) -> String {
    value.to_string()
}

/// 正規化層級 0..=5，0 代表未正規化
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalForm(u8);

impl NormalForm {
    pub const UNNORMALIZED: NormalForm = NormalForm(0);
    pub const FIFTH: NormalForm = NormalForm(5);

    pub fn new(level: u8) -> Option<Self> {
        (level <= Self::FIFTH.0).then_some(Self(level))
    }

    pub fn level(self) -> u8 {
        self.0
    }

    pub fn next(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }

    pub fn is_terminal(self) -> bool {
        self == Self::FIFTH
    }
}

impl fmt::Display for NormalForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0 => write!(f, "Unnormalized"),
            n => write!(f, "{}NF", n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeRole {
    PlainColumn,
    PrimaryKey,
    ForeignKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub role: AttributeRole,
}

impl Attribute {
    pub fn new(name: &str, role: AttributeRole) -> Self {
        Self {
            name: name.to_string(),
            role,
        }
    }

    pub fn column(name: &str) -> Self {
        Self::new(name, AttributeRole::PlainColumn)
    }

    pub fn pk(name: &str) -> Self {
        Self::new(name, AttributeRole::PrimaryKey)
    }

    pub fn fk(name: &str) -> Self {
        Self::new(name, AttributeRole::ForeignKey)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.role {
            AttributeRole::PlainColumn => write!(f, "{}", self.name),
            AttributeRole::PrimaryKey => write!(f, "{} (PK)", self.name),
            AttributeRole::ForeignKey => write!(f, "{} (FK)", self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub attributes: Vec<Attribute>,
}

impl TableSchema {
    pub fn new(name: &str, attributes: Vec<Attribute>) -> Self {
        Self {
            name: name.to_string(),
            attributes,
        }
    }

    fn count_role(&self, role: AttributeRole) -> usize {
        self.attributes.iter().filter(|a| a.role == role).count()
    }

    pub fn is_association(&self) -> bool {
        self.count_role(AttributeRole::PrimaryKey) == 0
            && self.count_role(AttributeRole::ForeignKey) >= 2
    }

    /// 至少一個主鍵；純關聯表則無主鍵且至少兩個外鍵
    pub fn is_well_formed(&self) -> bool {
        self.count_role(AttributeRole::PrimaryKey) >= 1 || self.is_association()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub from_table: String,
    pub to_table: String,
    pub join_attribute: String,
}

impl Relationship {
    pub fn new(from_table: &str, to_table: &str, join_attribute: &str) -> Self {
        Self {
            from_table: from_table.to_string(),
            to_table: to_table.to_string(),
            join_attribute: join_attribute.to_string(),
        }
    }
}

/// 每次事件處理後交給呈現層的不可變快照
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepResult {
    pub level: NormalForm,
    pub narration: String,
    pub dataset: Dataset,
    pub redundancy: u32,
    pub tables: Vec<TableSchema>,
    pub relationships: Vec<Relationship>,
    pub foreign_key_candidates: BTreeSet<String>,
}
