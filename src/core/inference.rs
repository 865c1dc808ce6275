use crate::domain::model::{value_key, Dataset};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

pub const DEFAULT_DISTINCT_THRESHOLD: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnProfile {
    pub field: String,
    pub distinct: usize,
    pub records: usize,
}

impl ColumnProfile {
    /// 基數低於門檻且確實有重複（或整欄為常數）才算外鍵候選
    pub fn is_foreign_key_candidate(&self, threshold: usize) -> bool {
        self.distinct < threshold && (self.distinct < self.records || self.distinct == 1)
    }
}

pub fn column_profiles(dataset: &Dataset) -> Vec<ColumnProfile> {
    dataset
        .fields
        .iter()
        .map(|field| {
            let distinct: HashSet<String> = dataset
                .records
                .iter()
                .filter_map(|r| r.get(field))
                .map(value_key)
                .collect();
            ColumnProfile {
                field: field.clone(),
                distinct: distinct.len(),
                records: dataset.len(),
            }
        })
        .collect()
}

/// 依欄位基數推測外鍵候選。僅供標註，不影響正規化步驟。
pub fn infer_foreign_key_candidates(dataset: &Dataset, threshold: usize) -> BTreeSet<String> {
    if dataset.is_empty() {
        return BTreeSet::new();
    }

    let candidates: BTreeSet<String> = column_profiles(dataset)
        .into_iter()
        .filter(|p| p.is_foreign_key_candidate(threshold))
        .map(|p| p.field)
        .collect();

    tracing::debug!(
        "Inferred {} foreign-key candidates from {} fields",
        candidates.len(),
        dataset.fields.len()
    );
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_low_cardinality_field_is_candidate() {
        let rows = (0..50)
            .map(|i| {
                let city = if i % 2 == 0 { "NY" } else { "SF" };
                vec![json!(city), json!(i * 3 + 1)]
            })
            .collect();
        let dataset =
            Dataset::from_rows(vec!["city".to_string(), "price".to_string()], rows).unwrap();

        let candidates = infer_foreign_key_candidates(&dataset, DEFAULT_DISTINCT_THRESHOLD);
        assert!(candidates.contains("city"));
        assert!(!candidates.contains("price"));
    }

    #[test]
    fn test_empty_dataset_has_no_candidates() {
        let dataset = Dataset::new(vec!["city".to_string()], vec![]);
        assert!(infer_foreign_key_candidates(&dataset, DEFAULT_DISTINCT_THRESHOLD).is_empty());
    }

    #[test]
    fn test_constant_fields_are_all_candidates() {
        let dataset = Dataset::from_rows(
            vec!["country".to_string(), "currency".to_string()],
            vec![vec![json!("US"), json!("USD")]],
        )
        .unwrap();

        let candidates = infer_foreign_key_candidates(&dataset, DEFAULT_DISTINCT_THRESHOLD);
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn test_small_unique_column_is_not_candidate() {
        let dataset = Dataset::from_rows(
            vec!["id".to_string()],
            vec![vec![json!("a")], vec![json!("b")], vec![json!("c")]],
        )
        .unwrap();

        let profiles = column_profiles(&dataset);
        assert_eq!(profiles[0].distinct, 3);
        assert!(infer_foreign_key_candidates(&dataset, DEFAULT_DISTINCT_THRESHOLD).is_empty());
    }
}
