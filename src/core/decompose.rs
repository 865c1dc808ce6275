use crate::domain::model::{Dataset, Record};
use crate::domain::ports::Decomposer;
use std::collections::HashSet;

/// 將單一多值欄位拆成多筆記錄（1NF 原子值）
pub fn split_multi_values(dataset: &Dataset, field: &str, delimiter: &str) -> Dataset {
    split_paired_values(dataset, &[field.to_string()], delimiter)
}

/// 同步拆分一組平行的多值欄位：第 i 個 token 進入第 i 筆輸出記錄。
///
/// 各欄位 token 數不一致時無法對齊，改為逐欄各自拆分（展開為所有組合），
/// 每筆輸出記錄的值都來自該欄位原本的 token。非字串值或不含分隔符的值原樣保留。
pub fn split_paired_values(dataset: &Dataset, fields: &[String], delimiter: &str) -> Dataset {
    if delimiter.is_empty() {
        return dataset.clone();
    }

    let mut records = Vec::with_capacity(dataset.len());
    for record in &dataset.records {
        let tokens: Vec<(&String, Vec<&str>)> = fields
            .iter()
            .filter_map(|field| {
                let value = record.get_str(field)?;
                value
                    .contains(delimiter)
                    .then(|| (field, value.split(delimiter).map(str::trim).collect::<Vec<_>>()))
            })
            .collect();

        let Some((_, first)) = tokens.first() else {
            records.push(record.clone());
            continue;
        };

        let width = first.len();
        if tokens.iter().all(|(_, values)| values.len() == width) {
            for i in 0..width {
                let mut split = record.clone();
                for (field, values) in &tokens {
                    split
                        .data
                        .insert((*field).clone(), serde_json::Value::String(values[i].to_string()));
                }
                records.push(split);
            }
            continue;
        }

        tracing::warn!(
            "Token counts differ across {:?} in one record, splitting each field on its own",
            fields
        );
        let mut expanded = vec![record.clone()];
        for (field, values) in &tokens {
            expanded = expanded
                .into_iter()
                .flat_map(|base| {
                    values.iter().map(move |token| {
                        let mut split = base.clone();
                        split
                            .data
                            .insert((*field).clone(), serde_json::Value::String(token.to_string()));
                        split
                    })
                })
                .collect();
        }
        records.extend(expanded);
    }

    tracing::debug!(
        "Split {:?} on '{}': {} -> {} records",
        fields,
        delimiter,
        dataset.len(),
        records.len()
    );
    Dataset::new(dataset.fields.clone(), records)
}

/// 移除與先前記錄逐欄完全相同的記錄，保留首次出現與原始順序。
/// 回傳去重後的資料集與移除筆數。
pub fn deduplicate(dataset: &Dataset) -> (Dataset, usize) {
    let mut seen = HashSet::new();
    let records: Vec<Record> = dataset
        .records
        .iter()
        .filter(|r| seen.insert(dataset.row_key(r)))
        .cloned()
        .collect();

    let removed = dataset.len() - records.len();
    tracing::debug!("Deduplicated {} records, removed {}", dataset.len(), removed);
    (Dataset::new(dataset.fields.clone(), records), removed)
}

/// 依位置將每筆記錄標記到某一張目標資料表（呈現用，並非真正的關聯投影）
pub fn project_to_tables(dataset: &Dataset, tables: &[String]) -> Dataset {
    let records = dataset
        .records
        .iter()
        .enumerate()
        .map(|(i, record)| Record {
            data: record.data.clone(),
            table: (!tables.is_empty()).then(|| tables[i % tables.len()].clone()),
        })
        .collect();
    Dataset::new(dataset.fields.clone(), records)
}

/// 至少有一筆字串值含分隔符的欄位，依欄位順序回傳
pub fn multi_valued_fields(dataset: &Dataset, delimiter: &str) -> Vec<String> {
    if delimiter.is_empty() {
        return Vec::new();
    }
    dataset
        .fields
        .iter()
        .filter(|field| {
            dataset
                .records
                .iter()
                .any(|r| r.get_str(field).is_some_and(|v| v.contains(delimiter)))
        })
        .cloned()
        .collect()
}

/// 預設的分解策略：依位置標記資料列
#[derive(Debug, Clone, Copy, Default)]
pub struct TaggingDecomposer;

impl Decomposer for TaggingDecomposer {
    fn project(&self, dataset: &Dataset, tables: &[String]) -> Dataset {
        project_to_tables(dataset, tables)
    }
}
