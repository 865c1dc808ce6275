use crate::domain::model::StepResult;
use std::fmt::Write;

/// 把 `StepResult` 排成終端機可讀的文字
pub fn render(result: &StepResult) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "== {} | redundancy {} ==",
        result.level, result.redundancy
    );
    let _ = writeln!(out, "{}", result.narration);

    if !result.tables.is_empty() {
        let _ = writeln!(out, "Tables:");
        for table in &result.tables {
            let attributes: Vec<String> = table.attributes.iter().map(ToString::to_string).collect();
            let _ = writeln!(out, "  {}: {}", table.name, attributes.join(", "));
        }
    }

    if !result.relationships.is_empty() {
        let _ = writeln!(out, "Relationships:");
        for rel in &result.relationships {
            let _ = writeln!(
                out,
                "  {} -> {} [{}]",
                rel.from_table, rel.to_table, rel.join_attribute
            );
        }
    }

    if !result.foreign_key_candidates.is_empty() {
        let candidates: Vec<&str> = result
            .foreign_key_candidates
            .iter()
            .map(String::as_str)
            .collect();
        let _ = writeln!(out, "Foreign-key candidates: {}", candidates.join(", "));
    }

    let dataset = &result.dataset;
    let _ = writeln!(out, "Records ({}):", dataset.len());
    let _ = writeln!(out, "  {}", dataset.fields.join(" | "));
    for record in &dataset.records {
        let cells: Vec<String> = dataset
            .fields
            .iter()
            .map(|f| match record.get(f) {
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => String::new(),
            })
            .collect();
        match &record.table {
            Some(table) => {
                let _ = writeln!(out, "  [{}] {}", table, cells.join(" | "));
            }
            None => {
                let _ = writeln!(out, "  {}", cells.join(" | "));
            }
        }
    }

    out
}
