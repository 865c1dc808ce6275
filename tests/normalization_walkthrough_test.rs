use anyhow::Result;
use nf_stepper::core::decompose::{deduplicate, split_multi_values};
use nf_stepper::core::sample::medical_dataset;
use nf_stepper::{Dataset, NormalForm, Stepper, StepperConfig};
use serde_json::json;

fn single_visit() -> Result<Dataset> {
    let fields = [
        "Patient_ID",
        "Patient_Name",
        "Doctor_ID",
        "Treatment_ID",
        "Treatment_Name",
        "Diagnosis",
    ];
    Ok(Dataset::from_rows(
        fields.iter().map(|f| f.to_string()).collect(),
        vec![vec![
            json!("P001"),
            json!("Alice Johnson"),
            json!("D001"),
            json!("T001,T002"),
            json!("Checkup,Antibiotics"),
            json!("Flu"),
        ]],
    )?)
}

/// 單筆多值療程在 1NF 後成為兩筆，其餘欄位不變
#[test]
fn test_first_normal_form_scenario() -> Result<()> {
    let mut stepper = Stepper::new(StepperConfig::default())?;
    stepper.load(single_visit()?)?;

    let result = stepper.advance();
    assert_eq!(result.level, NormalForm::new(1).unwrap());
    assert_eq!(result.dataset.len(), 2);

    let first = &result.dataset.records[0];
    let second = &result.dataset.records[1];
    assert_eq!(first.get_str("Treatment_ID"), Some("T001"));
    assert_eq!(first.get_str("Treatment_Name"), Some("Checkup"));
    assert_eq!(second.get_str("Treatment_ID"), Some("T002"));
    assert_eq!(second.get_str("Treatment_Name"), Some("Antibiotics"));

    for record in &result.dataset.records {
        assert_eq!(record.get_str("Patient_ID"), Some("P001"));
        assert_eq!(record.get_str("Patient_Name"), Some("Alice Johnson"));
        assert_eq!(record.get_str("Doctor_ID"), Some("D001"));
        assert_eq!(record.get_str("Diagnosis"), Some("Flu"));
    }
    Ok(())
}

#[test]
fn test_redundancy_never_rises_and_ends_at_zero() -> Result<()> {
    for initial in [0, 3, 15, 100] {
        let mut config = StepperConfig::default();
        config.session.initial_redundancy = initial;
        let mut stepper = Stepper::new(config)?;

        let mut previous = stepper.redundancy();
        assert_eq!(previous, initial);
        for _ in 0..5 {
            let result = stepper.advance();
            assert!(result.redundancy <= previous);
            previous = result.redundancy;
        }
        assert!(stepper.level().is_terminal());
        assert_eq!(stepper.redundancy(), 0);
    }
    Ok(())
}

#[test]
fn test_advance_at_fifth_form_returns_identical_result() -> Result<()> {
    let mut stepper = Stepper::new(StepperConfig::default())?;
    for _ in 0..5 {
        stepper.advance();
    }
    let last = stepper.current().clone();

    for _ in 0..3 {
        assert_eq!(stepper.advance(), last);
    }
    Ok(())
}

#[test]
fn test_reset_from_every_level_restores_sample() -> Result<()> {
    let mut stepper = Stepper::new(StepperConfig::default())?;
    for steps in 0..=6 {
        for _ in 0..steps {
            stepper.advance();
        }
        let result = stepper.reset();
        assert_eq!(result.level, NormalForm::UNNORMALIZED);
        assert_eq!(result.dataset, medical_dataset());
        assert_eq!(result.redundancy, 15);
        assert!(result.tables.is_empty());
    }
    Ok(())
}

#[test]
fn test_schema_only_appears_from_second_form() -> Result<()> {
    let mut stepper = Stepper::new(StepperConfig::default())?;
    let expected_tables = [0, 0, 3, 4, 5, 6];
    let expected_relationships = [0, 0, 2, 3, 3, 5];

    let mut result = stepper.current().clone();
    for level in 0..=5 {
        if level > 0 {
            result = stepper.advance();
        }
        assert_eq!(result.tables.len(), expected_tables[level], "level {}", level);
        assert_eq!(
            result.relationships.len(),
            expected_relationships[level],
            "level {}",
            level
        );
        let active: Vec<&str> = result.tables.iter().map(|t| t.name.as_str()).collect();
        for rel in &result.relationships {
            assert!(active.contains(&rel.from_table.as_str()));
            assert!(active.contains(&rel.to_table.as_str()));
        }
    }
    Ok(())
}

/// 兩個獨立會話給出相同結果，結果不依賴任何下游的隨機配置
#[test]
fn test_step_results_are_deterministic_across_sessions() -> Result<()> {
    let mut a = Stepper::new(StepperConfig::default())?;
    let mut b = Stepper::new(StepperConfig::default())?;

    assert_eq!(a.current(), b.current());
    for _ in 0..6 {
        let left = a.advance();
        let right = b.advance();
        assert_eq!(left, right);
        assert_eq!(serde_json::to_string(&left)?, serde_json::to_string(&right)?);
    }
    Ok(())
}

#[test]
fn test_engine_properties_on_sample() {
    let sample = medical_dataset();

    let (once, _) = deduplicate(&sample);
    let (twice, removed) = deduplicate(&once);
    assert_eq!(once, twice);
    assert_eq!(removed, 0);

    let split = split_multi_values(&sample, "Treatment_ID", ",");
    let expected: usize = sample
        .records
        .iter()
        .map(|r| r.get_str("Treatment_ID").unwrap().split(',').count())
        .sum();
    assert_eq!(split.len(), expected);
    assert_eq!(split_multi_values(&split, "Treatment_ID", ","), split);
}

#[test]
fn test_split_preserves_every_other_field_of_the_sample() {
    let sample = medical_dataset();

    for field in ["Treatment_ID", "Treatment_Name"] {
        let split = split_multi_values(&sample, field, ",");
        let mut outputs = split.records.iter();

        for source in &sample.records {
            let raw = source.get_str(field).unwrap();
            if !raw.contains(',') {
                assert_eq!(outputs.next(), Some(source), "{} without delimiter changed", field);
                continue;
            }

            for token in raw.split(',').map(str::trim) {
                let output = outputs.next().unwrap();
                assert_eq!(output.get_str(field), Some(token));
                for other in sample.fields.iter().filter(|f| f.as_str() != field) {
                    assert_eq!(
                        output.get(other),
                        source.get(other),
                        "{} changed while splitting {}",
                        other,
                        field
                    );
                }
            }
        }
        assert!(outputs.next().is_none());
    }
}
