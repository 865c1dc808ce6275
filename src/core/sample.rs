use crate::domain::model::{Dataset, Record};
use serde_json::Value;

pub const MEDICAL_FIELDS: [&str; 11] = [
    "Patient_ID",
    "Patient_Name",
    "Doctor_ID",
    "Doctor_Name",
    "Hospital_ID",
    "Hospital_Name",
    "Appointment_Date",
    "Treatment_ID",
    "Treatment_Name",
    "Diagnosis",
    "Notes",
];

const MEDICAL_ROWS: [[&str; 11]; 7] = [
    ["P001", "Alice Johnson", "D001", "Dr. Smith", "H001", "City Hospital", "2025-01-10", "T001,T002", "Checkup,Antibiotics", "Flu", "Follow-up needed"],
    ["P002", "Bob Wilson", "D001", "Dr. Smith", "H001", "City Hospital", "2025-01-15", "T001", "Checkup", "Cold", "Rest advised"],
    ["P001", "Alice Johnson", "D002", "Dr. Lee", "H002", "General Clinic", "2025-02-01", "T002,T003", "Antibiotics,X-Ray", "Fracture", "Pain management"],
    ["P003", "Carol Davis", "D001", "Dr. Smith", "H001", "City Hospital", "2025-02-05", "T004", "Surgery", "Appendicitis", "Post-op care"],
    ["P004", "David Brown", "D002", "Dr. Lee", "H002", "General Clinic", "2025-02-10", "T001,T003", "Checkup,X-Ray", "Injury", "Rehab plan"],
    ["P005", "Eve Garcia", "D003", "Dr. Patel", "H001", "City Hospital", "2025-02-15", "T002", "Antibiotics", "Infection", "Antibiotics prescribed"],
    ["P002", "Bob Wilson", "D001", "Dr. Smith", "H001", "City Hospital", "2025-03-01", "T005", "Therapy", "Back Pain", "Physical therapy"],
];

/// 內建的醫療預約範例：病患、醫師、醫院資訊重複，療程欄位為多值字串
pub fn medical_dataset() -> Dataset {
    let records = MEDICAL_ROWS
        .iter()
        .map(|row| {
            let data = MEDICAL_FIELDS
                .iter()
                .zip(row.iter())
                .map(|(field, value)| (field.to_string(), Value::String(value.to_string())))
                .collect();
            Record::new(data)
        })
        .collect();

    Dataset::new(MEDICAL_FIELDS.iter().map(|f| f.to_string()).collect(), records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_medical_dataset_is_uniform() {
        let dataset = medical_dataset();
        assert_eq!(dataset.len(), 7);
        assert!(dataset.validate().is_ok());
        assert_eq!(dataset.duplicate_count(), 0);
    }
}
