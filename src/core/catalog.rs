use crate::domain::model::{Attribute, NormalForm, Relationship, TableSchema};

/// 靜態的資料表目錄：主排序、各表欄位與表間關聯。純查詢，不做計算。
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaCatalog {
    tables: Vec<TableSchema>,
    relationships: Vec<Relationship>,
}

impl SchemaCatalog {
    /// `tables` 的順序即為主排序
    pub fn new(tables: Vec<TableSchema>, relationships: Vec<Relationship>) -> Self {
        Self {
            tables,
            relationships,
        }
    }

    /// 醫療範例資料集的目錄
    pub fn medical() -> Self {
        let tables = vec![
            TableSchema::new(
                "Patients",
                vec![Attribute::pk("Patient_ID"), Attribute::column("Patient_Name")],
            ),
            TableSchema::new(
                "Appointments",
                vec![
                    Attribute::pk("Appointment_ID"),
                    Attribute::fk("Patient_ID"),
                    Attribute::fk("Doctor_ID"),
                    Attribute::fk("Hospital_ID"),
                    Attribute::column("Appointment_Date"),
                    Attribute::column("Diagnosis"),
                    Attribute::column("Notes"),
                ],
            ),
            TableSchema::new(
                "Doctors",
                vec![Attribute::pk("Doctor_ID"), Attribute::column("Doctor_Name")],
            ),
            TableSchema::new(
                "Hospitals",
                vec![Attribute::pk("Hospital_ID"), Attribute::column("Hospital_Name")],
            ),
            TableSchema::new(
                "Treatments",
                vec![Attribute::pk("Treatment_ID"), Attribute::column("Treatment_Name")],
            ),
            TableSchema::new(
                "DoctorTreatments",
                vec![Attribute::fk("Doctor_ID"), Attribute::fk("Treatment_ID")],
            ),
        ];

        let relationships = vec![
            Relationship::new("Appointments", "Patients", "Patient_ID"),
            Relationship::new("Appointments", "Doctors", "Doctor_ID"),
            Relationship::new("Appointments", "Hospitals", "Hospital_ID"),
            Relationship::new("DoctorTreatments", "Doctors", "Doctor_ID"),
            Relationship::new("DoctorTreatments", "Treatments", "Treatment_ID"),
        ];

        Self::new(tables, relationships)
    }

    pub fn master_order(&self) -> Vec<String> {
        self.tables.iter().map(|t| t.name.clone()).collect()
    }

    /// 主排序的前 `nf + 1` 張表（以主排序長度為上限）
    pub fn tables_for_level(&self, nf: NormalForm) -> Vec<String> {
        let len = (usize::from(nf.level()) + 1).min(self.tables.len());
        self.tables[..len].iter().map(|t| t.name.clone()).collect()
    }

    /// 未知表名回傳空清單，代表沒有欄位可顯示
    pub fn attributes_for(&self, table: &str) -> Vec<Attribute> {
        self.tables
            .iter()
            .find(|t| t.name == table)
            .map(|t| t.attributes.clone())
            .unwrap_or_default()
    }

    pub fn schemas_for(&self, tables: &[String]) -> Vec<TableSchema> {
        tables
            .iter()
            .map(|name| TableSchema {
                name: name.clone(),
                attributes: self.attributes_for(name),
            })
            .collect()
    }

    pub fn schemas_for_level(&self, nf: NormalForm) -> Vec<TableSchema> {
        self.schemas_for(&self.tables_for_level(nf))
    }

    /// 兩端點都在 `active` 中的關聯，維持目錄順序
    pub fn relationships_among(&self, active: &[String]) -> Vec<Relationship> {
        self.relationships
            .iter()
            .filter(|r| active.contains(&r.from_table) && active.contains(&r.to_table))
            .cloned()
            .collect()
    }
}

impl Default for SchemaCatalog {
    fn default() -> Self {
        Self::medical()
    }
}
