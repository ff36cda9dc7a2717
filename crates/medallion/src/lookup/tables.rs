//! Id → description mapping tables.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Which of the three mappings a lookup block populates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupKind {
    AdmissionType,
    DischargeDisposition,
    AdmissionSource,
}

impl LookupKind {
    /// The id column name that introduces a block of this kind.
    pub fn id_column(&self) -> &'static str {
        match self {
            LookupKind::AdmissionType => "admission_type_id",
            LookupKind::DischargeDisposition => "discharge_disposition_id",
            LookupKind::AdmissionSource => "admission_source_id",
        }
    }

    /// Match a header field against the known id columns.
    pub fn from_id_column(field: &str) -> Option<Self> {
        match field.trim() {
            "admission_type_id" => Some(LookupKind::AdmissionType),
            "discharge_disposition_id" => Some(LookupKind::DischargeDisposition),
            "admission_source_id" => Some(LookupKind::AdmissionSource),
            _ => None,
        }
    }

    /// All kinds, in file order.
    pub fn all() -> [LookupKind; 3] {
        [
            LookupKind::AdmissionType,
            LookupKind::DischargeDisposition,
            LookupKind::AdmissionSource,
        ]
    }
}

/// The three id → description mappings, built once per run.
///
/// Insertion order is preserved so serialized artifacts are stable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupTables {
    pub admission_type: IndexMap<String, String>,
    pub discharge_disposition: IndexMap<String, String>,
    pub admission_source: IndexMap<String, String>,
    /// Keys seen more than once within a block (first write wins).
    pub duplicate_keys: usize,
}

impl LookupTables {
    /// Create an empty set of tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the table for a kind.
    pub fn table(&self, kind: LookupKind) -> &IndexMap<String, String> {
        match kind {
            LookupKind::AdmissionType => &self.admission_type,
            LookupKind::DischargeDisposition => &self.discharge_disposition,
            LookupKind::AdmissionSource => &self.admission_source,
        }
    }

    /// Get the mutable table for a kind.
    pub fn table_mut(&mut self, kind: LookupKind) -> &mut IndexMap<String, String> {
        match kind {
            LookupKind::AdmissionType => &mut self.admission_type,
            LookupKind::DischargeDisposition => &mut self.discharge_disposition,
            LookupKind::AdmissionSource => &mut self.admission_source,
        }
    }

    /// Resolve an id to its description.
    pub fn describe(&self, kind: LookupKind, id: &str) -> Option<&str> {
        self.table(kind).get(id).map(|s| s.as_str())
    }

    /// Total entries across all three tables.
    pub fn len(&self) -> usize {
        self.admission_type.len()
            + self.discharge_disposition.len()
            + self.admission_source.len()
    }

    /// True when no block contributed any entry.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_id_column() {
        assert_eq!(
            LookupKind::from_id_column("admission_type_id"),
            Some(LookupKind::AdmissionType)
        );
        assert_eq!(
            LookupKind::from_id_column(" discharge_disposition_id "),
            Some(LookupKind::DischargeDisposition)
        );
        assert_eq!(LookupKind::from_id_column("encounter_id"), None);
    }

    #[test]
    fn test_describe() {
        let mut tables = LookupTables::new();
        tables
            .table_mut(LookupKind::AdmissionType)
            .insert("1".to_string(), "Emergency".to_string());

        assert_eq!(tables.describe(LookupKind::AdmissionType, "1"), Some("Emergency"));
        assert_eq!(tables.describe(LookupKind::AdmissionType, "2"), None);
        assert_eq!(tables.describe(LookupKind::AdmissionSource, "1"), None);
    }
}
