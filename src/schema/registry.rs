//! Field registry: canonical order, roles, and the reviewer glossary
//!
//! Roles are data fixed at registry construction, not per-record logic.
//! The field order here is the versioned contract every stage replays;
//! changing it invalidates previously trained artifacts.

use std::collections::HashMap;

use super::record::{ClaimRecord, RawValue};
use super::{Result, SchemaError};

/// Name of the label column present only in training data.
pub const TARGET_COLUMN: &str = "decision";

/// Role a field plays in the encoding pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldRole {
    /// Excluded before encoding (free text, high cardinality)
    Drop,
    /// Low-cardinality flag, label-encoded to an integer code
    Binary,
    /// Numeric, median-imputed
    Continuous,
    /// One-hot expanded over a frozen vocabulary
    Categorical,
    /// Decomposed into year/month/day integer components
    Datetime,
}

/// One claim field: name, role, and its glossary entry
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub name: &'static str,
    pub role: FieldRole,
    pub help: &'static str,
}

const fn field(name: &'static str, role: FieldRole, help: &'static str) -> FieldDef {
    FieldDef { name, role, help }
}

/// Canonical claim fields in wire order. The order is load-bearing: the
/// passthrough block of the feature matrix follows it exactly.
const FIELDS: &[FieldDef] = &[
    field("excessFee", FieldRole::Continuous, "Customer deductible applied to approved claims."),
    field("rrp", FieldRole::Continuous, "Device recommended retail price at purchase."),
    field("balanceRRP", FieldRole::Continuous, "RRP remaining/used for pricing or settlement."),
    field("oldBalanceRRP", FieldRole::Continuous, "Previous RRP balance."),
    field("productName", FieldRole::Drop, "Internal product plan name (market/coverage/term/type)."),
    field("productDesc", FieldRole::Drop, "Human-readable description of the plan/coverage."),
    field("coverage", FieldRole::Categorical, "Coverage code (e.g., ADLD = Accidental Damage; ADLD/THEFT = Accidental Damage + Theft)."),
    field("productCode", FieldRole::Categorical, "Internal product identifier/code."),
    field("policyStartDate", FieldRole::Datetime, "Policy start date (epoch ms or dd/mm/yyyy)."),
    field("policyEndDate", FieldRole::Datetime, "Policy end date (epoch ms or dd/mm/yyyy)."),
    field("policyStatus", FieldRole::Categorical, "Policy state (Active, Cancelled, Lapsed)."),
    field("retailerName", FieldRole::Categorical, "Retail channel or merchant."),
    field("deviceType", FieldRole::Categorical, "Device category (SMARTPHONES, WEARABLES, etc.)."),
    field("make", FieldRole::Categorical, "Device manufacturer."),
    field("model", FieldRole::Categorical, "Device model identifier."),
    field("purchaseDate", FieldRole::Datetime, "Device purchase date (epoch ms or dd/mm/yyyy)."),
    field("deviceCost", FieldRole::Continuous, "Cash price paid for the device (if known)."),
    field("relationship", FieldRole::Categorical, "Relationship of claimant to owner (e.g., self)."),
    field("channel", FieldRole::Categorical, "Claim submission channel."),
    field("claimType", FieldRole::Categorical, "Declared claim cause/type (e.g., Accidental Damage, Theft)."),
    field("country", FieldRole::Categorical, "Country/market of cover/claim."),
    field("turnOnOff", FieldRole::Binary, "Triage: device powers on/off (1=yes, 0=no)."),
    field("touchScreen", FieldRole::Binary, "Triage: touchscreen working (1=yes, 0=no)."),
    field("smashed", FieldRole::Binary, "Triage: screen/body visibly smashed (1=yes, 0=no)."),
    field("frontCamera", FieldRole::Binary, "Triage: front camera working (1=yes, 0=no)."),
    field("backCamera", FieldRole::Binary, "Triage: rear camera working (1=yes, 0=no)."),
    field("frontOrBackCamera", FieldRole::Binary, "Triage: any camera working (1=yes, 0=no)."),
    field("audio", FieldRole::Binary, "Triage: audio working (1=yes, 0=no)."),
    field("mic", FieldRole::Binary, "Triage: microphone working (1=yes, 0=no)."),
    field("buttons", FieldRole::Binary, "Triage: buttons working (1=yes, 0=no)."),
    field("connection", FieldRole::Binary, "Triage: connectivity working (1=yes, 0=no)."),
    field("charging", FieldRole::Binary, "Triage: charging works (1=yes, 0=no)."),
    field("other", FieldRole::Drop, "Short free-text summary of the issue."),
    field("issueDesc", FieldRole::Drop, "Long free-text narrative of the incident/issue."),
];

const TARGET_HELP: &str = "Final decision already made by your system (COMPLETED/DECLINED).";

/// Fixed, versioned field registry consulted by every pipeline stage
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    fields: &'static [FieldDef],
}

impl SchemaRegistry {
    /// Registry for the claim domain
    pub fn claims() -> Self {
        Self { fields: FIELDS }
    }

    /// All fields in canonical order
    pub fn fields(&self) -> &[FieldDef] {
        self.fields
    }

    /// Role of a named field, if registered
    pub fn role(&self, name: &str) -> Option<FieldRole> {
        self.fields.iter().find(|f| f.name == name).map(|f| f.role)
    }

    /// Field names carrying the given role, in canonical order
    pub fn columns_with_role(&self, role: FieldRole) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|f| f.role == role)
            .map(|f| f.name)
            .collect()
    }

    /// Glossary entries for prompt building: every field plus the
    /// decision column.
    pub fn glossary(&self) -> Vec<(&'static str, &'static str)> {
        let mut entries: Vec<_> = self.fields.iter().map(|f| (f.name, f.help)).collect();
        entries.push((TARGET_COLUMN, TARGET_HELP));
        entries
    }

    /// Extract and integer-encode the target column from labeled records.
    ///
    /// Fails if any record lacks a decision or carries a label absent
    /// from `mapping`.
    pub fn extract_target(
        &self,
        records: &[ClaimRecord],
        mapping: &HashMap<String, u32>,
    ) -> Result<Vec<u32>> {
        let mut y = Vec::with_capacity(records.len());
        for (row, record) in records.iter().enumerate() {
            let value = record.get(TARGET_COLUMN);
            let label = match value {
                RawValue::Null => {
                    return Err(SchemaError::MissingTarget(TARGET_COLUMN.to_string()))
                }
                other => other.canon().unwrap_or_default(),
            };
            match mapping.get(&label) {
                Some(&code) => y.push(code),
                None => return Err(SchemaError::UnknownLabel { row, value: label }),
            }
        }
        Ok(y)
    }

    /// Boundary validation: reject a record whose continuous fields hold
    /// values that cannot become numbers before any stage runs.
    pub fn validate_record(&self, row: usize, record: &ClaimRecord) -> Result<()> {
        for field in self.fields {
            if field.role != FieldRole::Continuous {
                continue;
            }
            match record.get(field.name) {
                RawValue::Text(s) if s.trim().parse::<f64>().is_err() => {
                    return Err(SchemaError::InvalidValue {
                        row,
                        field: field.name.to_string(),
                        expected: "a number",
                        value: s.clone(),
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }
}
