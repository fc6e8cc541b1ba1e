//! Raw claim records as received at the serving boundary

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One untyped cell value. Untagged so the wire shape stays plain JSON:
/// `null`, numbers, booleans, and strings all round-trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl RawValue {
    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }

    /// Numeric view: numbers as-is, bools as 0/1, numeric text parsed.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawValue::Number(n) => Some(*n),
            RawValue::Bool(b) => Some(f64::from(*b)),
            RawValue::Text(s) => s.trim().parse().ok(),
            RawValue::Null => None,
        }
    }

    /// Canonical string form used for category/flag matching. Whole
    /// numbers print without a fractional part so `1`, `1.0`, and
    /// `"1"` all canonicalize to `"1"`; this normalization must match
    /// between fitting and serving.
    pub fn canon(&self) -> Option<String> {
        match self {
            RawValue::Null => None,
            RawValue::Bool(b) => Some(if *b { "1".into() } else { "0".into() }),
            RawValue::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                Some(format!("{}", *n as i64))
            }
            RawValue::Number(n) => Some(format!("{n}")),
            RawValue::Text(s) => Some(s.clone()),
        }
    }
}

/// One claim's raw field values, keyed by registry field names.
///
/// Absent keys read as [`RawValue::Null`]; keys outside the registry are
/// carried but ignored by reindexing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimRecord {
    fields: HashMap<String, RawValue>,
}

impl ClaimRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a field; absent or explicit null both read as Null.
    pub fn get(&self, name: &str) -> &RawValue {
        self.fields.get(name).unwrap_or(&RawValue::Null)
    }

    pub fn set(&mut self, name: impl Into<String>, value: RawValue) {
        self.fields.insert(name.into(), value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &RawValue)> {
        self.fields.iter()
    }

    /// The documented default claim: a smashed-screen smartphone case
    /// used in API docs and the end-to-end tests.
    pub fn sample() -> Self {
        let mut r = Self::new();
        r.set("excessFee", RawValue::Number(139.0));
        r.set("rrp", RawValue::Number(1319.0));
        r.set("balanceRRP", RawValue::Number(1319.0));
        r.set("oldBalanceRRP", RawValue::Number(1319.0));
        r.set(
            "productName",
            RawValue::Text("NL_MANDATORY_ADLD_1Y_UPFRONT_SMARTPHONE_Q5B5".into()),
        );
        r.set(
            "productDesc",
            RawValue::Text("WUAWEI Care+ Onopzettelijke Schade en Vloeistofschade".into()),
        );
        r.set("coverage", RawValue::Text("ADLD".into()));
        r.set("productCode", RawValue::Text("NLADLD1247".into()));
        r.set("policyStartDate", RawValue::Number(1_678_320_000_000.0));
        r.set("policyEndDate", RawValue::Number(1_709_942_400_000.0));
        r.set("policyStatus", RawValue::Text("Active".into()));
        r.set("retailerName", RawValue::Null);
        r.set("deviceType", RawValue::Text("SMARTPHONES".into()));
        r.set("make", RawValue::Text("WUAWEI".into()));
        r.set("model", RawValue::Text("WUAWEI-AAA176".into()));
        r.set("purchaseDate", RawValue::Number(1_678_320_000_000.0));
        r.set("deviceCost", RawValue::Number(0.0));
        r.set("relationship", RawValue::Text("self".into()));
        r.set("channel", RawValue::Text("Online Portal".into()));
        r.set("claimType", RawValue::Text("Accidental Damage".into()));
        r.set("country", RawValue::Text("NL".into()));
        r.set("turnOnOff", RawValue::Number(1.0));
        r.set("touchScreen", RawValue::Number(0.0));
        r.set("smashed", RawValue::Number(0.0));
        r.set("frontCamera", RawValue::Number(0.0));
        r.set("backCamera", RawValue::Number(0.0));
        r.set("frontOrBackCamera", RawValue::Number(0.0));
        r.set("audio", RawValue::Number(1.0));
        r.set("mic", RawValue::Number(0.0));
        r.set("buttons", RawValue::Number(0.0));
        r.set("connection", RawValue::Number(0.0));
        r.set("charging", RawValue::Number(0.0));
        r.set(
            "other",
            RawValue::Text("kleine scherm werkt nog wel, binnenscherm niet meer".into()),
        );
        r.set(
            "issueDesc",
            RawValue::Text("ik heb het toestel op de trap laten vallen".into()),
        );
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_value_from_json() {
        let v: RawValue = serde_json::from_str("null").expect("null parses");
        assert!(v.is_null());
        let v: RawValue = serde_json::from_str("1319").expect("int parses");
        assert_eq!(v, RawValue::Number(1319.0));
        let v: RawValue = serde_json::from_str("1.5").expect("float parses");
        assert_eq!(v, RawValue::Number(1.5));
        let v: RawValue = serde_json::from_str("true").expect("bool parses");
        assert_eq!(v, RawValue::Bool(true));
        let v: RawValue = serde_json::from_str("\"ADLD\"").expect("string parses");
        assert_eq!(v, RawValue::Text("ADLD".into()));
    }

    #[test]
    fn test_canon_normalizes_whole_numbers() {
        assert_eq!(RawValue::Number(1.0).canon().as_deref(), Some("1"));
        assert_eq!(RawValue::Number(0.0).canon().as_deref(), Some("0"));
        assert_eq!(RawValue::Text("1".into()).canon().as_deref(), Some("1"));
        assert_eq!(RawValue::Bool(true).canon().as_deref(), Some("1"));
        assert_eq!(RawValue::Number(1.5).canon().as_deref(), Some("1.5"));
        assert_eq!(RawValue::Null.canon(), None);
    }

    #[test]
    fn test_record_missing_key_reads_null() {
        let record = ClaimRecord::new();
        assert!(record.get("coverage").is_null());
    }

    #[test]
    fn test_record_deserializes_plain_object() {
        let record: ClaimRecord =
            serde_json::from_str(r#"{"coverage": "ADLD", "rrp": 1319.0, "retailerName": null}"#)
                .expect("object parses");
        assert_eq!(record.get("coverage"), &RawValue::Text("ADLD".into()));
        assert_eq!(record.get("rrp"), &RawValue::Number(1319.0));
        assert!(record.get("retailerName").is_null());
    }

    #[test]
    fn test_sample_record_covers_registry() {
        let registry = crate::schema::SchemaRegistry::claims();
        let sample = ClaimRecord::sample();
        for field in registry.fields() {
            // every registry field is present (retailerName as explicit null)
            assert!(
                sample.iter().any(|(name, _)| name == field.name),
                "sample lacks {}",
                field.name
            );
        }
    }
}
