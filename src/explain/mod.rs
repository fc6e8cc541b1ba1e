//! Explanation prompt building
//!
//! The decision is already made by the time this module runs; it only
//! assembles the prompt pair an external language model needs to
//! explain that decision. No decision logic lives here and none may
//! cross this boundary.

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::schema::{ClaimRecord, RawValue, SchemaRegistry, TARGET_COLUMN};

const SYSTEM_PROMPT: &str = "You are an impartial insurance claims reviewer. The system has \
already decided to COMPLETED or DECLINED each claim. Your job is to explain that decision \
clearly, concisely, and defensibly using only the provided fields. Do not re-decide the \
outcome, and do not invent facts. If information is missing, say so.";

fn raw_to_json(value: &RawValue) -> Value {
    match value {
        RawValue::Null => Value::Null,
        RawValue::Bool(b) => Value::Bool(*b),
        RawValue::Number(n) => serde_json::Number::from_f64(*n)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        RawValue::Text(s) => Value::String(s.clone()),
    }
}

/// Serialize the record in registry order (decision last) so prompts
/// are stable across calls.
fn record_json(registry: &SchemaRegistry, record: &ClaimRecord) -> Result<String> {
    let mut map = Map::new();
    for field in registry.fields() {
        map.insert(field.name.to_string(), raw_to_json(record.get(field.name)));
    }
    map.insert(
        TARGET_COLUMN.to_string(),
        raw_to_json(record.get(TARGET_COLUMN)),
    );
    serde_json::to_string_pretty(&Value::Object(map))
        .map_err(|e| Error::Serialization(format!("record JSON: {e}")))
}

/// Build the (system, user) prompt pair for one decided claim.
pub fn build_prompts(registry: &SchemaRegistry, record: &ClaimRecord) -> Result<(String, String)> {
    let glossary_text: String = registry
        .glossary()
        .iter()
        .map(|(name, help)| format!("- **{name}**: {help}\n"))
        .collect();

    let record_text = record_json(registry, record)?;
    let user_prompt = format!(
        "You are given:\n\n\
         1) Column meanings:\n{glossary_text}\n\
         2) The claim record (JSON). It already contains the final decision under \"{TARGET_COLUMN}\".\n\
         Use ONLY this data to explain why the claim was accepted or rejected.\n\n\
         ```json\n{record_text}\n```\n"
    );
    Ok((SYSTEM_PROMPT.to_string(), user_prompt))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decided_sample() -> ClaimRecord {
        let mut record = ClaimRecord::sample();
        record.set(TARGET_COLUMN, RawValue::Text("COMPLETED".into()));
        record
    }

    #[test]
    fn test_prompts_carry_glossary_and_decision() {
        let registry = SchemaRegistry::claims();
        let (system, user) = build_prompts(&registry, &decided_sample()).expect("prompts");
        assert!(system.contains("Do not re-decide the outcome"));
        assert!(user.contains("- **coverage**:"));
        assert!(user.contains("\"decision\": \"COMPLETED\""));
        assert!(user.contains("```json"));
    }

    #[test]
    fn test_prompts_are_stable_across_calls() {
        let registry = SchemaRegistry::claims();
        let a = build_prompts(&registry, &decided_sample()).expect("a");
        let b = build_prompts(&registry, &decided_sample()).expect("b");
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_fields_render_as_null() {
        let registry = SchemaRegistry::claims();
        let mut record = ClaimRecord::new();
        record.set(TARGET_COLUMN, RawValue::Text("DECLINED".into()));
        let (_, user) = build_prompts(&registry, &record).expect("prompts");
        assert!(user.contains("\"retailerName\": null"));
    }
}
