//! Structured output schema for the analysis response

use crate::prompt::MOHS_SCALE;
use serde_json::{json, Value};

/// Fields every response must carry
pub const REQUIRED_FIELDS: [&str; 8] = [
    "identification",
    "confidence",
    "rockType",
    "mineralogy",
    "texture",
    "physicalProperties",
    "geologicalAge",
    "isFossil",
];

/// The response schema sent with every analysis request
///
/// Uses the OpenAPI subset understood by `generateContent`'s
/// `responseSchema` (upper-case type names).
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "identification": { "type": "STRING" },
            "confidence": { "type": "NUMBER", "minimum": 0.0, "maximum": 1.0 },
            "rockType": { "type": "STRING" },
            "mineralogy": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "minItems": 1
            },
            "texture": { "type": "STRING" },
            "provenance": {
                "type": "OBJECT",
                "properties": {
                    "rounding": { "type": "STRING" },
                    "transportDistance": { "type": "STRING" },
                    "basinSource": { "type": "STRING" }
                },
                "required": ["rounding", "transportDistance", "basinSource"]
            },
            "physicalProperties": {
                "type": "OBJECT",
                "properties": {
                    "hardness": { "type": "STRING", "enum": MOHS_SCALE },
                    "specificGravity": { "type": "STRING" },
                    "grainSize": { "type": "STRING" }
                },
                "required": ["hardness", "specificGravity", "grainSize"]
            },
            "geologicalAge": { "type": "STRING" },
            "stratigraphicContext": { "type": "STRING" },
            "educationalNote": { "type": "STRING" },
            "professionalInsight": { "type": "STRING" },
            "isFossil": { "type": "BOOLEAN" },
            "fossilAuthenticity": { "type": "NUMBER", "minimum": 0.0, "maximum": 1.0 }
        },
        "required": REQUIRED_FIELDS
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_fields_listed() {
        let schema = response_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();

        assert_eq!(required, REQUIRED_FIELDS.to_vec());
        assert!(!required.contains(&"fossilAuthenticity"));
        assert!(!required.contains(&"provenance"));
    }

    #[test]
    fn test_every_required_field_has_property() {
        let schema = response_schema();
        for field in REQUIRED_FIELDS {
            assert!(
                schema["properties"].get(field).is_some(),
                "missing property {}",
                field
            );
        }
    }

    #[test]
    fn test_hardness_is_bucket_enum() {
        let schema = response_schema();
        let buckets = schema["properties"]["physicalProperties"]["properties"]["hardness"]["enum"]
            .as_array()
            .unwrap();
        assert_eq!(buckets.len(), MOHS_SCALE.len());
        assert_eq!(buckets[0], "1.0-2.0");
        assert_eq!(buckets[7], "8.0+");
    }
}
