//! Parse model output into a validated analysis result

use crate::error::AnalysisError;
use rockscan_domain::{AnalysisResult, PhysicalProperties, Provenance, UnitScore};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Parse and validate a model response
///
/// Every required field must be present with the right type and every score
/// must lie in [0, 1]. Nothing is defaulted: an empty body, a non-object, or
/// any violation is [`AnalysisError::MalformedResponse`].
pub fn parse_analysis_response(response: &str) -> Result<AnalysisResult, AnalysisError> {
    let json_str = extract_json(response)?;

    let json: Value = serde_json::from_str(&json_str)?;

    let obj = json
        .as_object()
        .ok_or_else(|| malformed("Expected JSON object"))?;

    let result = parse_result(obj).map_err(|e| {
        warn!("Rejected analysis response: {}", e);
        AnalysisError::MalformedResponse(e)
    })?;

    result
        .validate()
        .map_err(AnalysisError::MalformedResponse)?;

    Ok(result)
}

/// Extract JSON from response, handling markdown code blocks
fn extract_json(response: &str) -> Result<String, AnalysisError> {
    let trimmed = response.trim();

    if trimmed.is_empty() {
        return Err(malformed("Empty response body"));
    }

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(malformed("Empty code block"));
        }

        // Drop the opening fence and, if present, the closing one
        let end = if lines[lines.len() - 1].trim_start().starts_with("```") {
            lines.len() - 1
        } else {
            lines.len()
        };
        let body = lines[1..end].join("\n");
        if body.trim().is_empty() {
            return Err(malformed("Empty code block"));
        }
        Ok(body)
    } else {
        Ok(trimmed.to_string())
    }
}

fn parse_result(obj: &Map<String, Value>) -> Result<AnalysisResult, String> {
    let identification = required_str(obj, "identification")?;
    let confidence = required_score(obj, "confidence")?;

    // Older prompts used the bare "type" key
    let rock_type = match obj.get("rockType") {
        Some(_) => required_str(obj, "rockType")?,
        None => required_str(obj, "type").map_err(|_| missing("rockType"))?,
    };

    let mineralogy = parse_mineralogy(obj)?;
    let texture = required_str(obj, "texture")?;

    let props = required_object(obj, "physicalProperties")?;
    let physical_properties = PhysicalProperties {
        hardness: required_str(props, "hardness").map_err(|e| nested("physicalProperties", e))?,
        specific_gravity: required_str(props, "specificGravity")
            .map_err(|e| nested("physicalProperties", e))?,
        grain_size: required_str(props, "grainSize").map_err(|e| nested("physicalProperties", e))?,
    };

    let geological_age = required_str(obj, "geologicalAge")?;

    let is_fossil = obj
        .get("isFossil")
        .ok_or_else(|| missing("isFossil"))?
        .as_bool()
        .ok_or_else(|| wrong_type("isFossil", "boolean"))?;

    let provenance = match optional(obj, "provenance") {
        None => None,
        Some(value) => {
            let prov = value
                .as_object()
                .ok_or_else(|| wrong_type("provenance", "object"))?;
            Some(Provenance {
                rounding: required_str(prov, "rounding").map_err(|e| nested("provenance", e))?,
                transport_distance: required_str(prov, "transportDistance")
                    .map_err(|e| nested("provenance", e))?,
                basin_source: required_str(prov, "basinSource")
                    .map_err(|e| nested("provenance", e))?,
            })
        }
    };

    let stratigraphic_context = optional_str(obj, "stratigraphicContext")?;
    let educational_note = optional_str(obj, "educationalNote")?;
    let professional_insight = optional_str(obj, "professionalInsight")?;

    // Non-fossils ignore the field entirely, including its range.
    let fossil_authenticity = match optional(obj, "fossilAuthenticity") {
        Some(value) if is_fossil => Some(score(value, "fossilAuthenticity")?),
        Some(_) => {
            debug!("Ignoring fossilAuthenticity for a non-fossil sample");
            None
        }
        None => None,
    };

    Ok(AnalysisResult {
        identification,
        confidence,
        rock_type,
        mineralogy,
        texture,
        physical_properties,
        geological_age,
        is_fossil,
        provenance,
        stratigraphic_context,
        educational_note,
        professional_insight,
        fossil_authenticity,
    })
}

fn parse_mineralogy(obj: &Map<String, Value>) -> Result<Vec<String>, String> {
    let items = obj
        .get("mineralogy")
        .ok_or_else(|| missing("mineralogy"))?
        .as_array()
        .ok_or_else(|| wrong_type("mineralogy", "array"))?;

    let minerals = items
        .iter()
        .map(|item| {
            item.as_str()
                .map(|s| s.to_string())
                .ok_or_else(|| wrong_type("mineralogy[]", "string"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if minerals.is_empty() {
        return Err("'mineralogy' is empty".to_string());
    }
    Ok(minerals)
}

/// Present and non-null
fn optional<'v>(obj: &'v Map<String, Value>, key: &str) -> Option<&'v Value> {
    obj.get(key).filter(|v| !v.is_null())
}

fn required_str(obj: &Map<String, Value>, key: &str) -> Result<String, String> {
    obj.get(key)
        .ok_or_else(|| missing(key))?
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| wrong_type(key, "string"))
}

fn optional_str(obj: &Map<String, Value>, key: &str) -> Result<Option<String>, String> {
    match optional(obj, key) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| wrong_type(key, "string")),
    }
}

fn required_object<'v>(
    obj: &'v Map<String, Value>,
    key: &str,
) -> Result<&'v Map<String, Value>, String> {
    obj.get(key)
        .ok_or_else(|| missing(key))?
        .as_object()
        .ok_or_else(|| wrong_type(key, "object"))
}

fn required_score(obj: &Map<String, Value>, key: &str) -> Result<UnitScore, String> {
    score(obj.get(key).ok_or_else(|| missing(key))?, key)
}

fn score(value: &Value, key: &str) -> Result<UnitScore, String> {
    let raw = value.as_f64().ok_or_else(|| wrong_type(key, "number"))?;
    UnitScore::new(raw).map_err(|e| format!("'{}': {}", key, e))
}

fn missing(key: &str) -> String {
    format!("Missing '{}'", key)
}

fn wrong_type(key: &str, expected: &str) -> String {
    format!("'{}' is not a {}", key, expected)
}

fn nested(parent: &str, err: String) -> String {
    format!("{}: {}", parent, err)
}

fn malformed(msg: &str) -> AnalysisError {
    AnalysisError::MalformedResponse(msg.to_string())
}


#[cfg(test)]
mod tests {
    use super::fixtures::LIMESTONE;
    use super::*;
    use serde_json::json;

    fn with(mutate: impl FnOnce(&mut Map<String, Value>)) -> String {
        let mut value: Value = serde_json::from_str(LIMESTONE).unwrap();
        mutate(value.as_object_mut().unwrap());
        value.to_string()
    }

    fn assert_malformed(response: &str) {
        match parse_analysis_response(response) {
            Err(AnalysisError::MalformedResponse(_)) => {}
            other => panic!("expected MalformedResponse, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_complete_response() {
        let result = parse_analysis_response(LIMESTONE).unwrap();
        assert_eq!(result.identification, "Nummulitic Limestone");
        assert_eq!(result.confidence.value(), 0.87);
        assert_eq!(result.rock_type, "Sedimentary");
        assert_eq!(result.mineralogy, vec!["Calcite", "Dolomite"]);
        assert_eq!(result.physical_properties.specific_gravity, "2.71");
        assert!(result.is_fossil);
        assert_eq!(result.fossil_authenticity().map(|s| s.value()), Some(0.92));
        assert_eq!(
            result.provenance.as_ref().map(|p| p.basin_source.as_str()),
            Some("Potwar Plateau")
        );
    }

    #[test]
    fn test_parse_minimal_response() {
        let response = with(|obj| {
            for key in [
                "provenance",
                "stratigraphicContext",
                "educationalNote",
                "professionalInsight",
                "fossilAuthenticity",
            ] {
                obj.remove(key);
            }
        });
        let result = parse_analysis_response(&response).unwrap();
        assert!(result.provenance.is_none());
        assert!(result.educational_note.is_none());
        assert!(result.fossil_authenticity.is_none());
    }

    #[test]
    fn test_parse_markdown_wrapper() {
        let response = format!("```json\n{}\n```", LIMESTONE);
        assert!(parse_analysis_response(&response).is_ok());
    }

    #[test]
    fn test_legacy_type_key() {
        let response = with(|obj| {
            let rock_type = obj.remove("rockType").unwrap();
            obj.insert("type".to_string(), rock_type);
        });
        let result = parse_analysis_response(&response).unwrap();
        assert_eq!(result.rock_type, "Sedimentary");
    }

    #[test]
    fn test_empty_body_is_malformed() {
        assert_malformed("");
        assert_malformed("   \n");
        assert_malformed("```json\n```");
    }

    #[test]
    fn test_empty_object_is_malformed() {
        assert_malformed("{}");
    }

    #[test]
    fn test_not_json_is_malformed() {
        assert_malformed("The sample appears to be granite.");
    }

    #[test]
    fn test_array_is_malformed() {
        assert_malformed("[]");
    }

    #[test]
    fn test_missing_mineralogy() {
        assert_malformed(&with(|obj| {
            obj.remove("mineralogy");
        }));
    }

    #[test]
    fn test_empty_mineralogy() {
        assert_malformed(&with(|obj| {
            obj.insert("mineralogy".to_string(), json!([]));
        }));
    }

    #[test]
    fn test_non_string_mineral() {
        assert_malformed(&with(|obj| {
            obj.insert("mineralogy".to_string(), json!(["Quartz", 4]));
        }));
    }

    #[test]
    fn test_each_required_field() {
        for key in crate::schema::REQUIRED_FIELDS {
            let response = with(|obj| {
                obj.remove(key);
            });
            assert_malformed(&response);
        }
    }

    #[test]
    fn test_wrong_types() {
        assert_malformed(&with(|obj| {
            obj.insert("confidence".to_string(), json!("high"));
        }));
        assert_malformed(&with(|obj| {
            obj.insert("isFossil".to_string(), json!("yes"));
        }));
        assert_malformed(&with(|obj| {
            obj.insert("educationalNote".to_string(), json!(42));
        }));
        assert_malformed(&with(|obj| {
            obj.insert("physicalProperties".to_string(), json!("hard"));
        }));
    }

    #[test]
    fn test_incomplete_nested_objects() {
        assert_malformed(&with(|obj| {
            obj.insert(
                "physicalProperties".to_string(),
                json!({ "hardness": "3.0-4.0", "grainSize": "Medium" }),
            );
        }));
        assert_malformed(&with(|obj| {
            obj.insert("provenance".to_string(), json!({ "rounding": "Angular" }));
        }));
    }

    #[test]
    fn test_confidence_out_of_range() {
        assert_malformed(&with(|obj| {
            obj.insert("confidence".to_string(), json!(1.5));
        }));
        assert_malformed(&with(|obj| {
            obj.insert("confidence".to_string(), json!(-0.1));
        }));
    }

    #[test]
    fn test_authenticity_out_of_range() {
        assert_malformed(&with(|obj| {
            obj.insert("fossilAuthenticity".to_string(), json!(92));
        }));
    }

    #[test]
    fn test_authenticity_dropped_without_fossil() {
        let response = with(|obj| {
            obj.insert("isFossil".to_string(), json!(false));
        });
        let result = parse_analysis_response(&response).unwrap();
        assert!(!result.is_fossil);
        assert!(result.fossil_authenticity.is_none());
    }

    #[test]
    fn test_authenticity_ignored_without_fossil() {
        for bogus in [json!(1.5), json!(-3), json!("high")] {
            let response = with(|obj| {
                obj.insert("isFossil".to_string(), json!(false));
                obj.insert("fossilAuthenticity".to_string(), bogus);
            });
            let result = parse_analysis_response(&response).unwrap();
            assert!(result.fossil_authenticity.is_none());
        }
    }

    #[test]
    fn test_null_optionals_are_absent() {
        let response = with(|obj| {
            obj.insert("provenance".to_string(), Value::Null);
            obj.insert("professionalInsight".to_string(), Value::Null);
        });
        let result = parse_analysis_response(&response).unwrap();
        assert!(result.provenance.is_none());
        assert!(result.professional_insight.is_none());
    }

    #[test]
    fn test_out_of_bucket_hardness_accepted() {
        let response = with(|obj| {
            obj["physicalProperties"]["hardness"] = json!("about 3");
        });
        let result = parse_analysis_response(&response).unwrap();
        assert_eq!(result.physical_properties.hardness, "about 3");
    }
}

#[cfg(test)]
mod proptests {
    use super::fixtures::LIMESTONE;
    use super::*;
    use proptest::prelude::*;

    fn with_confidence(confidence: f64) -> String {
        let mut value: Value = serde_json::from_str(LIMESTONE).unwrap();
        value["confidence"] = Value::from(confidence);
        value.to_string()
    }

    proptest! {
        #[test]
        fn in_range_confidence_accepted(confidence in 0.0f64..=1.0) {
            let result = parse_analysis_response(&with_confidence(confidence)).unwrap();
            prop_assert!((0.0..=1.0).contains(&result.confidence.value()));
        }

        #[test]
        fn out_of_range_confidence_rejected(confidence in 1.0001f64..1000.0) {
            prop_assert!(parse_analysis_response(&with_confidence(confidence)).is_err());
            prop_assert!(parse_analysis_response(&with_confidence(-confidence)).is_err());
        }
    }
}
