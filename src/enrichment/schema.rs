use anyhow::{anyhow, Result};
use serde_json::{Map, Value};

use super::Enrichment;

/// Maximum items kept in a list field.
pub const MAX_LIST_ITEMS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Text,
    TextList,
}

struct FieldSpec {
    name: &'static str,
    kind: FieldKind,
    required: bool,
    max_chars: usize,
}

const FIELDS: &[FieldSpec] = &[
    FieldSpec { name: "topicZh", kind: FieldKind::Text, required: true, max_chars: 40 },
    FieldSpec { name: "summaryZh", kind: FieldKind::Text, required: true, max_chars: 400 },
    FieldSpec { name: "keyPointsEnRefined", kind: FieldKind::TextList, required: false, max_chars: 200 },
    FieldSpec { name: "keyPointsZh", kind: FieldKind::TextList, required: false, max_chars: 200 },
    FieldSpec { name: "promptImproved", kind: FieldKind::Text, required: false, max_chars: 1000 },
    FieldSpec { name: "notes", kind: FieldKind::Text, required: false, max_chars: 300 },
];

/// Pulls the JSON object out of a model response, tolerating code fences and
/// chatter around it.
pub fn extract_json_object(response: &str) -> Result<Map<String, Value>> {
    let start = response
        .find('{')
        .ok_or_else(|| anyhow!("No JSON object in enrichment response"))?;
    let end = response
        .rfind('}')
        .filter(|&end| end > start)
        .ok_or_else(|| anyhow!("Unterminated JSON object in enrichment response"))?;

    match serde_json::from_str::<Value>(&response[start..=end])? {
        Value::Object(map) => Ok(map),
        _ => Err(anyhow!("Enrichment response is not a JSON object")),
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> (String, bool) {
    if text.chars().count() <= max_chars {
        (text.to_string(), false)
    } else {
        (text.chars().take(max_chars).collect(), true)
    }
}

/// Validates a parsed object against the enrichment schema.
///
/// Never fails: missing required fields and wrong types fall back to typed
/// defaults, long values are truncated, unknown fields are ignored. Each
/// deviation is reported as `missing:<f>`, `type:<f>`, `truncated:<f>` or
/// `unknown:<f>`.
pub fn validate_enrichment(map: &Map<String, Value>) -> (Enrichment, Vec<String>) {
    let mut enrichment = Enrichment::default();
    let mut warnings = Vec::new();

    for spec in FIELDS {
        let value = match map.get(spec.name) {
            None | Some(Value::Null) => {
                if spec.required {
                    warnings.push(format!("missing:{}", spec.name));
                }
                continue;
            }
            Some(value) => value,
        };

        match spec.kind {
            FieldKind::Text => {
                let Some(text) = value.as_str() else {
                    warnings.push(format!("type:{}", spec.name));
                    continue;
                };
                let (text, truncated) = truncate_chars(text.trim(), spec.max_chars);
                if truncated {
                    warnings.push(format!("truncated:{}", spec.name));
                }
                enrichment.set_text(spec.name, text);
            }
            FieldKind::TextList => {
                let Some(items) = value.as_array() else {
                    warnings.push(format!("type:{}", spec.name));
                    continue;
                };
                let mut list = Vec::new();
                let mut truncated = items.len() > MAX_LIST_ITEMS;
                let mut mistyped = false;
                for item in items.iter().take(MAX_LIST_ITEMS) {
                    match item.as_str() {
                        Some(text) => {
                            let (text, cut) = truncate_chars(text.trim(), spec.max_chars);
                            truncated |= cut;
                            if !text.is_empty() {
                                list.push(text);
                            }
                        }
                        None => mistyped = true,
                    }
                }
                if mistyped {
                    warnings.push(format!("type:{}", spec.name));
                }
                if truncated {
                    warnings.push(format!("truncated:{}", spec.name));
                }
                enrichment.set_list(spec.name, list);
            }
        }
    }

    let mut unknown: Vec<&String> = map
        .keys()
        .filter(|k| !FIELDS.iter().any(|f| f.name == k.as_str()))
        .collect();
    unknown.sort();
    warnings.extend(unknown.into_iter().map(|k| format!("unknown:{}", k)));

    (enrichment, warnings)
}

/// Extracts and validates an enrichment from raw model output.
///
/// Only a response without a usable JSON object is an error.
pub fn parse_enrichment(response: &str) -> Result<(Enrichment, Vec<String>)> {
    let map = extract_json_object(response)?;
    Ok(validate_enrichment(&map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test value must be an object"),
        }
    }

    #[test]
    fn test_valid_response() {
        let (e, warnings) = validate_enrichment(&object(json!({
            "topicZh": "特斯拉召回",
            "summaryZh": "特斯拉宣布召回。",
            "keyPointsZh": ["召回车辆"],
            "notes": "ok"
        })));
        assert!(warnings.is_empty());
        assert_eq!(e.topic_zh, "特斯拉召回");
        assert_eq!(e.key_points_zh, vec!["召回车辆"]);
        assert_eq!(e.notes.as_deref(), Some("ok"));
        assert!(e.prompt_improved.is_none());
    }

    #[test]
    fn test_missing_and_mistyped_fields_get_defaults() {
        let (e, warnings) = validate_enrichment(&object(json!({
            "summaryZh": 42,
            "keyPointsEnRefined": "not a list",
            "extra": true
        })));
        assert_eq!(e.topic_zh, "");
        assert_eq!(e.summary_zh, "");
        assert!(e.key_points_en_refined.is_empty());
        assert_eq!(
            warnings,
            vec![
                "missing:topicZh",
                "type:summaryZh",
                "type:keyPointsEnRefined",
                "unknown:extra"
            ]
        );
    }

    #[test]
    fn test_truncation() {
        let long_topic: String = "长".repeat(60);
        let (e, warnings) = validate_enrichment(&object(json!({
            "topicZh": long_topic,
            "summaryZh": "s",
            "keyPointsEnRefined": ["a", "b", "c", "d", "e", "f", 7]
        })));
        assert_eq!(e.topic_zh.chars().count(), 40);
        assert_eq!(e.key_points_en_refined.len(), MAX_LIST_ITEMS);
        assert_eq!(warnings, vec!["truncated:topicZh", "truncated:keyPointsEnRefined"]);
    }

    #[test]
    fn test_parse_tolerates_fences() {
        let response = "Sure!\n```json\n{\"topicZh\": \"话题\", \"summaryZh\": \"摘要\"}\n```";
        let (e, warnings) = parse_enrichment(response).unwrap();
        assert_eq!(e.topic_zh, "话题");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_enrichment("no json here").is_err());
        assert!(parse_enrichment("} backwards {").is_err());
        assert!(parse_enrichment("{broken").is_err());
    }
}
