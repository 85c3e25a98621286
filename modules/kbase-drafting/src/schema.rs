use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;

/// Trait for types usable as a forced-tool response schema.
///
/// Automatically implemented for any `JsonSchema + DeserializeOwned` type.
/// The generated schema is tightened for strict structured output:
/// `additionalProperties: false` everywhere, every property listed in
/// `required` (optional fields stay nullable), and all `$ref`s inlined.
pub trait StructuredOutput: JsonSchema + DeserializeOwned {
    fn response_schema() -> serde_json::Value {
        let schema = schema_for!(Self);
        let mut value = serde_json::to_value(schema).unwrap_or_default();

        let definitions = match &value {
            serde_json::Value::Object(map) => map.get("definitions").cloned(),
            _ => None,
        };
        if let Some(defs) = definitions {
            resolve_refs(&mut value, &defs);
        }
        tighten(&mut value);

        if let serde_json::Value::Object(map) = &mut value {
            map.remove("definitions");
            map.remove("$schema");
        }

        value
    }

    fn type_name() -> String {
        <Self as JsonSchema>::schema_name()
    }
}

impl<T: JsonSchema + DeserializeOwned> StructuredOutput for T {}

/// Force `additionalProperties: false` and a full `required` list on every
/// object schema, recursively.
fn tighten(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            if map.get("type") == Some(&serde_json::Value::String("object".into())) {
                map.insert("additionalProperties".into(), serde_json::Value::Bool(false));
                if let Some(serde_json::Value::Object(props)) = map.get("properties") {
                    let keys = props
                        .keys()
                        .map(|k| serde_json::Value::String(k.clone()))
                        .collect();
                    map.insert("required".into(), serde_json::Value::Array(keys));
                }
            }
            for (_, v) in map.iter_mut() {
                tighten(v);
            }
        }
        serde_json::Value::Array(items) => {
            for item in items.iter_mut() {
                tighten(item);
            }
        }
        _ => {}
    }
}

/// Replace `#/definitions/...` references with the definition bodies and
/// collapse single-element `allOf` wrappers schemars emits around them.
fn resolve_refs(value: &mut serde_json::Value, definitions: &serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            if let Some(serde_json::Value::String(path)) = map.get("$ref").cloned() {
                if let Some(name) = path.strip_prefix("#/definitions/") {
                    if let Some(def) = definitions.get(name) {
                        *value = def.clone();
                        resolve_refs(value, definitions);
                        return;
                    }
                }
            }

            if let Some(serde_json::Value::Array(all_of)) = map.get("allOf").cloned() {
                if all_of.len() == 1 {
                    *value = all_of.into_iter().next().unwrap();
                    resolve_refs(value, definitions);
                    return;
                }
            }

            for (_, v) in map.iter_mut() {
                resolve_refs(v, definitions);
            }
        }
        serde_json::Value::Array(items) => {
            for item in items.iter_mut() {
                resolve_refs(item, definitions);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemars::JsonSchema;
    use serde::Deserialize;

    #[derive(Deserialize, JsonSchema)]
    struct Section {
        heading: String,
        needs_review: bool,
    }

    #[derive(Deserialize, JsonSchema)]
    struct Revision {
        title: Option<String>,
        body: String,
        sections: Vec<Section>,
    }

    #[test]
    fn optional_fields_are_still_required() {
        let schema = Revision::response_schema();
        let required = schema["required"].as_array().unwrap();
        let names: Vec<&str> = required.iter().filter_map(|v| v.as_str()).collect();
        assert!(names.contains(&"title"));
        assert!(names.contains(&"body"));
        assert!(names.contains(&"sections"));
    }

    #[test]
    fn nested_types_are_inlined() {
        let schema = Revision::response_schema();
        let obj = schema.as_object().unwrap();
        assert!(!obj.contains_key("definitions"));
        assert!(!obj.contains_key("$schema"));

        let section = &schema["properties"]["sections"]["items"];
        assert!(section.get("$ref").is_none());
        assert_eq!(section["type"], "object");
        assert_eq!(section["additionalProperties"], false);
    }

    #[test]
    fn objects_reject_extra_properties() {
        let schema = Revision::response_schema();
        assert_eq!(schema["additionalProperties"], false);
    }
}
