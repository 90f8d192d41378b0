//! Response schemas for the extraction backend.
//!
//! These use the structured-output schema dialect the Gemini API expects:
//! uppercase type names, `nullable` markers, and `anyOf` for union values.
//! Both variants share the fuel list; the PDF variant additionally asks
//! for the power generated.

use serde_json::{json, Value};

use crate::types::FuelType;

/// Response schema for the email path: report date plus fuel consumed.
pub fn email_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "date": {
                "type": "STRING",
                "format": "date-time",
                "description": "Date of the report, normalized to YYYY-MM-DD",
            },
            "fuel_consumed": fuel_consumed_schema(),
        },
        "required": ["date", "fuel_consumed"],
    })
}

/// Response schema for the PDF path: the email schema plus power generated.
pub fn pdf_response_schema() -> Value {
    let mut schema = email_response_schema();
    schema["properties"]["power_generated"] = json!({
        "type": "NUMBER",
        "nullable": true,
        "description": "Total power generated in the reporting period, in MW",
    });
    schema
}

fn fuel_consumed_schema() -> Value {
    let fuel_types: Vec<&str> = FuelType::all().iter().map(FuelType::as_str).collect();
    json!({
        "type": "ARRAY",
        "description": "Fuel consumed in the reporting period, one entry per fuel type",
        "items": {
            "type": "OBJECT",
            "properties": {
                "fuel_type": {
                    "type": "STRING",
                    "enum": fuel_types,
                },
                "value": {
                    "anyOf": [
                        {
                            "type": "NUMBER",
                            "description": "Total metric tons across all engines",
                        },
                        {
                            "type": "OBJECT",
                            "description": "Metric tons per engine, 1-indexed in reporting order",
                            "properties": engine_slot_properties(),
                        },
                    ],
                },
            },
            "required": ["fuel_type", "value"],
        },
    })
}

fn engine_slot_properties() -> Value {
    json!({
        "me1": { "type": "NUMBER", "nullable": true },
        "me2": { "type": "NUMBER", "nullable": true },
        "me3": { "type": "NUMBER", "nullable": true },
        "me4": { "type": "NUMBER", "nullable": true },
        "me5": { "type": "NUMBER", "nullable": true },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_schema_shape() {
        let schema = email_response_schema();
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["required"], json!(["date", "fuel_consumed"]));
        assert_eq!(schema["properties"]["fuel_consumed"]["type"], "ARRAY");
        assert!(schema["properties"].get("power_generated").is_none());
    }

    #[test]
    fn test_pdf_schema_adds_power() {
        let schema = pdf_response_schema();
        assert_eq!(schema["properties"]["power_generated"]["type"], "NUMBER");
        assert_eq!(schema["properties"]["power_generated"]["nullable"], true);
        // Power stays optional.
        assert_eq!(schema["required"], json!(["date", "fuel_consumed"]));
    }

    #[test]
    fn test_fuel_enum_lists_all_grades() {
        let schema = email_response_schema();
        let fuel_enum =
            &schema["properties"]["fuel_consumed"]["items"]["properties"]["fuel_type"]["enum"];
        assert_eq!(fuel_enum, &json!(["VLSFO", "MGO", "IFO", "LSBF", "LSGO"]));
    }

    #[test]
    fn test_value_union_covers_both_shapes() {
        let schema = email_response_schema();
        let any_of =
            &schema["properties"]["fuel_consumed"]["items"]["properties"]["value"]["anyOf"];
        let variants = any_of.as_array().unwrap();
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0]["type"], "NUMBER");
        assert_eq!(variants[1]["type"], "OBJECT");
        assert!(variants[1]["properties"].get("me5").is_some());
        assert!(variants[1]["properties"].get("me6").is_none());
    }
}
