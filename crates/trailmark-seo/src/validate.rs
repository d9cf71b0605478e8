//! Structural checks for generated JSON-LD.
//!
//! Only a missing `@context` or `@type` (or a non-object) makes a schema
//! invalid. Missing type-specific or recommended properties are warnings.

use serde::Serialize;
use serde_json::Value;

use crate::schema::HEADLINE_MAX;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Properties expected on each schema.org type.
fn expected_fields(schema_type: &str) -> &'static [&'static str] {
    match schema_type {
        "BlogPosting" | "Article" | "NewsArticle" => &["headline", "author", "datePublished", "image"],
        "Person" | "Organization" | "WebSite" => &["name"],
        "LocalBusiness" | "ProfessionalService" | "TravelAgency" => &["name", "address"],
        "TouristDestination" | "Place" => &["name"],
        "FAQPage" => &["mainEntity"],
        "HowTo" => &["name", "step"],
        "ImageObject" => &["contentUrl"],
        "BreadcrumbList" => &["itemListElement"],
        _ => &[],
    }
}

pub fn validate_schema(schema: &Value) -> ValidationResult {
    let mut result = ValidationResult::default();

    let Some(obj) = schema.as_object() else {
        result.errors.push("Schema must be a JSON object".to_string());
        return result;
    };

    if !obj.contains_key("@context") {
        result.errors.push("Missing required field: @context".to_string());
    } else if !obj["@context"]
        .as_str()
        .is_some_and(|c| c.contains("schema.org"))
    {
        result
            .warnings
            .push("@context should reference https://schema.org".to_string());
    }

    let schema_type = match obj.get("@type") {
        Some(Value::String(t)) => Some(t.as_str()),
        Some(Value::Array(types)) => types.first().and_then(Value::as_str),
        Some(_) => None,
        None => {
            result.errors.push("Missing required field: @type".to_string());
            None
        }
    };

    if let Some(schema_type) = schema_type {
        for field in expected_fields(schema_type) {
            if is_missing(obj.get(*field)) {
                result
                    .warnings
                    .push(format!("{} is missing recommended field: {}", schema_type, field));
            }
        }
        if let Some(headline) = obj.get("headline").and_then(Value::as_str) {
            if headline.chars().count() > HEADLINE_MAX {
                result.warnings.push(format!(
                    "headline exceeds {} characters",
                    HEADLINE_MAX
                ));
            }
        }
    }

    if !obj.contains_key("@id") {
        result
            .warnings
            .push("Missing @id; add one so other nodes can reference this entity".to_string());
    }

    result.valid = result.errors.is_empty();
    result
}

fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(a)) => a.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_context_or_type_is_invalid() {
        let no_context = json!({ "@type": "Person", "name": "A", "@id": "x" });
        assert!(!validate_schema(&no_context).valid);

        let no_type = json!({ "@context": "https://schema.org", "name": "A", "@id": "x" });
        assert!(!validate_schema(&no_type).valid);

        let neither = json!({ "headline": "x" });
        let result = validate_schema(&neither);
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 2);

        assert!(!validate_schema(&json!("not an object")).valid);
    }

    #[test]
    fn test_blog_posting_missing_fields_only_warn() {
        let schema = json!({
            "@context": "https://schema.org",
            "@type": "BlogPosting",
            "@id": "https://example.com/blog/x#article",
            "image": ["https://example.com/a.jpg"],
        });
        let result = validate_schema(&schema);
        assert!(result.valid);
        assert!(result.errors.is_empty());
        for field in ["headline", "author", "datePublished"] {
            assert!(
                result.warnings.iter().any(|w| w.ends_with(field)),
                "no warning for {}",
                field
            );
        }
    }

    #[test]
    fn test_missing_id_warns() {
        let schema = json!({
            "@context": "https://schema.org",
            "@type": "WebSite",
            "name": "Site",
        });
        let result = validate_schema(&schema);
        assert!(result.valid);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("@id"));
    }

    #[test]
    fn test_empty_values_count_as_missing() {
        let schema = json!({
            "@context": "https://schema.org",
            "@type": "HowTo",
            "@id": "x",
            "name": " ",
            "step": [],
        });
        assert_eq!(validate_schema(&schema).warnings.len(), 2);
    }
}
