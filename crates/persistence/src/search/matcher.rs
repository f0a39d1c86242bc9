//! In-process evaluation of compiled queries against JSON documents.

use serde_json::Value;

use super::params::{SearchModifier, SearchParamType, SearchValue};
use super::query::{CompiledQuery, SearchClause};

impl CompiledQuery {
    /// Returns true if the document satisfies every clause.
    pub fn matches(&self, document: &Value) -> bool {
        self.clauses().iter().all(|clause| clause.matches(document))
    }
}

impl SearchClause {
    /// Returns true if any of the clause's values matches the document.
    pub fn matches(&self, document: &Value) -> bool {
        let elements: Vec<&Value> = self
            .paths
            .iter()
            .flat_map(|path| collect_path(document, path))
            .collect();

        match self.modifier {
            Some(SearchModifier::Missing) => {
                let want_missing = self.values.first().is_some_and(|v| v.value == "true");
                elements.is_empty() == want_missing
            }
            Some(SearchModifier::Not) => !self.any_value_matches(&elements),
            _ => self.any_value_matches(&elements),
        }
    }

    fn any_value_matches(&self, elements: &[&Value]) -> bool {
        self.values.iter().any(|wanted| {
            elements
                .iter()
                .any(|element| self.element_matches(element, wanted))
        })
    }

    fn element_matches(&self, element: &Value, wanted: &SearchValue) -> bool {
        match self.param_type {
            SearchParamType::Token => token_matches(element, &wanted.value),
            SearchParamType::String => string_matches(element, &wanted.value, self.modifier),
            SearchParamType::Reference => reference_matches(element, &wanted.value),
            SearchParamType::Date => date_matches(element, wanted),
        }
    }
}

/// Resolves a dot-separated path, flattening arrays met along the way.
pub fn collect_path<'a>(document: &'a Value, path: &str) -> Vec<&'a Value> {
    let mut current = vec![document];
    for segment in path.split('.') {
        let mut next = Vec::new();
        for value in current {
            if let Some(child) = value.get(segment) {
                push_flattened(child, &mut next);
            }
        }
        current = next;
    }
    current
}

fn push_flattened<'a>(value: &'a Value, out: &mut Vec<&'a Value>) {
    match value {
        Value::Array(items) => items.iter().for_each(|item| push_flattened(item, out)),
        Value::Null => {}
        other => out.push(other),
    }
}

fn token_matches(element: &Value, wanted: &str) -> bool {
    let (system, code) = match wanted.split_once('|') {
        Some((system, code)) => (Some(system), code),
        None => (None, wanted),
    };

    match element {
        Value::String(s) => system.is_none_or(str::is_empty) && s == code,
        Value::Bool(b) => system.is_none() && b.to_string() == code,
        Value::Number(n) => system.is_none() && n.to_string() == code,
        Value::Object(map) => {
            if let Some(Value::Array(codings)) = map.get("coding") {
                return codings
                    .iter()
                    .any(|coding| coded_matches(coding, "code", system, code));
            }
            if map.contains_key("value") {
                return coded_matches(element, "value", system, code);
            }
            coded_matches(element, "code", system, code)
        }
        _ => false,
    }
}

fn coded_matches(element: &Value, field: &str, system: Option<&str>, code: &str) -> bool {
    let value_ok = element.get(field).and_then(Value::as_str) == Some(code);
    let system_ok = match system {
        None => true,
        Some("") => element.get("system").is_none(),
        Some(s) => element.get("system").and_then(Value::as_str) == Some(s),
    };
    value_ok && system_ok
}

fn string_matches(element: &Value, wanted: &str, modifier: Option<SearchModifier>) -> bool {
    let mut strings = Vec::new();
    collect_strings(element, &mut strings);

    let wanted_lower = wanted.to_lowercase();
    strings.iter().any(|s| match modifier {
        Some(SearchModifier::Exact) => *s == wanted,
        Some(SearchModifier::Contains) => s.to_lowercase().contains(&wanted_lower),
        _ => s.to_lowercase().starts_with(&wanted_lower),
    })
}

fn collect_strings<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
    match value {
        Value::String(s) => out.push(s),
        Value::Array(items) => items.iter().for_each(|item| collect_strings(item, out)),
        Value::Object(map) => map.values().for_each(|item| collect_strings(item, out)),
        _ => {}
    }
}

fn reference_matches(element: &Value, wanted: &str) -> bool {
    let reference = match element {
        Value::String(s) => s.as_str(),
        Value::Object(_) => match element.get("reference").and_then(Value::as_str) {
            Some(r) => r,
            None => return false,
        },
        _ => return false,
    };

    reference == wanted
        || reference
            .strip_suffix(wanted)
            .is_some_and(|head| head.ends_with('/'))
}

fn date_matches(element: &Value, wanted: &SearchValue) -> bool {
    let Some(stored) = element.as_str() else {
        return false;
    };
    // Compare at the coarser of the two precisions.
    let width = stored.len().min(wanted.value.len());
    match (stored.get(..width), wanted.value.get(..width)) {
        (Some(stored), Some(target)) => wanted.prefix.compare(stored, target),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::search::query::{SearchLimits, SearchQuery};
    use crate::search::registry::SearchParameterRegistry;

    fn query(resource_type: &str, raw: &str) -> CompiledQuery {
        SearchQuery::new(resource_type, raw)
            .compile(
                &SearchParameterRegistry::with_builtin(),
                SearchLimits::default(),
            )
            .unwrap()
    }

    fn enrollment() -> Value {
        json!({
            "resourceType": "EnrollmentRequest",
            "id": "507f1f77bcf86cd799439011",
            "status": "active",
            "created": "2021-03-15T09:30:00Z",
            "identifier": [
                { "system": "http://example.org/enrollment", "value": "ER-1001" }
            ],
            "candidate": { "reference": "Patient/pat-1" },
            "insurer": { "reference": "Organization/org-7" },
            "provider": { "reference": "Practitioner/prac-2" }
        })
    }

    fn related_person() -> Value {
        json!({
            "resourceType": "RelatedPerson",
            "id": "6123456789abcdef01234567",
            "patient": { "reference": "Patient/pat-1" },
            "gender": "female",
            "birthDate": "1980-07-04",
            "name": [{ "family": "Fernández", "given": ["Ana", "María"] }],
            "telecom": [{ "system": "phone", "value": "555-0100" }],
            "address": [{ "line": ["12 Elm Street"], "city": "Springfield" }]
        })
    }

    #[test]
    fn test_collect_path_flattens_arrays() {
        let outcome = json!({
            "issue": [
                { "severity": "error", "code": "invalid" },
                { "severity": "warning", "code": "processing" }
            ]
        });
        let values = collect_path(&outcome, "issue.severity");
        assert_eq!(values, vec![&json!("error"), &json!("warning")]);
        assert!(collect_path(&outcome, "issue.details").is_empty());
    }

    #[test]
    fn test_empty_query_matches_everything() {
        assert!(query("EnrollmentRequest", "").matches(&enrollment()));
        assert!(query("EnrollmentRequest", "").matches(&json!({})));
    }

    #[test]
    fn test_token_matching() {
        let doc = enrollment();
        assert!(query("EnrollmentRequest", "status=active").matches(&doc));
        assert!(query("EnrollmentRequest", "status=cancelled,active").matches(&doc));
        assert!(!query("EnrollmentRequest", "status=cancelled").matches(&doc));
        assert!(query("EnrollmentRequest", "_id=507f1f77bcf86cd799439011").matches(&doc));
    }

    #[test]
    fn test_identifier_token_with_system() {
        let doc = enrollment();
        assert!(query("EnrollmentRequest", "identifier=ER-1001").matches(&doc));
        assert!(
            query(
                "EnrollmentRequest",
                "identifier=http://example.org/enrollment|ER-1001"
            )
            .matches(&doc)
        );
        assert!(!query("EnrollmentRequest", "identifier=http://other|ER-1001").matches(&doc));
        assert!(!query("EnrollmentRequest", "identifier=|ER-1001").matches(&doc));
    }

    #[test]
    fn test_coding_token() {
        let doc = json!({
            "issue": [{
                "severity": "error",
                "code": "invalid",
                "details": { "coding": [{ "system": "s", "code": "MSG_BAD" }] }
            }]
        });
        assert!(query("OperationOutcome", "severity=error").matches(&doc));
        assert!(query("OperationOutcome", "code=invalid").matches(&doc));
        assert!(!query("OperationOutcome", "severity=fatal").matches(&doc));
    }

    #[test]
    fn test_token_not_modifier() {
        let doc = related_person();
        assert!(query("RelatedPerson", "gender:not=male").matches(&doc));
        assert!(!query("RelatedPerson", "gender:not=female").matches(&doc));
    }

    #[test]
    fn test_string_matching() {
        let doc = related_person();
        assert!(query("RelatedPerson", "name=fern").matches(&doc));
        assert!(query("RelatedPerson", "name=MAR").matches(&doc));
        assert!(!query("RelatedPerson", "name=nandez").matches(&doc));
        assert!(query("RelatedPerson", "name:contains=nandez").matches(&doc));
        assert!(query("RelatedPerson", "name:exact=Ana").matches(&doc));
        assert!(!query("RelatedPerson", "name:exact=ana").matches(&doc));
        assert!(query("RelatedPerson", "address=spring").matches(&doc));
    }

    #[test]
    fn test_reference_matching() {
        let doc = enrollment();
        assert!(query("EnrollmentRequest", "patient=Patient/pat-1").matches(&doc));
        assert!(query("EnrollmentRequest", "subject=pat-1").matches(&doc));
        assert!(!query("EnrollmentRequest", "subject=at-1").matches(&doc));
        assert!(query("EnrollmentRequest", "organization=org-7").matches(&doc));
        assert!(!query("EnrollmentRequest", "provider=prac-9").matches(&doc));
    }

    #[test]
    fn test_date_matching() {
        let doc = enrollment();
        assert!(query("EnrollmentRequest", "created=2021-03-15").matches(&doc));
        assert!(query("EnrollmentRequest", "created=2021").matches(&doc));
        assert!(query("EnrollmentRequest", "created=ge2021-03-01").matches(&doc));
        assert!(query("EnrollmentRequest", "created=lt2021-04").matches(&doc));
        assert!(!query("EnrollmentRequest", "created=gt2021-03-15").matches(&doc));
        assert!(!query("EnrollmentRequest", "created=2020").matches(&doc));
        assert!(query("EnrollmentRequest", "created=ne2020").matches(&doc));
    }

    #[test]
    fn test_missing_modifier() {
        let doc = related_person();
        assert!(query("RelatedPerson", "birthdate:missing=false").matches(&doc));
        assert!(!query("RelatedPerson", "birthdate:missing=true").matches(&doc));
        assert!(query("RelatedPerson", "identifier:missing=true").matches(&doc));
    }

    #[test]
    fn test_clauses_are_anded() {
        let doc = related_person();
        assert!(query("RelatedPerson", "gender=female&name=ana").matches(&doc));
        assert!(!query("RelatedPerson", "gender=female&name=bob").matches(&doc));
    }
}
