//! OperationOutcome response generation.
//!
//! Two outcomes leave this service: search rejections ([`search_rejected`])
//! and the synthetic outcome for unexpected failures ([`fatal_exception`]).

use carebase_store::SearchError;
use serde_json::Value;

/// Issue severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    /// Fatal error - processing cannot continue.
    Fatal,
    /// Error - processing has failed.
    Error,
}

impl IssueSeverity {
    /// Returns the FHIR string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueSeverity::Fatal => "fatal",
            IssueSeverity::Error => "error",
        }
    }
}

/// Issue type codes used by this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueType {
    /// Invalid content.
    Invalid,
    /// Not supported.
    NotSupported,
    /// Unexpected internal failure.
    Exception,
}

impl IssueType {
    /// Returns the FHIR code string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::Invalid => "invalid",
            IssueType::NotSupported => "not-supported",
            IssueType::Exception => "exception",
        }
    }
}

impl From<&SearchError> for IssueType {
    fn from(err: &SearchError) -> Self {
        match err {
            SearchError::InvalidValue { .. } => IssueType::Invalid,
            SearchError::UnknownParameter { .. }
            | SearchError::UnsupportedModifier { .. }
            | SearchError::UnsupportedResourceType { .. } => IssueType::NotSupported,
        }
    }
}

/// An issue in an OperationOutcome.
#[derive(Debug, Clone)]
pub struct Issue {
    /// The severity of the issue.
    pub severity: IssueSeverity,
    /// The type/code of the issue.
    pub code: IssueType,
    /// Human-readable description.
    pub details: Option<String>,
}

impl Issue {
    /// Creates a new issue.
    pub fn new(severity: IssueSeverity, code: IssueType) -> Self {
        Self {
            severity,
            code,
            details: None,
        }
    }

    /// Sets the human-readable description.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Converts to FHIR JSON.
    pub fn to_json(&self) -> Value {
        let mut issue = serde_json::json!({
            "severity": self.severity.as_str(),
            "code": self.code.as_str(),
        });

        if let Some(details) = &self.details {
            issue["details"] = serde_json::json!({ "text": details });
        }

        issue
    }
}

/// Builder for OperationOutcome resources.
#[derive(Debug, Default)]
pub struct OperationOutcomeBuilder {
    issues: Vec<Issue>,
}

impl OperationOutcomeBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an issue.
    pub fn add_issue(mut self, issue: Issue) -> Self {
        self.issues.push(issue);
        self
    }

    /// Builds the OperationOutcome resource.
    pub fn build(self) -> Value {
        let issues: Vec<Value> = self.issues.iter().map(|i| i.to_json()).collect();

        serde_json::json!({
            "resourceType": "OperationOutcome",
            "issue": issues
        })
    }
}

/// The outcome returned when a search query is rejected.
pub fn search_rejected(err: &SearchError) -> Value {
    let issue = Issue::new(IssueSeverity::Error, IssueType::from(err)).with_details(err.to_string());
    OperationOutcomeBuilder::new().add_issue(issue).build()
}

/// The synthetic outcome returned for unexpected failures.
pub fn fatal_exception(details: Option<&str>) -> Value {
    let mut issue = Issue::new(IssueSeverity::Fatal, IssueType::Exception);
    if let Some(details) = details {
        issue = issue.with_details(details);
    }
    OperationOutcomeBuilder::new().add_issue(issue).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_to_json() {
        let issue = Issue::new(IssueSeverity::Error, IssueType::Invalid).with_details("bad value");
        let json = issue.to_json();

        assert_eq!(json["severity"], "error");
        assert_eq!(json["code"], "invalid");
        assert_eq!(json["details"]["text"], "bad value");
    }

    #[test]
    fn test_fatal_exception() {
        let outcome = fatal_exception(None);
        assert_eq!(outcome["resourceType"], "OperationOutcome");
        assert_eq!(outcome["issue"][0]["severity"], "fatal");
        assert_eq!(outcome["issue"][0]["code"], "exception");
        assert!(outcome["issue"][0].get("details").is_none());

        let outcome = fatal_exception(Some("boom"));
        assert_eq!(outcome["issue"][0]["details"]["text"], "boom");
    }

    #[test]
    fn test_search_rejected_codes() {
        let unknown = SearchError::UnknownParameter {
            resource_type: "EnrollmentRequest".to_string(),
            parameter: "foo".to_string(),
        };
        let outcome = search_rejected(&unknown);
        assert_eq!(outcome["resourceType"], "OperationOutcome");
        assert_eq!(outcome["issue"].as_array().unwrap().len(), 1);
        assert_eq!(outcome["issue"][0]["severity"], "error");
        assert_eq!(outcome["issue"][0]["code"], "not-supported");
        assert_eq!(
            outcome["issue"][0]["details"]["text"],
            "unknown search parameter 'foo' for EnrollmentRequest"
        );

        let modifier = SearchError::UnsupportedModifier {
            parameter: "status".to_string(),
            modifier: "above".to_string(),
        };
        assert_eq!(search_rejected(&modifier)["issue"][0]["code"], "not-supported");

        let invalid = SearchError::InvalidValue {
            parameter: "_count".to_string(),
            value: "0".to_string(),
            message: "must be a positive integer".to_string(),
        };
        assert_eq!(search_rejected(&invalid)["issue"][0]["code"], "invalid");
    }
}
