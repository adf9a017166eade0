use std::fmt;

use serde::Serialize;

use crate::pointer::Pointer;

// ── Issue codes ──

pub const E_INVALID_VERSION: &str = "E_INVALID_VERSION";
pub const E_MISSING_FIELD: &str = "E_MISSING_FIELD";
pub const E_INVALID_TYPE: &str = "E_INVALID_TYPE";
pub const E_INVALID_VALUE: &str = "E_INVALID_VALUE";
pub const E_UNKNOWN_FIELD: &str = "E_UNKNOWN_FIELD";
pub const E_RESERVED_EXTENSION: &str = "E_RESERVED_EXTENSION";
pub const E_REF_SIBLINGS: &str = "E_REF_SIBLINGS";
pub const E_MUTUALLY_EXCLUSIVE: &str = "E_MUTUALLY_EXCLUSIVE";
pub const E_MISSING_ONE_OF: &str = "E_MISSING_ONE_OF";
pub const E_PATH_PARAM_NOT_REQUIRED: &str = "E_PATH_PARAM_NOT_REQUIRED";
pub const E_DUPLICATE_PARAMETER: &str = "E_DUPLICATE_PARAMETER";
pub const E_CONTENT_ENTRY_COUNT: &str = "E_CONTENT_ENTRY_COUNT";
pub const E_INVALID_STYLE: &str = "E_INVALID_STYLE";
pub const E_NOT_APPLICABLE: &str = "E_NOT_APPLICABLE";
pub const E_IGNORED_HEADER: &str = "E_IGNORED_HEADER";
pub const E_INVALID_PATH_KEY: &str = "E_INVALID_PATH_KEY";
pub const E_DUPLICATE_PATH: &str = "E_DUPLICATE_PATH";
pub const E_INVALID_STATUS_CODE: &str = "E_INVALID_STATUS_CODE";
pub const E_EMPTY_RESPONSES: &str = "E_EMPTY_RESPONSES";
pub const E_INVALID_COMPONENT_NAME: &str = "E_INVALID_COMPONENT_NAME";
pub const E_DUPLICATE_OPERATION_ID: &str = "E_DUPLICATE_OPERATION_ID";
pub const E_DUPLICATE_TAG: &str = "E_DUPLICATE_TAG";
pub const E_UNKNOWN_SECURITY_SCHEME: &str = "E_UNKNOWN_SECURITY_SCHEME";
pub const E_NON_OAUTH_SCOPES: &str = "E_NON_OAUTH_SCOPES";
pub const E_VERSION_GATED: &str = "E_VERSION_GATED";
pub const E_DEPRECATED_KEYWORD: &str = "E_DEPRECATED_KEYWORD";
pub const E_MODEL_MISMATCH: &str = "E_MODEL_MISMATCH";

/// Issue severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// A single finding of the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// Machine-readable stable code
    pub code: &'static str,
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// JSON pointer to the offending node
    pub path: Pointer,
    /// Suggestion for fixing the issue
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Issue {
    pub fn error(code: &'static str, path: &Pointer, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: Severity::Error,
            message: message.into(),
            path: path.clone(),
            suggestion: None,
        }
    }

    pub fn warning(code: &'static str, path: &Pointer, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: Severity::Warning,
            message: message.into(),
            path: path.clone(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {}: {}",
            self.severity, self.code, self.path, self.message
        )?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (hint: {suggestion})")?;
        }
        Ok(())
    }
}

/// Aggregated validation report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// False iff at least one issue is an error
    pub ok: bool,
    pub issues: Vec<Issue>,
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::success()
    }
}

impl ValidationReport {
    pub fn success() -> Self {
        Self {
            ok: true,
            issues: Vec::new(),
        }
    }

    pub fn from_issues(issues: Vec<Issue>) -> Self {
        let ok = !issues.iter().any(|i| i.severity == Severity::Error);
        Self { ok, issues }
    }

    /// Add an issue and update the ok flag
    pub fn push(&mut self, issue: Issue) {
        if issue.severity == Severity::Error {
            self.ok = false;
        }
        self.issues.push(issue);
    }

    pub fn merge(&mut self, other: ValidationReport) {
        for issue in other.issues {
            self.push(issue);
        }
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    pub fn has_errors(&self) -> bool {
        !self.ok
    }

    /// Whether the report should be considered a pass.
    pub fn passes(&self, fail_on_warnings: bool) -> bool {
        self.ok && !(fail_on_warnings && self.count(Severity::Warning) > 0)
    }

    /// Issue codes in report order.
    pub fn codes(&self) -> Vec<&'static str> {
        self.issues.iter().map(|i| i.code).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_json_format() {
        let issue = Issue::error(
            E_PATH_PARAM_NOT_REQUIRED,
            &Pointer::root().join("paths").join("/pets/{id}").join("parameters").index(0),
            "path parameter `id` must be required",
        )
        .with_suggestion("set `required: true`");

        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["code"], "E_PATH_PARAM_NOT_REQUIRED");
        assert_eq!(json["severity"], "error");
        assert_eq!(json["path"], "#/paths/~1pets~1{id}/parameters/0");
        assert_eq!(json["suggestion"], "set `required: true`");
    }

    #[test]
    fn test_report_ok_tracks_errors() {
        let mut report = ValidationReport::success();
        report.push(Issue::warning(E_IGNORED_HEADER, &Pointer::root(), "ignored"));
        assert!(report.ok);
        assert!(report.passes(false));
        assert!(!report.passes(true));

        report.push(Issue::error(E_MISSING_FIELD, &Pointer::root(), "missing"));
        assert!(report.has_errors());
        assert_eq!(report.count(Severity::Error), 1);
        assert_eq!(report.codes(), [E_IGNORED_HEADER, E_MISSING_FIELD]);
    }

    #[test]
    fn test_from_issues_and_merge() {
        let warnings = ValidationReport::from_issues(vec![Issue::warning(
            E_DEPRECATED_KEYWORD,
            &Pointer::root(),
            "nullable",
        )]);
        assert!(warnings.ok);

        let mut report = ValidationReport::default();
        report.merge(warnings);
        report.merge(ValidationReport::from_issues(vec![Issue::error(
            E_DUPLICATE_TAG,
            &Pointer::root(),
            "dup",
        )]));
        assert!(!report.ok);
        assert_eq!(report.issues.len(), 2);
    }

    #[test]
    fn test_display() {
        let issue = Issue::warning(E_IGNORED_HEADER, &Pointer::root().join("x"), "Accept is ignored");
        assert_eq!(
            issue.to_string(),
            "warning [E_IGNORED_HEADER] #/x: Accept is ignored"
        );
    }
}
