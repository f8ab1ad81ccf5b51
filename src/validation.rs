//! Registrant Validation - Rule/Policy Separation
//!
//! Rules produce structured violations.
//! Policy: any Error rejects the registrant before rendering; Warning and
//! Info are carried into the report.

use serde::{Deserialize, Serialize};

use crate::payload::normalize_id_number;
use crate::registrant::Registrant;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationViolation {
    pub rule: String,
    pub severity: ViolationSeverity,
    pub message: String,
    pub remediation: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<ValidationViolation>,
}

impl ValidationResult {
    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(|v| v.severity == ViolationSeverity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationViolation> {
        self.violations.iter().filter(|v| v.severity == ViolationSeverity::Error)
    }

    pub fn non_blocking(&self) -> Vec<ValidationViolation> {
        self.violations
            .iter()
            .filter(|v| v.severity != ViolationSeverity::Error)
            .cloned()
            .collect()
    }
}

/// Validation rule trait - produces violations
pub trait ValidationRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn validate(&self, registrant: &Registrant) -> Vec<ValidationViolation>;
}

fn violation(
    rule: &dyn ValidationRule,
    severity: ViolationSeverity,
    message: &str,
    remediation: &str,
) -> ValidationViolation {
    ValidationViolation {
        rule: rule.name().to_string(),
        severity,
        message: message.to_string(),
        remediation: vec![remediation.to_string()],
    }
}

// --- Concrete Rules ---

pub struct NameRule;

impl ValidationRule for NameRule {
    fn name(&self) -> &'static str { "name" }

    fn validate(&self, registrant: &Registrant) -> Vec<ValidationViolation> {
        if registrant.name.trim().is_empty() {
            vec![violation(self, ViolationSeverity::Error, "Name is empty", "Provide the attendee's name")]
        } else {
            vec![]
        }
    }
}

pub struct IdDocumentRule;

impl ValidationRule for IdDocumentRule {
    fn name(&self) -> &'static str { "id_document" }

    fn validate(&self, registrant: &Registrant) -> Vec<ValidationViolation> {
        let mut violations = vec![];

        if registrant.id_type.trim().is_empty() {
            violations.push(violation(
                self,
                ViolationSeverity::Error,
                "ID type is empty",
                "Provide the identity document type",
            ));
        }

        let id = normalize_id_number(&registrant.id_number);
        if id.is_empty() {
            violations.push(violation(
                self,
                ViolationSeverity::Error,
                "ID number is empty",
                "Provide the identity document number",
            ));
        } else if !id.chars().all(|c| c.is_ascii_alphanumeric()) {
            violations.push(violation(
                self,
                ViolationSeverity::Error,
                "ID number contains characters other than letters and digits",
                "Remove punctuation from the ID number",
            ));
        }

        violations
    }
}

/// Exhibitor records may carry session flags that the resolver ignores.
pub struct ExhibitorFlagsRule;

impl ValidationRule for ExhibitorFlagsRule {
    fn name(&self) -> &'static str { "exhibitor_flags" }

    fn validate(&self, registrant: &Registrant) -> Vec<ValidationViolation> {
        let flags = &registrant.entitlements;
        if registrant.is_exhibitor() && (flags.interactive_sessions || flags.plenary) {
            vec![violation(
                self,
                ViolationSeverity::Warning,
                "Interactive and plenary flags are ignored for exhibitors",
                "Clear session flags on exhibitor records at entry time",
            )]
        } else {
            vec![]
        }
    }
}

pub struct EntitlementsRule;

impl ValidationRule for EntitlementsRule {
    fn name(&self) -> &'static str { "entitlements" }

    fn validate(&self, registrant: &Registrant) -> Vec<ValidationViolation> {
        if !registrant.is_exhibitor() && registrant.entitlements.is_empty() {
            vec![violation(
                self,
                ViolationSeverity::Info,
                "No entitlements allocated; nothing will be generated",
                "Allocate at least one session before generating passes",
            )]
        } else {
            vec![]
        }
    }
}

/// Validator orchestrates rules and applies policy
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(NameRule),
                Box::new(IdDocumentRule),
                Box::new(ExhibitorFlagsRule),
                Box::new(EntitlementsRule),
            ],
        }
    }

    pub fn validate(&self, registrant: &Registrant) -> ValidationResult {
        let violations: Vec<_> = self
            .rules
            .iter()
            .flat_map(|rule| rule.validate(registrant))
            .collect();

        let valid = !violations.iter().any(|v| v.severity == ViolationSeverity::Error);
        ValidationResult { valid, violations }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registrant::{Category, Entitlements};

    fn registrant() -> Registrant {
        Registrant {
            id: 1,
            name: "Asha Rao".to_string(),
            id_type: "Aadhaar".to_string(),
            id_number: "1111-2222-3333".to_string(),
            phone: None,
            email: None,
            category: Category::Visitor,
            entitlements: Entitlements {
                exhibition_day1: true,
                ..Entitlements::default()
            },
        }
    }

    #[test]
    fn test_clean_registrant_has_no_violations() {
        let result = Validator::new().validate(&registrant());
        assert!(result.valid);
        assert!(result.violations.is_empty());
    }

    #[test]
    fn test_blank_name_blocks() {
        let mut r = registrant();
        r.name = "   ".to_string();
        let result = Validator::new().validate(&r);
        assert!(!result.valid);
        assert_eq!(result.errors().next().unwrap().rule, "name");
    }

    #[test]
    fn test_punctuated_id_blocks() {
        let mut r = registrant();
        r.id_number = "1111/2222".to_string();
        assert!(!Validator::new().validate(&r).valid);
    }

    #[test]
    fn test_exhibitor_session_flags_warn_only() {
        let mut r = registrant();
        r.category = Category::Exhibitor;
        r.entitlements.plenary = true;
        let result = Validator::new().validate(&r);
        assert!(result.valid);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].severity, ViolationSeverity::Warning);
        assert_eq!(result.non_blocking().len(), 1);
    }

    #[test]
    fn test_empty_visitor_is_info() {
        let mut r = registrant();
        r.entitlements = Entitlements::default();
        let result = Validator::new().validate(&r);
        assert!(result.valid);
        assert_eq!(result.violations[0].severity, ViolationSeverity::Info);
    }
}
