//! Input validation for roster planning.
//!
//! Checks the structural integrity of a planning request before any
//! scheduling runs. Detects:
//! - Duplicate resource or group names
//! - Empty resource pool or group list
//! - Inverted date ranges
//!
//! All findings are user-correctable input problems, reported together
//! as data — never panics, never partial results.

use chrono::NaiveDate;

use crate::models::{Group, Resource};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two resources or groups share a name.
    DuplicateName,
    /// No resources to plan with.
    EmptyResourcePool,
    /// No groups to plan for.
    EmptyGroupList,
    /// Range end before range start.
    InvalidDateRange,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a planning request.
///
/// Checks:
/// 1. At least one resource and one group
/// 2. No duplicate resource names
/// 3. No duplicate group names
/// 4. `start <= end`
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    resources: &[Resource],
    groups: &[Group],
    start: NaiveDate,
    end: NaiveDate,
) -> ValidationResult {
    let mut errors = Vec::new();

    if resources.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyResourcePool,
            "No resources available for planning",
        ));
    }
    if groups.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyGroupList,
            "No duty groups selected",
        ));
    }

    let mut resource_names = std::collections::HashSet::new();
    for r in resources {
        if !resource_names.insert(r.name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateName,
                format!("Duplicate resource name: {}", r.name),
            ));
        }
    }

    let mut group_names = std::collections::HashSet::new();
    for g in groups {
        if !group_names.insert(g.name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateName,
                format!("Duplicate group name: {}", g.name),
            ));
        }
    }

    if end < start {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidDateRange,
            format!("Range end {end} is before start {start}"),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
