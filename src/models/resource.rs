//! Resource and group models.
//!
//! Resources are the people eligible for duty; groups are the duty
//! circles ("Rufbereitschaftsgruppen") a roster is planned for. Both
//! are supplied by the host's import adapter and treated as immutable
//! by the scheduling core — uniqueness of names within a batch is the
//! importer's responsibility.

use serde::{Deserialize, Serialize};

/// A person eligible for duty assignments.
///
/// Identity is the name, unique within the active dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Unique name within the active dataset.
    pub name: String,
    /// District/region tag (e.g., a service area code).
    pub district: String,
}

/// A duty group a roster is planned for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Unique group name.
    pub name: String,
    /// District/region tag.
    pub district: String,
    /// Responsible-person tag (dispatcher or team lead).
    pub responsible: String,
}

impl Resource {
    /// Creates a new resource.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            district: String::new(),
        }
    }

    /// Sets the district tag.
    pub fn with_district(mut self, district: impl Into<String>) -> Self {
        self.district = district.into();
        self
    }
}

impl Group {
    /// Creates a new group.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            district: String::new(),
            responsible: String::new(),
        }
    }

    /// Sets the district tag.
    pub fn with_district(mut self, district: impl Into<String>) -> Self {
        self.district = district.into();
        self
    }

    /// Sets the responsible-person tag.
    pub fn with_responsible(mut self, responsible: impl Into<String>) -> Self {
        self.responsible = responsible.into();
        self
    }
}
