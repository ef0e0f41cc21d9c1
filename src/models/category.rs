//! Category model
//!
//! A category is a cost-service name or a finding-severity label. Raw names
//! are resolved exactly once, during aggregation, into a [`CategoryKey`]:
//! either the name itself or the synthetic "Other" bucket.

use std::fmt;

/// Label of the synthetic bucket for non-allow-listed categories
pub const OTHER_LABEL: &str = "Other";

/// Category name used for records that carry no category
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// A resolved category
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CategoryKey {
    /// A category reported under its own name
    Explicit(String),
    /// Everything the allow-list does not name, per (account, period)
    Other,
}

impl CategoryKey {
    /// Create an explicit category
    pub fn explicit(name: impl Into<String>) -> Self {
        Self::Explicit(name.into())
    }

    /// Get the display name
    pub fn name(&self) -> &str {
        match self {
            Self::Explicit(name) => name,
            Self::Other => OTHER_LABEL,
        }
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The configured category allow-list
///
/// An empty list means "report every category under its own name".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryFilter {
    allowed: Vec<String>,
}

impl CategoryFilter {
    /// Create a filter from the configured list (order is preserved, repeats dropped)
    pub fn new(allowed: Vec<String>) -> Self {
        let mut unique: Vec<String> = Vec::with_capacity(allowed.len());
        for name in allowed {
            if !unique.contains(&name) {
                unique.push(name);
            }
        }
        Self { allowed: unique }
    }

    /// A filter that keeps every category
    pub fn show_all() -> Self {
        Self::default()
    }

    /// Whether every category is kept verbatim
    pub fn is_show_all(&self) -> bool {
        self.allowed.is_empty()
    }

    /// Whether an Other bucket can exist under this filter
    pub fn uses_other(&self) -> bool {
        !self.is_show_all()
    }

    /// The allow-listed names, in configured order
    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    /// Check if a category name is allow-listed
    pub fn allows(&self, name: &str) -> bool {
        self.allowed.iter().any(|a| a == name)
    }

    /// Resolve a raw category name
    pub fn resolve(&self, name: &str) -> CategoryKey {
        if self.is_show_all() || self.allows(name) {
            CategoryKey::explicit(name)
        } else {
            CategoryKey::Other
        }
    }
}

/// A class of categories that can be dropped from a report entirely
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExclusionRule {
    /// The "Tax" service
    Tax,
    /// Any "AWS Support (...)" plan
    Support,
    /// Informational findings
    Informational,
}

impl ExclusionRule {
    /// Check whether a raw category name falls in this class
    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::Tax => category == "Tax",
            Self::Support => category.starts_with("AWS Support"),
            Self::Informational => category == "INFORMATIONAL",
        }
    }

    /// Find the first rule in a set matching a category
    pub fn first_match(rules: &[ExclusionRule], category: &str) -> Option<ExclusionRule> {
        rules.iter().copied().find(|rule| rule.matches(category))
    }
}

impl fmt::Display for ExclusionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tax => write!(f, "tax"),
            Self::Support => write!(f, "support"),
            Self::Informational => write!(f, "informational"),
        }
    }
}
