use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    #[serde(rename = "User Interface")]
    UserInterface,
    Security,
    System,
    Validation,
    #[serde(rename = "Data Management")]
    DataManagement,
    #[serde(rename = "Business Logic")]
    BusinessLogic,
    General,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::UserInterface => write!(f, "User Interface"),
            Category::Security => write!(f, "Security"),
            Category::System => write!(f, "System"),
            Category::Validation => write!(f, "Validation"),
            Category::DataManagement => write!(f, "Data Management"),
            Category::BusinessLogic => write!(f, "Business Logic"),
            Category::General => write!(f, "General"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "High"),
            Priority::Medium => write!(f, "Medium"),
            Priority::Low => write!(f, "Low"),
        }
    }
}

/// A single "The system shall ..." statement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FunctionalRequirement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
}

/// Use-case elements a requirement traces back to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TraceabilityRow {
    pub requirement_id: String,
    pub requirement_title: String,
    pub mapped_elements: Vec<String>,
}

/// `FR-001` style identifier; wider numbers are not truncated.
pub fn requirement_id(number: usize) -> String {
    format!("FR-{:03}", number)
}
