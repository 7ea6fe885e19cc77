use serde::{Deserialize, Serialize};

pub const UNKNOWN_USE_CASE: &str = "Unknown Use Case";
pub const DEFAULT_GOAL: &str = "Enable system functionality";
pub const DEFAULT_ACTORS: [&str; 2] = ["User", "System"];
pub const DEFAULT_MAIN_FLOW: [&str; 3] = [
    "1. User accesses the system",
    "2. System processes request",
    "3. System provides response",
];

/// Structured elements recovered from a use-case document.
///
/// Every field is populated after extraction; missing pieces carry defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseCaseElements {
    pub use_case_name: String,
    /// Deduplicated, in order of first appearance
    pub actors: Vec<String>,
    pub goal: String,
    pub preconditions: Vec<String>,
    /// `"<n>. <text>"` steps
    pub main_flow: Vec<String>,
    pub alternative_flows: Vec<String>,
    pub postconditions: Vec<String>,
}

impl Default for UseCaseElements {
    fn default() -> Self {
        Self {
            use_case_name: UNKNOWN_USE_CASE.to_string(),
            actors: DEFAULT_ACTORS.iter().map(|a| a.to_string()).collect(),
            goal: DEFAULT_GOAL.to_string(),
            preconditions: Vec::new(),
            main_flow: DEFAULT_MAIN_FLOW.iter().map(|s| s.to_string()).collect(),
            alternative_flows: Vec::new(),
            postconditions: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_field_names() {
        let value = serde_json::to_value(UseCaseElements::default()).unwrap();
        for key in [
            "use_case_name",
            "actors",
            "goal",
            "preconditions",
            "main_flow",
            "alternative_flows",
            "postconditions",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["actors"], serde_json::json!(["User", "System"]));
    }
}
