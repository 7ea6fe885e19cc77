pub mod lists;
pub mod patterns;
pub mod schema;

pub use patterns::{PatternCascade, PatternSet};
pub use schema::UseCaseElements;

use std::collections::HashSet;
use tracing::debug;

use schema::{DEFAULT_ACTORS, DEFAULT_GOAL, DEFAULT_MAIN_FLOW, UNKNOWN_USE_CASE};

const MAX_ACTOR_CHARS: usize = 50;
const MAX_FALLBACK_NAME_CHARS: usize = 100;

/// Rule-based extractor for use-case documents.
///
/// Each field is recovered independently from the raw text with its own
/// pattern cascade, so the result depends only on the input string.
pub struct Extractor {
    patterns: &'static PatternSet,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor {
    pub fn new() -> Self {
        Self {
            patterns: patterns::init(),
        }
    }

    /// Extract every use-case element. Never fails; absent fields get defaults.
    pub fn extract(&self, text: &str) -> UseCaseElements {
        let elements = UseCaseElements {
            use_case_name: self.extract_use_case_name(text),
            actors: self.extract_actors(text),
            goal: self.extract_goal(text),
            preconditions: self.extract_preconditions(text),
            main_flow: self.extract_main_flow(text),
            alternative_flows: self.extract_alternative_flows(text),
            postconditions: self.extract_postconditions(text),
        };

        debug!(
            name = %elements.use_case_name,
            actors = elements.actors.len(),
            steps = elements.main_flow.len(),
            "Extracted use-case elements"
        );
        elements
    }

    pub fn extract_use_case_name(&self, text: &str) -> String {
        let matched = self.patterns.use_case_name.first_accepted(text, |captured| {
            let name = captured.trim();
            (!name.is_empty() && name.to_lowercase() != "use case").then(|| name.to_string())
        });
        if let Some(name) = matched {
            return name;
        }

        let first_line = text.split('\n').next().unwrap_or_default().trim();
        if !first_line.is_empty() && first_line.chars().count() < MAX_FALLBACK_NAME_CHARS {
            first_line.to_string()
        } else {
            UNKNOWN_USE_CASE.to_string()
        }
    }

    /// Collects every actor block from every pattern, not just the first.
    pub fn extract_actors(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut actors = Vec::new();

        for block in self.patterns.actors.all_captures(text) {
            for piece in block.split([',', '•', '-', '\n']) {
                let actor = piece.trim();
                if !actor.is_empty() && actor.chars().count() < MAX_ACTOR_CHARS && seen.insert(actor) {
                    actors.push(actor.to_string());
                }
            }
        }

        if actors.is_empty() {
            DEFAULT_ACTORS.iter().map(|a| a.to_string()).collect()
        } else {
            actors
        }
    }

    pub fn extract_goal(&self, text: &str) -> String {
        self.patterns
            .goal
            .first_accepted(text, |captured| {
                let goal = captured.trim();
                (!goal.is_empty()).then(|| goal.to_string())
            })
            .unwrap_or_else(|| DEFAULT_GOAL.to_string())
    }

    pub fn extract_preconditions(&self, text: &str) -> Vec<String> {
        lists::extract_list_items(self.patterns, &self.patterns.preconditions, text)
    }

    pub fn extract_main_flow(&self, text: &str) -> Vec<String> {
        let steps = lists::extract_flow_steps(self.patterns, text);
        if steps.is_empty() {
            DEFAULT_MAIN_FLOW.iter().map(|s| s.to_string()).collect()
        } else {
            steps
        }
    }

    pub fn extract_alternative_flows(&self, text: &str) -> Vec<String> {
        lists::extract_list_items(self.patterns, &self.patterns.alternative_flows, text)
    }

    pub fn extract_postconditions(&self, text: &str) -> Vec<String> {
        lists::extract_list_items(self.patterns, &self.patterns.postconditions, text)
    }
}
