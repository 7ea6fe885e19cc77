use extract::UseCaseElements;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use crate::schema::{requirement_id, Category, FunctionalRequirement, Priority};

const USER_ACTOR_KEYWORDS: [&str; 5] = ["user", "customer", "admin", "manager", "operator"];
const AUTH_GOAL_KEYWORDS: [&str; 3] = ["login", "authenticate", "access"];

/// Ids reserved per user-type actor, whether one or two requirements are emitted.
pub const ACTOR_ID_STRIDE: usize = 5;
/// Gap inserted before condition requirements, independent of the flow counts.
pub const CONDITION_ID_OFFSET: usize = 10;

/// Keyword groups checked in order; the first group found in a step decides.
const STEP_CATEGORIES: [(&[&str], Category); 4] = [
    (&["validate", "verify", "check"], Category::Validation),
    (&["display", "show", "present"], Category::UserInterface),
    (&["store", "save", "retrieve", "update"], Category::DataManagement),
    (&["calculate", "process", "compute"], Category::BusinessLogic),
];

static STEP_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\s*").expect("step number pattern must compile"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlowKind {
    Main,
    Alternative,
}

impl FlowKind {
    fn label(self) -> &'static str {
        match self {
            FlowKind::Main => "Main Flow",
            FlowKind::Alternative => "Alternative Flow",
        }
    }

    fn priority(self) -> Priority {
        match self {
            FlowKind::Main => Priority::Medium,
            FlowKind::Alternative => Priority::Low,
        }
    }
}

/// Rule-based functional requirement generator.
#[derive(Debug, Clone, Default)]
pub struct RequirementGenerator;

impl RequirementGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Derive requirements from use-case elements.
    ///
    /// `model_type` is recorded but every model currently runs the same
    /// rule set. Id numbering leaves gaps (and can collide across rules);
    /// see [`ACTOR_ID_STRIDE`] and [`CONDITION_ID_OFFSET`].
    pub fn generate(&self, elements: &UseCaseElements, model_type: &str) -> Vec<FunctionalRequirement> {
        let mut requirements = Vec::new();
        let mut next_id = 1;

        for actor in &elements.actors {
            if is_user_actor(actor) {
                requirements.extend(self.actor_requirements(actor, &elements.goal, next_id));
                next_id += ACTOR_ID_STRIDE;
            }
        }

        requirements.extend(self.flow_requirements(&elements.main_flow, next_id, FlowKind::Main));
        next_id += elements.main_flow.len();

        requirements.extend(self.flow_requirements(
            &elements.alternative_flows,
            next_id,
            FlowKind::Alternative,
        ));

        requirements.extend(self.condition_requirements(elements, next_id + CONDITION_ID_OFFSET));

        info!(model_type, requirements = requirements.len(), "Generated functional requirements");
        requirements
    }

    fn actor_requirements(&self, actor: &str, goal: &str, start_id: usize) -> Vec<FunctionalRequirement> {
        let mut requirements = vec![FunctionalRequirement {
            id: requirement_id(start_id),
            title: format!("{} Interface Access", actor),
            description: format!("The system shall provide interface access for {}", actor),
            category: Category::UserInterface,
            priority: Priority::High,
        }];

        let goal = goal.to_lowercase();
        if AUTH_GOAL_KEYWORDS.iter().any(|k| goal.contains(k)) {
            requirements.push(FunctionalRequirement {
                id: requirement_id(start_id + 1),
                title: format!("{} Authentication", actor),
                description: format!("The system shall authenticate {} credentials", actor),
                category: Category::Security,
                priority: Priority::High,
            });
        }

        debug!(actor, emitted = requirements.len(), "Actor requirements");
        requirements
    }

    fn flow_requirements(&self, steps: &[String], start_id: usize, kind: FlowKind) -> Vec<FunctionalRequirement> {
        steps
            .iter()
            .enumerate()
            .map(|(offset, step)| FunctionalRequirement {
                id: requirement_id(start_id + offset),
                title: format!("{} Step {}", kind.label(), offset + 1),
                description: format!("The system shall {}", step_action(step)),
                category: categorize_step(step),
                priority: kind.priority(),
            })
            .collect()
    }

    fn condition_requirements(&self, elements: &UseCaseElements, start_id: usize) -> Vec<FunctionalRequirement> {
        let preconditions = elements.preconditions.iter().map(|condition| {
            (
                "System Precondition",
                format!("The system shall ensure that {}", condition),
            )
        });
        let postconditions = elements.postconditions.iter().map(|condition| {
            (
                "System Postcondition",
                format!("The system shall achieve {}", condition),
            )
        });

        preconditions
            .chain(postconditions)
            .enumerate()
            .map(|(offset, (title, description))| FunctionalRequirement {
                id: requirement_id(start_id + offset),
                title: title.to_string(),
                description,
                category: Category::System,
                priority: Priority::High,
            })
            .collect()
    }
}

pub fn is_user_actor(actor: &str) -> bool {
    let actor = actor.to_lowercase();
    USER_ACTOR_KEYWORDS.iter().any(|k| actor.contains(k))
}

pub fn categorize_step(step: &str) -> Category {
    let step = step.to_lowercase();
    STEP_CATEGORIES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| step.contains(k)))
        .map_or(Category::General, |(_, category)| *category)
}

/// Step text from the system's point of view: number stripped, the first
/// lowercase "user" turned into "allow user to", then lowercased.
///
/// Later occurrences of "user" are left as written.
pub fn step_action(step: &str) -> String {
    let clean = STEP_NUMBER.replace(step, "");
    clean.replacen("user", "allow user to", 1).to_lowercase()
}
