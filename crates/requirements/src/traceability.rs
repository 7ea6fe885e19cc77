use extract::UseCaseElements;

use crate::schema::{FunctionalRequirement, TraceabilityRow};

pub const NAME_TAG: &str = "Use Case Name";
pub const GOAL_TAG: &str = "Goal";
pub const GENERAL_TAG: &str = "General System";

/// Map every requirement to the use-case elements whose wording appears in
/// its description. Rows follow requirement order.
pub fn build_matrix(elements: &UseCaseElements, requirements: &[FunctionalRequirement]) -> Vec<TraceabilityRow> {
    let name = elements.use_case_name.to_lowercase();
    let goal = elements.goal.to_lowercase();

    requirements
        .iter()
        .map(|requirement| {
            let description = requirement.description.to_lowercase();
            let mut mapped = Vec::new();

            if shares_word(&description, &name) {
                mapped.push(NAME_TAG.to_string());
            }
            if shares_word(&description, &goal) {
                mapped.push(GOAL_TAG.to_string());
            }
            for actor in &elements.actors {
                if description.contains(&actor.to_lowercase()) {
                    mapped.push(format!("Actor: {}", actor));
                }
            }

            if mapped.is_empty() {
                mapped.push(GENERAL_TAG.to_string());
            }

            TraceabilityRow {
                requirement_id: requirement.id.clone(),
                requirement_title: requirement.title.clone(),
                mapped_elements: mapped,
            }
        })
        .collect()
}

/// Substring test, so "log" in the source also matches "login".
fn shares_word(description: &str, source: &str) -> bool {
    source.split_whitespace().any(|word| description.contains(word))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Category, Priority};

    fn requirement(id: &str, description: &str) -> FunctionalRequirement {
        FunctionalRequirement {
            id: id.to_string(),
            title: format!("{id} title"),
            description: description.to_string(),
            category: Category::General,
            priority: Priority::Medium,
        }
    }

    fn elements() -> UseCaseElements {
        UseCaseElements {
            use_case_name: "Order Pizza".to_string(),
            actors: vec!["Customer".to_string(), "Courier".to_string()],
            goal: "Deliver hot food".to_string(),
            ..UseCaseElements::default()
        }
    }

    #[test]
    fn test_default_mapping() {
        let rows = build_matrix(&elements(), &[requirement("FR-001", "The system shall idle")]);
        assert_eq!(rows[0].mapped_elements, vec![GENERAL_TAG]);
    }

    #[test]
    fn test_tags_in_fixed_order() {
        let reqs = [requirement(
            "FR-003",
            "The system shall let the courier deliver the pizza to the customer",
        )];
        let rows = build_matrix(&elements(), &reqs);

        assert_eq!(rows[0].requirement_id, "FR-003");
        assert_eq!(rows[0].requirement_title, "FR-003 title");
        assert_eq!(
            rows[0].mapped_elements,
            vec!["Use Case Name", "Goal", "Actor: Customer", "Actor: Courier"]
        );
    }

    #[test]
    fn test_one_row_per_requirement() {
        let reqs = [
            requirement("FR-001", "a"),
            requirement("FR-001", "b"),
            requirement("FR-010", "c"),
        ];
        let rows = build_matrix(&elements(), &reqs);
        let ids: Vec<&str> = rows.iter().map(|r| r.requirement_id.as_str()).collect();
        assert_eq!(ids, vec!["FR-001", "FR-001", "FR-010"]);
    }
}
