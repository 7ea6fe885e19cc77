//! Extraction is total and deterministic over arbitrary text.

use extract::Extractor;
use proptest::prelude::*;

fn use_case_like() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "(Use Case|Actors|Goal|Preconditions|Main Flow|Alternative Flows|Postconditions): [A-Za-z ,]{0,30}",
            "[0-9]{1,2}\\. [A-Za-z ]{0,30}",
            "[-•*] [A-Za-z ]{0,30}",
            "[A-Za-z .!?]{0,40}",
            Just(String::new()),
        ],
        0..12,
    )
    .prop_map(|lines| lines.join("\n"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_extraction_is_total(text in any::<String>()) {
        let elements = Extractor::new().extract(&text);

        prop_assert!(!elements.use_case_name.is_empty());
        prop_assert!(!elements.actors.is_empty());
        prop_assert!(!elements.goal.is_empty());
        prop_assert!(!elements.main_flow.is_empty());
        prop_assert!(elements.actors.iter().all(|a| a.chars().count() < 50));
        for list in [&elements.preconditions, &elements.alternative_flows, &elements.postconditions] {
            prop_assert!(list.len() <= 10);
            prop_assert!(list.iter().all(|item| !item.is_empty() && item.chars().count() < 200));
        }
    }

    #[test]
    fn prop_extraction_is_idempotent(text in use_case_like()) {
        let extractor = Extractor::new();
        let first = extractor.extract(&text);
        let second = extractor.extract(&text);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_numbered_steps_keep_their_numbers(text in use_case_like()) {
        let elements = Extractor::new().extract(&text);
        for step in &elements.main_flow {
            let (number, _) = step.split_once(". ").unwrap_or(("", ""));
            prop_assert!(number.chars().all(|c| c.is_numeric()) && !number.is_empty());
        }
    }
}
