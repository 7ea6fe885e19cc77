use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

use crate::patterns::{PatternCascade, PatternSet};

pub const MAX_LIST_ITEMS: usize = 10;
pub const MAX_ITEM_CHARS: usize = 200;
pub const MAX_SENTENCE_STEPS: usize = 5;

/// Bullet and numbered items of a field's section, or of the whole text when
/// the section is absent.
///
/// A section that is present but holds no items yields an empty list; the
/// whole text is not rescanned in that case.
pub fn extract_list_items(patterns: &PatternSet, section: &PatternCascade, text: &str) -> Vec<String> {
    let found = section.first_section(text);
    let scope = found.unwrap_or(text);

    let bullets = patterns.bullet_item.captures_iter(scope);
    let numbers = patterns.numbered_item.captures_iter(scope);

    let items: Vec<String> = bullets
        .chain(numbers)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|item| !item.is_empty() && item.chars().count() < MAX_ITEM_CHARS)
        .take(MAX_LIST_ITEMS)
        .map(str::to_string)
        .collect();

    debug!(
        field = section.field(),
        whole_text = found.is_none(),
        items = items.len(),
        "Extracted list items"
    );
    items
}

/// `"<n>. <text>"` for each numbered step found anywhere in the text.
pub fn extract_flow_steps(patterns: &PatternSet, text: &str) -> Vec<String> {
    let steps: Vec<String> = numbered_steps(patterns, text)
        .into_iter()
        .filter_map(|(number, body)| {
            let body = body.trim();
            (!body.is_empty()).then(|| format!("{}. {}", number, body))
        })
        .collect();

    if steps.is_empty() {
        sentence_steps(text)
    } else {
        steps
    }
}

/// Numbered items whose body runs to the end of its line, accepted only when
/// that line is followed by another numbered item, a blank line, or the end
/// of the text. Whitespace after the dot may span lines; shorter spans are
/// tried when the longest one fails.
fn numbered_steps<'t>(patterns: &PatternSet, text: &'t str) -> Vec<(&'t str, &'t str)> {
    let mut steps = Vec::new();
    let mut pos = 0;

    while pos <= text.len() {
        let Some(caps) = patterns.step_start.captures_at(text, pos) else {
            break;
        };
        let (Some(whole), Some(number), Some(gap)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            break;
        };

        let mut body_starts = text[gap.start()..gap.end()]
            .char_indices()
            .map(|(i, _)| gap.start() + i)
            .chain(std::iter::once(gap.end()))
            .rev();

        let found = body_starts.find_map(|start| {
            let end = text[start..].find('\n').map_or(text.len(), |i| start + i);
            step_ends_at(patterns, text, end).then_some((start, end))
        });

        match found {
            Some((start, end)) => {
                steps.push((number.as_str(), &text[start..end]));
                pos = end;
            }
            None => {
                pos = whole.start()
                    + text[whole.start()..]
                        .chars()
                        .next()
                        .map_or(1, char::len_utf8);
            }
        }
    }

    steps
}

fn step_ends_at(patterns: &PatternSet, text: &str, end: usize) -> bool {
    let rest = &text[end..];
    rest.is_empty() || rest == "\n" || rest.starts_with("\n\n") || patterns.next_step.is_match(rest)
}

/// Fallback for prose: the first sentences become numbered steps.
fn sentence_steps(text: &str) -> Vec<String> {
    sentences(text)
        .into_iter()
        .take(MAX_SENTENCE_STEPS)
        .enumerate()
        .map(|(i, sentence)| format!("{}. {}", i + 1, sentence))
        .collect()
}

/// Sentences that end only at `.`, `!` or `?`. UAX #29 segments ending in a
/// bare line break are joined onto the next one, newlines kept.
fn sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();

    for segment in text.split_sentence_bounds() {
        current.push_str(segment);
        if ends_sentence(&current) {
            push_trimmed(&mut sentences, &current);
            current.clear();
        }
    }
    push_trimmed(&mut sentences, &current);

    sentences
}

fn ends_sentence(segment: &str) -> bool {
    segment
        .trim_end()
        .trim_end_matches(['"', '\'', ')', ']'])
        .ends_with(['.', '!', '?'])
}

fn push_trimmed(sentences: &mut Vec<String>, sentence: &str) {
    let sentence = sentence.trim();
    if !sentence.is_empty() {
        sentences.push(sentence.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns;

    #[test]
    fn test_numbered_steps_stop_at_line_end() {
        let set = patterns::init();
        let text = "Main Flow:\n1. User opens form\n2. System saves it\n\nDone";
        let steps = extract_flow_steps(set, text);
        assert_eq!(steps, vec!["1. User opens form", "2. System saves it"]);
    }

    #[test]
    fn test_step_followed_by_prose_is_skipped() {
        let set = patterns::init();
        // step 1 is followed by a plain line, so it is not a complete step
        let text = "1. First thing\ncontinues here\n2. Second thing";
        let steps = extract_flow_steps(set, text);
        assert_eq!(steps, vec!["2. Second thing"]);
    }

    #[test]
    fn test_multi_digit_numbers() {
        let set = patterns::init();
        let text = "9. Ninth\n10. Tenth\n";
        let steps = extract_flow_steps(set, text);
        assert_eq!(steps, vec!["9. Ninth", "10. Tenth"]);
    }

    #[test]
    fn test_sentence_fallback() {
        let set = patterns::init();
        let text = "The clerk opens the ledger. The system shows totals! Then it prints a receipt.";
        let steps = extract_flow_steps(set, text);
        assert_eq!(
            steps,
            vec![
                "1. The clerk opens the ledger.",
                "2. The system shows totals!",
                "3. Then it prints a receipt.",
            ]
        );
    }

    #[test]
    fn test_sentence_fallback_joins_broken_lines() {
        let set = patterns::init();
        let text = "Order Pizza\nThe customer picks a pizza\nCustomer pays. System confirms.";
        let steps = extract_flow_steps(set, text);
        assert_eq!(
            steps,
            vec![
                "1. Order Pizza\nThe customer picks a pizza\nCustomer pays.",
                "2. System confirms.",
            ]
        );
    }

    #[test]
    fn test_sentence_fallback_keeps_unterminated_tail() {
        let set = patterns::init();
        let text = "Clerk scans the badge.\nDoor opens\nfor the visitor";
        let steps = extract_flow_steps(set, text);
        assert_eq!(
            steps,
            vec!["1. Clerk scans the badge.", "2. Door opens\nfor the visitor"]
        );
    }

    #[test]
    fn test_sentence_fallback_caps_at_five() {
        let set = patterns::init();
        let text = "One. Two. Three. Four. Five. Six. Seven.";
        assert_eq!(extract_flow_steps(set, text).len(), MAX_SENTENCE_STEPS);
    }

    #[test]
    fn test_list_items_from_section() {
        let set = patterns::init();
        let text = "Preconditions:\n- Account exists\n* Network is up\n\nMain Flow:\n1. Do it";
        let items = extract_list_items(set, &set.preconditions, text);
        assert_eq!(items, vec!["Account exists", "Network is up"]);
    }

    #[test]
    fn test_list_items_bullets_before_numbers() {
        let set = patterns::init();
        let text = "Notes\n1. numbered first\n- bullet second";
        let items = extract_list_items(set, &set.postconditions, text);
        assert_eq!(items, vec!["bullet second", "numbered first"]);
    }

    #[test]
    fn test_list_items_whole_text_fallback_and_cap() {
        let set = patterns::init();
        let text: String = (1..=12).map(|i| format!("- item {}\n", i)).collect();
        let items = extract_list_items(set, &set.preconditions, &text);
        assert_eq!(items.len(), MAX_LIST_ITEMS);
        assert_eq!(items[0], "item 1");
    }

    #[test]
    fn test_present_empty_section_does_not_rescan() {
        let set = patterns::init();
        let text = "Preconditions:\nnone really\n\nNotes\n- stray bullet";
        let items = extract_list_items(set, &set.preconditions, text);
        assert_eq!(set.preconditions.field(), "preconditions");
        assert!(items.is_empty());
    }

    #[test]
    fn test_list_items_drop_long_entries() {
        let set = patterns::init();
        let text = format!("- {}\n- short", "x".repeat(MAX_ITEM_CHARS));
        let items = extract_list_items(set, &set.preconditions, &text);
        assert_eq!(items, vec!["short"]);
    }
}
