/// Returned in place of OCR output when the engine produced only whitespace.
pub const NO_TEXT_NOTICE: &str =
    "No text could be extracted from the image. Using sample use case data.";

const USE_CASE_KEYWORDS: [&str; 6] = ["use case", "actor", "goal", "flow", "system", "user"];

const MIN_USE_CASE_CHARS: usize = 50;

/// Trim every line and drop the empty ones
pub fn normalize_lines(text: &str) -> String {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Heuristic check that OCR output is worth feeding to the extractor.
pub fn looks_like_use_case(text: &str) -> bool {
    if text.chars().count() < MIN_USE_CASE_CHARS {
        return false;
    }
    let lower = text.to_lowercase();
    USE_CASE_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}
