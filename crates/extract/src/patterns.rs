use once_cell::sync::OnceCell;
use regex::Regex;
use tracing::{debug, info};

/// Ends a section body: a blank line, or the end of the text (optionally
/// after one trailing newline).
const BLOCK_END: &str = r"(?:\n\n|\n?\z)";

/// Ordered list of patterns for one use-case field. Group 1 of each pattern
/// is the captured value; earlier patterns take precedence.
pub struct PatternCascade {
    field: &'static str,
    patterns: Vec<Regex>,
}

impl PatternCascade {
    pub fn new(field: &'static str, sources: &[String]) -> Self {
        let patterns = sources
            .iter()
            .map(|src| Regex::new(src).expect("use-case field pattern must compile"))
            .collect();
        Self { field, patterns }
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Try each pattern's first match in order; the first capture `accept`
    /// turns into a value wins.
    pub fn first_accepted<F>(&self, text: &str, accept: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        for (index, re) in self.patterns.iter().enumerate() {
            let Some(caps) = re.captures(text) else {
                continue;
            };
            let captured = caps.get(1).map_or("", |m| m.as_str());
            if let Some(value) = accept(captured) {
                debug!(field = self.field, pattern = index, "Pattern matched");
                return Some(value);
            }
        }
        None
    }

    /// Body of the first pattern that matches anywhere, even if empty.
    pub fn first_section<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.patterns.iter().find_map(|re| {
            re.captures(text)
                .map(|caps| caps.get(1).map_or("", |m| m.as_str()))
        })
    }

    /// Every capture of every pattern, pattern order first, then text order.
    pub fn all_captures<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.patterns
            .iter()
            .flat_map(|re| {
                re.captures_iter(text)
                    .map(|caps| caps.get(1).map_or("", |m| m.as_str()))
            })
            .collect()
    }
}

/// All compiled patterns the extractor uses.
pub struct PatternSet {
    pub use_case_name: PatternCascade,
    pub goal: PatternCascade,
    pub actors: PatternCascade,
    pub preconditions: PatternCascade,
    pub alternative_flows: PatternCascade,
    pub postconditions: PatternCascade,
    /// `<digits>.` followed by optional whitespace (group 2)
    pub step_start: Regex,
    /// A numbered item beginning on the next line
    pub next_step: Regex,
    pub bullet_item: Regex,
    pub numbered_item: Regex,
}

impl PatternSet {
    fn compile() -> Self {
        Self {
            use_case_name: PatternCascade::new(
                "use_case_name",
                &[
                    r#"(?i)use case:?\s*["']?(.*?)["']?(?:\n|\z)"#.to_string(),
                    r#"(?i)use case name:?\s*["']?(.*?)["']?(?:\n|\z)"#.to_string(),
                    r#"(?i)system:?\s*["']?(.*?)\s*use case"#.to_string(),
                    r#"(?i)\A["']?(.*?use case.*?)["']?(?:\n|\z)"#.to_string(),
                ],
            ),
            goal: PatternCascade::new("goal", &block_patterns(&["goals?", "purposes?", "objectives?"])),
            actors: PatternCascade::new(
                "actors",
                &[
                    format!(r"(?is)actors?:?\s*(.*?){BLOCK_END}"),
                    r"(?is)primary.*?actor:?\s*(.*?)\n".to_string(),
                    r"(?is)secondary.*?actor:?\s*(.*?)\n".to_string(),
                    format!(r"(?is)users?:?\s*(.*?){BLOCK_END}"),
                ],
            ),
            preconditions: PatternCascade::new(
                "preconditions",
                &block_patterns(&["preconditions?", "assumptions?", "prerequisites?"]),
            ),
            alternative_flows: PatternCascade::new(
                "alternative_flows",
                &block_patterns(&["alternative.*?flows?", "exceptions?", "error.*?flows?"]),
            ),
            postconditions: PatternCascade::new(
                "postconditions",
                &block_patterns(&["postconditions?", "results?", "outcomes?"]),
            ),
            step_start: compile(r"(\d+)\.(\s*)"),
            next_step: compile(r"\A\n\d+\."),
            bullet_item: compile(r"[•\-*]\s*(.*)"),
            numbered_item: compile(r"\d+\.\s*(.*)"),
        }
    }
}

/// `<heading>:` followed by a body running to the end of the block
fn block_patterns(headings: &[&str]) -> Vec<String> {
    headings
        .iter()
        .map(|heading| format!(r"(?is){heading}:?\s*(.*?){BLOCK_END}"))
        .collect()
}

fn compile(src: &str) -> Regex {
    Regex::new(src).expect("extractor pattern must compile")
}

static PATTERNS: OnceCell<PatternSet> = OnceCell::new();

/// Compile the pattern tables once per process. Safe to call repeatedly.
pub fn init() -> &'static PatternSet {
    PATTERNS.get_or_init(|| {
        let set = PatternSet::compile();
        info!(
            name_patterns = set.use_case_name.len(),
            actor_patterns = set.actors.len(),
            "Use-case pattern tables compiled"
        );
        set
    })
}

pub fn is_ready() -> bool {
    PATTERNS.get().is_some()
}
