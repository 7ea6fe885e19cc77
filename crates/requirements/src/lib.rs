//! Functional requirement generation and traceability for extracted use cases.

pub mod generator;
pub mod schema;
pub mod traceability;

pub use generator::RequirementGenerator;
pub use schema::{Category, FunctionalRequirement, Priority, TraceabilityRow};
pub use traceability::build_matrix;

use extract::{Extractor, UseCaseElements};
use ocr::OcrProcessor;
use serde::Serialize;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::info;

pub const DEFAULT_MODEL_TYPE: &str = "rule-based";

/// Everything one pipeline run produces
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub use_case_description: UseCaseElements,
    pub functional_requirements: Vec<FunctionalRequirement>,
    pub traceability_matrix: Vec<TraceabilityRow>,
    pub extracted_text: String,
    #[serde(skip)]
    pub timings: StageTimings,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StageTimings {
    pub ocr: Duration,
    pub extract: Duration,
    pub generate: Duration,
    pub trace: Duration,
}

/// OCR -> extraction -> generation -> traceability
pub struct Pipeline {
    extractor: Extractor,
    generator: RequirementGenerator,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            extractor: Extractor::new(),
            generator: RequirementGenerator::new(),
        }
    }

    /// Run the whole pipeline on an uploaded file.
    pub async fn generate_requirements(
        &self,
        ocr: &OcrProcessor,
        path: &Path,
        model_type: &str,
    ) -> PipelineOutput {
        info!("Step 1: Performing OCR...");
        let started = Instant::now();
        let extracted_text = ocr.extract_text(path).await;
        let ocr_time = started.elapsed();

        let mut output = self.process_text(extracted_text, model_type);
        output.timings.ocr = ocr_time;
        output
    }

    /// Run the text stages on already recognized text.
    pub fn process_text(&self, extracted_text: String, model_type: &str) -> PipelineOutput {
        let mut timings = StageTimings::default();

        info!("Step 2: Performing NLP analysis...");
        let started = Instant::now();
        let elements = self.extractor.extract(&extracted_text);
        timings.extract = started.elapsed();

        info!("Step 3: Generating functional requirements...");
        let started = Instant::now();
        let requirements = self.generator.generate(&elements, model_type);
        timings.generate = started.elapsed();

        info!("Step 4: Generating traceability matrix...");
        let started = Instant::now();
        let matrix = build_matrix(&elements, &requirements);
        timings.trace = started.elapsed();

        PipelineOutput {
            use_case_description: elements,
            functional_requirements: requirements,
            traceability_matrix: matrix,
            extracted_text,
            timings,
        }
    }
}
