use std::time::Instant;
use tracing::{debug, info};

use super::{ServiceCore, StudyInput, UploadKind};
use crate::error::ApiResult;
use crate::gemini::Part;
use crate::interpreter::{ExplanationSolution, RawModelReply};
use crate::prompts::{
    document_query_prompt, extracted_text_query_prompt, image_query_prompt, text_query_prompt,
};

/// Virtual Professor: explanation plus step-by-step solution.
#[derive(Clone)]
pub struct ExplainService {
    core: ServiceCore,
}

impl ExplainService {
    /// Create a new explain service
    pub fn new(core: ServiceCore) -> Self {
        Self { core }
    }

    /// Answer a question or analyze an upload
    pub async fn process(&self, input: StudyInput) -> ApiResult<ExplanationSolution> {
        let start = Instant::now();
        let input_kind = input.describe();

        let parts = build_parts(&input)?;
        debug!(input = input_kind, parts = parts.len(), "Requesting explanation");

        let reply = RawModelReply::from(self.core.generator().generate(parts).await?);
        let result = self.core.interpreter().explain(&reply);

        info!(
            input = input_kind,
            explanation_chars = result.explanation.len(),
            solution_chars = result.solution.len(),
            latency_ms = start.elapsed().as_millis(),
            "Explanation completed"
        );

        Ok(result)
    }
}

fn build_parts(input: &StudyInput) -> ApiResult<Vec<Part>> {
    let parts = match input {
        StudyInput::Text(message) => vec![Part::text(text_query_prompt(message))],
        StudyInput::Document(upload) => match upload.kind()? {
            UploadKind::Image(mime) => vec![
                Part::text(image_query_prompt()),
                Part::inline_data(mime, &upload.data),
            ],
            UploadKind::Pdf => vec![
                Part::text(document_query_prompt()),
                Part::inline_data("application/pdf", &upload.data),
            ],
            UploadKind::PlainText => {
                vec![Part::text(extracted_text_query_prompt(upload.text()?))]
            }
        },
    };
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ApiError, GeminiError};
    use crate::gemini::MockTextGenerator;
    use crate::interpreter::{NO_EXPLANATION, NO_SOLUTION};
    use crate::services::Upload;
    use std::sync::Arc;

    fn service_with(generator: MockTextGenerator) -> ExplainService {
        ExplainService::new(ServiceCore::new(Arc::new(generator)))
    }

    #[tokio::test]
    async fn test_text_question_is_split() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .withf(|parts| {
                parts.len() == 1
                    && parts[0]
                        .as_text()
                        .is_some_and(|t| t.contains("educational query: What is velocity?"))
            })
            .times(1)
            .returning(|_| {
                Ok("Velocity is speed with direction.\n\n**Step 1:** Measure displacement.".into())
            });

        let result = service_with(generator)
            .process(StudyInput::Text("What is velocity?".into()))
            .await
            .unwrap();

        assert_eq!(result.explanation, "Velocity is speed with direction.");
        assert_eq!(result.solution, "**Step 1:** Measure displacement.");
    }

    #[tokio::test]
    async fn test_reply_without_steps_uses_sentinel() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .returning(|_| Ok("Only prose here.".into()));

        let result = service_with(generator)
            .process(StudyInput::Text("Why?".into()))
            .await
            .unwrap();

        assert_eq!(result.explanation, "Only prose here.");
        assert_eq!(result.solution, NO_SOLUTION);
        assert_ne!(result.explanation, NO_EXPLANATION);
    }

    #[tokio::test]
    async fn test_image_is_sent_inline() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .withf(|parts| {
                parts.len() == 2
                    && matches!(
                        &parts[1],
                        Part::InlineData { inline_data } if inline_data.mime_type == "image/png"
                    )
            })
            .times(1)
            .returning(|_| Ok("A triangle. **Step 1:** Use Pythagoras.".into()));

        let upload = Upload::new("triangle.png", "image/png", vec![0x89, 0x50, 0x4e, 0x47]);
        let result = service_with(generator)
            .process(StudyInput::Document(upload))
            .await
            .unwrap();

        assert_eq!(result.explanation, "A triangle.");
    }

    #[tokio::test]
    async fn test_pdf_is_sent_inline() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .withf(|parts| {
                matches!(
                    parts.get(1),
                    Some(Part::InlineData { inline_data }) if inline_data.mime_type == "application/pdf"
                )
            })
            .times(1)
            .returning(|_| Ok("Summary".into()));

        let upload = Upload::new("lecture.pdf", "application/pdf", b"%PDF-1.4".to_vec());
        service_with(generator)
            .process(StudyInput::Document(upload))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_plain_text_upload_is_inlined_in_prompt() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .withf(|parts| {
                parts.len() == 1
                    && parts[0]
                        .as_text()
                        .is_some_and(|t| t.contains("Integrate x^2 dx"))
            })
            .times(1)
            .returning(|_| Ok("ok".into()));

        let upload = Upload::new("hw.txt", "text/plain", b"Integrate x^2 dx".to_vec());
        service_with(generator)
            .process(StudyInput::Document(upload))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_unsupported_upload_skips_generator() {
        let mut generator = MockTextGenerator::new();
        generator.expect_generate().never();

        let upload = Upload::new("song.mp3", "audio/mpeg", vec![1, 2, 3]);
        let err = service_with(generator)
            .process(StudyInput::Document(upload))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::UnsupportedMediaType { .. }));
    }

    #[tokio::test]
    async fn test_generator_failure_maps_to_upstream_error() {
        let mut generator = MockTextGenerator::new();
        generator.expect_generate().returning(|_| {
            Err(GeminiError::EmptyResponse {
                reason: "no candidates returned".into(),
            })
        });

        let err = service_with(generator)
            .process(StudyInput::Text("Hi".into()))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Upstream { .. }));
    }
}
