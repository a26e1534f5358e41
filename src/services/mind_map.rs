use std::time::Instant;
use tracing::{debug, info, warn};

use super::{ServiceCore, StudyInput, UploadKind};
use crate::error::ApiResult;
use crate::gemini::Part;
use crate::interpreter::{MindMapOutcome, RawModelReply};
use crate::prompts::{concept_mind_map_prompt, content_mind_map_prompt};

/// Concept visualizer: mind-map trees for a concept or a document.
#[derive(Clone)]
pub struct MindMapService {
    core: ServiceCore,
}

impl MindMapService {
    /// Create a new mind map service
    pub fn new(core: ServiceCore) -> Self {
        Self { core }
    }

    /// Build a mind map.
    ///
    /// An unreadable model reply is not an error: the returned outcome is
    /// [`MindMapOutcome::Fallback`]. Only input and upstream failures are.
    pub async fn process(&self, input: StudyInput) -> ApiResult<MindMapOutcome> {
        let start = Instant::now();
        let input_kind = input.describe();

        let (parts, topic) = build_parts(&input)?;
        debug!(input = input_kind, topic = %topic, "Requesting mind map");

        let reply = RawModelReply::from(self.core.generator().generate(parts).await?);
        let outcome = self.core.interpreter().mind_map(&reply, &topic);

        if let MindMapOutcome::Fallback { reason, .. } = &outcome {
            warn!(
                topic = %topic,
                reason = %reason,
                reply_chars = reply.as_str().len(),
                "Mind map reply unusable, returning fallback tree"
            );
        }

        info!(
            input = input_kind,
            topic = %topic,
            nodes = outcome.tree().node_count(),
            depth = outcome.tree().depth(),
            fallback = outcome.is_fallback(),
            latency_ms = start.elapsed().as_millis(),
            "Mind map completed"
        );

        Ok(outcome)
    }
}

fn build_parts(input: &StudyInput) -> ApiResult<(Vec<Part>, String)> {
    match input {
        StudyInput::Text(concept) => Ok((
            vec![Part::text(concept_mind_map_prompt(concept))],
            concept.clone(),
        )),
        StudyInput::Document(upload) => {
            let parts = match upload.kind()? {
                UploadKind::Image(mime) => vec![
                    Part::text(content_mind_map_prompt("")),
                    Part::inline_data(mime, &upload.data),
                ],
                UploadKind::Pdf => vec![
                    Part::text(content_mind_map_prompt("")),
                    Part::inline_data("application/pdf", &upload.data),
                ],
                UploadKind::PlainText => vec![Part::text(content_mind_map_prompt(upload.text()?))],
            };
            Ok((parts, upload.topic().to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ApiError, GeminiError};
    use crate::gemini::MockTextGenerator;
    use crate::interpreter::{MindMapNode, PARSE_ERROR_LABEL};
    use crate::prompts::MAX_MIND_MAP_CONTENT_CHARS;
    use crate::services::Upload;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn service_with(generator: MockTextGenerator) -> MindMapService {
        MindMapService::new(ServiceCore::new(Arc::new(generator)))
    }

    #[tokio::test]
    async fn test_concept_mind_map_parsed() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .withf(|parts| {
                parts[0]
                    .as_text()
                    .is_some_and(|t| t.contains("concept: \"Photosynthesis\""))
            })
            .times(1)
            .returning(|_| {
                Ok("```json\n{\"name\":\"Photosynthesis\",\"children\":[{\"name\":\"Light\"}]}\n```"
                    .into())
            });

        let outcome = service_with(generator)
            .process(StudyInput::Text("Photosynthesis".into()))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            MindMapOutcome::Parsed(
                MindMapNode::new("Photosynthesis").with_child(MindMapNode::new("Light"))
            )
        );
    }

    #[tokio::test]
    async fn test_malformed_reply_returns_fallback() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .returning(|_| Ok("Sorry, I can't help with that.".into()));

        let outcome = service_with(generator)
            .process(StudyInput::Text("Photosynthesis".into()))
            .await
            .unwrap();

        assert!(outcome.is_fallback());
        assert_eq!(outcome.tree().name, "Photosynthesis");
        assert_eq!(outcome.tree().children[0].name, PARSE_ERROR_LABEL);
    }

    #[tokio::test]
    async fn test_upload_fallback_uses_file_name() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .withf(|parts| parts.len() == 2)
            .returning(|_| Ok("{broken".into()));

        let upload = Upload::new("biology-notes.pdf", "application/pdf", b"%PDF".to_vec());
        let outcome = service_with(generator)
            .process(StudyInput::Document(upload))
            .await
            .unwrap();

        assert!(outcome.is_fallback());
        assert_eq!(outcome.tree().name, "biology-notes.pdf");
    }

    #[tokio::test]
    async fn test_text_upload_content_is_truncated() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .withf(|parts| {
                parts.len() == 1
                    && parts[0].as_text().is_some_and(|t| {
                        t.contains(&"x".repeat(MAX_MIND_MAP_CONTENT_CHARS))
                            && !t.contains(&"x".repeat(MAX_MIND_MAP_CONTENT_CHARS + 1))
                    })
            })
            .times(1)
            .returning(|_| Ok(r#"{"central":"Notes","branches":[]}"#.into()));

        let upload = Upload::new(
            "notes.txt",
            "text/plain",
            "x".repeat(MAX_MIND_MAP_CONTENT_CHARS * 2).into_bytes(),
        );
        let outcome = service_with(generator)
            .process(StudyInput::Document(upload))
            .await
            .unwrap();

        assert_eq!(outcome, MindMapOutcome::Parsed(MindMapNode::new("Notes")));
    }

    #[tokio::test]
    async fn test_upstream_timeout_is_an_error() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .returning(|_| Err(GeminiError::Timeout { timeout_ms: 30000 }));

        let err = service_with(generator)
            .process(StudyInput::Text("Atoms".into()))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::UpstreamTimeout { timeout_ms: 30000 }));
    }
}
