//! Unit tests for mind-map extraction.

use super::*;
use pretty_assertions::assert_eq;

fn node(name: &str, children: Vec<MindMapNode>) -> MindMapNode {
    MindMapNode {
        name: name.to_string(),
        children,
    }
}

fn leaf(name: &str) -> MindMapNode {
    MindMapNode::new(name)
}

fn assert_fallback_for(outcome: &MindMapOutcome, topic: &str) {
    assert!(outcome.is_fallback(), "expected fallback, got {:?}", outcome);
    assert_eq!(
        outcome.tree(),
        &node(
            topic,
            vec![node(PARSE_ERROR_LABEL, vec![leaf(INVALID_RESPONSE_LABEL)])]
        )
    );
}

// Candidate extraction
#[test]
fn test_candidate_from_json_fence() {
    let text = "Here you go:\n```json\n{\"name\": \"X\"}\n```\nEnjoy!";
    assert_eq!(extract_json_candidate(text), "{\"name\": \"X\"}");
}

#[test]
fn test_candidate_from_bare_fence() {
    let text = "```\n{\"name\": \"X\"}\n```";
    assert_eq!(extract_json_candidate(text), "{\"name\": \"X\"}");
}

#[test]
fn test_candidate_bare_fence_skips_language_tag() {
    let text = "```JSON\n{\"name\": \"X\"}\n```";
    assert_eq!(extract_json_candidate(text), "{\"name\": \"X\"}");
}

#[test]
fn test_candidate_prefers_json_fence_over_earlier_bare_fence() {
    let text = "```\nnot this\n```\n```json\n{\"name\": \"Y\"}\n```";
    assert_eq!(extract_json_candidate(text), "{\"name\": \"Y\"}");
}

#[test]
fn test_candidate_whole_text_when_unfenced() {
    assert_eq!(extract_json_candidate("  {\"name\": \"Z\"}\n"), "{\"name\": \"Z\"}");
}

#[test]
fn test_candidate_unterminated_fence_runs_to_end() {
    let text = "```json\n{\"name\": \"X\", \"children\": [";
    assert_eq!(extract_json_candidate(text), "{\"name\": \"X\", \"children\": [");
}

// Parsing
#[test]
fn test_fenced_canonical_tree() {
    let outcome = extract_json_tree("```json\n{\"name\":\"X\",\"children\":[]}\n```", "X");
    assert_eq!(outcome, MindMapOutcome::Parsed(leaf("X")));
}

#[test]
fn test_legacy_shape_is_normalized() {
    let outcome = extract_json_tree(
        r#"{"central":"Y","branches":[{"name":"A","children":[]}]}"#,
        "Y",
    );
    assert_eq!(
        outcome,
        MindMapOutcome::Parsed(node("Y", vec![leaf("A")]))
    );
}

#[test]
fn test_mixed_shapes_at_different_depths() {
    let text = r#"{
        "central": "Cell",
        "branches": [
            {"central": "Organelles", "branches": [{"name": "Nucleus"}]},
            {"name": "Membrane", "children": [{"central": "Lipids"}]}
        ]
    }"#;
    let outcome = extract_json_tree(text, "Cell");
    assert_eq!(
        outcome.into_tree(),
        node(
            "Cell",
            vec![
                node("Organelles", vec![leaf("Nucleus")]),
                node("Membrane", vec![leaf("Lipids")]),
            ]
        )
    );
}

#[test]
fn test_missing_and_null_children_default_to_empty() {
    let outcome = extract_json_tree(
        r#"{"name":"Root","children":[{"name":"A"},{"name":"B","children":null}]}"#,
        "Root",
    );
    assert_eq!(
        outcome,
        MindMapOutcome::Parsed(node("Root", vec![leaf("A"), leaf("B")]))
    );
}

#[test]
fn test_prompt_example_shape_parses() {
    let text = r#"```json
{
    "name": "Photosynthesis",
    "children": [
        {
            "name": "Light Reactions",
            "children": [
                {"name": "Chlorophyll"},
                {"name": "ATP & NADPH"}
            ]
        },
        {
            "name": "Calvin Cycle",
            "children": [
                {"name": "Carbon Fixation"}
            ]
        }
    ]
}
```"#;
    let outcome = extract_json_tree(text, "Photosynthesis");
    assert!(!outcome.is_fallback());
    let tree = outcome.tree();
    assert_eq!(tree.name, "Photosynthesis");
    assert_eq!(tree.children.len(), 2);
    assert_eq!(tree.node_count(), 6);
    assert_eq!(tree.depth(), 3);
}

#[test]
fn test_prose_around_unfenced_json_is_recovered() {
    let text = "Sure! Here is the mind map:\n{\"name\": \"Gravity\", \"children\": [{\"name\": \"Mass\"}]}\nLet me know if you need more.";
    let outcome = extract_json_tree(text, "Gravity");
    assert_eq!(
        outcome,
        MindMapOutcome::Parsed(node("Gravity", vec![leaf("Mass")]))
    );
}

#[test]
fn test_extra_fields_are_ignored() {
    let outcome = extract_json_tree(
        r#"{"name":"X","color":"blue","children":[{"name":"A","weight":3}]}"#,
        "X",
    );
    assert_eq!(outcome, MindMapOutcome::Parsed(node("X", vec![leaf("A")])));
}

// Fallback
#[test]
fn test_not_json_falls_back_to_topic() {
    let outcome = extract_json_tree("not json at all", "Photosynthesis");
    assert_fallback_for(&outcome, "Photosynthesis");
}

#[test]
fn test_empty_reply_falls_back() {
    let outcome = extract_json_tree("", "Atoms");
    assert_fallback_for(&outcome, "Atoms");
    match outcome {
        MindMapOutcome::Fallback { reason, .. } => assert_eq!(reason, "reply contained no JSON"),
        MindMapOutcome::Parsed(_) => unreachable!(),
    }
}

#[test]
fn test_blank_topic_uses_default_root() {
    let outcome = extract_json_tree("???", "   ");
    assert_fallback_for(&outcome, DEFAULT_TOPIC);
}

#[test]
fn test_truncated_json_falls_back() {
    let outcome = extract_json_tree(
        "```json\n{\"name\": \"Cells\", \"children\": [{\"name\": \"Nuc",
        "Cells",
    );
    assert_fallback_for(&outcome, "Cells");
}

#[test]
fn test_json_of_wrong_shape_falls_back() {
    assert_fallback_for(&extract_json_tree("[1, 2, 3]", "Numbers"), "Numbers");
    assert_fallback_for(&extract_json_tree(r#"{"title": "X"}"#, "X"), "X");
    assert_fallback_for(&extract_json_tree(r#"{"name": 42}"#, "X"), "X");
    assert_fallback_for(&extract_json_tree("\"just a string\"", "X"), "X");
}

#[test]
fn test_garbage_bytes_fall_back() {
    let garbage = String::from_utf8_lossy(&[0xff, 0x00, 0x7b, 0xfe, 0x7d, 0x01]).into_owned();
    assert_fallback_for(&extract_json_tree(&garbage, "Noise"), "Noise");
}

#[test]
fn test_deep_nesting_does_not_overflow() {
    let depth = 10_000;
    let text = format!(
        "{}{}",
        "{\"name\":\"n\",\"children\":[".repeat(depth),
        "]}".repeat(depth)
    );
    let outcome = extract_json_tree(&text, "Deep");
    assert_fallback_for(&outcome, "Deep");
}

#[test]
fn test_fallback_reason_mentions_parse_error() {
    match extract_json_tree("{oops}", "X") {
        MindMapOutcome::Fallback { reason, .. } => {
            assert!(reason.starts_with("reply was not a mind map"), "{}", reason)
        }
        MindMapOutcome::Parsed(tree) => panic!("unexpected parse: {:?}", tree),
    }
}

// Properties
#[test]
fn test_extraction_is_idempotent() {
    for text in [
        "```json\n{\"name\":\"X\"}\n```",
        "garbage",
        "",
        r#"{"central":"C","branches":[]}"#,
    ] {
        assert_eq!(extract_json_tree(text, "T"), extract_json_tree(text, "T"));
    }
}

#[test]
fn test_round_trip_through_both_shapes() {
    let tree = node(
        "Ecosystem",
        vec![
            node("Producers", vec![leaf("Plants"), leaf("Algae")]),
            node("Consumers", vec![node("Herbivores", vec![leaf("Deer")])]),
            leaf("Decomposers"),
        ],
    );

    for value in [tree.to_canonical_json(), tree.to_legacy_json()] {
        let reparsed = extract_json_tree(&value.to_string(), "ignored");
        assert_eq!(reparsed, MindMapOutcome::Parsed(tree.clone()));
    }
}

#[test]
fn test_serialize_is_canonical() {
    let tree = node("X", vec![leaf("A")]);
    assert_eq!(serde_json::to_value(&tree).unwrap(), tree.to_canonical_json());
    assert_eq!(
        tree.to_legacy_json(),
        serde_json::json!({"central": "X", "branches": [{"name": "A", "children": []}]})
    );
}
