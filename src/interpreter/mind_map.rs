//! Mind-map recovery from free-text model replies.
//!
//! Models are asked for a JSON tree but often wrap it in a fenced block,
//! surround it with prose, or use the older `central`/`branches` field
//! names. Everything here is total: a reply that cannot be read produces a
//! fallback tree instead of an error.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::split::split_at_first;

/// Root label used for fallback trees when no topic is known.
pub const DEFAULT_TOPIC: &str = "Core Concept";

/// Label of the diagnostic child in a fallback tree.
pub const PARSE_ERROR_LABEL: &str = "Error parsing mind map";

/// Leaf under [`PARSE_ERROR_LABEL`] describing the failure.
pub const INVALID_RESPONSE_LABEL: &str = "Invalid response from AI";

const FENCE: &str = "```";
const JSON_FENCE: &str = "```json";

/// A node of a mind map in canonical `name`/`children` form.
///
/// Deserializes from either the canonical shape or the legacy
/// `{"central": ..., "branches": [...]}` shape, at any depth, and always
/// serializes canonically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireNode")]
pub struct MindMapNode {
    /// Short label for the node.
    pub name: String,
    /// Ordered sub-topics.
    pub children: Vec<MindMapNode>,
}

/// The two field-naming schemes seen in model output.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireNode {
    Canonical {
        name: String,
        #[serde(default)]
        children: Option<Vec<WireNode>>,
    },
    Legacy {
        central: String,
        #[serde(default)]
        branches: Option<Vec<WireNode>>,
    },
}

impl From<WireNode> for MindMapNode {
    fn from(node: WireNode) -> Self {
        let (name, children) = match node {
            WireNode::Canonical { name, children } => (name, children),
            WireNode::Legacy { central, branches } => (central, branches),
        };

        MindMapNode {
            name,
            children: children
                .unwrap_or_default()
                .into_iter()
                .map(MindMapNode::from)
                .collect(),
        }
    }
}

impl MindMapNode {
    /// Create a node without children
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Append a child
    pub fn with_child(mut self, child: MindMapNode) -> Self {
        self.children.push(child);
        self
    }

    /// Tree returned when a reply cannot be parsed.
    ///
    /// Rooted at `topic` (or [`DEFAULT_TOPIC`] when blank) with a single
    /// diagnostic branch.
    pub fn fallback(topic: &str) -> Self {
        let topic = topic.trim();
        let root = if topic.is_empty() { DEFAULT_TOPIC } else { topic };

        MindMapNode::new(root).with_child(
            MindMapNode::new(PARSE_ERROR_LABEL).with_child(MindMapNode::new(INVALID_RESPONSE_LABEL)),
        )
    }

    /// Number of nodes in the tree, root included
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(MindMapNode::node_count).sum::<usize>()
    }

    /// Number of levels in the tree; a lone root has depth 1
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(MindMapNode::depth)
            .max()
            .unwrap_or(0)
    }

    /// Canonical JSON: `{"name": ..., "children": [...]}` at every level
    pub fn to_canonical_json(&self) -> Value {
        json!({
            "name": self.name,
            "children": self.children.iter().map(MindMapNode::to_canonical_json).collect::<Vec<_>>(),
        })
    }

    /// Legacy JSON: `{"central": ..., "branches": [...]}` at the root,
    /// canonical nodes below it
    pub fn to_legacy_json(&self) -> Value {
        json!({
            "central": self.name,
            "branches": self.children.iter().map(MindMapNode::to_canonical_json).collect::<Vec<_>>(),
        })
    }
}

/// Result of reading a mind map out of a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MindMapOutcome {
    /// The reply contained a usable tree.
    Parsed(MindMapNode),
    /// The reply was unusable; `tree` is the fallback tree.
    Fallback {
        /// Fallback tree rooted at the requested topic.
        tree: MindMapNode,
        /// Why the reply was rejected.
        reason: String,
    },
}

impl MindMapOutcome {
    /// The tree to hand to the caller, parsed or fallback
    pub fn tree(&self) -> &MindMapNode {
        match self {
            MindMapOutcome::Parsed(tree) => tree,
            MindMapOutcome::Fallback { tree, .. } => tree,
        }
    }

    /// Consume the outcome, keeping only the tree
    pub fn into_tree(self) -> MindMapNode {
        match self {
            MindMapOutcome::Parsed(tree) => tree,
            MindMapOutcome::Fallback { tree, .. } => tree,
        }
    }

    /// Whether the fallback tree was used
    pub fn is_fallback(&self) -> bool {
        matches!(self, MindMapOutcome::Fallback { .. })
    }
}

/// Pick the part of a reply that should hold the JSON tree.
///
/// Order: a ```` ```json ```` fenced block, then a bare ```` ``` ```` fenced
/// block (an optional language tag line is skipped), then the whole text.
/// An unterminated fence runs to the end of the text.
pub fn extract_json_candidate(text: &str) -> &str {
    if let Some(block) = fenced_block(text, JSON_FENCE) {
        return block;
    }
    if let Some(block) = fenced_block(text, FENCE) {
        return skip_language_tag(block);
    }
    text.trim()
}

fn fenced_block<'a>(text: &'a str, opener: &str) -> Option<&'a str> {
    let (_, from_opener) = split_at_first(text, opener);
    let body = &from_opener?[opener.len()..];
    let (inner, _) = split_at_first(body, FENCE);
    Some(inner.trim())
}

fn skip_language_tag(block: &str) -> &str {
    match block.split_once('\n') {
        Some((first, rest))
            if !first.trim().is_empty()
                && first.trim().chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            rest.trim()
        }
        _ => block,
    }
}

/// Span from the first `{` to the last `}`, for JSON surrounded by prose
fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

fn parse_tree(candidate: &str) -> Result<MindMapNode, serde_json::Error> {
    serde_json::from_str::<MindMapNode>(candidate)
}

/// Read a mind-map tree out of a model reply.
///
/// Never fails: when neither the extracted candidate nor the brace-delimited
/// span of the reply parses, a [`MindMapOutcome::Fallback`] rooted at
/// `topic` is returned.
pub fn extract_json_tree(text: &str, topic: &str) -> MindMapOutcome {
    let candidate = extract_json_candidate(text);

    let first_error = match parse_tree(candidate) {
        Ok(tree) => return MindMapOutcome::Parsed(tree),
        Err(e) => e,
    };

    if let Some(span) = brace_span(text).filter(|span| *span != candidate) {
        if let Ok(tree) = parse_tree(span) {
            return MindMapOutcome::Parsed(tree);
        }
    }

    let reason = if candidate.is_empty() {
        "reply contained no JSON".to_string()
    } else {
        format!("reply was not a mind map: {}", first_error)
    };

    MindMapOutcome::Fallback {
        tree: MindMapNode::fallback(topic),
        reason,
    }
}

#[cfg(test)]
#[path = "mind_map_tests.rs"]
mod mind_map_tests;
