//! Interpretation of raw model replies.
//!
//! The Gemini reply is free text. This module turns it into one of the two
//! shapes the API returns:
//! - [`ExplanationSolution`]: prose explanation plus step-by-step solution
//! - [`MindMapNode`]: a mind-map tree, wrapped in a [`MindMapOutcome`] that
//!   records whether the reply parsed cleanly or the fallback tree was used
//!
//! Interpretation is pure. It never fails and keeps no state between calls.

mod mind_map;
mod split;

pub use mind_map::*;
pub use split::*;

/// Text returned by a generation call, consumed once by the interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawModelReply(String);

impl RawModelReply {
    /// Wrap a reply
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Reply text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RawModelReply {
    fn from(text: String) -> Self {
        Self(text)
    }
}

/// What the caller expects the reply to contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterpretMode {
    /// Explanation followed by a step-by-step solution.
    Explain,
    /// A JSON mind map; `topic` roots the fallback tree.
    MindMap {
        /// Concept or document name the map was requested for.
        topic: String,
    },
}

/// Structured result of interpreting a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interpretation {
    /// Result of [`InterpretMode::Explain`].
    Explanation(ExplanationSolution),
    /// Result of [`InterpretMode::MindMap`].
    MindMap(MindMapOutcome),
}

/// Turns [`RawModelReply`] values into structured results.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseInterpreter;

impl ResponseInterpreter {
    /// Create an interpreter
    pub fn new() -> Self {
        Self
    }

    /// Interpret `reply` according to `mode`
    pub fn interpret(&self, reply: RawModelReply, mode: &InterpretMode) -> Interpretation {
        match mode {
            InterpretMode::Explain => Interpretation::Explanation(self.explain(&reply)),
            InterpretMode::MindMap { topic } => {
                Interpretation::MindMap(self.mind_map(&reply, topic))
            }
        }
    }

    /// Split a reply into explanation and solution
    pub fn explain(&self, reply: &RawModelReply) -> ExplanationSolution {
        split_explanation_and_solution(reply.as_str())
    }

    /// Read a mind map out of a reply, falling back to a tree rooted at `topic`
    pub fn mind_map(&self, reply: &RawModelReply, topic: &str) -> MindMapOutcome {
        extract_json_tree(reply.as_str(), topic)
    }
}
