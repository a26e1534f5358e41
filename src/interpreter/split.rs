use serde::{Deserialize, Serialize};

/// Marker that opens the step-by-step part of a Virtual Professor reply.
pub const SOLUTION_MARKER: &str = "**Step";

/// Substituted when the explanation part is empty.
pub const NO_EXPLANATION: &str = "No explanation provided.";

/// Substituted when the solution part is empty.
pub const NO_SOLUTION: &str = "No solution provided.";

/// A reply split into prose explanation and step-by-step solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplanationSolution {
    /// Everything before the solution marker, trimmed.
    pub explanation: String,
    /// Everything from the solution marker onward.
    pub solution: String,
}

/// Split `text` at the first occurrence of `marker`.
///
/// Returns the text before the marker and, when the marker is present,
/// the remainder starting at the marker (marker included). When the marker
/// is absent the whole text is returned as the first half.
pub fn split_at_first<'a>(text: &'a str, marker: &str) -> (&'a str, Option<&'a str>) {
    match text.find(marker) {
        Some(index) => (&text[..index], Some(&text[index..])),
        None => (text, None),
    }
}

/// Split a reply into explanation and solution around [`SOLUTION_MARKER`].
///
/// Never fails. Empty halves are replaced by [`NO_EXPLANATION`] and
/// [`NO_SOLUTION`].
pub fn split_explanation_and_solution(text: &str) -> ExplanationSolution {
    let (before, from_marker) = split_at_first(text, SOLUTION_MARKER);

    let explanation = before.trim();
    let solution = from_marker.unwrap_or("");

    ExplanationSolution {
        explanation: or_sentinel(explanation, NO_EXPLANATION),
        solution: or_sentinel(solution, NO_SOLUTION),
    }
}

fn or_sentinel(value: &str, sentinel: &str) -> String {
    if value.is_empty() {
        sentinel.to_string()
    } else {
        value.to_string()
    }
}
