use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, trace};

/// Type of a JSON node found by the structure scanner.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NodeType {
    Object,
    Array,
}

/// Byte coordinates of a root-level JSON structure within a larger text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ObjCoords {
    pub start: usize,
    pub end: usize, // inclusive index of the closing bracket/brace
    pub kind: NodeType,
}

impl ObjCoords {
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..=self.end]
    }
}

/// Find all brace/bracket balanced root structures in the given text.
///
/// String literals are only tracked inside a structure, so quotes and
/// apostrophes in the surrounding prose cannot hide a following object.
/// Mismatched closers abandon the structure they close.
#[instrument(target = "pdf_quiz::json", skip(text), fields(text_len = text.len()))]
pub fn find_json_structures(text: &str) -> Vec<ObjCoords> {
    let mut results = Vec::new();
    let mut stack: Vec<(usize, NodeType)> = Vec::new();
    let mut in_string = false;
    let mut escape = false;

    for (i, &b) in text.as_bytes().iter().enumerate() {
        if in_string {
            if escape {
                escape = false;
                continue;
            }
            match b {
                b'\\' => escape = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match b {
            b'"' if !stack.is_empty() => in_string = true,
            b'{' => stack.push((i, NodeType::Object)),
            b'[' => stack.push((i, NodeType::Array)),
            b'}' | b']' => {
                let closing = if b == b'}' { NodeType::Object } else { NodeType::Array };
                if let Some((start, kind)) = stack.pop() {
                    if kind == closing && stack.is_empty() {
                        trace!(target: "pdf_quiz::json", start, end = i, ?kind, "closed root");
                        results.push(ObjCoords { start, end: i, kind });
                    } else if kind != closing {
                        // unbalanced; restart scanning from a clean state
                        stack.clear();
                    }
                }
            }
            _ => {}
        }
    }

    debug!(target: "pdf_quiz::json", count = results.len(), "found root structures");
    results
}

/// Return the first root-level JSON object in `text` that parses as JSON.
pub fn extract_first_object(text: &str) -> Option<Value> {
    find_json_structures(text)
        .into_iter()
        .filter(|c| c.kind == NodeType::Object)
        .find_map(|c| serde_json::from_str::<Value>(c.slice(text)).ok())
}
