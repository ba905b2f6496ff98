//! Streamed tool-call reassembly.
//!
//! Tool calls arrive as ordered fragments: the name early, argument text in
//! pieces. Buffers are built by plain concatenation and are only meaningful
//! once the stream that produced them has ended.

use async_openai::types::ChatCompletionMessageToolCallChunk;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Accumulates tool-call fragments by call index during one model turn.
#[derive(Debug, Default)]
pub struct ToolCallAccumulator {
    ids: BTreeMap<usize, String>,
    names: BTreeMap<usize, String>,
    arguments: BTreeMap<usize, String>,
}

/// A fully reassembled tool call, ready for dispatch.
#[derive(Debug, Clone)]
pub struct PendingToolCall {
    /// Provider-assigned call id, or a generated one when the stream never
    /// carried it.
    pub id: String,
    pub name: String,
    /// Concatenated raw argument text.
    pub arguments: String,
}

impl ToolCallAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorb one fragment batch. Fragments must be fed in arrival order;
    /// argument text is appended as-is.
    pub fn absorb(&mut self, chunks: &[ChatCompletionMessageToolCallChunk]) {
        for chunk in chunks {
            let index = chunk.index as usize;

            if let Some(id) = &chunk.id {
                self.ids.entry(index).or_insert_with(|| id.clone());
            }

            let Some(function) = &chunk.function else {
                continue;
            };

            if let Some(name) = &function.name {
                if !name.is_empty() {
                    // First non-empty name wins for a given index.
                    self.names.entry(index).or_insert_with(|| name.clone());
                }
            }
            if let Some(fragment) = &function.arguments {
                self.arguments.entry(index).or_default().push_str(fragment);
            }
        }
    }

    /// The first call index that received both a name and argument text.
    ///
    /// Any further calls from the same turn are dropped; parallel dispatch
    /// is deliberately not supported in the streaming loop.
    pub fn into_first_call(mut self) -> Option<PendingToolCall> {
        let index = self
            .names
            .keys()
            .copied()
            .find(|i| self.arguments.get(i).is_some_and(|a| !a.is_empty()))?;

        Some(PendingToolCall {
            id: self
                .ids
                .remove(&index)
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: self.names.remove(&index).unwrap_or_default(),
            arguments: self.arguments.remove(&index).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chunk(
        index: u32,
        id: Option<&str>,
        name: Option<&str>,
        arguments: Option<&str>,
    ) -> ChatCompletionMessageToolCallChunk {
        serde_json::from_value(json!({
            "index": index,
            "id": id,
            "function": { "name": name, "arguments": arguments },
        }))
        .unwrap()
    }

    #[test]
    fn test_in_order_fragments_reassemble() {
        let mut acc = ToolCallAccumulator::new();
        acc.absorb(&[chunk(0, Some("call_1"), Some("summarize_paper"), None)]);
        acc.absorb(&[chunk(0, None, None, Some("{\"paper_i"))]);
        acc.absorb(&[chunk(0, None, None, Some("d\":\"1234"))]);
        acc.absorb(&[chunk(0, None, None, Some(".5678\"}"))]);

        let call = acc.into_first_call().unwrap();
        assert_eq!(call.id, "call_1");
        assert_eq!(call.name, "summarize_paper");

        let parsed: serde_json::Value = serde_json::from_str(&call.arguments).unwrap();
        assert_eq!(parsed["paper_id"], "1234.5678");
    }

    #[test]
    fn test_first_nonempty_name_wins() {
        let mut acc = ToolCallAccumulator::new();
        acc.absorb(&[chunk(0, None, Some(""), Some("{"))]);
        acc.absorb(&[chunk(0, None, Some("fetch_papers"), Some("}"))]);
        acc.absorb(&[chunk(0, None, Some("something_else"), None)]);

        let call = acc.into_first_call().unwrap();
        assert_eq!(call.name, "fetch_papers");
    }

    #[test]
    fn test_only_first_complete_call_is_kept() {
        let mut acc = ToolCallAccumulator::new();
        acc.absorb(&[
            chunk(0, Some("call_a"), Some("fetch_papers"), Some("{}")),
            chunk(1, Some("call_b"), Some("summarize_paper"), Some("{}")),
        ]);

        let call = acc.into_first_call().unwrap();
        assert_eq!(call.name, "fetch_papers");
    }

    #[test]
    fn test_name_without_arguments_is_not_pending() {
        let mut acc = ToolCallAccumulator::new();
        acc.absorb(&[chunk(0, None, Some("fetch_papers"), None)]);
        assert!(acc.into_first_call().is_none());
    }

    #[test]
    fn test_arguments_without_name_is_not_pending() {
        let mut acc = ToolCallAccumulator::new();
        acc.absorb(&[chunk(0, None, None, Some("{}"))]);
        assert!(acc.into_first_call().is_none());
    }

    #[test]
    fn test_incomplete_first_index_falls_through() {
        // Index 0 never gets arguments; index 1 is complete.
        let mut acc = ToolCallAccumulator::new();
        acc.absorb(&[chunk(0, None, Some("fetch_papers"), None)]);
        acc.absorb(&[chunk(1, None, Some("summarize_paper"), Some("{\"paper_id\":\"x\"}"))]);

        let call = acc.into_first_call().unwrap();
        assert_eq!(call.name, "summarize_paper");
    }

    #[test]
    fn test_generated_id_when_stream_carries_none() {
        let mut acc = ToolCallAccumulator::new();
        acc.absorb(&[chunk(0, None, Some("fetch_papers"), Some("{}"))]);

        let call = acc.into_first_call().unwrap();
        assert!(!call.id.is_empty());
    }
}
