use std::collections::BTreeMap;

use crate::streaming::{StreamEvent, ToolCallDelta};
use crate::types::{FunctionCall, ToolCall};

/// In-flight accumulation state for one tool-call slot.
///
/// Fields are sticky: once set, a later delta carrying `None` never erases
/// them. Argument fragments are concatenated verbatim — a single JSON token
/// may be split across fragments, so the buffer must not be re-parsed until
/// finalization.
#[derive(Debug, Default, Clone)]
struct PartialToolCall {
    id: Option<String>,
    tool_type: Option<String>,
    name: Option<String>,
    arguments: String,
}

impl PartialToolCall {
    fn merge(
        &mut self,
        id: Option<&str>,
        tool_type: Option<&str>,
        name: Option<&str>,
        arguments: Option<&str>,
    ) {
        if self.id.is_none() {
            self.id = id.map(str::to_string);
        }
        if self.tool_type.is_none() {
            self.tool_type = tool_type.map(str::to_string);
        }
        if self.name.is_none() {
            self.name = name.map(str::to_string);
        }
        if let Some(fragment) = arguments {
            self.arguments.push_str(fragment);
        }
    }
}

/// Stateful reducer that reassembles fragmented tool-call deltas, keyed by
/// slot index. One instance can serve successive rounds via [`reset`].
///
/// [`reset`]: ToolCallAccumulator::reset
#[derive(Debug, Default)]
pub struct ToolCallAccumulator {
    slots: BTreeMap<u32, PartialToolCall>,
}

impl ToolCallAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one wire-level delta into its slot.
    pub fn add_delta(&mut self, delta: &ToolCallDelta) {
        let slot = self.slots.entry(delta.index).or_default();
        slot.merge(
            delta.id.as_deref(),
            delta.tool_type.as_deref(),
            delta.function.as_ref().and_then(|f| f.name.as_deref()),
            delta.function.as_ref().and_then(|f| f.arguments.as_deref()),
        );
    }

    /// Merge a decoded [`StreamEvent::ToolCall`]; other events are ignored.
    pub fn add_event(&mut self, event: &StreamEvent) {
        if let StreamEvent::ToolCall {
            index,
            id,
            name,
            arguments,
        } = event
        {
            let slot = self.slots.entry(*index).or_default();
            slot.merge(id.as_deref(), None, name.as_deref(), arguments.as_deref());
        }
    }

    /// True iff at least one slot exists.
    pub fn has_tool_calls(&self) -> bool {
        !self.slots.is_empty()
    }

    /// Finalized calls, ascending by slot index. Index order is the contract:
    /// arrival order is not reliable when the model interleaves slots.
    /// Slots that never received an id or name are dropped.
    pub fn tool_calls(&self) -> Vec<ToolCall> {
        self.slots
            .values()
            .filter_map(|slot| {
                let (id, name) = (slot.id.clone()?, slot.name.clone()?);
                Some(ToolCall {
                    id,
                    tool_type: slot
                        .tool_type
                        .clone()
                        .unwrap_or_else(|| "function".to_string()),
                    function: FunctionCall {
                        name,
                        arguments: slot.arguments.clone(),
                    },
                })
            })
            .collect()
    }

    /// Clear all slots so the accumulator can serve the next round.
    pub fn reset(&mut self) {
        self.slots.clear();
    }
}
