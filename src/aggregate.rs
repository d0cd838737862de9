//! Folding stream fragments back into a complete response.

use std::collections::BTreeMap;

use crate::model::{
    ChatCompletionChoice, ChatCompletionMessage, ChatCompletionResponse,
    ChatCompletionStreamResponse, FinishReason, Role, StreamToolCall, ToolCall, Usage,
};

/// Accumulates fragments per slot.
///
/// Text and reasoning deltas are concatenated. Tool-call pieces are merged by
/// their own `index`: `id` and `type` are taken from the first piece that
/// carries them, `name` and `arguments` are appended.
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    id: String,
    object: String,
    created: i64,
    model: String,
    slots: BTreeMap<u32, SlotState>,
    usage: Option<Usage>,
}

#[derive(Debug, Default)]
struct SlotState {
    role: Option<Role>,
    content: String,
    reasoning: String,
    tool_calls: BTreeMap<u32, ToolCall>,
    finish_reason: Option<FinishReason>,
}

impl StreamAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one fragment.
    pub fn push(&mut self, fragment: &ChatCompletionStreamResponse) {
        if self.id.is_empty() {
            self.id.clone_from(&fragment.id);
            self.object.clone_from(&fragment.object);
            self.created = fragment.created;
        }
        if self.model.is_empty() {
            self.model.clone_from(&fragment.model);
        }
        if fragment.usage.is_some() {
            self.usage = fragment.usage;
        }

        for choice in &fragment.choices {
            let slot = self.slots.entry(choice.index).or_default();
            let delta = &choice.delta;

            if slot.role.is_none() {
                slot.role.clone_from(&delta.role);
            }
            if let Some(content) = &delta.content {
                slot.content.push_str(content);
            }
            if let Some(reasoning) = &delta.reasoning_content {
                slot.reasoning.push_str(reasoning);
            }
            for piece in delta.tool_calls.iter().flatten() {
                merge_tool_call(slot.tool_calls.entry(piece.index).or_default(), piece);
            }
            if choice.finish_reason.is_some() {
                slot.finish_reason = choice.finish_reason;
            }
        }
    }

    /// Whether the slot has received its finish marker.
    pub fn is_finished(&self, index: u32) -> bool {
        self.slots
            .get(&index)
            .is_some_and(|slot| slot.finish_reason.is_some())
    }

    /// Build the merged response, choices ordered by slot index.
    pub fn finish(self) -> ChatCompletionResponse {
        let choices = self
            .slots
            .into_iter()
            .map(|(index, slot)| ChatCompletionChoice {
                index,
                message: ChatCompletionMessage {
                    role: slot.role.unwrap_or(Role::Assistant),
                    content: slot.content,
                    reasoning_content: Some(slot.reasoning).filter(|r| !r.is_empty()),
                    tool_calls: Some(slot.tool_calls.into_values().collect::<Vec<_>>())
                        .filter(|calls| !calls.is_empty()),
                    ..Default::default()
                },
                finish_reason: slot.finish_reason,
            })
            .collect();

        ChatCompletionResponse {
            id: self.id,
            object: self.object,
            created: self.created,
            model: self.model,
            choices,
            usage: self.usage,
        }
    }
}

fn merge_tool_call(call: &mut ToolCall, piece: &StreamToolCall) {
    if let Some(id) = &piece.id {
        if call.id.is_empty() {
            call.id.clone_from(id);
        }
    }
    if let Some(tool_type) = &piece.tool_type {
        call.tool_type.clone_from(tool_type);
    }
    if let Some(function) = &piece.function {
        if let Some(name) = &function.name {
            call.function.name.push_str(name);
        }
        if let Some(arguments) = &function.arguments {
            call.function.arguments.push_str(arguments);
        }
    }
}
