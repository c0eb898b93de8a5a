//! Hook event envelope: the JSON object the host writes to stdin.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::eval::{Evaluator, ToolInvocation, Verdict};
use crate::rules::Rule;

/// Errors turning raw stdin into a [`HookInput`].
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("invalid JSON input: {0}")]
    Json(#[source] serde_json::Error),
    #[error("invalid hook input: {0}")]
    Envelope(#[source] serde_json::Error),
}

/// A hook event with the fields common to every event.
#[derive(Debug, Clone, Deserialize)]
pub struct HookInput {
    pub session_id: String,
    pub transcript_path: String,
    pub cwd: String,
    #[serde(flatten)]
    pub event: HookEvent,
}

/// Event-specific payload, selected by `hook_event_name`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "hook_event_name")]
pub enum HookEvent {
    PreToolUse {
        tool_name: String,
        tool_input: Map<String, Value>,
    },
    PostToolUse {
        tool_name: String,
        tool_input: Map<String, Value>,
        tool_response: Value,
    },
    Notification {
        message: String,
    },
    Stop {
        stop_hook_active: bool,
    },
    SubagentStop,
    UserPromptSubmit {
        prompt: String,
    },
    PreCompact,
}

impl HookEvent {
    pub fn name(&self) -> &'static str {
        match self {
            HookEvent::PreToolUse { .. } => "PreToolUse",
            HookEvent::PostToolUse { .. } => "PostToolUse",
            HookEvent::Notification { .. } => "Notification",
            HookEvent::Stop { .. } => "Stop",
            HookEvent::SubagentStop => "SubagentStop",
            HookEvent::UserPromptSubmit { .. } => "UserPromptSubmit",
            HookEvent::PreCompact => "PreCompact",
        }
    }
}

impl HookInput {
    /// Parse and validate a hook envelope.
    ///
    /// Malformed JSON and well-formed JSON of the wrong shape are reported
    /// separately.
    pub fn parse(raw: &str) -> Result<Self, InputError> {
        let value: Value = serde_json::from_str(raw).map_err(InputError::Json)?;
        serde_json::from_value(value).map_err(InputError::Envelope)
    }

    /// The tool call to gate, for `PreToolUse` events only.
    pub fn invocation(&self) -> Option<ToolInvocation> {
        match &self.event {
            HookEvent::PreToolUse {
                tool_name,
                tool_input,
            } => Some(ToolInvocation::new(tool_name.clone(), tool_input.clone())),
            _ => None,
        }
    }

    /// Compute the hook response. Events other than `PreToolUse` get `{}`.
    pub fn respond(&self, evaluator: &Evaluator, rules: &[Rule]) -> Verdict {
        match self.invocation() {
            Some(invocation) => evaluator.evaluate(&invocation, rules),
            None => {
                log::debug!("{} event: nothing to evaluate", self.event.name());
                Verdict::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::Decision;
    use crate::rules::ShellRule;

    const BASH_INPUT: &str = r#"{
        "session_id": "s1",
        "transcript_path": "/tmp/t.jsonl",
        "cwd": "/work",
        "hook_event_name": "PreToolUse",
        "tool_name": "Bash",
        "tool_input": {"command": "rm -rf /", "description": "wipe"}
    }"#;

    #[test]
    fn parses_pre_tool_use() {
        let input = HookInput::parse(BASH_INPUT).unwrap();
        assert_eq!(input.cwd, "/work");
        let inv = input.invocation().unwrap();
        assert_eq!(inv.tool_name, "Bash");
        assert_eq!(inv.text("command"), Some("rm -rf /"));
    }

    #[test]
    fn parses_other_events() {
        let raw = r#"{"session_id":"s","transcript_path":"t","cwd":"/","hook_event_name":"Stop","stop_hook_active":false}"#;
        let input = HookInput::parse(raw).unwrap();
        assert!(matches!(input.event, HookEvent::Stop { stop_hook_active: false }));
        assert!(input.invocation().is_none());

        let raw = r#"{"session_id":"s","transcript_path":"t","cwd":"/","hook_event_name":"SubagentStop"}"#;
        assert!(matches!(HookInput::parse(raw).unwrap().event, HookEvent::SubagentStop));
    }

    #[test]
    fn rejects_bad_json() {
        assert!(matches!(HookInput::parse("{not json"), Err(InputError::Json(_))));
    }

    #[test]
    fn rejects_missing_common_fields() {
        let raw = r#"{"hook_event_name":"PreToolUse","tool_name":"Bash","tool_input":{}}"#;
        assert!(matches!(HookInput::parse(raw), Err(InputError::Envelope(_))));
    }

    #[test]
    fn rejects_unknown_event() {
        let raw = r#"{"session_id":"s","transcript_path":"t","cwd":"/","hook_event_name":"Bogus"}"#;
        assert!(matches!(HookInput::parse(raw), Err(InputError::Envelope(_))));
    }

    #[test]
    fn rejects_non_object_tool_input() {
        let raw = r#"{"session_id":"s","transcript_path":"t","cwd":"/","hook_event_name":"PreToolUse","tool_name":"Bash","tool_input":"ls"}"#;
        assert!(matches!(HookInput::parse(raw), Err(InputError::Envelope(_))));
    }

    #[test]
    fn post_tool_use_requires_response() {
        let raw = r#"{"session_id":"s","transcript_path":"t","cwd":"/","hook_event_name":"PostToolUse","tool_name":"Bash","tool_input":{}}"#;
        assert!(HookInput::parse(raw).is_err());
    }

    #[test]
    fn respond_evaluates_pre_tool_use_only() {
        let rules = [Rule::Shell(ShellRule {
            tool_match: Some("Bash".into()),
            command: Some("rm".into()),
            args: None,
            decision: Decision::Block,
            reason: "rm is risky".into(),
        })];
        let evaluator = Evaluator::new();

        let input = HookInput::parse(BASH_INPUT).unwrap();
        assert_eq!(input.respond(&evaluator, &rules), Verdict::block("rm is risky"));

        let raw = r#"{"session_id":"s","transcript_path":"t","cwd":"/","hook_event_name":"UserPromptSubmit","prompt":"rm -rf /"}"#;
        let input = HookInput::parse(raw).unwrap();
        assert!(input.respond(&evaluator, &rules).is_empty());
    }
}
