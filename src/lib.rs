//! hookrules: a PreToolUse hook that approves or blocks agent tool calls.
//!
//! Given one attempted tool invocation and an ordered list of declarative
//! rules, the engine returns one of: block, approve, a reason without a
//! decision (flag for review), or no opinion. It only classifies; nothing is
//! executed.
//!
//! # Architecture
//!
//! - **[`parse`]**: Splits shell commands on top-level `&&`, `;`, `|` into `(command, args)` pairs.
//! - **[`matcher`]**: Regex-first pattern matching with literal fallback; anchored tool-name matching.
//! - **[`rules`]**: Rule variants per tool class and last-wins normalization.
//! - **[`tools`]**: Per-tool resolvers (Bash, WebFetch, WebSearch, generic fallback).
//! - **[`eval`]**: Evaluator registry, decision priority, tool invocations.
//! - **[`hook`]**: Hook event envelope parsing and response.
//! - **[`config`]**: Rule file parsing, validation and discovery.
//! - **[`logging`]**: stderr/debug-file logger setup and the decision log.

/// Rule file parsing, validation and discovery.
pub mod config;
/// Evaluation engine: resolver registry, decision selection, invocation context.
pub mod eval;
/// Hook event envelope read from stdin.
pub mod hook;
/// Logger setup and the on-disk decision log.
pub mod logging;
/// Pattern matching for rule fields and tool names.
pub mod matcher;
/// Shell command splitting.
pub mod parse;
/// Rule types and normalization.
pub mod rules;
/// Per-tool resolution strategies.
pub mod tools;

use eval::{ToolInvocation, Verdict};
use rules::Rule;

/// Evaluate a tool invocation against an ordered rule set with the default
/// resolvers.
///
/// This is the main entry point for tests and simple usage. Hosts evaluating
/// many invocations can build an [`eval::Evaluator`] once and reuse it.
pub fn evaluate(invocation: &ToolInvocation, rules: &[Rule]) -> Verdict {
    eval::Evaluator::new().evaluate(invocation, rules)
}
