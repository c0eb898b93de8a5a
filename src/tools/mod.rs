//! Per-tool resolution strategies.
//!
//! Each tool class (Bash, WebFetch, WebSearch) has its own `ToolResolver`
//! that extracts the relevant subject from the tool input and collects the
//! candidate decisions of matching rules. Every other tool goes through
//! `GenericResolver`, which tests rule patterns against all input values.

/// Shell command resolution: split, then specific (args) over default rules.
pub mod bash;
/// Fallback for tools without a dedicated rule class.
pub mod generic;
/// URL fetch resolution keyed on the hostname.
pub mod web_fetch;
/// Search resolution keyed on the query string.
pub mod web_search;

use crate::eval::{RuleMatch, ToolInvocation};
use crate::matcher;
use crate::rules::{Keyed, Rule, normalize};

pub const BASH: &str = "Bash";
pub const WEB_FETCH: &str = "WebFetch";
pub const WEB_SEARCH: &str = "WebSearch";

/// Trait for tool resolvers.
///
/// `rules` holds only the rules whose tool pattern matched the invocation's
/// tool name, in configuration order. Implementations pick out their own rule
/// variant and return the candidates of every rule that matched.
pub trait ToolResolver: Send + Sync {
    fn resolve(&self, invocation: &ToolInvocation, rules: &[&Rule]) -> Vec<RuleMatch>;
}

/// Specific-over-default resolution against a single subject string.
///
/// Rules are normalized first. Rules whose pattern is set and matches
/// `subject` are returned; if there are none, the rules with no pattern are.
fn resolve_subject<T: Keyed>(
    rules: &[&T],
    subject: &str,
    pattern: impl Fn(&T) -> Option<&str>,
    to_match: impl Fn(&T) -> RuleMatch,
) -> Vec<RuleMatch> {
    let rules = normalize(rules);

    let specific: Vec<RuleMatch> = rules
        .iter()
        .copied()
        .filter(|&r| pattern(r).is_some_and(|p| matcher::matches(p, subject)))
        .map(&to_match)
        .collect();
    if !specific.is_empty() {
        return specific;
    }

    rules
        .iter()
        .copied()
        .filter(|&r| pattern(r).is_none())
        .map(&to_match)
        .collect()
}
