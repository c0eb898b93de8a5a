use crate::eval::{RuleMatch, ToolInvocation};
use crate::rules::{Rule, SearchRule};
use crate::tools::{ToolResolver, resolve_subject};

/// Resolver for the `WebSearch` tool, matching `query` patterns against the
/// `query` input.
pub struct WebSearchResolver;

impl ToolResolver for WebSearchResolver {
    fn resolve(&self, invocation: &ToolInvocation, rules: &[&Rule]) -> Vec<RuleMatch> {
        let Some(query) = invocation.text("query") else {
            return Vec::new();
        };

        let search_rules: Vec<&SearchRule> = rules.iter().filter_map(|&r| r.as_search()).collect();
        resolve_subject(&search_rules, query, SearchRule::query, SearchRule::to_match)
    }
}
