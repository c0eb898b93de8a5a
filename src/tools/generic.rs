use crate::eval::{RuleMatch, ToolInvocation};
use crate::matcher;
use crate::rules::{GenericRule, Rule, normalize};
use crate::tools::ToolResolver;

/// Resolver for tools without a dedicated rule class (Read, Edit, MCP tools...).
///
/// A rule matches when its `args` pattern matches any stringified input
/// value. There are no default rules: a rule without `args` never matches.
pub struct GenericResolver;

impl ToolResolver for GenericResolver {
    fn resolve(&self, invocation: &ToolInvocation, rules: &[&Rule]) -> Vec<RuleMatch> {
        let generic_rules: Vec<&GenericRule> = rules.iter().filter_map(|&r| r.as_generic()).collect();
        if generic_rules.is_empty() {
            return Vec::new();
        }

        let values = invocation.input_values();
        normalize(&generic_rules)
            .into_iter()
            .filter(|r| {
                r.args()
                    .is_some_and(|p| values.iter().any(|v| matcher::matches(p, v)))
            })
            .map(GenericRule::to_match)
            .collect()
    }
}
