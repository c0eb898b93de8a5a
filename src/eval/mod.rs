pub mod context;
pub mod decision;

pub use context::ToolInvocation;
pub use decision::{Decision, RuleMatch, Verdict, select};

use std::collections::HashMap;

use crate::matcher;
use crate::rules::Rule;
use crate::tools::ToolResolver;

/// Registry of tool resolvers, keyed by exact tool name.
///
/// Tools without a registered resolver fall back to the generic resolver.
pub struct Evaluator {
    resolvers: HashMap<String, Box<dyn ToolResolver>>,
    fallback: Box<dyn ToolResolver>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    /// Build the registry with the Bash, WebFetch and WebSearch resolvers.
    pub fn new() -> Self {
        use crate::tools::{
            BASH, WEB_FETCH, WEB_SEARCH, bash::BashResolver, generic::GenericResolver,
            web_fetch::WebFetchResolver, web_search::WebSearchResolver,
        };

        let mut resolvers: HashMap<String, Box<dyn ToolResolver>> = HashMap::new();
        resolvers.insert(BASH.into(), Box::new(BashResolver));
        resolvers.insert(WEB_FETCH.into(), Box::new(WebFetchResolver));
        resolvers.insert(WEB_SEARCH.into(), Box::new(WebSearchResolver));

        Self {
            resolvers,
            fallback: Box::new(GenericResolver),
        }
    }

    /// Register (or replace) the resolver used for a tool name.
    pub fn register(&mut self, tool_name: impl Into<String>, resolver: Box<dyn ToolResolver>) {
        self.resolvers.insert(tool_name.into(), resolver);
    }

    fn resolver_for(&self, tool_name: &str) -> &dyn ToolResolver {
        self.resolvers
            .get(tool_name)
            .map(|b| b.as_ref())
            .unwrap_or(self.fallback.as_ref())
    }

    /// Evaluate one tool invocation against an ordered rule set.
    ///
    /// Rules whose tool pattern doesn't match the tool name are discarded
    /// first; the tool's resolver then collects candidate decisions, and the
    /// highest-priority candidate becomes the verdict.
    pub fn evaluate(&self, invocation: &ToolInvocation, rules: &[Rule]) -> Verdict {
        let applicable: Vec<&Rule> = rules
            .iter()
            .filter(|r| matcher::matches_tool(r.tool_match(), &invocation.tool_name))
            .collect();

        if applicable.is_empty() {
            log::debug!("{}: no applicable rules", invocation.tool_name);
            return Verdict::default();
        }

        let candidates = self
            .resolver_for(&invocation.tool_name)
            .resolve(invocation, &applicable);

        log::debug!(
            "{}: {} applicable rule(s), {} candidate(s)",
            invocation.tool_name,
            applicable.len(),
            candidates.len()
        );
        for c in &candidates {
            log::debug!("  -> {}: {}", c.decision.label(), c.reason);
        }

        select(&candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{GenericRule, ShellRule};
    use serde_json::json;

    struct AlwaysBlock;

    impl ToolResolver for AlwaysBlock {
        fn resolve(&self, _: &ToolInvocation, _: &[&Rule]) -> Vec<RuleMatch> {
            vec![RuleMatch {
                decision: Decision::Block,
                reason: "custom".into(),
            }]
        }
    }

    fn shell(tool: Option<&str>, command: &str, decision: Decision, reason: &str) -> Rule {
        Rule::Shell(ShellRule {
            tool_match: tool.map(String::from),
            command: Some(command.into()),
            args: None,
            decision,
            reason: reason.into(),
        })
    }

    #[test]
    fn no_rules_is_empty() {
        let inv = ToolInvocation::from_json("Bash", json!({"command": "rm -rf /"}));
        assert!(Evaluator::new().evaluate(&inv, &[]).is_empty());
    }

    #[test]
    fn tool_filter_applies_before_resolution() {
        let rules = [shell(Some("Other"), "rm", Decision::Block, "rm")];
        let inv = ToolInvocation::from_json("Bash", json!({"command": "rm -rf /"}));
        assert!(Evaluator::new().evaluate(&inv, &rules).is_empty());
    }

    #[test]
    fn absent_tool_pattern_applies_everywhere() {
        let rules = [shell(None, "rm", Decision::Block, "rm")];
        let inv = ToolInvocation::from_json("Bash", json!({"command": "rm -rf /"}));
        assert_eq!(Evaluator::new().evaluate(&inv, &rules), Verdict::block("rm"));
    }

    #[test]
    fn unknown_tools_use_generic_resolver() {
        let rules = [Rule::Generic(GenericRule {
            tool_match: Some("mcp__.*".into()),
            args: Some("prod".into()),
            decision: Decision::Block,
            reason: "no prod".into(),
        })];
        let inv = ToolInvocation::from_json("mcp__db__query", json!({"database": "prod-main"}));
        assert_eq!(Evaluator::new().evaluate(&inv, &rules), Verdict::block("no prod"));
    }

    #[test]
    fn registered_resolver_overrides() {
        let mut evaluator = Evaluator::new();
        evaluator.register("Bash", Box::new(AlwaysBlock));
        let rules = [shell(None, "ls", Decision::Approve, "ls")];
        let inv = ToolInvocation::from_json("Bash", json!({"command": "ls"}));
        assert_eq!(evaluator.evaluate(&inv, &rules), Verdict::block("custom"));
    }
}
