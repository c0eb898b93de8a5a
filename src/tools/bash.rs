use crate::eval::{RuleMatch, ToolInvocation};
use crate::matcher;
use crate::parse::{self, ParsedCommand};
use crate::rules::{Rule, ShellRule, normalize};
use crate::tools::ToolResolver;

/// Resolver for the `Bash` tool.
///
/// The `command` input is split into its `(command, args)` pairs. For each
/// pair, rules for that command with a matching `args` pattern win; only when
/// none match do the command's default (args-less) rules apply.
pub struct BashResolver;

impl BashResolver {
    fn resolve_command(rules: &[&ShellRule], parsed: &ParsedCommand) -> Vec<RuleMatch> {
        let for_command: Vec<&ShellRule> = rules
            .iter()
            .copied()
            .filter(|r| r.command() == Some(parsed.command.as_str()))
            .collect();

        let specific: Vec<RuleMatch> = for_command
            .iter()
            .filter(|r| r.args().is_some_and(|p| matcher::matches(p, &parsed.args)))
            .map(|r| r.to_match())
            .collect();
        if !specific.is_empty() {
            return specific;
        }

        for_command
            .iter()
            .filter(|r| r.args().is_none())
            .map(|r| r.to_match())
            .collect()
    }
}

impl ToolResolver for BashResolver {
    fn resolve(&self, invocation: &ToolInvocation, rules: &[&Rule]) -> Vec<RuleMatch> {
        let Some(command) = invocation.text("command") else {
            return Vec::new();
        };

        let parsed = parse::split_commands(command);
        if parsed.is_empty() {
            return Vec::new();
        }

        let shell_rules: Vec<&ShellRule> = rules.iter().filter_map(|&r| r.as_shell()).collect();
        let shell_rules = normalize(&shell_rules);

        let mut matches = Vec::new();
        for p in &parsed {
            let found = Self::resolve_command(&shell_rules, p);
            log::debug!(
                "  [{} {}] -> {} rule(s)",
                p.command,
                p.args,
                found.len()
            );
            matches.extend(found);
        }
        matches
    }
}
