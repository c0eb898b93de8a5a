//! Rule types: one variant per tool class, each carrying only its own
//! discriminating field.

pub mod normalize;

pub use normalize::normalize;

use crate::eval::{Decision, RuleMatch};

/// Treat `Some("")` the same as `None`.
fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// De-duplication key of a rule. Absent and empty fields share the key `""`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKey<'a> {
    Shell { command: &'a str, args: &'a str },
    Domain(&'a str),
    Query(&'a str),
    Args(&'a str),
}

/// Anything that can be collapsed by [`normalize`].
pub trait Keyed {
    fn key(&self) -> RuleKey<'_>;
}

/// Rule for the `Bash` tool, keyed on `(command, args)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellRule {
    pub tool_match: Option<String>,
    /// Exact command name, e.g. `rm`.
    pub command: Option<String>,
    /// Pattern over the command's arguments. Absent makes this a default rule.
    pub args: Option<String>,
    pub decision: Decision,
    pub reason: String,
}

/// Rule for the `WebFetch` tool, keyed on `domain`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRule {
    pub tool_match: Option<String>,
    /// Pattern over the URL's hostname. Absent makes this a default rule.
    pub domain: Option<String>,
    pub decision: Decision,
    pub reason: String,
}

/// Rule for the `WebSearch` tool, keyed on `query`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRule {
    pub tool_match: Option<String>,
    /// Pattern over the search query. Absent makes this a default rule.
    pub query: Option<String>,
    pub decision: Decision,
    pub reason: String,
}

/// Rule for any other tool, keyed on `args`. Only matches with a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericRule {
    pub tool_match: Option<String>,
    /// Pattern tested against every stringified tool-input value.
    pub args: Option<String>,
    pub decision: Decision,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Shell(ShellRule),
    Fetch(FetchRule),
    Search(SearchRule),
    Generic(GenericRule),
}

impl ShellRule {
    pub fn command(&self) -> Option<&str> {
        non_empty(&self.command)
    }

    pub fn args(&self) -> Option<&str> {
        non_empty(&self.args)
    }
}

impl FetchRule {
    pub fn domain(&self) -> Option<&str> {
        non_empty(&self.domain)
    }
}

impl SearchRule {
    pub fn query(&self) -> Option<&str> {
        non_empty(&self.query)
    }
}

impl GenericRule {
    pub fn args(&self) -> Option<&str> {
        non_empty(&self.args)
    }
}

impl Keyed for ShellRule {
    fn key(&self) -> RuleKey<'_> {
        RuleKey::Shell {
            command: self.command().unwrap_or(""),
            args: self.args().unwrap_or(""),
        }
    }
}

impl Keyed for FetchRule {
    fn key(&self) -> RuleKey<'_> {
        RuleKey::Domain(self.domain().unwrap_or(""))
    }
}

impl Keyed for SearchRule {
    fn key(&self) -> RuleKey<'_> {
        RuleKey::Query(self.query().unwrap_or(""))
    }
}

impl Keyed for GenericRule {
    fn key(&self) -> RuleKey<'_> {
        RuleKey::Args(self.args().unwrap_or(""))
    }
}

impl Keyed for Rule {
    fn key(&self) -> RuleKey<'_> {
        match self {
            Rule::Shell(r) => r.key(),
            Rule::Fetch(r) => r.key(),
            Rule::Search(r) => r.key(),
            Rule::Generic(r) => r.key(),
        }
    }
}

impl Rule {
    /// Pattern over tool names; `None` applies to every tool.
    pub fn tool_match(&self) -> Option<&str> {
        let field = match self {
            Rule::Shell(r) => &r.tool_match,
            Rule::Fetch(r) => &r.tool_match,
            Rule::Search(r) => &r.tool_match,
            Rule::Generic(r) => &r.tool_match,
        };
        non_empty(field)
    }

    pub fn decision(&self) -> Decision {
        match self {
            Rule::Shell(r) => r.decision,
            Rule::Fetch(r) => r.decision,
            Rule::Search(r) => r.decision,
            Rule::Generic(r) => r.decision,
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            Rule::Shell(r) => &r.reason,
            Rule::Fetch(r) => &r.reason,
            Rule::Search(r) => &r.reason,
            Rule::Generic(r) => &r.reason,
        }
    }

    /// Short name of the rule's tool class.
    pub fn class(&self) -> &'static str {
        match self {
            Rule::Shell(_) => "shell",
            Rule::Fetch(_) => "fetch",
            Rule::Search(_) => "search",
            Rule::Generic(_) => "generic",
        }
    }

    pub fn as_shell(&self) -> Option<&ShellRule> {
        match self {
            Rule::Shell(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_fetch(&self) -> Option<&FetchRule> {
        match self {
            Rule::Fetch(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_search(&self) -> Option<&SearchRule> {
        match self {
            Rule::Search(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_generic(&self) -> Option<&GenericRule> {
        match self {
            Rule::Generic(r) => Some(r),
            _ => None,
        }
    }
}

macro_rules! impl_candidate {
    ($($ty:ty),*) => {
        $(
            impl $ty {
                /// The candidate decision this rule contributes when it matches.
                pub fn to_match(&self) -> RuleMatch {
                    RuleMatch {
                        decision: self.decision,
                        reason: self.reason.clone(),
                    }
                }
            }
        )*
    };
}

impl_candidate!(ShellRule, FetchRule, SearchRule, GenericRule);
