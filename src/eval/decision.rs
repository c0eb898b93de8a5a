use serde::{Deserialize, Serialize};

/// A rule's decision, ordered by priority.
///
/// `Unspecified` is what a rule without a `decision` field carries: it is
/// surfaced to the host as "reason, no decision" (flag for review) and
/// outranks an explicit approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approve,
    #[serde(skip)]
    Unspecified,
    Block,
}

impl Decision {
    pub fn as_str(self) -> &'static str {
        match self {
            Decision::Approve => "approve",
            Decision::Unspecified => "unspecified",
            Decision::Block => "block",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Decision::Approve => "APPROVE",
            Decision::Unspecified => "FLAG",
            Decision::Block => "BLOCK",
        }
    }
}

/// A decision contributed by one matching rule, before priority selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    pub decision: Decision,
    pub reason: String,
}

/// The engine's final answer, serialized as the hook response.
///
/// Empty (`{}`) when no rule had an opinion. `decision` is omitted when an
/// unspecified rule won.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<Decision>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Verdict {
    pub fn is_empty(&self) -> bool {
        self.decision.is_none() && self.reason.is_none()
    }

    pub fn block(reason: impl Into<String>) -> Self {
        Self {
            decision: Some(Decision::Block),
            reason: Some(reason.into()),
        }
    }

    pub fn approve(reason: impl Into<String>) -> Self {
        Self {
            decision: Some(Decision::Approve),
            reason: Some(reason.into()),
        }
    }

    /// A reason with no decision: the host flags the call for review.
    pub fn flag(reason: impl Into<String>) -> Self {
        Self {
            decision: None,
            reason: Some(reason.into()),
        }
    }
}

impl From<&RuleMatch> for Verdict {
    fn from(m: &RuleMatch) -> Self {
        match m.decision {
            Decision::Block => Verdict::block(&m.reason),
            Decision::Approve => Verdict::approve(&m.reason),
            Decision::Unspecified => Verdict::flag(&m.reason),
        }
    }
}

/// Reduce candidates to one verdict: Block > Unspecified > Approve.
///
/// Among candidates of equal priority the first in emission order wins.
pub fn select(candidates: &[RuleMatch]) -> Verdict {
    let mut winner: Option<&RuleMatch> = None;
    for candidate in candidates {
        if winner.is_none_or(|w| candidate.decision > w.decision) {
            winner = Some(candidate);
        }
    }
    winner.map(Verdict::from).unwrap_or_default()
}
