//! Types produced by the command splitter and consumed by the Bash resolver.

/// Shell operator separating consecutive commands.
///
/// Only top-level, unquoted operators are recognized. `||` is not an
/// operator of its own: it splits as two pipes around an empty segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `&&`: run next only if previous succeeded
    And,
    /// `;`: run next unconditionally
    Semi,
    /// `|`: pipe stdout
    Pipe,
}

impl Operator {
    /// The operator's shell syntax.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::And => "&&",
            Operator::Semi => ";",
            Operator::Pipe => "|",
        }
    }

    /// Width of the operator in characters.
    pub(crate) fn len(&self) -> usize {
        self.as_str().len()
    }
}

/// One `(command, args)` pair extracted from a compound command string.
///
/// For `git push origin main`, `command` is `git` and `args` is
/// `push origin main`. Quotes are kept verbatim in both fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Text up to the first unquoted space.
    pub command: String,
    /// Remainder after the first unquoted space, trimmed. Empty if none.
    pub args: String,
}

impl ParsedCommand {
    pub fn new(command: impl Into<String>, args: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: args.into(),
        }
    }
}
