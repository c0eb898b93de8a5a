//! Pattern matching for rule fields and tool names.
//!
//! Rule patterns are regular expressions when they compile and literal text
//! when they don't, so a typo in a rule never aborts evaluation.

use regex::{Regex, RegexBuilder};

/// Test a rule pattern against a subject, case-insensitively and unanchored.
///
/// Falls back to a case-insensitive substring test when `pattern` is not a
/// valid regular expression (e.g. `[invalid`).
pub fn matches(pattern: &str, subject: &str) -> bool {
    match RegexBuilder::new(pattern).case_insensitive(true).build() {
        Ok(re) => re.is_match(subject),
        Err(e) => {
            log::debug!("pattern {pattern:?} is not a valid regex ({e}), matching literally");
            subject.to_lowercase().contains(&pattern.to_lowercase())
        }
    }
}

/// Test a rule's tool pattern against a tool name.
///
/// The pattern must match the whole name, case-sensitively: `Bash` matches
/// `Bash` but `Bas` does not, while `Web.*` matches both `WebFetch` and
/// `WebSearch`. An absent or empty pattern matches every tool. Invalid
/// patterns fall back to exact string equality.
pub fn matches_tool(pattern: Option<&str>, tool_name: &str) -> bool {
    let Some(pattern) = pattern.filter(|p| !p.is_empty()) else {
        return true;
    };
    match Regex::new(&format!("^(?:{pattern})$")) {
        Ok(re) => re.is_match(tool_name),
        Err(_) => pattern == tool_name,
    }
}
