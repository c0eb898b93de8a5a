use super::types::{Operator, ParsedCommand};

/// If `chars[start]` opens a quoted region, return the index of its closing quote.
///
/// A region runs from a `'` or `"` to the next occurrence of the same
/// character. There is no escape handling: `\'` does not protect the quote.
/// A quote with no closing partner is an ordinary character.
fn quoted_span_end(chars: &[char], start: usize) -> Option<usize> {
    let quote = chars[start];
    if quote != '\'' && quote != '"' {
        return None;
    }
    chars[start + 1..]
        .iter()
        .position(|&c| c == quote)
        .map(|offset| start + 1 + offset)
}

/// Split a command at top-level `&&`, `;` and `|`, leaving quoted regions intact.
///
/// Returns the trimmed, non-empty segments and every operator encountered,
/// including operators adjacent to segments that were dropped as empty.
fn split_compound_command(command: &str) -> (Vec<String>, Vec<Operator>) {
    let mut parts = Vec::new();
    let mut operators = Vec::new();
    let mut buf = String::new();

    let chars: Vec<char> = command.chars().collect();
    let len = chars.len();
    let mut i = 0;

    while i < len {
        if let Some(end) = quoted_span_end(&chars, i) {
            buf.extend(&chars[i..=end]);
            i = end + 1;
            continue;
        }

        let op = match chars[i] {
            '&' if chars.get(i + 1) == Some(&'&') => Some(Operator::And),
            ';' => Some(Operator::Semi),
            '|' => Some(Operator::Pipe),
            _ => None,
        };
        if let Some(op) = op {
            parts.push(buf.trim().to_string());
            operators.push(op);
            buf.clear();
            i += op.len();
            continue;
        }

        buf.push(chars[i]);
        i += 1;
    }

    parts.push(buf.trim().to_string());
    parts.retain(|p| !p.is_empty());

    (parts, operators)
}

/// Separate a single segment into command and args at the first unquoted space.
fn split_segment(segment: &str) -> ParsedCommand {
    let chars: Vec<char> = segment.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        if let Some(end) = quoted_span_end(&chars, i) {
            i = end + 1;
            continue;
        }
        if chars[i] == ' ' {
            let command: String = chars[..i].iter().collect();
            let args: String = chars[i + 1..].iter().collect();
            return ParsedCommand::new(command, args.trim());
        }
        i += 1;
    }

    ParsedCommand::new(segment, "")
}

/// Split a raw shell command into its `(command, args)` pairs.
///
/// `cd /tmp && ls -la | grep foo` yields `cd /tmp`, `ls -la` and `grep foo`.
/// Empty, whitespace-only and separator-only input yields nothing.
pub fn split_commands(raw: &str) -> Vec<ParsedCommand> {
    let (segments, operators) = split_compound_command(raw);

    if !operators.is_empty() {
        let ops: Vec<&str> = operators.iter().map(|o| o.as_str()).collect();
        log::debug!(
            "split compound command into {} segment(s) on [{}]",
            segments.len(),
            ops.join(" ")
        );
    }

    segments.iter().map(|s| split_segment(s)).collect()
}
