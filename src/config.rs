use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::eval::Decision;
use crate::rules::{FetchRule, GenericRule, Rule, SearchRule, ShellRule};
use crate::tools::{BASH, WEB_FETCH, WEB_SEARCH};

/// Name of a rule file, both in user config directories and in projects.
pub const CONFIG_FILE_NAME: &str = "hooks.config.json";

/// The only event rules may be attached to.
const PRE_TOOL_USE: &str = "preToolUse";

/// Errors in the content of a rule document.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected an array of rules or an object with a `preToolUse` array")]
    Shape,
    #[error("invalid rule at index {index}: {message}")]
    Invalid { index: usize, message: String },
}

/// Errors loading a rule file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: {source}", path.display())]
    Rules {
        path: PathBuf,
        #[source]
        source: RuleError,
    },
}

// ── Wire format ──

/// A rule object exactly as written in a rule file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    /// Tool-name pattern; `Bash`, `WebFetch` and `WebSearch` also select the
    /// rule class.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    /// Older spelling of `tool`, used only as a tool-name pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matcher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<Decision>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Rule class selected by an explicit `tool` name.
fn class_for_tool(tool: &str) -> &'static str {
    match tool {
        BASH => "shell",
        WEB_FETCH => "fetch",
        WEB_SEARCH => "search",
        _ => "generic",
    }
}

fn is_set(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|s| !s.is_empty())
}

impl RawRule {
    /// The tool pattern, `tool` before `matcher`. Empty strings count as unset.
    fn tool_pattern(&self) -> Option<&String> {
        [&self.tool, &self.matcher]
            .into_iter()
            .find(|field| is_set(field))
            .and_then(Option::as_ref)
    }

    fn class(&self) -> &'static str {
        match self.tool.as_deref().filter(|t| !t.is_empty()) {
            Some(tool) => class_for_tool(tool),
            None if is_set(&self.command) => "shell",
            None if is_set(&self.domain) => "fetch",
            None if is_set(&self.query) => "search",
            None => "generic",
        }
    }

    /// Fail if any field that belongs to another rule class is set.
    fn reject_foreign(&self, class: &str, allowed: &[&str]) -> Result<(), String> {
        let fields = [
            ("command", &self.command),
            ("args", &self.args),
            ("domain", &self.domain),
            ("query", &self.query),
        ];
        for (name, value) in fields {
            if !allowed.contains(&name) && is_set(value) {
                return Err(format!("field `{name}` is not valid for a {class} rule"));
            }
        }
        Ok(())
    }
}

impl TryFrom<RawRule> for Rule {
    type Error = String;

    fn try_from(raw: RawRule) -> Result<Self, Self::Error> {
        if let Some(event) = &raw.event
            && event != PRE_TOOL_USE
        {
            return Err(format!("unsupported event `{event}`"));
        }

        let class = raw.class();
        let allowed: &[&str] = match class {
            "shell" => &["command", "args"],
            "fetch" => &["domain"],
            "search" => &["query"],
            _ => &["args"],
        };
        raw.reject_foreign(class, allowed)?;

        let tool_match = raw.tool_pattern().cloned();
        let reason = raw
            .reason
            .ok_or_else(|| "missing required field `reason`".to_string())?;
        let decision = raw.decision.unwrap_or(Decision::Unspecified);

        Ok(match class {
            "shell" => Rule::Shell(ShellRule {
                tool_match,
                command: raw.command,
                args: raw.args,
                decision,
                reason,
            }),
            "fetch" => Rule::Fetch(FetchRule {
                tool_match,
                domain: raw.domain,
                decision,
                reason,
            }),
            "search" => Rule::Search(SearchRule {
                tool_match,
                query: raw.query,
                decision,
                reason,
            }),
            _ => Rule::Generic(GenericRule {
                tool_match,
                args: raw.args,
                decision,
                reason,
            }),
        })
    }
}

impl From<&Rule> for RawRule {
    fn from(rule: &Rule) -> Self {
        let mut raw = RawRule {
            decision: match rule.decision() {
                Decision::Unspecified => None,
                d => Some(d),
            },
            reason: Some(rule.reason().to_string()),
            ..Default::default()
        };

        // Write the tool pattern as `tool` only when that alone reproduces the
        // rule class; otherwise the class is inferred from the fields on reload.
        if let Some(pattern) = rule.tool_match() {
            if class_for_tool(pattern) == rule.class() {
                raw.tool = Some(pattern.to_string());
            } else {
                raw.matcher = Some(pattern.to_string());
            }
        }

        match rule {
            Rule::Shell(r) => {
                raw.command = r.command.clone();
                raw.args = r.args.clone();
            }
            Rule::Fetch(r) => raw.domain = r.domain.clone(),
            Rule::Search(r) => raw.query = r.query.clone(),
            Rule::Generic(r) => raw.args = r.args.clone(),
        }
        raw
    }
}

/// Parse a rule document.
///
/// Accepts a JSON array of rule objects, or the older `{"preToolUse": [...]}`
/// object. Every rule is validated; the first invalid one fails the document.
pub fn parse_rules(content: &str) -> Result<Vec<Rule>, RuleError> {
    let document: Value = serde_json::from_str(content)?;
    let items = match document {
        Value::Array(items) => items,
        Value::Object(mut sections) => match sections.remove(PRE_TOOL_USE) {
            Some(Value::Array(items)) => items,
            None => Vec::new(),
            Some(_) => return Err(RuleError::Shape),
        },
        _ => return Err(RuleError::Shape),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let raw: RawRule = serde_json::from_value(item).map_err(|e| RuleError::Invalid {
                index,
                message: e.to_string(),
            })?;
            Rule::try_from(raw).map_err(|message| RuleError::Invalid { index, message })
        })
        .collect()
}

/// Read and parse one rule file.
pub fn read_rules(path: &Path) -> Result<Vec<Rule>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_rules(&content).map_err(|source| ConfigError::Rules {
        path: path.to_path_buf(),
        source,
    })
}

// ── Discovery ──

/// Expand `~` and `$VAR` in a user-supplied path. Unresolvable variables
/// leave the path as written.
pub fn expand_path(raw: &str) -> PathBuf {
    match shellexpand::full(raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(shellexpand::tilde(raw).as_ref()),
    }
}

/// Candidate user rule files, most preferred first.
fn user_config_candidates(config_dir: Option<&str>, home: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(dir) = config_dir.filter(|d| !d.is_empty()) {
        candidates.push(expand_path(dir).join(CONFIG_FILE_NAME));
    }
    if let Some(home) = home {
        candidates.push(home.join(".config/claude").join(CONFIG_FILE_NAME));
        candidates.push(home.join(".claude").join(CONFIG_FILE_NAME));
    }
    candidates
}

/// First existing user rule file: `$CLAUDE_CONFIG_DIR`, then
/// `~/.config/claude`, then `~/.claude`.
pub fn user_config_path() -> Option<PathBuf> {
    let config_dir = std::env::var("CLAUDE_CONFIG_DIR").ok();
    let home = std::env::var_os("HOME").map(PathBuf::from);
    user_config_candidates(config_dir.as_deref(), home.as_deref())
        .into_iter()
        .find(|p| p.is_file())
}

/// The project rule file under `project_root`.
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".claude").join(CONFIG_FILE_NAME)
}

/// Every path discovery considers, in load order.
pub fn searched_paths(project_root: &Path) -> Vec<PathBuf> {
    let config_dir = std::env::var("CLAUDE_CONFIG_DIR").ok();
    let home = std::env::var_os("HOME").map(PathBuf::from);
    let mut paths = user_config_candidates(config_dir.as_deref(), home.as_deref());
    paths.push(project_config_path(project_root));
    paths
}

/// The effective rule set and the files it came from.
#[derive(Debug, Default)]
pub struct Config {
    pub rules: Vec<Rule>,
    pub sources: Vec<PathBuf>,
}

impl Config {
    /// Load a single explicitly named rule file. Any failure is an error.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        Ok(Self {
            rules: read_rules(path)?,
            sources: vec![path.to_path_buf()],
        })
    }

    /// Load rules with resolution order:
    /// 1. User rule file (see [`user_config_path`])
    /// 2. Project rule file under `project_root`
    ///
    /// Rules are concatenated in that order, so project rules override user
    /// rules with the same key.
    pub fn load(project_root: &Path) -> Self {
        let mut paths: Vec<PathBuf> = user_config_path().into_iter().collect();
        paths.push(project_config_path(project_root));
        Self::load_paths(paths)
    }

    /// Concatenate rules from `paths` in order. Missing files are skipped
    /// silently; unreadable or invalid ones are skipped with a warning.
    pub fn load_paths(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut config = Self::default();
        for path in paths {
            if !path.is_file() {
                continue;
            }
            match read_rules(&path) {
                Ok(rules) => {
                    log::debug!("loaded {} rule(s) from {}", rules.len(), path.display());
                    config.rules.extend(rules);
                    config.sources.push(path);
                }
                Err(e) => log::warn!("skipping rule file: {e}"),
            }
        }
        config
    }

    /// The rule set in its file format, for `--dump-rules`.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let raw: Vec<RawRule> = self.rules.iter().map(RawRule::from).collect();
        serde_json::to_string_pretty(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(json: &str) -> Rule {
        let mut rules = parse_rules(&format!("[{json}]")).unwrap();
        assert_eq!(rules.len(), 1);
        rules.remove(0)
    }

    fn invalid_message(json: &str) -> String {
        match parse_rules(&format!("[{json}]")) {
            Err(RuleError::Invalid { index: 0, message }) => message,
            other => panic!("expected invalid rule, got {other:?}"),
        }
    }

    #[test]
    fn bash_rule() {
        let rule = parse_one(
            r#"{"event":"preToolUse","tool":"Bash","command":"rm","args":"/tmp/","decision":"approve","reason":"tmp ok"}"#,
        );
        assert_eq!(
            rule,
            Rule::Shell(ShellRule {
                tool_match: Some("Bash".into()),
                command: Some("rm".into()),
                args: Some("/tmp/".into()),
                decision: Decision::Approve,
                reason: "tmp ok".into(),
            })
        );
    }

    #[test]
    fn missing_decision_is_unspecified() {
        let rule = parse_one(r#"{"tool":"WebSearch","query":"x","reason":"check"}"#);
        assert_eq!(rule.decision(), Decision::Unspecified);
        assert_eq!(rule.class(), "search");
    }

    #[test]
    fn fetch_rule() {
        let rule = parse_one(r#"{"tool":"WebFetch","domain":"example\\.com","decision":"block","reason":"r"}"#);
        assert_eq!(rule.as_fetch().unwrap().domain(), Some(r"example\.com"));
    }

    #[test]
    fn other_tools_are_generic() {
        let rule = parse_one(r#"{"tool":"Read|Write","args":"\\.env","decision":"block","reason":"r"}"#);
        assert_eq!(rule.class(), "generic");
        assert_eq!(rule.tool_match(), Some("Read|Write"));
    }

    #[test]
    fn legacy_matcher_infers_class() {
        let rule = parse_one(r#"{"matcher":"Bash","command":"rm","decision":"block","reason":"r"}"#);
        assert_eq!(rule.class(), "shell");
        assert_eq!(rule.tool_match(), Some("Bash"));

        let rule = parse_one(r#"{"domain":"x","reason":"r"}"#);
        assert_eq!(rule.class(), "fetch");
        assert_eq!(rule.tool_match(), None);
    }

    #[test]
    fn empty_tool_infers_class() {
        let rule = parse_one(r#"{"tool":"","command":"rm","decision":"block","reason":"rm"}"#);
        assert_eq!(rule.class(), "shell");
        assert_eq!(rule.tool_match(), None);

        let rule = parse_one(r#"{"tool":"","matcher":"WebFetch","domain":"x","reason":"r"}"#);
        assert_eq!(rule.class(), "fetch");
        assert_eq!(rule.tool_match(), Some("WebFetch"));
    }

    #[test]
    fn legacy_object_document() {
        let rules = parse_rules(
            r#"{"preToolUse":[{"matcher":"Bash","command":"ls","decision":"approve","reason":"ok"}]}"#,
        )
        .unwrap();
        assert_eq!(rules.len(), 1);
        assert!(parse_rules("{}").unwrap().is_empty());
    }

    #[test]
    fn foreign_field_is_rejected() {
        let msg = invalid_message(r#"{"tool":"Bash","command":"curl","domain":"x","reason":"r"}"#);
        assert!(msg.contains("domain"), "{msg}");
        let msg = invalid_message(r#"{"tool":"WebFetch","command":"curl","reason":"r"}"#);
        assert!(msg.contains("command"), "{msg}");
        let msg = invalid_message(r#"{"tool":"Read","command":"cat","reason":"r"}"#);
        assert!(msg.contains("command"), "{msg}");
    }

    #[test]
    fn missing_reason_is_rejected() {
        assert!(invalid_message(r#"{"tool":"Bash","command":"rm"}"#).contains("reason"));
    }

    #[test]
    fn bad_decision_is_rejected() {
        invalid_message(r#"{"tool":"Bash","command":"rm","decision":"deny","reason":"r"}"#);
        invalid_message(r#"{"tool":"Bash","command":"rm","decision":"unspecified","reason":"r"}"#);
    }

    #[test]
    fn other_event_is_rejected() {
        assert!(invalid_message(r#"{"event":"postToolUse","tool":"Bash","reason":"r"}"#).contains("postToolUse"));
    }

    #[test]
    fn wrong_field_type_is_rejected() {
        invalid_message(r#"{"tool":"Bash","command":42,"reason":"r"}"#);
    }

    #[test]
    fn invalid_index_is_reported() {
        let err = parse_rules(r#"[{"tool":"Bash","command":"ls","reason":"ok"},{"tool":"Bash"}]"#).unwrap_err();
        assert!(matches!(err, RuleError::Invalid { index: 1, .. }));
    }

    #[test]
    fn shape_errors() {
        assert!(matches!(parse_rules("42"), Err(RuleError::Shape)));
        assert!(matches!(parse_rules(r#"{"preToolUse":1}"#), Err(RuleError::Shape)));
        assert!(matches!(parse_rules("[oops"), Err(RuleError::Json(_))));
    }

    #[test]
    fn dump_reloads_to_same_rules() {
        let source = r#"[
            {"tool":"Bash","command":"rm","args":"/tmp/","decision":"approve","reason":"tmp"},
            {"matcher":"Ba.*","command":"ls","reason":"flag ls"},
            {"tool":"WebFetch","reason":"default fetch","decision":"block"},
            {"tool":"Read","args":"secret","decision":"block","reason":"secret"},
            {"query":"x","reason":"no tool"}
        ]"#;
        let config = Config {
            rules: parse_rules(source).unwrap(),
            sources: Vec::new(),
        };
        let reloaded = parse_rules(&config.to_json().unwrap()).unwrap();
        assert_eq!(reloaded, config.rules);
    }

    #[test]
    fn user_candidates_order() {
        let home = Path::new("/home/u");
        assert_eq!(
            user_config_candidates(Some("/cfg"), Some(home)),
            vec![
                PathBuf::from("/cfg/hooks.config.json"),
                PathBuf::from("/home/u/.config/claude/hooks.config.json"),
                PathBuf::from("/home/u/.claude/hooks.config.json"),
            ]
        );
        assert_eq!(user_config_candidates(Some(""), None), Vec::<PathBuf>::new());
    }

    #[test]
    fn project_path() {
        assert_eq!(
            project_config_path(Path::new("/work/repo")),
            PathBuf::from("/work/repo/.claude/hooks.config.json")
        );
    }

    #[test]
    fn searched_paths_end_with_project_file() {
        let root = Path::new("/work/repo");
        let paths = searched_paths(root);
        assert_eq!(paths.last(), Some(&project_config_path(root)));
        assert!(paths.iter().all(|p| p.ends_with(CONFIG_FILE_NAME)));
    }

    #[test]
    fn load_paths_concatenates_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let user = dir.path().join("user.json");
        let project = dir.path().join("project.json");
        std::fs::write(&user, r#"[{"tool":"Bash","command":"ls","decision":"block","reason":"user"}]"#).unwrap();
        std::fs::write(&project, r#"[{"tool":"Bash","command":"ls","decision":"approve","reason":"project"}]"#).unwrap();

        let config = Config::load_paths([user.clone(), project.clone()]);
        let reasons: Vec<&str> = config.rules.iter().map(|r| r.reason()).collect();
        assert_eq!(reasons, vec!["user", "project"]);
        assert_eq!(config.sources, vec![user, project]);
    }

    #[test]
    fn load_paths_skips_missing_and_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.json");
        let good = dir.path().join("good.json");
        std::fs::write(&bad, "not json").unwrap();
        std::fs::write(&good, r#"[{"tool":"Bash","command":"ls","reason":"ok"}]"#).unwrap();

        let config = Config::load_paths([dir.path().join("missing.json"), bad, good.clone()]);
        assert_eq!(config.rules.len(), 1);
        assert_eq!(config.sources, vec![good]);
    }

    #[test]
    fn load_reads_project_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".claude")).unwrap();
        std::fs::write(
            project_config_path(dir.path()),
            r#"[{"tool":"WebSearch","query":"x","reason":"project"}]"#,
        )
        .unwrap();
        let config = Config::load(dir.path());
        assert!(config.rules.iter().any(|r| r.reason() == "project"));
    }

    #[test]
    fn from_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(Config::from_path(&missing), Err(ConfigError::Io { .. })));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, r#"[{"tool":"Bash"}]"#).unwrap();
        let err = Config::from_path(&bad).unwrap_err();
        assert!(matches!(err, ConfigError::Rules { .. }));
        assert!(err.to_string().contains("bad.json"));
    }

    #[test]
    fn expand_tilde() {
        let expanded = expand_path("~/rules.json");
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert_eq!(expand_path("/abs/rules.json"), PathBuf::from("/abs/rules.json"));
    }
}
