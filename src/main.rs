//! hookrules: PreToolUse hook for agentic tool hosts.
//!
//! Reads a hook event (JSON) from stdin, evaluates tool calls against the
//! user and project rule files, and writes the response JSON to stdout:
//! `{"decision": "block"|"approve", "reason": "..."}`, or `{}` when no rule
//! has an opinion.

use std::io::{IsTerminal, Read};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;

use hookrules::config::{self, Config, ConfigError};
use hookrules::eval::Evaluator;
use hookrules::hook::HookInput;
use hookrules::logging;

#[derive(Debug, Parser)]
#[command(name = "hookrules", version, about = "Approve or block tool calls from declarative rules")]
struct Cli {
    /// Append debug logs to /tmp/claude-hook-debug.log (also: CLAUDE_HOOK_DEBUG=true)
    #[arg(short, long)]
    debug: bool,

    /// Read the hook event from FILE when stdin is not piped ("-" requires stdin)
    #[arg(short, long, value_name = "FILE")]
    input: Option<String>,

    /// Use only this rule file instead of the user and project rule files
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Print the effective rules as JSON and exit
    #[arg(long)]
    dump_rules: bool,
}

/// Piped stdin wins; otherwise fall back to `--input`.
fn read_input(option: Option<&str>) -> Result<String, String> {
    let stdin = std::io::stdin();
    if !stdin.is_terminal() {
        let mut buf = String::new();
        stdin
            .lock()
            .read_to_string(&mut buf)
            .map_err(|e| format!("failed to read stdin: {e}"))?;
        return Ok(buf);
    }

    match option {
        Some("-") => Err("no input provided via stdin".into()),
        Some(path) => std::fs::read_to_string(config::expand_path(path))
            .map_err(|e| format!("cannot read input file {path}: {e}")),
        None => Err("no input: pipe a hook event on stdin or pass --input FILE".into()),
    }
}

/// An explicit rule file must load; discovered ones are best-effort.
fn load_config(explicit: Option<&str>, project_root: &Path) -> Result<Config, ConfigError> {
    match explicit {
        Some(path) => Config::from_path(&config::expand_path(path)),
        None => Ok(Config::load(project_root)),
    }
}

fn dump_rules(explicit: Option<&str>) -> ExitCode {
    let cwd = std::env::current_dir().unwrap_or_default();
    let config = match load_config(explicit, &cwd) {
        Ok(c) => c,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    for source in &config.sources {
        log::debug!("rules from {}", source.display());
    }
    match config.to_json() {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("cannot serialize rules: {e}");
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(logging::debug_enabled(cli.debug));

    if cli.dump_rules {
        return dump_rules(cli.config.as_deref());
    }

    let raw = match read_input(cli.input.as_deref()) {
        Ok(raw) => raw,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    if raw.trim().is_empty() {
        log::debug!("no input received");
        return ExitCode::SUCCESS;
    }

    let input = match HookInput::parse(&raw) {
        Ok(input) => input,
        Err(e) => {
            log::debug!("rejected input: {raw}");
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    log::debug!("{} event (session {})", input.event.name(), input.session_id);

    let config = match load_config(cli.config.as_deref(), Path::new(&input.cwd)) {
        Ok(c) => c,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    if config.sources.is_empty() {
        let searched: Vec<String> = config::searched_paths(Path::new(&input.cwd))
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        log::warn!(
            "no rule file found (looked in: {}); every tool call passes through",
            searched.join(", ")
        );
    } else if config.rules.is_empty() {
        log::debug!("no rules configured");
    }

    let verdict = input.respond(&Evaluator::new(), &config.rules);
    if let Some(invocation) = input.invocation() {
        logging::log_decision(&invocation, &verdict);
    }

    match serde_json::to_string(&verdict) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("cannot serialize response: {e}");
            ExitCode::FAILURE
        }
    }
}
