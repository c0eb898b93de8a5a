use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use log::LevelFilter;
use simplelog::{CombinedLogger, ConfigBuilder, SharedLogger, WriteLogger};

use crate::eval::{ToolInvocation, Verdict};

/// Debug log written when debug mode is on.
pub const DEBUG_LOG_PATH: &str = "/tmp/claude-hook-debug.log";

/// Environment variable that turns on debug mode (`true`).
pub const DEBUG_ENV_VAR: &str = "CLAUDE_HOOK_DEBUG";

/// Debug mode is on when requested on the command line or via the environment.
pub fn debug_enabled(cli_flag: bool) -> bool {
    cli_flag || std::env::var(DEBUG_ENV_VAR).is_ok_and(|v| v == "true")
}

/// Install the global logger.
///
/// Warnings and errors always go to stderr. In debug mode every record down
/// to `debug` is also appended to [`DEBUG_LOG_PATH`]. Stdout is never used:
/// it carries the hook response.
pub fn init(debug: bool) {
    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![WriteLogger::new(
        LevelFilter::Warn,
        config.clone(),
        std::io::stderr(),
    )];

    if debug {
        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(DEBUG_LOG_PATH)
        {
            Ok(file) => loggers.push(WriteLogger::new(LevelFilter::Debug, config, file)),
            Err(e) => eprintln!("hookrules: cannot open {DEBUG_LOG_PATH}: {e}"),
        }
    }

    // A logger may already be installed (e.g. by a test harness).
    let _ = CombinedLogger::init(loggers);
}

fn decision_log_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    Some(PathBuf::from(home).join(".local/share/hookrules/decisions.log"))
}

/// Append a decision record to ~/.local/share/hookrules/decisions.log.
/// Best-effort: failures are silently ignored (logging must never block the hook).
pub fn log_decision(invocation: &ToolInvocation, verdict: &Verdict) {
    let Some(log_path) = decision_log_path() else {
        return;
    };
    if let Some(dir) = log_path.parent() {
        let _ = std::fs::create_dir_all(dir);
    }

    let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&log_path) else {
        return;
    };

    let _ = writeln!(file, "{}", format_record(&timestamp_now(), invocation, verdict));
}

/// One tab-separated record: timestamp, decision, tool, subject, reason.
fn format_record(ts: &str, invocation: &ToolInvocation, verdict: &Verdict) -> String {
    let decision = match (&verdict.decision, &verdict.reason) {
        (Some(d), _) => d.as_str(),
        (None, Some(_)) => "flag",
        (None, None) => "none",
    };
    let one_line = |s: &str| s.replace(['\n', '\t'], " ");
    let subject: String = one_line(&invocation.subject()).chars().take(200).collect();
    let reason = verdict.reason.as_deref().map(one_line).unwrap_or_default();

    format!(
        "{ts}\t{decision}\t{tool}\t{subject}\t{reason}",
        tool = invocation.tool_name,
    )
}

/// Simple UTC timestamp without external deps.
fn timestamp_now() -> String {
    let dur = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    format_timestamp(dur.as_secs())
}

fn format_timestamp(secs: u64) -> String {
    let days = secs / 86400;
    let rem = secs % 86400;
    let h = rem / 3600;
    let m = (rem % 3600) / 60;
    let s = rem % 60;
    let (year, month, day) = epoch_days_to_date(days);
    format!("{year:04}-{month:02}-{day:02}T{h:02}:{m:02}:{s:02}Z")
}

/// Convert days since Unix epoch to (year, month, day).
fn epoch_days_to_date(days: u64) -> (u64, u64, u64) {
    // Civil calendar from days algorithm (Howard Hinnant)
    let z = days + 719468;
    let era = z / 146097;
    let doe = z - era * 146097;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = if m <= 2 { y + 1 } else { y };
    (y, m, d)
}
