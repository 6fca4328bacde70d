use clap::Parser;
use serde::Serialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use willow_log_validator::constants::{LAYOUT_PATH_ENV, LOG_DIR_ENV};
use willow_log_validator::export::write_export;
use willow_log_validator::log_reader::load_dir;
use willow_log_validator::summary::{build_run_summary, render_console, write_summary};
use willow_log_validator::{validate, HouseLayout, IssueCategory};

#[derive(Parser, Debug)]
#[command(author, version, about = "Replay haunted-house logs and report inconsistencies")]
struct Cli {
    /// Directory holding the log_*.csv files (falls back to WILLOW_LOG_DIR, then ".")
    #[arg(long)]
    dir: Option<PathBuf>,
    /// Process at most this many log entries (after sorting)
    #[arg(long)]
    limit: Option<usize>,
    /// Write the combined, ordered, issue-annotated timeline here
    #[arg(long)]
    export: Option<PathBuf>,
    #[arg(long)]
    summary_out: Option<PathBuf>,
    /// JSON house layout (falls back to WILLOW_LAYOUT_PATH, then the built-in Willow house)
    #[arg(long)]
    layout: Option<PathBuf>,
    #[arg(long)]
    run_id: Option<String>,
    /// Exit with status 1 when any issue was found
    #[arg(long)]
    strict: bool,
}

#[derive(Clone, Debug, Serialize)]
struct StructuredLogLine {
    #[serde(rename = "timestampMs")]
    timestamp_ms: u64,
    level: String,
    event: String,
    #[serde(rename = "runId")]
    run_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<i64>,
    details: Value,
}

fn main() {
    let cli = Cli::parse();
    let started_at_ms = now_ms();
    let run_id = cli
        .run_id
        .clone()
        .unwrap_or_else(|| default_run_id(started_at_ms));
    let dir = resolve_path(cli.dir.clone(), LOG_DIR_ENV).unwrap_or_else(|| PathBuf::from("."));

    let layout = match resolve_path(cli.layout.clone(), LAYOUT_PATH_ENV) {
        Some(path) => match HouseLayout::load(&path) {
            Ok(layout) => layout,
            Err(error) => fail(&run_id, "layout_load_failed", &path, error.to_string()),
        },
        None => HouseLayout::willow(),
    };

    emit_log(
        "info",
        "load_started",
        &run_id,
        None,
        None,
        json!({
            "dir": dir.to_string_lossy(),
            "limit": cli.limit,
            "startRoom": layout.start_room(),
        }),
    );
    let loaded = match load_dir(&dir, cli.limit) {
        Ok(loaded) => loaded,
        Err(error) => fail(&run_id, "load_failed", &dir, error.to_string()),
    };
    for source in &loaded.sources {
        emit_log(
            "info",
            "source_loaded",
            &run_id,
            Some(source.source.as_str()),
            None,
            json!({ "records": source.records }),
        );
    }

    let mut records = loaded.records;
    let outcome = validate(&mut records, &layout);

    for category in IssueCategory::ALL {
        for sample in outcome.report.samples(category) {
            emit_log(
                "warn",
                "issue_detected",
                &run_id,
                None,
                sample_timestamp(sample),
                json!({
                    "category": category,
                    "message": sample,
                }),
            );
        }
    }
    emit_log(
        "info",
        "replay_finished",
        &run_id,
        None,
        None,
        json!({
            "entries": outcome.entries,
            "issueTotal": outcome.report.total(),
            "durationMs": now_ms().saturating_sub(started_at_ms),
        }),
    );

    println!("{}", render_console(&outcome));

    if let Some(path) = cli.export.as_ref() {
        if let Err(error) = write_export(path, &records) {
            fail(&run_id, "export_write_failed", path, error.to_string());
        }
        println!("Combined timeline exported to {}", path.display());
        emit_log(
            "info",
            "export_written",
            &run_id,
            None,
            None,
            json!({ "path": path.to_string_lossy(), "records": records.len() }),
        );
    }

    if let Some(path) = cli.summary_out.as_ref() {
        let summary = build_run_summary(run_id.clone(), &outcome, loaded.sources.clone());
        if let Err(error) = write_summary(path, &summary) {
            fail(&run_id, "summary_write_failed", path, error.to_string());
        }
        emit_log(
            "info",
            "summary_written",
            &run_id,
            None,
            None,
            json!({ "path": path.to_string_lossy() }),
        );
    }

    if cli.strict && !outcome.report.is_clean() {
        std::process::exit(1);
    }
}

fn resolve_path(flag: Option<PathBuf>, env_key: &str) -> Option<PathBuf> {
    flag.or_else(|| {
        std::env::var(env_key)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
    })
}

fn sample_timestamp(sample: &str) -> Option<i64> {
    sample
        .split_once(" | ")
        .and_then(|(timestamp, _)| timestamp.parse::<i64>().ok())
}

fn fail(run_id: &str, event: &str, path: &Path, error: String) -> ! {
    emit_log(
        "error",
        event,
        run_id,
        None,
        None,
        json!({
            "path": path.to_string_lossy(),
            "error": error,
        }),
    );
    eprintln!("Something was wrong while processing {}: {error}", path.display());
    std::process::exit(2);
}

fn default_run_id(timestamp_ms: u64) -> String {
    format!("validate-{timestamp_ms}")
}

fn emit_log(
    level: &str,
    event: &str,
    run_id: &str,
    source: Option<&str>,
    timestamp: Option<i64>,
    details: Value,
) {
    let log_line = StructuredLogLine {
        timestamp_ms: now_ms(),
        level: level.to_string(),
        event: event.to_string(),
        run_id: run_id.to_string(),
        source: source.map(|value| value.to_string()),
        timestamp,
        details,
    };
    match serde_json::to_string(&log_line) {
        Ok(text) => eprintln!("{text}"),
        Err(error) => eprintln!("[validate] failed to serialize log line {event}: {error}"),
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_run_id_contains_timestamp() {
        assert_eq!(default_run_id(123456789), "validate-123456789");
    }

    #[test]
    fn sample_timestamp_reads_leading_number() {
        assert_eq!(sample_timestamp("42 | log_1.csv:3 hunter 1 invalid edge"), Some(42));
        assert_eq!(sample_timestamp("no separator"), None);
        assert_eq!(sample_timestamp("x | detail"), None);
    }

    #[test]
    fn explicit_flag_wins_over_environment() {
        let flag = Some(PathBuf::from("/tmp/logs"));
        assert_eq!(
            resolve_path(flag, "WILLOW_TEST_UNUSED_ENV"),
            Some(PathBuf::from("/tmp/logs"))
        );
        assert_eq!(resolve_path(None, "WILLOW_TEST_UNUSED_ENV"), None);
    }

    #[test]
    fn cli_parses_all_flags() {
        let cli = Cli::try_parse_from([
            "willow-validate",
            "--dir",
            "logs",
            "--limit",
            "50",
            "--export",
            "combined.csv",
            "--summary-out",
            "summary.json",
            "--strict",
        ])
        .expect("flags parse");
        assert_eq!(cli.dir, Some(PathBuf::from("logs")));
        assert_eq!(cli.limit, Some(50));
        assert_eq!(cli.export, Some(PathBuf::from("combined.csv")));
        assert_eq!(cli.summary_out, Some(PathBuf::from("summary.json")));
        assert!(cli.strict);
        assert!(cli.layout.is_none());
    }
}
