use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::log_reader::SourceSummary;
use crate::replay::ReplayOutcome;
use crate::types::IssueCategory;

#[derive(Clone, Debug, Serialize)]
pub struct RunSummary {
    #[serde(rename = "runId")]
    pub run_id: String,
    #[serde(rename = "generatedAt")]
    pub generated_at: String,
    pub entries: usize,
    #[serde(rename = "issueTotal")]
    pub issue_total: usize,
    #[serde(rename = "issueCounts")]
    pub issue_counts: BTreeMap<String, usize>,
    pub samples: BTreeMap<String, Vec<String>>,
    pub sources: Vec<SourceSummary>,
}

pub fn build_run_summary(
    run_id: String,
    outcome: &ReplayOutcome,
    sources: Vec<SourceSummary>,
) -> RunSummary {
    let mut issue_counts = BTreeMap::new();
    let mut samples = BTreeMap::new();
    for category in IssueCategory::ALL {
        issue_counts.insert(category.as_str().to_string(), outcome.report.count(category));
        samples.insert(
            category.as_str().to_string(),
            outcome.report.samples(category).to_vec(),
        );
    }
    RunSummary {
        run_id,
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        entries: outcome.entries,
        issue_total: outcome.report.total(),
        issue_counts,
        samples,
        sources,
    }
}

pub fn write_summary(path: &Path, summary: &RunSummary) -> io::Result<()> {
    let text = serde_json::to_string_pretty(summary).map_err(io::Error::other)?;
    fs::write(path, text)
}

pub fn render_console(outcome: &ReplayOutcome) -> String {
    let report = &outcome.report;
    let mut lines = vec![format!("Processed entries: {}", outcome.entries)];
    for category in IssueCategory::ALL {
        let count = report.count(category);
        if category == IssueCategory::UnknownEntity && count == 0 {
            continue;
        }
        lines.push(format!("{}: {count}", console_label(category)));
        for sample in report.samples(category) {
            lines.push(format!("  - {sample}"));
        }
    }
    lines.join("\n")
}

fn console_label(category: IssueCategory) -> &'static str {
    match category {
        IssueCategory::Movement => "Movement issues",
        IssueCategory::Return => "Return path issues",
        IssueCategory::Evidence => "Evidence issues",
        IssueCategory::Boredom => "Boredom mismatches",
        IssueCategory::MissingInit => "Missing initialisation entries",
        IssueCategory::UnknownEntity => "Unknown entity lines",
    }
}
