use std::collections::{BTreeMap, BTreeSet};

use crate::constants::SAMPLE_LIMIT;
use crate::types::IssueCategory;

pub trait IssueSink {
    fn report(
        &mut self,
        category: IssueCategory,
        timestamp: i64,
        detail: String,
        tags: &mut BTreeSet<IssueCategory>,
    );
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IssueReport {
    counts: BTreeMap<IssueCategory, usize>,
    samples: BTreeMap<IssueCategory, Vec<String>>,
}

impl IssueReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, category: IssueCategory) -> usize {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    pub fn samples(&self, category: IssueCategory) -> &[String] {
        self.samples
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }
}

impl IssueSink for IssueReport {
    fn report(
        &mut self,
        category: IssueCategory,
        timestamp: i64,
        detail: String,
        tags: &mut BTreeSet<IssueCategory>,
    ) {
        *self.counts.entry(category).or_insert(0) += 1;
        let samples = self.samples.entry(category).or_default();
        if samples.len() < SAMPLE_LIMIT {
            samples.push(format!("{timestamp} | {detail}"));
        }
        tags.insert(category);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_are_capped_but_counts_are_not() {
        let mut report = IssueReport::new();
        let mut tags = BTreeSet::new();
        for ts in 0..8 {
            report.report(IssueCategory::Movement, ts, format!("move {ts}"), &mut tags);
        }
        assert_eq!(report.count(IssueCategory::Movement), 8);
        assert_eq!(report.samples(IssueCategory::Movement).len(), SAMPLE_LIMIT);
        assert_eq!(report.samples(IssueCategory::Movement)[0], "0 | move 0");
        assert_eq!(report.samples(IssueCategory::Movement)[4], "4 | move 4");
        assert_eq!(tags, BTreeSet::from([IssueCategory::Movement]));
    }

    #[test]
    fn categories_are_tracked_independently() {
        let mut report = IssueReport::new();
        let mut first = BTreeSet::new();
        let mut second = BTreeSet::new();
        report.report(IssueCategory::Boredom, 3, "stale".to_string(), &mut first);
        report.report(IssueCategory::Return, 4, "wrong way".to_string(), &mut second);
        report.report(IssueCategory::Boredom, 5, "stale again".to_string(), &mut second);
        assert_eq!(report.count(IssueCategory::Boredom), 2);
        assert_eq!(report.count(IssueCategory::Return), 1);
        assert_eq!(report.count(IssueCategory::Evidence), 0);
        assert!(report.samples(IssueCategory::Evidence).is_empty());
        assert_eq!(report.total(), 3);
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 2);
    }

    #[test]
    fn fresh_report_is_clean() {
        assert!(IssueReport::new().is_clean());
    }
}
