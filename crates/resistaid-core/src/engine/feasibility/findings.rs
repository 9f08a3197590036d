//! Tagged finding log accumulated by the feasibility checks.

use serde::Serialize;

/// Severity class of one finding, in increasing order of score impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Pass,
    ManufacturingRisk,
    Warning,
    Issue,
    Critical,
}

impl Severity {
    /// Multiplicative score penalty applied once per finding of this
    /// severity. Passes contribute a bonus instead and carry no penalty.
    pub fn penalty_factor(self) -> f64 {
        match self {
            Severity::Pass => 1.0,
            Severity::ManufacturingRisk => 0.95,
            Severity::Warning => 0.9,
            Severity::Issue => 0.8,
            Severity::Critical => 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

/// Ordered accumulator for check results, folded once into the final score.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindingLog {
    findings: Vec<Finding>,
}

impl FindingLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, severity: Severity, message: impl Into<String>) {
        self.findings.push(Finding::new(severity, message));
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .count()
    }

    pub fn messages(&self, severity: Severity) -> impl Iterator<Item = &str> {
        self.findings
            .iter()
            .filter(move |f| f.severity == severity)
            .map(|f| f.message.as_str())
    }

    pub fn first_message(&self, severity: Severity) -> Option<&str> {
        self.messages(severity).next()
    }

    /// Folds every finding into the multiplicative feasibility score:
    /// penalties compound per finding, passes add a 2% bonus each, and the
    /// result is clamped to `[0, 1]` and rounded to three decimals.
    pub fn fold_score(&self) -> f64 {
        let mut score = 1.0;
        for finding in &self.findings {
            score *= finding.severity.penalty_factor();
        }
        let pass_bonus = 1.0 + 0.02 * self.count(Severity::Pass) as f64;
        score = (score * pass_bonus).clamp(0.0, 1.0);
        (score * 1000.0).round() / 1000.0
    }

    pub fn into_findings(self) -> Vec<Finding> {
        self.findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn penalties_compound_multiplicatively() {
        let mut log = FindingLog::new();
        log.record(Severity::Critical, "a");
        log.record(Severity::Issue, "b");
        log.record(Severity::Warning, "c");
        log.record(Severity::ManufacturingRisk, "d");
        let expected = 0.5 * 0.8 * 0.9 * 0.95;
        assert_eq!(log.fold_score(), (expected * 1000.0_f64).round() / 1000.0);
    }

    #[test]
    fn passes_raise_the_score_but_never_above_one() {
        let mut log = FindingLog::new();
        for i in 0..10 {
            log.record(Severity::Pass, format!("pass {i}"));
        }
        assert_eq!(log.fold_score(), 1.0);
    }

    #[test]
    fn score_is_non_increasing_in_critical_count() {
        let mut log = FindingLog::new();
        log.record(Severity::Issue, "fixed");
        let mut previous = log.fold_score();
        for i in 0..5 {
            log.record(Severity::Critical, format!("critical {i}"));
            let next = log.fold_score();
            assert!(next <= previous, "score rose after critical {i}");
            previous = next;
        }
    }

    #[test]
    fn first_message_respects_insertion_order() {
        let mut log = FindingLog::new();
        log.record(Severity::Issue, "first");
        log.record(Severity::Issue, "second");
        assert_eq!(log.first_message(Severity::Issue), Some("first"));
        assert_eq!(log.first_message(Severity::Critical), None);
    }
}
