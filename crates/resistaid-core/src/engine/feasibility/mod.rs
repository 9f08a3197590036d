//! Deterministic manufacturability and biophysical assessment.
//!
//! Six check groups feed a tagged [`FindingLog`]; the log folds once into a
//! multiplicative `[0, 1]` score, so defects compound instead of averaging
//! out. The evaluator holds no mutable state and involves no randomness:
//! the same sequence always yields the same report.

pub mod findings;

use crate::core::chem::{classes, properties};
use crate::core::chem::properties::SequenceProperties;
use crate::core::models::candidate::Candidate;
use crate::engine::config::DesignTables;
use findings::{Finding, FindingLog, Severity};
use serde::Serialize;
use std::fmt;
use tracing::instrument;

const MIN_LENGTH: usize = 100;
const MAX_LENGTH: usize = 250;
const MIN_CYSTEINES: usize = 2;
const MAX_CYSTEINES: usize = 6;
const IDEAL_PI_RANGE: (f64, f64) = (5.0, 9.0);
const IDEAL_GRAVY_RANGE: (f64, f64) = (-1.0, 0.5);
const MAX_INSTABILITY_INDEX: f64 = 40.0;
const MAX_HYDROPHOBIC_RUN: usize = 4;
const MAX_METHIONINES: usize = 3;
const MAX_TRYPTOPHANS: usize = 2;
const MAX_CHARGED_DENSITY: f64 = 0.25;
const MIN_COMPLEXITY: f64 = 0.65;
const SIGNAL_WINDOW: usize = 20;

const PROTEASE_SITES: [&str; 6] = ["DP", "TP", "GP", "AP", "KP", "RP"];
const DEAMIDATION_SITES: [[u8; 2]; 3] = [*b"NG", *b"NS", *b"NT"];
const ISOMERIZATION_SITES: [[u8; 2]; 3] = [*b"DG", *b"DS", *b"DT"];

/// Category label derived from the folded feasibility score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FeasibilityCategory {
    Excellent,
    Good,
    Moderate,
    Marginal,
    Poor,
}

impl FeasibilityCategory {
    fn from_score(score: f64) -> Self {
        if score >= 0.9 {
            Self::Excellent
        } else if score >= 0.8 {
            Self::Good
        } else if score >= 0.7 {
            Self::Moderate
        } else if score >= 0.6 {
            Self::Marginal
        } else {
            Self::Poor
        }
    }
}

impl fmt::Display for FeasibilityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::Marginal => "Marginal",
            Self::Poor => "Poor",
        };
        f.write_str(label)
    }
}

/// Full assessment of one candidate, derived and immutable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeasibilityReport {
    pub score: f64,
    pub category: FeasibilityCategory,
    pub properties: SequenceProperties,
    pub findings: Vec<Finding>,
    pub recommendations: Vec<String>,
}

impl FeasibilityReport {
    pub fn passes(&self) -> impl Iterator<Item = &str> {
        self.by_severity(Severity::Pass)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        self.by_severity(Severity::Warning)
    }

    pub fn issues(&self) -> impl Iterator<Item = &str> {
        self.by_severity(Severity::Issue)
    }

    pub fn critical_issues(&self) -> impl Iterator<Item = &str> {
        self.by_severity(Severity::Critical)
    }

    pub fn manufacturing_risks(&self) -> impl Iterator<Item = &str> {
        self.by_severity(Severity::ManufacturingRisk)
    }

    fn by_severity(&self, severity: Severity) -> impl Iterator<Item = &str> {
        self.findings
            .iter()
            .filter(move |f| f.severity == severity)
            .map(|f| f.message.as_str())
    }
}

/// Rule-based candidate assessor.
pub struct FeasibilityEvaluator<'a> {
    tables: &'a DesignTables,
}

impl<'a> FeasibilityEvaluator<'a> {
    pub fn new(tables: &'a DesignTables) -> Self {
        Self { tables }
    }

    pub fn evaluate(&self, candidate: &Candidate) -> FeasibilityReport {
        self.evaluate_sequence(&candidate.sequence)
    }

    /// Runs the full check battery over a bare sequence.
    ///
    /// Never fails: malformed sequences degrade to estimated properties, and
    /// a zero-length sequence simply fails the length check.
    #[instrument(skip_all, fields(length = sequence.len()))]
    pub fn evaluate_sequence(&self, sequence: &str) -> FeasibilityReport {
        let props = properties::analyze_or_estimate(sequence);
        let mut log = FindingLog::new();

        self.check_length(sequence, &mut log);
        self.check_cysteines(sequence, &mut log);
        self.check_denylist_motifs(sequence, &mut log);
        self.check_biochemical_properties(&props, &mut log);
        self.check_manufacturing(sequence, &mut log);
        self.check_structure(sequence, &mut log);

        let score = log.fold_score();
        let category = FeasibilityCategory::from_score(score);
        let recommendations = self.recommendations(score, &log);

        FeasibilityReport {
            score,
            category,
            properties: props,
            findings: log.into_findings(),
            recommendations,
        }
    }

    fn check_length(&self, sequence: &str, log: &mut FindingLog) {
        let length = sequence.len();
        if (MIN_LENGTH..=MAX_LENGTH).contains(&length) {
            log.record(Severity::Pass, format!("Length OK ({length} residues)"));
        } else {
            log.record(
                Severity::Issue,
                format!("Length {length} outside ideal range ({MIN_LENGTH}-{MAX_LENGTH})"),
            );
        }
    }

    fn check_cysteines(&self, sequence: &str, log: &mut FindingLog) {
        let count = classes::count_residue(sequence, b'C');
        if count % 2 == 0 {
            if (MIN_CYSTEINES..=MAX_CYSTEINES).contains(&count) {
                log.record(
                    Severity::Pass,
                    format!("Cysteine count OK ({count}, all can form disulfides)"),
                );
            } else if count > MAX_CYSTEINES {
                log.record(
                    Severity::Warning,
                    format!("High cysteine count ({count}) - may cause misfolding"),
                );
            } else {
                log.record(
                    Severity::Warning,
                    format!("Low cysteine count ({count}) - may lack structural disulfides"),
                );
            }
        } else {
            log.record(
                Severity::Critical,
                format!("Odd number of cysteines ({count}) - cannot form proper disulfide bonds"),
            );
        }
    }

    fn check_denylist_motifs(&self, sequence: &str, log: &mut FindingLog) {
        let found: Vec<&str> = self
            .tables
            .denylist_motifs
            .iter()
            .filter(|motif| sequence.contains(motif.as_str()))
            .map(String::as_str)
            .collect();

        if found.is_empty() {
            log.record(Severity::Pass, "No problematic motifs detected");
        } else {
            log.record(
                Severity::Issue,
                format!("Problematic motifs found: {}", found.join(", ")),
            );
        }
    }

    fn check_biochemical_properties(&self, props: &SequenceProperties, log: &mut FindingLog) {
        let pi = props.isoelectric_point;
        if (IDEAL_PI_RANGE.0..=IDEAL_PI_RANGE.1).contains(&pi) {
            log.record(Severity::Pass, format!("Isoelectric point OK (pI = {pi:.2})"));
        } else {
            log.record(
                Severity::Warning,
                format!("Extreme isoelectric point (pI = {pi:.2}) - may affect solubility"),
            );
        }

        let gravy = props.gravy;
        if (IDEAL_GRAVY_RANGE.0..=IDEAL_GRAVY_RANGE.1).contains(&gravy) {
            log.record(Severity::Pass, format!("Hydrophobicity OK (GRAVY = {gravy:.2})"));
        } else {
            log.record(
                Severity::Issue,
                format!("Extreme hydrophobicity (GRAVY = {gravy:.2}) - aggregation risk"),
            );
        }

        let instability = props.instability_index;
        if instability < MAX_INSTABILITY_INDEX {
            log.record(
                Severity::Pass,
                format!("Stable protein (instability index = {instability:.1})"),
            );
        } else {
            log.record(
                Severity::Warning,
                format!("Potentially unstable (instability index = {instability:.1})"),
            );
        }
    }

    fn check_manufacturing(&self, sequence: &str, log: &mut FindingLog) {
        let mut risks: Vec<String> = Vec::new();

        let run = classes::longest_class_run(sequence, b"WFYILV");
        if run > MAX_HYDROPHOBIC_RUN {
            risks.push(format!(
                "Aggregation risk: {run} consecutive hydrophobic residues"
            ));
        }

        if let Some(site) = PROTEASE_SITES.iter().find(|s| sequence.contains(*s)) {
            risks.push(format!("Protease cleavage site: {site}"));
        }

        let methionines = classes::count_residue(sequence, b'M');
        let tryptophans = classes::count_residue(sequence, b'W');
        if methionines > MAX_METHIONINES {
            risks.push(format!(
                "Oxidation risk: High methionine count ({methionines})"
            ));
        } else if tryptophans > MAX_TRYPTOPHANS {
            risks.push(format!(
                "Oxidation risk: High tryptophan count ({tryptophans})"
            ));
        }

        if let Some(risk) = degradation_risk(sequence) {
            risks.push(risk);
        }

        let charged_density = classes::class_fraction(sequence, classes::CHARGED);
        if charged_density > MAX_CHARGED_DENSITY {
            risks.push(format!(
                "High charge density ({:.1}%) - may affect solubility",
                charged_density * 100.0
            ));
        }

        if risks.is_empty() {
            log.record(Severity::Pass, "No major manufacturing risks detected");
        } else {
            for risk in risks {
                log.record(Severity::ManufacturingRisk, risk);
            }
        }
    }

    fn check_structure(&self, sequence: &str, log: &mut FindingLog) {
        let complexity = dimer_complexity(sequence);
        if complexity >= MIN_COMPLEXITY {
            log.record(
                Severity::Pass,
                format!("Good sequence complexity ({complexity:.2})"),
            );
        } else {
            log.record(
                Severity::Warning,
                format!("Low sequence complexity ({complexity:.2}) - may express poorly"),
            );
        }

        let window: String = sequence.chars().take(SIGNAL_WINDOW).collect();
        if classes::count_residue(&window, b'L') > 5 && classes::count_residue(&window, b'A') > 3 {
            log.record(
                Severity::Warning,
                "N-terminal region resembles signal peptide - may affect secretion",
            );
        }
    }

    fn recommendations(&self, score: f64, log: &FindingLog) -> Vec<String> {
        let mut recs = Vec::new();

        if score >= 0.8 {
            recs.push("Good candidate for immediate synthesis and testing".to_string());
        } else if score >= 0.6 {
            recs.push("Moderate candidate - consider optimization before synthesis".to_string());
        } else {
            recs.push("Not recommended for synthesis without major redesign".to_string());
        }

        if let Some(critical) = log.first_message(Severity::Critical) {
            recs.push(format!("Fix critical issues first: {critical}"));
        }
        if let Some(issue) = log.first_message(Severity::Issue) {
            recs.push(format!("Address: {issue}"));
        }
        if let Some(risk) = log.first_message(Severity::ManufacturingRisk) {
            let lower = risk.to_lowercase();
            if lower.contains("aggregation") {
                recs.push(
                    "Consider adding solubility tags or optimizing hydrophobic patches".to_string(),
                );
            } else if lower.contains("protease") {
                recs.push("Consider mutation to remove protease sites".to_string());
            } else if lower.contains("oxidation") {
                recs.push("Consider formulation with antioxidants".to_string());
            }
        }

        recs.push("Validate binding with computational docking".to_string());
        recs.push("Test expression in mammalian system (HEK293 or CHO)".to_string());
        recs
    }
}

/// Deamidation and isomerization scan; reports the first liability found.
fn degradation_risk(sequence: &str) -> Option<String> {
    let s = sequence.as_bytes();
    for i in 0..s.len().saturating_sub(1) {
        let dipeptide = [s[i], s[i + 1]];
        if DEAMIDATION_SITES.contains(&dipeptide) {
            return Some(format!("Deamidation risk at position {i}"));
        }
        if ISOMERIZATION_SITES.contains(&dipeptide) {
            return Some(format!("Isomerization risk at position {i}"));
        }
    }
    None
}

/// Distinct 2-mer fraction, a cheap low-complexity detector.
fn dimer_complexity(sequence: &str) -> f64 {
    let s = sequence.as_bytes();
    if s.len() < 2 {
        return 0.0;
    }
    let total = s.len() - 1;
    let mut seen = std::collections::HashSet::with_capacity(total);
    for window in s.windows(2) {
        seen.insert([window[0], window[1]]);
    }
    seen.len() as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluator(tables: &DesignTables) -> FeasibilityEvaluator<'_> {
        FeasibilityEvaluator::new(tables)
    }

    /// A clean, antibody-like chain: in-range length, one even cysteine
    /// pair, no denylist motifs, moderate charge.
    fn clean_sequence() -> String {
        let mut seq = String::from("EVQLVESGGGLVQPGGSLRLSCAAS");
        seq.push_str("GYTFTSYGIS");
        seq.push_str("WVRQAPGKGLEWV");
        seq.push_str("ARIYPTDGYTRYADSVKG");
        seq.push_str("RFTISADTSKNTAYLQMNSLRAEDTAVYYC");
        seq.push_str("AKDRGYDYEGF");
        seq.push_str("WGQGTLVTVSS");
        seq
    }

    #[test]
    fn score_equals_the_folded_finding_formula() {
        let tables = DesignTables::default();
        let report = evaluator(&tables).evaluate_sequence(&clean_sequence());

        let criticals = report.critical_issues().count() as u32;
        let issues = report.issues().count() as u32;
        let warnings = report.warnings().count() as u32;
        let risks = report.manufacturing_risks().count() as u32;
        let passes = report.passes().count();

        let raw = 0.5f64.powi(criticals as i32)
            * 0.8f64.powi(issues as i32)
            * 0.9f64.powi(warnings as i32)
            * 0.95f64.powi(risks as i32)
            * (1.0 + 0.02 * passes as f64);
        let expected = (raw.clamp(0.0, 1.0) * 1000.0).round() / 1000.0;
        assert_eq!(report.score, expected);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let tables = DesignTables::default();
        let eval = evaluator(&tables);
        let a = eval.evaluate_sequence(&clean_sequence());
        let b = eval.evaluate_sequence(&clean_sequence());
        assert_eq!(a, b);
    }

    #[test]
    fn odd_cysteine_is_critical_and_at_least_halves_the_score() {
        let tables = DesignTables::default();
        let eval = evaluator(&tables);

        // Identical chains except one C <-> A swap; both carry one deliberate
        // charge-neutral denylist motif so neither score saturates at the
        // 1.0 cap.
        let even = clean_sequence().replace("ADSVKG", "AGPGPG") + "CC";
        let odd = clean_sequence().replace("ADSVKG", "AGPGPG") + "CA";
        let even_report = eval.evaluate_sequence(&even);
        let odd_report = eval.evaluate_sequence(&odd);

        assert_eq!(even_report.critical_issues().count(), 0);
        assert!(odd_report.critical_issues().count() > 0);
        assert!(odd_report.score <= 0.5 * even_report.score + 1e-9);
    }

    #[test]
    fn empty_sequence_fails_length_check_without_crashing() {
        let tables = DesignTables::default();
        let report = evaluator(&tables).evaluate_sequence("");
        assert!(report.issues().any(|m| m.contains("Length 0")));
        assert_eq!(report.properties.length, 0);
    }

    #[test]
    fn denylist_motifs_are_reported_as_issues() {
        let tables = DesignTables::default();
        let seq = clean_sequence().replace("ADSVKG", "AKKKKG");
        let report = evaluator(&tables).evaluate_sequence(&seq);
        assert!(report.issues().any(|m| m.contains("KKKK")));
    }

    #[test]
    fn hydrophobic_run_is_a_manufacturing_risk() {
        let tables = DesignTables::default();
        let seq = clean_sequence().replace("DRGYDYEGF", "DWFYILVGF");
        let report = evaluator(&tables).evaluate_sequence(&seq);
        assert!(
            report
                .manufacturing_risks()
                .any(|m| m.contains("Aggregation risk"))
        );
    }

    #[test]
    fn methionine_load_is_an_oxidation_risk() {
        let tables = DesignTables::default();
        let seq = clean_sequence().replace("DRGYDYEGF", "DMGMDMEMF");
        let report = evaluator(&tables).evaluate_sequence(&seq);
        assert!(report.manufacturing_risks().any(|m| m.contains("methionine")));
    }

    #[test]
    fn low_complexity_draws_a_warning() {
        let tables = DesignTables::default();
        let seq = "QV".repeat(60);
        let report = evaluator(&tables).evaluate_sequence(&seq);
        assert!(
            report
                .warnings()
                .any(|m| m.contains("Low sequence complexity"))
        );
    }

    #[test]
    fn leucine_rich_n_terminus_resembles_a_signal_peptide() {
        let tables = DesignTables::default();
        let mut seq = String::from("LLALLALLALLAALLAGGSS");
        seq.push_str(&clean_sequence()[20..]);
        let report = evaluator(&tables).evaluate_sequence(&seq);
        assert!(report.warnings().any(|m| m.contains("signal peptide")));
    }

    #[test]
    fn category_thresholds_match_the_documented_bands() {
        assert_eq!(FeasibilityCategory::from_score(0.95), FeasibilityCategory::Excellent);
        assert_eq!(FeasibilityCategory::from_score(0.9), FeasibilityCategory::Excellent);
        assert_eq!(FeasibilityCategory::from_score(0.85), FeasibilityCategory::Good);
        assert_eq!(FeasibilityCategory::from_score(0.75), FeasibilityCategory::Moderate);
        assert_eq!(FeasibilityCategory::from_score(0.65), FeasibilityCategory::Marginal);
        assert_eq!(FeasibilityCategory::from_score(0.2), FeasibilityCategory::Poor);
    }

    #[test]
    fn recommendations_always_end_with_the_fixed_validation_steps() {
        let tables = DesignTables::default();
        let report = evaluator(&tables).evaluate_sequence(&clean_sequence());
        let n = report.recommendations.len();
        assert!(n >= 3);
        assert_eq!(
            report.recommendations[n - 2],
            "Validate binding with computational docking"
        );
        assert_eq!(
            report.recommendations[n - 1],
            "Test expression in mammalian system (HEK293 or CHO)"
        );
    }

    #[test]
    fn degradation_scan_reports_the_first_site() {
        assert_eq!(
            degradation_risk("AANGAA"),
            Some("Deamidation risk at position 2".to_string())
        );
        assert_eq!(
            degradation_risk("AADGAA"),
            Some("Isomerization risk at position 2".to_string())
        );
        assert_eq!(degradation_risk("AAAA"), None);
    }

    #[test]
    fn dimer_complexity_spans_repeats_to_diversity() {
        assert!(dimer_complexity(&"QV".repeat(30)) < 0.1);
        assert_eq!(dimer_complexity("A"), 0.0);
        let diverse = "ACDEFGHIKLMNPQRSTVWY";
        assert_eq!(dimer_complexity(diverse), 1.0);
    }
}
