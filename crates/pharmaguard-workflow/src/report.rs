//! View-model for the results screen: stats bar, expandable per-result cards
//! and the raw JSON panel.

use chrono::{DateTime, Local, TimeZone};
use pharmaguard_common::AnalysisResult;
use serde_json::Value;
use std::fmt::Display;

use crate::classify::{phenotype_meta, risk_meta, PhenotypeMeta, RiskMeta};
use crate::results::{ResultSet, Stats};

const UNKNOWN: &str = "Unknown";
const MISSING: &str = "—";
const NO_RECOMMENDATION: &str = "No recommendation available.";
const NO_SUMMARY: &str = "No summary available.";
const NO_INTERPRETATION: &str = "No interpretation available.";

/// An empty result set gets its own variant so nothing downstream can reach
/// the per-result views without data.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultsView {
    Empty,
    Report(ReportView),
}

impl ResultsView {
    pub fn from_results(results: ResultSet) -> Self {
        if results.is_empty() {
            ResultsView::Empty
        } else {
            ResultsView::Report(ReportView {
                results,
                expanded: None,
                show_json: false,
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportView {
    results: ResultSet,
    expanded: Option<usize>,
    show_json: bool,
}

impl ReportView {
    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    pub fn stats(&self) -> Stats {
        self.results.stats()
    }

    /// Drug names in result order, for the header.
    pub fn drugs(&self) -> Vec<&str> {
        self.results.iter().map(|r| r.drug()).collect()
    }

    pub fn expanded(&self) -> Option<usize> {
        self.expanded
    }

    /// Expand card `index`, or collapse it if it is already open. Only one
    /// card is open at a time. Returns false for an out-of-range index.
    pub fn toggle_expanded(&mut self, index: usize) -> bool {
        if index >= self.results.len() {
            return false;
        }
        self.expanded = if self.expanded == Some(index) { None } else { Some(index) };
        true
    }

    pub fn show_json(&self) -> bool {
        self.show_json
    }

    pub fn toggle_json(&mut self) {
        self.show_json = !self.show_json;
    }

    /// The full result set, pretty-printed.
    pub fn json_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.results)
    }

    pub fn cards(&self) -> Vec<ResultCard<'_>> {
        self.results
            .iter()
            .enumerate()
            .map(|(i, r)| ResultCard::new(i, r, self.expanded == Some(i)))
            .collect()
    }
}

/// Everything one result card shows, with display fallbacks already applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultCard<'a> {
    pub index: usize,
    pub expanded: bool,
    pub drug: &'a str,
    pub patient_id: Option<&'a str>,
    pub timestamp: Option<String>,
    pub risk_label: &'a str,
    pub risk: RiskMeta,
    pub phenotype_code: &'a str,
    pub phenotype: PhenotypeMeta,
    pub primary_gene: &'a str,
    pub diplotype: &'a str,
    pub activity_score: String,
    pub severity: Option<f64>,
    pub decision_trace: Option<&'a Value>,
    pub recommendation: &'a str,
    pub summary: &'a str,
    /// Mechanism, evidence and citations as pretty JSON (`{}` when absent).
    pub explanation_json: String,
    pub interpretation: &'a str,
    /// The result document as the backend sent it.
    pub raw: &'a AnalysisResult,
}

impl<'a> ResultCard<'a> {
    fn new(index: usize, r: &'a AnalysisResult, expanded: bool) -> Self {
        let profile = r.pharmacogenomic_profile();
        let explanation = r.llm_generated_explanation();

        Self {
            index,
            expanded,
            drug: r.drug(),
            patient_id: r.patient_id(),
            timestamp: r.timestamp().map(|ts| format_timestamp(ts, &Local)),
            risk_label: r.risk_label().unwrap_or(UNKNOWN),
            risk: risk_meta(r.risk_label()),
            phenotype_code: r.phenotype().unwrap_or(UNKNOWN),
            phenotype: phenotype_meta(r.phenotype()),
            primary_gene: non_empty(profile.and_then(|p| p.primary_gene.as_deref()), MISSING),
            diplotype: non_empty(profile.and_then(|p| p.diplotype.as_deref()), MISSING),
            activity_score: profile
                .and_then(|p| p.activity_score.as_ref())
                .map(|n| n.to_string())
                .unwrap_or_else(|| MISSING.to_string()),
            severity: r.severity(),
            decision_trace: profile.and_then(|p| p.decision_trace.as_ref()),
            recommendation: non_empty(
                r.clinical_recommendation().and_then(|c| c.text.as_deref()),
                NO_RECOMMENDATION,
            ),
            summary: non_empty(explanation.and_then(|e| e.summary.as_deref()), NO_SUMMARY),
            explanation_json: r
                .member("llm_generated_explanation")
                .and_then(|e| serde_json::to_string_pretty(e).ok())
                .unwrap_or_else(|| "{}".to_string()),
            interpretation: non_empty(r.drug_level_interpretation(), NO_INTERPRETATION),
            raw: r,
        }
    }

    /// This result's own document, pretty-printed.
    pub fn raw_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self.raw)
    }
}

fn non_empty<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    value.filter(|v| !v.is_empty()).unwrap_or(fallback)
}

/// RFC 3339 timestamps are shown in `tz`; anything else is shown as sent.
pub fn format_timestamp<Tz>(raw: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(tz).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ColorToken;
    use chrono::Utc;
    use serde_json::json;

    fn set(raw: Value) -> ResultSet {
        ResultSet::new(serde_json::from_value(raw).unwrap())
    }

    fn report(raw: Value) -> ReportView {
        match ResultsView::from_results(set(raw)) {
            ResultsView::Report(view) => view,
            ResultsView::Empty => panic!("expected a populated report"),
        }
    }

    #[test]
    fn test_empty_results_give_empty_view() {
        assert_eq!(ResultsView::from_results(ResultSet::default()), ResultsView::Empty);
    }

    #[test]
    fn test_minimal_card_uses_fallbacks() {
        let view = report(json!([{"drug": "CODEINE"}]));
        let card = &view.cards()[0];
        assert_eq!(card.drug, "CODEINE");
        assert_eq!(card.risk_label, "Unknown");
        assert_eq!(card.risk.color, ColorToken::TextMuted);
        assert_eq!(card.phenotype_code, "Unknown");
        assert_eq!(card.phenotype.label, "Unknown");
        assert_eq!(card.primary_gene, "—");
        assert_eq!(card.diplotype, "—");
        assert_eq!(card.activity_score, "—");
        assert_eq!(card.recommendation, "No recommendation available.");
        assert_eq!(card.summary, "No summary available.");
        assert_eq!(card.interpretation, "No interpretation available.");
        assert_eq!(card.explanation_json, "{}");
        assert!(card.timestamp.is_none());
        assert!(card.decision_trace.is_none());
    }

    #[test]
    fn test_full_card_passes_values_through() {
        let view = report(json!([{
            "drug": "CLOPIDOGREL",
            "patient_id": "PATIENT_042",
            "pharmacogenomic_profile": {
                "primary_gene": "CYP2C19", "diplotype": "*2/*2",
                "activity_score": 0, "phenotype": "PM",
                "decision_trace": {"steps": 3}
            },
            "risk_assessment": {"risk_label": "Ineffective", "severity": 0.9},
            "clinical_recommendation": {"text": "Use prasugrel"},
            "llm_generated_explanation": {"summary": "Loss of function"},
            "drug_level_interpretation": "No active metabolite"
        }]));
        let card = &view.cards()[0];
        assert_eq!(card.patient_id, Some("PATIENT_042"));
        assert_eq!(card.risk_label, "Ineffective");
        assert_eq!(card.risk.color, ColorToken::RiskToxic);
        assert_eq!(card.phenotype.label, "Poor Metabolizer");
        assert_eq!(card.primary_gene, "CYP2C19");
        assert_eq!(card.activity_score, "0");
        assert_eq!(card.severity, Some(0.9));
        assert_eq!(card.decision_trace, Some(&json!({"steps": 3})));
        assert_eq!(card.recommendation, "Use prasugrel");
        assert_eq!(card.summary, "Loss of function");
        assert!(card.explanation_json.contains("\"summary\": \"Loss of function\""));
    }

    #[test]
    fn test_only_one_card_expanded_at_a_time() {
        let mut view = report(json!([{"drug": "A"}, {"drug": "B"}]));
        assert!(view.toggle_expanded(0));
        assert!(view.toggle_expanded(1));
        assert_eq!(view.expanded(), Some(1));
        let cards = view.cards();
        assert!(!cards[0].expanded && cards[1].expanded);

        assert!(view.toggle_expanded(1));
        assert_eq!(view.expanded(), None);
        assert!(!view.toggle_expanded(2));
    }

    #[test]
    fn test_header_drugs_and_stats_follow_result_order() {
        let view = report(json!([
            {"drug": "WARFARIN", "risk_assessment": {"risk_label": "Safe"}},
            {"drug": "CODEINE", "risk_assessment": {"risk_label": "Toxic"}}
        ]));
        assert_eq!(view.drugs(), ["WARFARIN", "CODEINE"]);
        assert_eq!(view.stats().total, 2);
        assert_eq!(view.stats().toxic_or_ineffective_count, 1);
    }

    #[test]
    fn test_json_toggle_and_text() {
        let mut view = report(json!([{"drug": "WARFARIN"}]));
        assert!(!view.show_json());
        view.toggle_json();
        assert!(view.show_json());
        let text = view.json_text().unwrap();
        assert_eq!(serde_json::from_str::<Value>(&text).unwrap(), json!([{"drug": "WARFARIN"}]));
    }

    #[test]
    fn test_card_raw_json_is_the_received_document() {
        let view = report(json!([
            {"drug": "A"},
            {"zeta": 1, "drug": "B", "patient_id": null}
        ]));
        let cards = view.cards();
        assert_eq!(
            cards[1].raw_json().unwrap(),
            "{\n  \"zeta\": 1,\n  \"drug\": \"B\",\n  \"patient_id\": null\n}"
        );
        assert_eq!(cards[1].patient_id, None);
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp("2026-01-05T10:00:00+02:00", &Utc), "2026-01-05 08:00:00");
        assert_eq!(format_timestamp("yesterday", &Utc), "yesterday");
    }
}
