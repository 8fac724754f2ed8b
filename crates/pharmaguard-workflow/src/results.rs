//! Canonical result set and the summary counts derived from it.

use pharmaguard_common::{AnalysisPayload, AnalysisResult};
use serde::Serialize;
use std::sync::Arc;

use crate::classify::RiskLabel;

/// Coerce the backend's single-or-array response into an ordered list.
/// This is the only place that knows about the two shapes.
pub fn normalize(payload: AnalysisPayload) -> Vec<AnalysisResult> {
    match payload {
        AnalysisPayload::Many(results) => results,
        AnalysisPayload::One(result) => vec![*result],
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub safe_count: usize,
    pub adjust_count: usize,
    pub toxic_or_ineffective_count: usize,
}

/// Results with a missing or unrecognized label only count toward `total`.
pub fn compute_stats(results: &[AnalysisResult]) -> Stats {
    results.iter().fold(
        Stats { total: results.len(), ..Stats::default() },
        |mut stats, r| {
            match RiskLabel::from_label(r.risk_label()) {
                RiskLabel::Safe => stats.safe_count += 1,
                RiskLabel::AdjustDosage => stats.adjust_count += 1,
                RiskLabel::Toxic | RiskLabel::Ineffective => stats.toxic_or_ineffective_count += 1,
                RiskLabel::Unknown => {}
            }
            stats
        },
    )
}

/// Immutable, backend-ordered results of one analysis. Clones share storage;
/// callers that need to edit must copy out with [`ResultSet::to_vec`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    results: Arc<[AnalysisResult]>,
}

impl Default for ResultSet {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ResultSet {
    pub fn new(results: Vec<AnalysisResult>) -> Self {
        Self { results: results.into() }
    }

    pub fn from_payload(payload: AnalysisPayload) -> Self {
        Self::new(normalize(payload))
    }

    pub fn as_slice(&self) -> &[AnalysisResult] {
        &self.results
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AnalysisResult> {
        self.results.iter()
    }

    pub fn get(&self, index: usize) -> Option<&AnalysisResult> {
        self.results.get(index)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Derived on every call; never cached.
    pub fn stats(&self) -> Stats {
        compute_stats(&self.results)
    }

    pub fn to_vec(&self) -> Vec<AnalysisResult> {
        self.results.to_vec()
    }
}

impl Serialize for ResultSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_slice().serialize(serializer)
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a AnalysisResult;
    type IntoIter = std::slice::Iter<'a, AnalysisResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn result(drug: &str, label: Option<&str>) -> AnalysisResult {
        let mut raw = json!({"drug": drug});
        if let Some(label) = label {
            raw["risk_assessment"] = json!({"risk_label": label});
        }
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn test_normalize_single_and_wrapped_are_equal() {
        let r = result("WARFARIN", Some("Safe"));
        let single = normalize(AnalysisPayload::One(Box::new(r.clone())));
        let wrapped = normalize(AnalysisPayload::Many(vec![r]));
        assert_eq!(single, wrapped);
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn test_normalize_preserves_order() {
        let list = vec![
            result("WARFARIN", Some("Toxic")),
            result("CODEINE", Some("Safe")),
            result("CLOPIDOGREL", None),
        ];
        let drugs: Vec<_> = normalize(AnalysisPayload::Many(list))
            .into_iter()
            .map(|r| r.drug().to_string())
            .collect();
        assert_eq!(drugs, ["WARFARIN", "CODEINE", "CLOPIDOGREL"]);
    }

    #[test]
    fn test_stats_of_empty_list() {
        assert_eq!(compute_stats(&[]), Stats::default());
        assert_eq!(ResultSet::default().stats().total, 0);
    }

    #[test]
    fn test_stats_one_per_category() {
        let list = vec![
            result("A", Some("Safe")),
            result("B", Some("Adjust Dosage")),
            result("C", Some("Toxic")),
            result("D", Some("Ineffective")),
            result("E", None),
        ];
        assert_eq!(
            compute_stats(&list),
            Stats { total: 5, safe_count: 1, adjust_count: 1, toxic_or_ineffective_count: 2 }
        );
    }

    #[test]
    fn test_unrecognized_label_counts_only_toward_total() {
        let list = vec![result("A", Some("Lethal")), result("B", Some("safe"))];
        assert_eq!(compute_stats(&list), Stats { total: 2, ..Stats::default() });
    }

    #[test]
    fn test_clones_share_storage() {
        let set = ResultSet::new(vec![result("A", Some("Safe"))]);
        let view = set.clone();
        assert!(Arc::ptr_eq(&set.results, &view.results));

        let mut edited = view.to_vec();
        edited.push(result("B", None));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(0).unwrap().drug(), "A");
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let set = ResultSet::new(vec![result("A", None), result("B", None)]);
        assert_eq!(
            serde_json::to_value(&set).unwrap(),
            json!([{"drug": "A"}, {"drug": "B"}])
        );
    }
}
