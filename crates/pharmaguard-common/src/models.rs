/// Wire types returned by the PharmaGuard analysis backend.
/// An `AnalysisResult` keeps the document exactly as received and serializes
/// it back unchanged: key order, explicit nulls and unknown fields included.
/// The typed accessors are a read-only view over that document.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

// ---------------------------------------------------------------------------
// Analysis result (one per patient/drug pair)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    fields: ResultFields,
    raw: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct ResultFields {
    drug: String,
    #[serde(default)]
    patient_id: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    pharmacogenomic_profile: Option<PharmacogenomicProfile>,
    #[serde(default)]
    risk_assessment: Option<RiskAssessment>,
    #[serde(default)]
    clinical_recommendation: Option<ClinicalRecommendation>,
    #[serde(default)]
    llm_generated_explanation: Option<LlmExplanation>,
    #[serde(default)]
    drug_level_interpretation: Option<String>,
}

impl TryFrom<Map<String, Value>> for AnalysisResult {
    type Error = serde_json::Error;

    fn try_from(raw: Map<String, Value>) -> Result<Self, Self::Error> {
        let fields = serde_json::from_value(Value::Object(raw.clone()))?;
        Ok(Self { fields, raw })
    }
}

impl<'de> Deserialize<'de> for AnalysisResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Map::<String, Value>::deserialize(deserializer)?;
        Self::try_from(raw).map_err(D::Error::custom)
    }
}

impl Serialize for AnalysisResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl AnalysisResult {
    pub fn drug(&self) -> &str {
        &self.fields.drug
    }

    pub fn patient_id(&self) -> Option<&str> {
        self.fields.patient_id.as_deref()
    }

    /// ISO-8601, kept as sent.
    pub fn timestamp(&self) -> Option<&str> {
        self.fields.timestamp.as_deref()
    }

    pub fn pharmacogenomic_profile(&self) -> Option<&PharmacogenomicProfile> {
        self.fields.pharmacogenomic_profile.as_ref()
    }

    pub fn risk_assessment(&self) -> Option<&RiskAssessment> {
        self.fields.risk_assessment.as_ref()
    }

    pub fn clinical_recommendation(&self) -> Option<&ClinicalRecommendation> {
        self.fields.clinical_recommendation.as_ref()
    }

    pub fn llm_generated_explanation(&self) -> Option<&LlmExplanation> {
        self.fields.llm_generated_explanation.as_ref()
    }

    pub fn drug_level_interpretation(&self) -> Option<&str> {
        self.fields.drug_level_interpretation.as_deref()
    }

    /// Server risk label exactly as received (e.g. `"Adjust Dosage"`).
    pub fn risk_label(&self) -> Option<&str> {
        self.risk_assessment()?.risk_label.as_deref()
    }

    /// Phenotype code exactly as received (e.g. `"PM"`).
    pub fn phenotype(&self) -> Option<&str> {
        self.pharmacogenomic_profile()?.phenotype.as_deref()
    }

    pub fn severity(&self) -> Option<f64> {
        self.risk_assessment()?.severity.as_ref()?.as_f64()
    }

    /// The received document. A key sent as `null` is present here.
    pub fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }

    /// A top-level member of the document, treating `null` as absent.
    pub fn member(&self, key: &str) -> Option<&Value> {
        self.raw.get(key).filter(|v| !v.is_null())
    }
}

// ---------------------------------------------------------------------------
// Nested records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PharmacogenomicProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_gene: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diplotype: Option<String>,
    /// `Number` rather than `f64` so integer scores stay integers on export.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_score: Option<Number>,
    /// PM | IM | NM | RM | UM; anything else is classified as unknown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phenotype: Option<String>,
    /// Opaque; passed through uninterpreted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_trace: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Safe | Adjust Dosage | Toxic | Ineffective
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Number>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClinicalRecommendation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmExplanation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Mechanism, evidence, citations, ...
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ---------------------------------------------------------------------------
// Response envelope
// ---------------------------------------------------------------------------

/// The analyze endpoint answers with a bare object for some requests and an
/// array for others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisPayload {
    Many(Vec<AnalysisResult>),
    One(Box<AnalysisResult>),
}
