//! Canned VCF uploads and backend responses.

use pharmaguard_common::{AnalysisResult, CandidateFile};
use serde_json::{json, Value};

pub const SAMPLE_VCF: &str = "\
##fileformat=VCFv4.2
##source=pharmaguard-fixture
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO
chr10\t94781859\trs4244285\tG\tA\t.\tPASS\tGENE=CYP2C19;STAR=*2
chr16\t31096368\trs9923231\tC\tT\t.\tPASS\tGENE=VKORC1
";

pub fn sample_vcf() -> CandidateFile {
    CandidateFile::from_bytes("patient.vcf", SAMPLE_VCF.as_bytes().to_vec())
}

/// One fully populated result, as the backend sends it for a single drug.
pub fn clopidogrel_json() -> Value {
    json!({
        "patient_id": "PATIENT_001",
        "drug": "CLOPIDOGREL",
        "timestamp": "2026-02-19T10:00:00Z",
        "pharmacogenomic_profile": {
            "primary_gene": "CYP2C19",
            "diplotype": "*2/*2",
            "activity_score": 0,
            "phenotype": "PM",
            "detected_variants": [{"rsid": "rs4244285"}]
        },
        "risk_assessment": {"risk_label": "Ineffective", "severity": 0.85, "confidence_score": 0.9},
        "clinical_recommendation": {"text": "Consider prasugrel or ticagrelor."},
        "llm_generated_explanation": {
            "summary": "CYP2C19 poor metabolizers form little active metabolite.",
            "mechanism": "Prodrug activation requires CYP2C19."
        },
        "drug_level_interpretation": "Reduced antiplatelet effect expected.",
        "quality_metrics": {"vcf_parsing_success": true}
    })
}

pub fn warfarin_json() -> Value {
    json!({
        "patient_id": "PATIENT_001",
        "drug": "WARFARIN",
        "pharmacogenomic_profile": {
            "primary_gene": "CYP2C9",
            "diplotype": "*1/*3",
            "activity_score": 1.5,
            "phenotype": "IM"
        },
        "risk_assessment": {"risk_label": "Adjust Dosage", "severity": 0.5},
        "clinical_recommendation": {"text": "Reduce the starting dose."}
    })
}

/// Array response for a WARFARIN + CLOPIDOGREL request, in that order.
pub fn two_drug_json() -> Value {
    json!([warfarin_json(), clopidogrel_json()])
}

pub fn two_drug_results() -> Vec<AnalysisResult> {
    decode(two_drug_json())
}

/// A FastAPI-style 422 body.
pub fn validation_detail() -> Value {
    json!([
        {"loc": ["body", "file"], "msg": "Invalid VCF header", "type": "value_error"}
    ])
}

fn decode(value: Value) -> Vec<AnalysisResult> {
    match serde_json::from_value(value) {
        Ok(results) => results,
        Err(e) => panic!("fixture does not decode: {e}"),
    }
}
