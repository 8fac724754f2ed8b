//! Input collection: one staged VCF plus an ordered set of drugs.

use pharmaguard_common::{CandidateFile, Drug};

use crate::error::{MissingInput, ValidationError};

/// Upload limit enforced before submission (5 MiB).
pub const MAX_VCF_BYTES: u64 = 5 * 1024 * 1024;

const VCF_EXTENSION: &str = ".vcf";

/// A validated submission. Only `InputCollector::submit` creates one, and the
/// orchestrator consumes it by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCandidate {
    file: CandidateFile,
    drugs: Vec<Drug>,
}

impl UploadCandidate {
    pub fn file(&self) -> &CandidateFile {
        &self.file
    }

    /// Drugs in the order they were selected.
    pub fn drugs(&self) -> &[Drug] {
        &self.drugs
    }
}

#[derive(Debug, Default)]
pub struct InputCollector {
    file: Option<CandidateFile>,
    drugs: Vec<Drug>,
}

impl InputCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage `file`, replacing any previous one. A rejected file leaves the
    /// current selection untouched.
    pub fn select_file(&mut self, file: CandidateFile) -> Result<(), ValidationError> {
        validate_file(&file)?;
        tracing::debug!(name = file.name(), size = file.size(), "VCF staged");
        self.file = Some(file);
        Ok(())
    }

    pub fn clear_file(&mut self) {
        self.file = None;
    }

    /// Add the drug if absent, remove it if present. `code` is trimmed and
    /// matched case-insensitively.
    pub fn toggle_drug(&mut self, code: &str) -> Result<(), ValidationError> {
        let drug = parse_drug(code)?;
        if self.drugs.contains(&drug) {
            self.remove_drug(drug);
        } else {
            self.drugs.push(drug);
        }
        Ok(())
    }

    /// Select the drug; naming one that is already selected changes nothing.
    pub fn add_drug(&mut self, code: &str) -> Result<(), ValidationError> {
        let drug = parse_drug(code)?;
        if !self.drugs.contains(&drug) {
            self.drugs.push(drug);
        }
        Ok(())
    }

    pub fn remove_drug(&mut self, drug: Drug) {
        self.drugs.retain(|d| *d != drug);
    }

    pub fn staged_file(&self) -> Option<&CandidateFile> {
        self.file.as_ref()
    }

    pub fn selected_drugs(&self) -> &[Drug] {
        &self.drugs
    }

    pub fn can_submit(&self) -> bool {
        self.file.is_some() && !self.drugs.is_empty()
    }

    /// Hand out the staged input and reset the collector. A missing file is
    /// reported before a missing drug.
    pub fn submit(&mut self) -> Result<UploadCandidate, ValidationError> {
        let Some(file) = self.file.take() else {
            return Err(ValidationError::IncompleteInput(MissingInput::File));
        };
        if self.drugs.is_empty() {
            self.file = Some(file);
            return Err(ValidationError::IncompleteInput(MissingInput::Drug));
        }
        Ok(UploadCandidate {
            file,
            drugs: std::mem::take(&mut self.drugs),
        })
    }
}

fn parse_drug(code: &str) -> Result<Drug, ValidationError> {
    code.parse::<Drug>()
        .map_err(|e| ValidationError::UnsupportedDrug { code: e.code })
}

fn validate_file(file: &CandidateFile) -> Result<(), ValidationError> {
    if !file.name().ends_with(VCF_EXTENSION) {
        return Err(ValidationError::UnsupportedExtension { name: file.name().to_string() });
    }
    if file.size() > MAX_VCF_BYTES {
        return Err(ValidationError::FileTooLarge { size: file.size(), limit: MAX_VCF_BYTES });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pharmaguard_common::SUPPORTED_DRUGS;

    fn vcf(name: &str, size: usize) -> CandidateFile {
        CandidateFile::from_bytes(name, vec![b'A'; size])
    }

    #[test]
    fn test_select_file_accepts_vcf_up_to_limit() {
        let mut input = InputCollector::new();
        input.select_file(vcf("patient.vcf", MAX_VCF_BYTES as usize)).unwrap();
        assert_eq!(input.staged_file().unwrap().name(), "patient.vcf");
    }

    #[test]
    fn test_select_file_extension_is_case_sensitive() {
        let mut input = InputCollector::new();
        for name in ["patient.VCF", "patient.vcf.gz", "patient.txt", "vcf"] {
            let err = input.select_file(vcf(name, 10)).unwrap_err();
            assert_eq!(err, ValidationError::UnsupportedExtension { name: name.to_string() });
        }
        assert!(input.staged_file().is_none());
    }

    #[test]
    fn test_select_file_too_large() {
        let mut input = InputCollector::new();
        let err = input.select_file(vcf("big.vcf", MAX_VCF_BYTES as usize + 1)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::FileTooLarge { size: MAX_VCF_BYTES + 1, limit: MAX_VCF_BYTES }
        );
        assert_eq!(err.to_string(), "VCF file exceeds 5 MB limit.");
    }

    #[test]
    fn test_rejected_file_keeps_previous_selection() {
        let mut input = InputCollector::new();
        input.select_file(vcf("first.vcf", 10)).unwrap();
        assert!(input.select_file(vcf("notes.txt", 10)).is_err());
        assert_eq!(input.staged_file().unwrap().name(), "first.vcf");

        input.select_file(vcf("second.vcf", 10)).unwrap();
        assert_eq!(input.staged_file().unwrap().name(), "second.vcf");
    }

    #[test]
    fn test_toggle_drug_twice_restores_membership() {
        let mut input = InputCollector::new();
        input.toggle_drug("WARFARIN").unwrap();
        assert_eq!(input.selected_drugs(), &[Drug::Warfarin]);
        input.toggle_drug("WARFARIN").unwrap();
        assert!(input.selected_drugs().is_empty());
    }

    #[test]
    fn test_toggle_drug_is_case_insensitive() {
        let mut input = InputCollector::new();
        input.toggle_drug(" warfarin ").unwrap();
        input.toggle_drug("WARFARIN").unwrap();
        assert!(input.selected_drugs().is_empty());
    }

    #[test]
    fn test_toggle_keeps_selection_order() {
        let mut input = InputCollector::new();
        input.toggle_drug("clopidogrel").unwrap();
        input.toggle_drug("codeine").unwrap();
        input.toggle_drug("Warfarin").unwrap();
        assert_eq!(
            input.selected_drugs(),
            &[Drug::Clopidogrel, Drug::Codeine, Drug::Warfarin]
        );
    }

    #[test]
    fn test_add_drug_ignores_repeats() {
        let mut input = InputCollector::new();
        for code in ["WARFARIN", "CLOPIDOGREL", "warfarin"] {
            input.add_drug(code).unwrap();
        }
        assert_eq!(input.selected_drugs(), &[Drug::Warfarin, Drug::Clopidogrel]);
        assert!(matches!(
            input.add_drug("aspirin"),
            Err(ValidationError::UnsupportedDrug { .. })
        ));
    }

    #[test]
    fn test_unsupported_drug_lists_vocabulary() {
        let mut input = InputCollector::new();
        let err = input.toggle_drug("ibuprofen").unwrap_err();
        assert_eq!(err, ValidationError::UnsupportedDrug { code: "IBUPROFEN".to_string() });
        let msg = err.to_string();
        for d in SUPPORTED_DRUGS {
            assert!(msg.contains(d.as_str()));
        }
        assert!(input.selected_drugs().is_empty());
    }

    #[test]
    fn test_can_submit_matrix() {
        let mut input = InputCollector::new();
        assert!(!input.can_submit());

        input.select_file(vcf("p.vcf", 1)).unwrap();
        assert!(!input.can_submit());

        input.clear_file();
        input.toggle_drug("CODEINE").unwrap();
        assert!(!input.can_submit());

        input.select_file(vcf("p.vcf", 1)).unwrap();
        assert!(input.can_submit());
    }

    #[test]
    fn test_submit_reports_missing_file_first() {
        let mut input = InputCollector::new();
        assert_eq!(
            input.submit().unwrap_err(),
            ValidationError::IncompleteInput(MissingInput::File)
        );

        input.select_file(vcf("p.vcf", 1)).unwrap();
        let err = input.submit().unwrap_err();
        assert_eq!(err, ValidationError::IncompleteInput(MissingInput::Drug));
        assert_eq!(err.to_string(), "Please select at least one drug.");
        // Failed submit leaves the staged file in place.
        assert!(input.staged_file().is_some());
    }

    #[test]
    fn test_submit_is_single_use() {
        let mut input = InputCollector::new();
        input.select_file(vcf("patient.vcf", 10 * 1024)).unwrap();
        input.toggle_drug("WARFARIN").unwrap();

        let candidate = input.submit().unwrap();
        assert_eq!(candidate.file().name(), "patient.vcf");
        assert_eq!(candidate.drugs(), &[Drug::Warfarin]);

        assert!(!input.can_submit());
        assert!(input.staged_file().is_none());
        assert!(input.selected_drugs().is_empty());
    }
}
