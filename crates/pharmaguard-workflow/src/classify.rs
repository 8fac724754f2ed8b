//! Display metadata for server-assigned phenotype codes and risk labels.
//!
//! Both mappings are total: anything outside the closed vocabularies,
//! including an absent value, lands on a neutral "Unknown" entry.

/// Theme colour tokens; `css_var` gives the stylesheet variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorToken {
    RiskSafe,
    RiskCaution,
    RiskToxic,
    Teal,
    PurpleAi,
    TextMuted,
}

impl ColorToken {
    pub fn css_var(&self) -> &'static str {
        match self {
            ColorToken::RiskSafe    => "var(--risk-safe)",
            ColorToken::RiskCaution => "var(--risk-caution)",
            ColorToken::RiskToxic   => "var(--risk-toxic)",
            ColorToken::Teal        => "var(--teal)",
            ColorToken::PurpleAi    => "var(--purple-ai)",
            ColorToken::TextMuted   => "var(--text-muted)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlowToken {
    None,
    SafeDim,
    CautionDim,
    ToxicDim,
}

impl GlowToken {
    pub fn css_value(&self) -> &'static str {
        match self {
            GlowToken::None       => "none",
            GlowToken::SafeDim    => "var(--risk-safe-dim)",
            GlowToken::CautionDim => "var(--risk-caution-dim)",
            GlowToken::ToxicDim   => "var(--risk-toxic-dim)",
        }
    }
}

// ── Phenotype ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhenotypeCode {
    Poor,
    Intermediate,
    Normal,
    Rapid,
    UltraRapid,
    Unknown,
}

impl PhenotypeCode {
    /// Exact, case-sensitive match on the server code.
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some("PM") => PhenotypeCode::Poor,
            Some("IM") => PhenotypeCode::Intermediate,
            Some("NM") => PhenotypeCode::Normal,
            Some("RM") => PhenotypeCode::Rapid,
            Some("UM") => PhenotypeCode::UltraRapid,
            _ => PhenotypeCode::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhenotypeMeta {
    pub label: &'static str,
    pub color: ColorToken,
    pub icon: &'static str,
}

pub fn phenotype_meta(code: Option<&str>) -> PhenotypeMeta {
    let (label, color, icon) = match PhenotypeCode::from_code(code) {
        PhenotypeCode::Poor         => ("Poor Metabolizer", ColorToken::RiskToxic, "⚠"),
        PhenotypeCode::Intermediate => ("Intermediate", ColorToken::RiskCaution, "⚡"),
        PhenotypeCode::Normal       => ("Normal Metabolizer", ColorToken::RiskSafe, "✓"),
        PhenotypeCode::Rapid        => ("Rapid Metabolizer", ColorToken::Teal, "→"),
        PhenotypeCode::UltraRapid   => ("Ultra-Rapid", ColorToken::PurpleAi, "↑↑"),
        PhenotypeCode::Unknown      => ("Unknown", ColorToken::TextMuted, "?"),
    };
    PhenotypeMeta { label, color, icon }
}

// ── Risk ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskLabel {
    Safe,
    AdjustDosage,
    Toxic,
    Ineffective,
    Unknown,
}

impl RiskLabel {
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            Some("Safe") => RiskLabel::Safe,
            Some("Adjust Dosage") => RiskLabel::AdjustDosage,
            Some("Toxic") => RiskLabel::Toxic,
            Some("Ineffective") => RiskLabel::Ineffective,
            _ => RiskLabel::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskMeta {
    pub color: ColorToken,
    pub glow: GlowToken,
}

pub fn risk_meta(label: Option<&str>) -> RiskMeta {
    let (color, glow) = match RiskLabel::from_label(label) {
        RiskLabel::Safe => (ColorToken::RiskSafe, GlowToken::SafeDim),
        RiskLabel::AdjustDosage => (ColorToken::RiskCaution, GlowToken::CautionDim),
        RiskLabel::Toxic | RiskLabel::Ineffective => (ColorToken::RiskToxic, GlowToken::ToxicDim),
        RiskLabel::Unknown => (ColorToken::TextMuted, GlowToken::None),
    };
    RiskMeta { color, glow }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phenotype_meta_known_codes() {
        assert_eq!(phenotype_meta(Some("PM")).label, "Poor Metabolizer");
        assert_eq!(phenotype_meta(Some("IM")).color, ColorToken::RiskCaution);
        assert_eq!(phenotype_meta(Some("NM")).icon, "✓");
        assert_eq!(phenotype_meta(Some("RM")).color.css_var(), "var(--teal)");
        assert_eq!(phenotype_meta(Some("UM")).icon, "↑↑");
    }

    #[test]
    fn test_phenotype_meta_is_total() {
        let unknown = phenotype_meta(None);
        assert_eq!(unknown.label, "Unknown");
        assert_eq!(unknown.color, ColorToken::TextMuted);
        assert_eq!(unknown.icon, "?");

        for odd in ["", "nm", "Normal", "XM", "Unknown", "PM "] {
            assert_eq!(phenotype_meta(Some(odd)), unknown, "code {odd:?}");
        }
    }

    #[test]
    fn test_unrecognized_phenotype_never_reads_as_normal() {
        assert_ne!(phenotype_meta(Some("nm")).label, "Normal Metabolizer");
    }

    #[test]
    fn test_risk_meta_toxic_and_ineffective_share_styling() {
        assert_eq!(risk_meta(Some("Toxic")), risk_meta(Some("Ineffective")));
        assert_eq!(risk_meta(Some("Toxic")).glow.css_value(), "var(--risk-toxic-dim)");
    }

    #[test]
    fn test_risk_meta_known_labels() {
        assert_eq!(
            risk_meta(Some("Safe")),
            RiskMeta { color: ColorToken::RiskSafe, glow: GlowToken::SafeDim }
        );
        assert_eq!(
            risk_meta(Some("Adjust Dosage")),
            RiskMeta { color: ColorToken::RiskCaution, glow: GlowToken::CautionDim }
        );
    }

    #[test]
    fn test_risk_meta_is_total() {
        let neutral = RiskMeta { color: ColorToken::TextMuted, glow: GlowToken::None };
        assert_eq!(risk_meta(None), neutral);
        for odd in ["", "safe", "Adjust dosage", "Lethal"] {
            assert_eq!(risk_meta(Some(odd)), neutral, "label {odd:?}");
        }
        assert_eq!(neutral.glow.css_value(), "none");
    }
}
