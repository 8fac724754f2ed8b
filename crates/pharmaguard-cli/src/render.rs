//! Terminal rendering of the progress line, the results report and the drug list.
//! Every function returns a `String`; printing is left to `main`.

use console::{style, Style};
use pharmaguard_common::SUPPORTED_DRUGS;
use pharmaguard_workflow::{
    progress::LAST_STAGE, ColorToken, ProgressSnapshot, ReportView, ResultCard, Stats, STAGES,
};
use std::fmt::Write;

fn palette(token: ColorToken) -> Style {
    match token {
        ColorToken::RiskSafe => Style::new().green(),
        ColorToken::RiskCaution => Style::new().yellow(),
        ColorToken::RiskToxic => Style::new().red(),
        ColorToken::Teal => Style::new().cyan(),
        ColorToken::PurpleAi => Style::new().magenta(),
        ColorToken::TextMuted => Style::new().dim(),
    }
}

// ── Progress ──

pub fn progress_message(snapshot: &ProgressSnapshot) -> String {
    format!(
        "[{}/{}] {} · {}",
        snapshot.step.min(LAST_STAGE) + 1,
        STAGES.len(),
        snapshot.stage_label(),
        style(snapshot.hint_label()).dim()
    )
}

// ── Report ──

pub fn stats_line(stats: &Stats) -> String {
    format!(
        "{} total   {} safe   {} adjust   {} toxic/ineffective",
        style(stats.total).bold(),
        palette(ColorToken::RiskSafe).apply_to(stats.safe_count),
        palette(ColorToken::RiskCaution).apply_to(stats.adjust_count),
        palette(ColorToken::RiskToxic).apply_to(stats.toxic_or_ineffective_count),
    )
}

pub fn card_summary(card: &ResultCard<'_>) -> String {
    let marker = if card.expanded { "▾" } else { "▸" };
    format!(
        "{marker} [{}] {:<13} {:<14} {} {:<20} {} {}",
        card.index + 1,
        style(card.drug).bold(),
        palette(card.risk.color).apply_to(card.risk_label),
        palette(card.phenotype.color).apply_to(card.phenotype.icon),
        palette(card.phenotype.color).apply_to(card.phenotype.label),
        card.primary_gene,
        card.diplotype,
    )
}

pub fn card_detail(card: &ResultCard<'_>) -> String {
    let mut out = String::new();
    let label = |s: &str| style(format!("{s:<16}")).dim().to_string();

    if let Some(patient) = card.patient_id {
        let _ = writeln!(out, "    {}{patient}", label("Patient"));
    }
    if let Some(ts) = &card.timestamp {
        let _ = writeln!(out, "    {}{ts}", label("Analyzed"));
    }
    let _ = writeln!(out, "    {}{} ({})", label("Phenotype"), card.phenotype.label, card.phenotype_code);
    let _ = writeln!(out, "    {}{}", label("Activity score"), card.activity_score);
    if let Some(severity) = card.severity {
        let _ = writeln!(out, "    {}{severity:.2}", label("Severity"));
    }
    let _ = writeln!(out, "    {}{}", label("Recommendation"), card.recommendation);
    let _ = writeln!(
        out,
        "    {}{}",
        label("Summary"),
        palette(ColorToken::PurpleAi).apply_to(card.summary)
    );
    let _ = writeln!(out, "    {}{}", label("Interpretation"), card.interpretation);
    let _ = writeln!(out, "    {}", label("Explanation"));
    for line in card.explanation_json.lines() {
        let _ = writeln!(out, "      {line}");
    }
    if let Some(trace) = card.decision_trace {
        let _ = writeln!(out, "    {}{trace}", label("Decision trace"));
    }
    let _ = writeln!(out, "    {}", label("Raw data"));
    match card.raw_json() {
        Ok(text) => {
            for line in text.lines() {
                let _ = writeln!(out, "      {}", style(line).dim());
            }
        }
        Err(e) => {
            let _ = writeln!(out, "      {}", style(format!("could not serialize result: {e}")).red());
        }
    }
    out
}

/// Header, stats, one line per card, details for expanded cards (or all of
/// them with `expand_all`) and the raw JSON when toggled on.
pub fn report(view: &ReportView, expand_all: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", style("Results for").bold(), view.drugs().join(", "));
    let _ = writeln!(out, "{}", stats_line(&view.stats()));
    let _ = writeln!(out);

    for card in view.cards() {
        let _ = writeln!(out, "{}", card_summary(&card));
        if expand_all || card.expanded {
            out.push_str(&card_detail(&card));
        }
    }

    if view.show_json() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", style("Raw JSON").bold());
        match view.json_text() {
            Ok(text) => out.push_str(&text),
            Err(e) => {
                let _ = write!(out, "{}", style(format!("could not serialize results: {e}")).red());
            }
        }
        let _ = writeln!(out);
    }
    out
}

// ── Drugs ──

pub fn drug_list() -> String {
    SUPPORTED_DRUGS
        .iter()
        .map(|d| format!("  {d}\n"))
        .collect()
}
