//! Trial transcript assembly for adjudication.
//!
//! The transcript is a deterministic function of the case and the recorded
//! submissions: same inputs, same text. Evidence and witness lists render
//! only in the evidence stage.

use std::fmt::Write;

use crate::domains::cases::Case;

use super::models::StageSubmission;
use super::stage::{ArgumentStage, Side};

fn side_label(side: Side) -> &'static str {
    match side {
        Side::Prosecution => "PROSECUTION",
        Side::Defense => "DEFENSE",
    }
}

fn push_arguments(out: &mut String, submissions: &[&StageSubmission]) {
    for sub in submissions {
        let _ = write!(out, "\n**{}:**\n{}\n", side_label(sub.side), sub.argument_text);
    }
}

fn push_list(out: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = write!(out, "\n{}:\n", heading);
    for item in items {
        let _ = writeln!(out, "- {}", item);
    }
}

/// Render the full trial transcript handed to the judge.
pub fn build_transcript(
    case: &Case,
    prosecution_wallet: &str,
    defense_wallet: &str,
    submissions: &[StageSubmission],
) -> String {
    let for_stage = |stage: ArgumentStage| -> Vec<&StageSubmission> {
        submissions.iter().filter(|s| s.stage == stage).collect()
    };

    let mut out = String::new();
    let _ = write!(
        out,
        "\n## CASE: {}\n\n### Case Description\n{}\n\n### Prosecution Brief\n{}\n\n### Defense Brief\n{}\n\n---\n\n## TRIAL PROCEEDINGS\n\n### Prosecution Attorney: {}\n### Defense Attorney: {}\n\n---\n\n### STAGE 1: Initial Arguments\n",
        case.title,
        case.description,
        case.prosecution_brief,
        case.defense_brief,
        prosecution_wallet,
        defense_wallet,
    );

    push_arguments(&mut out, &for_stage(ArgumentStage::InitialArguments));

    out.push_str("\n---\n\n### STAGE 2: Evidence & Witnesses\n");
    for sub in for_stage(ArgumentStage::EvidencesWitnesses) {
        let _ = write!(out, "\n**{}:**\n{}\n", side_label(sub.side), sub.argument_text);
        if let Some(evidences) = &sub.selected_evidences {
            push_list(&mut out, "Evidence Presented", evidences);
        }
        if let Some(witnesses) = &sub.selected_witnesses {
            push_list(&mut out, "Witnesses Called", witnesses);
        }
    }

    out.push_str("\n---\n\n### STAGE 3: Final Arguments\n");
    push_arguments(&mut out, &for_stage(ArgumentStage::FinalArguments));

    out
}
