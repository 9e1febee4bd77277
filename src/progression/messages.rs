//! Participant-facing message text

use crate::program::{Application, TOTAL_STAGES};

fn feedback_line(feedback: &str, fallback: &str) -> String {
    let text = if feedback.trim().is_empty() {
        fallback
    } else {
        feedback.trim()
    };
    format!("*Feedback:* _\"{}\"_", text)
}

pub fn advanced(app: &Application, feedback: &str, score: Option<u8>) -> String {
    let score_line = score
        .map(|s| format!("*Audit score:* {}/100\n", s))
        .unwrap_or_default();
    format!(
        "*Congratulations {}!* Your submission was accepted.\n\
         You have advanced to *Stage {}* of {} ({}% complete).\n{}{}",
        app.first_name,
        app.current_stage,
        TOTAL_STAGES,
        app.progress,
        score_line,
        feedback_line(feedback, "Keep up the great momentum!")
    )
}

pub fn completed(app: &Application, feedback: &str, certificate_issued: bool) -> String {
    let mut text = format!(
        "*CONGRATULATIONS {}!* Your final project was approved. You have officially completed the {} program!\n{}",
        app.first_name,
        app.track,
        feedback_line(feedback, "Outstanding work on your final project!")
    );
    if certificate_issued {
        text.push_str("\n\n*Premium benefit:* your verified certificate has been generated and sent to your email.");
    } else if !app.tier.is_paid() {
        text.push_str("\n\nYou've completed the Free track! Upgrade in the next cohort to earn a verified certificate.");
    }
    text
}

pub fn needs_revision(app: &Application, stage: u8, feedback: &str, score: Option<u8>) -> String {
    let score_line = score
        .map(|s| format!("*Audit score:* {}/100\n", s))
        .unwrap_or_default();
    format!(
        "*Revision required, {}:* your Stage {} submission needs some tweaks.\n{}{}\nResubmit whenever you're ready.",
        app.first_name,
        stage,
        score_line,
        feedback_line(feedback, "Please review the stage requirements.")
    )
}

pub fn rejected(app: &Application, stage: u8, feedback: &str) -> String {
    format!(
        "*{}, your Stage {} submission was not accepted.*\n{}\nYou can submit a new link for this stage.",
        app.first_name,
        stage,
        feedback_line(feedback, "Please review the stage requirements.")
    )
}

pub fn queued(app: &Application, stage: u8, warning: Option<&str>) -> String {
    let mut text = format!(
        "Thanks {}! Your Stage {} submission was received and is queued for mentor review.",
        app.first_name, stage
    );
    if let Some(warning) = warning {
        text.push_str(&format!("\n*Note:* {}", warning));
    }
    text
}

pub fn accepted_without_advance(app: &Application, stage: u8, feedback: &str) -> String {
    format!(
        "Your Stage {} submission was marked accepted. You are currently on Stage {}.\n{}",
        stage,
        app.current_stage,
        feedback_line(feedback, "Nice work.")
    )
}

pub fn system_error() -> String {
    "Something went wrong while processing your submission. Nothing was saved; please try again in a few minutes.".to_string()
}
