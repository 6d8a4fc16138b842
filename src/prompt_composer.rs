//! Builds the analysis prompt sent to the generative model.
//!
//! Every optional input is rendered only when it carries text, so the prompt
//! shrinks to what is actually known about the shift and the care recipient.

use crate::prompts::{ANALYSIS_INSTRUCTIONS, ANALYSIS_PREAMBLE, PROFILE_FOCUS};
use crate::shift_notes::{
    present, CareRecipientProfile, ShiftContext, ShiftNote,
};

pub const PROFILE_HEADER: &str = "CARE RECIPIENT PROFILE:";
pub const NOTES_HEADER: &str = "SHIFT NOTES:";

/// Compose the full analysis prompt.
///
/// An empty `notes` slice still yields a well-formed prompt with an empty
/// notes block; short-circuiting that case is the analyzer's job.
pub fn compose(
    notes: &[ShiftNote],
    recipient_name: Option<&str>,
    context: Option<&ShiftContext>,
    profile: Option<&CareRecipientProfile>,
) -> String {
    let context_block = render_context(recipient_name, context);
    let profile_block = profile.map(render_profile).unwrap_or_default();
    let profile_focus = if profile_block.is_empty() {
        ""
    } else {
        PROFILE_FOCUS
    };

    let mut prompt = String::new();
    prompt.push_str(ANALYSIS_PREAMBLE);
    prompt.push_str("\n\n");
    for block in [&context_block, &profile_block] {
        if !block.is_empty() {
            prompt.push_str(block);
            prompt.push('\n');
        }
    }
    prompt.push_str(NOTES_HEADER);
    prompt.push('\n');
    prompt.push_str(&render_notes(notes));
    prompt.push('\n');
    prompt.push_str(
        &ANALYSIS_INSTRUCTIONS.replace("{profile_focus}", profile_focus),
    );
    prompt
}

/// One numbered line per note, in the order given.
pub fn render_notes(notes: &[ShiftNote]) -> String {
    notes
        .iter()
        .enumerate()
        .map(|(i, note)| {
            format!(
                "{}. [{} at {}]: {}\n",
                i + 1,
                note.caregiver_name,
                note.timestamp,
                note.content
            )
        })
        .collect()
}

// The day number is accepted in the context but deliberately left out here.
fn render_context(
    recipient_name: Option<&str>,
    context: Option<&ShiftContext>,
) -> String {
    let mut lines = Vec::new();
    if let Some(name) = recipient_name.map(str::trim).filter(|n| !n.is_empty())
    {
        lines.push(format!("Care Recipient: {}\n", name));
    }
    if let Some(context) = context {
        if let Some(date) = present(&context.date) {
            lines.push(format!("Date: {}\n", date));
        }
        if let Some(shift_number) = present(&context.shift_number) {
            lines.push(format!("Shift Number: {}\n", shift_number));
        }
    }
    lines.concat()
}

fn identity_lines(
    profile: &CareRecipientProfile,
) -> [(&'static str, &Option<String>); 3] {
    [
        ("Preferred Form of Address", &profile.preferred_address),
        ("Age", &profile.age),
        ("Birthday", &profile.birthday),
    ]
}

fn routine_times(
    profile: &CareRecipientProfile,
) -> [(&'static str, &Option<String>); 5] {
    [
        ("Wake", &profile.wake_time),
        ("Breakfast", &profile.breakfast_time),
        ("Lunch", &profile.lunch_time),
        ("Dinner", &profile.dinner_time),
        ("Bedtime", &profile.bedtime),
    ]
}

fn care_lines(
    profile: &CareRecipientProfile,
) -> [(&'static str, &Option<String>); 18] {
    [
        ("Speech Pace", &profile.speech_pace),
        ("Hearing Status", &profile.hearing_status),
        ("Visual Cues", &profile.visual_cues),
        ("Instruction Style", &profile.instruction_style),
        ("Dietary Notes", &profile.dietary_notes),
        ("Medication Notes", &profile.medication_notes),
        ("Mobility Support", &profile.mobility_support),
        ("Hearing/Vision Support", &profile.sensory_support),
        ("Memory Support", &profile.memory_support),
        ("Fall Risk", &profile.fall_risk),
        ("Allergies", &profile.allergies),
        ("Medical Conditions", &profile.medical_conditions),
        ("Hobbies", &profile.hobbies),
        ("Favorite Topics", &profile.favorite_topics),
        ("Privacy Preferences", &profile.privacy_preferences),
        ("Sensitive Topics", &profile.sensitive_topics),
        ("Independence Preferences", &profile.independence_preferences),
        ("Physical Comfort", &profile.physical_comfort),
    ]
}

/// Render the profile checklist, or an empty string when nothing is known.
pub fn render_profile(profile: &CareRecipientProfile) -> String {
    let mut lines = Vec::new();

    for (label, value) in identity_lines(profile) {
        if let Some(value) = present(value) {
            lines.push(format!("- {}: {}", label, value));
        }
    }

    let routine: Vec<String> = routine_times(profile)
        .into_iter()
        .filter_map(|(label, value)| {
            present(value).map(|value| format!("{} {}", label, value))
        })
        .collect();
    if !routine.is_empty() {
        lines.push(format!("- Daily Routine: {}", routine.join(", ")));
    }

    for (label, value) in care_lines(profile) {
        if let Some(value) = present(value) {
            lines.push(format!("- {}: {}", label, value));
        }
    }

    if lines.is_empty() {
        return String::new();
    }

    let mut block = String::from(PROFILE_HEADER);
    block.push('\n');
    for line in lines {
        block.push_str(&line);
        block.push('\n');
    }
    block
}
