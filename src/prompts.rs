pub const ANALYSIS_PREAMBLE: &str = "You are an expert healthcare assistant analyzing caregiver shift notes for elderly care.";

pub const ANALYSIS_INSTRUCTIONS: &str = r####"Please analyze these shift notes and provide:

1. SUMMARY: A brief 2-3 sentence summary of the key events and observations from this shift.

2. SUGGESTIONS: 3-5 specific, actionable suggestions for the next shift to improve care quality. Focus on:
   - Follow-up actions needed based on observations
   - Patterns or concerns that need monitoring
   - Care improvements or preventive measures
   - Communication recommendations for the care team
{profile_focus}
3. PRIORITIES: Identify 2-3 top priority items that the next caregiver should focus on immediately.

Format your response EXACTLY as follows:
SUMMARY:
[Your summary here]

SUGGESTIONS:
- [Suggestion 1]
- [Suggestion 2]
- [Suggestion 3]
...

PRIORITIES:
- [Priority 1]
- [Priority 2]
- [Priority 3]
"####;

pub const PROFILE_FOCUS: &str = r####"   - Alignment with the care recipient profile above: daily routine, communication preferences, safety notes, interests and boundaries
"####;

pub const SHIFT_SUMMARY_PROMPT: &str = r####"Summarize these caregiver shift notes in 2-3 sentences:

{notes}

Provide a clear, concise summary focusing on the most important information."####;
