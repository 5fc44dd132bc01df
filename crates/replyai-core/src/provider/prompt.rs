//! Steering instructions derived from tone modes and intensity.
//!
//! Every function here is pure: the same request always yields the same
//! text, whichever backend it is sent to.

use super::types::SuggestRequest;

/// Style clauses for the recognized modes, in the order they are emitted.
const STYLE_CLAUSES: [(&str, &str); 3] = [
    ("formal", "Use formal, professional language"),
    ("casual", "Use casual, friendly language"),
    ("witty", "Include humor and wit"),
];

pub const NEUTRAL_STYLE: &str = "Use natural, conversational language";
pub const CONSERVATIVE: &str = "Be conservative and safe with suggestions";
pub const BALANCED: &str = "Use balanced, appropriate suggestions";
pub const BOLD: &str = "Be bold and creative with suggestions";

/// The pair of instructions every backend receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instructions {
    pub style: String,
    pub intensity: &'static str,
}

impl Instructions {
    pub fn for_request(request: &SuggestRequest) -> Self {
        Self {
            style: style_instruction(&request.modes),
            intensity: intensity_instruction(request.intensity),
        }
    }
}

/// Join the clauses of every recognized mode present, or fall back to the
/// neutral style when none is.
pub fn style_instruction(modes: &[String]) -> String {
    let clauses: Vec<&str> = STYLE_CLAUSES
        .iter()
        .filter(|(mode, _)| modes.iter().any(|m| m == mode))
        .map(|(_, clause)| *clause)
        .collect();

    if clauses.is_empty() {
        NEUTRAL_STYLE.to_string()
    } else {
        clauses.join("; ")
    }
}

/// Map intensity to guidance: below 3 conservative, above 7 bold,
/// balanced otherwise.
pub fn intensity_instruction(intensity: i32) -> &'static str {
    if intensity < 3 {
        CONSERVATIVE
    } else if intensity > 7 {
        BOLD
    } else {
        BALANCED
    }
}

/// Single free-text prompt for completion-style backends.
pub fn completion_prompt(request: &SuggestRequest) -> String {
    let instructions = Instructions::for_request(request);
    format!(
        "Generate 3 reply suggestions for the following message context.

Context: \"{context}\"

Style instructions: {style}
Intensity guidance: {intensity}

Requirements:
- Each suggestion should be a complete, natural reply
- Suggestions should be appropriate for the context
- Provide exactly 3 suggestions, one per line
- Keep each suggestion under 100 characters
- Format: Just the suggestions, no numbering or extra text

Suggestions:",
        context = request.context,
        style = instructions.style,
        intensity = instructions.intensity,
    )
}

/// System/user message pair for chat backends. The system message asks for
/// a JSON array of exactly three strings.
pub fn chat_messages(request: &SuggestRequest) -> (String, String) {
    let instructions = Instructions::for_request(request);
    let system = format!(
        "You are a helpful assistant that generates reply suggestions.

Style instructions: {style}
Intensity guidance: {intensity}

Generate exactly 3 reply suggestions for the user's message.
Each suggestion should be a complete, natural reply under 100 characters.
Format your response as a JSON array of strings, like: [\"suggestion 1\", \"suggestion 2\", \"suggestion 3\"]",
        style = instructions.style,
        intensity = instructions.intensity,
    );
    let user = format!(
        "Generate reply suggestions for this message: \"{}\"",
        request.context
    );
    (system, user)
}
