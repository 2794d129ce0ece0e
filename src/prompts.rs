//! Patient prompt composition and the canned replies shown in the chat.

pub const PATIENT_QUESTION_LABEL: &str = "Patient Question: ";

pub const ANSWER_INSTRUCTIONS: &str = "Please provide a helpful, professional response about dental care, services, or general oral health information. Keep responses concise and informative.";

/// Returned with a 200 when the model produced no usable text.
pub const NO_ANSWER_FALLBACK: &str = "I'm here to help with your dental questions. Please call our office at (808) 095-0921 for specific medical advice.";

/// Returned with a 500 alongside the error message.
pub const TECHNICAL_FALLBACK: &str = "I'm experiencing technical difficulties. Please call our office at (808) 095-0921 for assistance.";

/// Build the single-part prompt sent upstream. `context` is used verbatim.
pub fn compose_patient_prompt(context: &str, message: &str) -> String {
    let mut prompt = String::with_capacity(
        context.len() + message.len() + PATIENT_QUESTION_LABEL.len() + ANSWER_INSTRUCTIONS.len() + 4,
    );
    prompt.push_str(context);
    prompt.push_str("\n\n");
    prompt.push_str(PATIENT_QUESTION_LABEL);
    prompt.push_str(message);
    prompt.push_str("\n\n");
    prompt.push_str(ANSWER_INSTRUCTIONS);
    prompt
}
