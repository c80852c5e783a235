// Shared prompt fragments for every completion.
// Mode-specific templates live in orchestration/prompts.rs.

/// Appended to the persona so the model answers with the schema's JSON object only.
pub const JSON_CONTRACT_INSTRUCTION: &str = "You MUST respond with a single JSON object \
    matching the provided schema. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Combines the caller's persona with the JSON output contract.
pub fn with_json_contract(persona: &str) -> String {
    let persona = persona.trim();
    if persona.is_empty() {
        JSON_CONTRACT_INSTRUCTION.to_string()
    } else {
        format!("{persona}\n\n{JSON_CONTRACT_INSTRUCTION}")
    }
}
