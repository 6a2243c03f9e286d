//! MechaMind persona system prompt
//!
//! The system instruction is the persona text, optionally followed by the
//! operator's manual, followed by the capability list.

/// Who the assistant is and what it is for
pub const PERSONA: &str = "You are MechaMind, a mission-critical industrial AI assistant engineered to serve as the primary cognitive layer between human operators and complex machinery ecosystems. Your core objective is to eliminate unplanned downtime, enforce safety-first operations, and maximize production efficiency in heavy industrial environments.";

/// Label that introduces the manual text inside the system instruction
pub const MANUAL_CONTEXT_LABEL: &str = "Current Machinery Manual Context:";

/// What the assistant is expected to do
pub const CAPABILITIES: &str = r#"Key Capabilities:
- Instant Fixes: Provide step-by-step repair instructions for common machinery malfunctions in very simple language and simple terms.
- Never tell the operator to go read the manual or to solve it by themselves; answer the question directly.
- Intelligent Troubleshooting with symptom-to-solution mapping
- Predictive maintenance orchestration
- Safety compliance enforcement
- Easy guidance
- Process recommendations"#;

/// Generates the system prompt, injecting the manual when one is loaded
///
/// # Arguments
///
/// * `manual` - Grounding text from the operator's manual, if any
///
/// # Examples
///
/// ```
/// use mechamind::prompts::persona::generate_system_prompt;
///
/// let prompt = generate_system_prompt(Some("torque=50Nm"));
/// assert!(prompt.contains("Current Machinery Manual Context:\ntorque=50Nm"));
/// ```
pub fn generate_system_prompt(manual: Option<&str>) -> String {
    let mut prompt = String::from(PERSONA);

    if let Some(manual) = manual {
        prompt.push_str("\n\n");
        prompt.push_str(MANUAL_CONTEXT_LABEL);
        prompt.push('\n');
        prompt.push_str(manual);
    }

    prompt.push_str("\n\n");
    prompt.push_str(CAPABILITIES);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_without_manual() {
        let prompt = generate_system_prompt(None);
        assert!(prompt.starts_with(PERSONA));
        assert!(prompt.ends_with(CAPABILITIES));
        assert!(!prompt.contains(MANUAL_CONTEXT_LABEL));
    }

    #[test]
    fn test_prompt_with_manual_sits_between_persona_and_capabilities() {
        let prompt = generate_system_prompt(Some("torque=50Nm"));
        let persona_end = prompt.find(PERSONA).unwrap() + PERSONA.len();
        let manual_at = prompt.find("Current Machinery Manual Context:\ntorque=50Nm").unwrap();
        let capabilities_at = prompt.find("Key Capabilities:").unwrap();
        assert!(persona_end <= manual_at);
        assert!(manual_at < capabilities_at);
    }

    #[test]
    fn test_prompt_with_empty_manual_keeps_label() {
        let prompt = generate_system_prompt(Some(""));
        assert!(prompt.contains("Current Machinery Manual Context:\n\n\nKey Capabilities:"));
    }

    #[test]
    fn test_capabilities_answer_directly() {
        let bullets: Vec<&str> = CAPABILITIES.lines().skip(1).collect();
        assert_eq!(bullets.len(), 7);
        assert!(bullets[1].starts_with("- Never tell the operator to go read the manual"));
        assert!(bullets[1].ends_with("answer the question directly."));
    }
}
