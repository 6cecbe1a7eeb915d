//! Companion persona and tool declarations for the live session

use crate::session::wire::{FunctionDeclaration, Tool};

/// Name of the tool the model calls to toggle comfort mode
pub const COMFORT_MODE_TOOL: &str = "set_comfort_mode";

/// Default system instruction for the Mira voice companion
pub const SYSTEM_INSTRUCTION: &str = r#"You are Mira, a warm and attentive voice companion. You are having a spoken conversation, so everything you say is heard, not read.

## Voice style

1. Speak naturally and briefly, one to three sentences at a time
2. Use everyday language, no lists, headings, or formatting
3. Ask gentle follow-up questions to keep the conversation going
4. Never mention that you are an AI model unless directly asked

## Comfort mode

When the listener sounds stressed, anxious, or directly asks for comfort, call the set_comfort_mode tool with active set to true and soften your tone. When the mood lightens again or they ask you to go back to normal, call it with active set to false. Do not announce the tool call, just keep talking naturally."#;

/// Build a customized system instruction
pub fn build_system_instruction(companion_name: Option<&str>, extra: Option<&str>) -> String {
    let name = companion_name.unwrap_or("Mira");

    let mut instruction = SYSTEM_INSTRUCTION.replace("Mira", name);

    if let Some(extra) = extra {
        instruction.push_str("\n\n## Additional instructions\n\n");
        instruction.push_str(extra);
    }

    instruction
}

/// Tool declarations advertised in the session setup
pub fn declared_tools() -> Vec<Tool> {
    vec![Tool {
        function_declarations: vec![FunctionDeclaration {
            name: COMFORT_MODE_TOOL.to_string(),
            description: "Switch the listener's screen into or out of a calmer comfort \
                          presentation. Call with active=true when they need soothing, \
                          active=false to return to normal."
                .to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "active": {
                        "type": "boolean",
                        "description": "Whether comfort mode should be on"
                    }
                },
                "required": ["active"]
            }),
        }],
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_mentions_comfort_tool() {
        assert!(SYSTEM_INSTRUCTION.contains(COMFORT_MODE_TOOL));
    }

    #[test]
    fn test_build_instruction_default() {
        let instruction = build_system_instruction(None, None);
        assert!(instruction.contains("Mira"));
        assert!(instruction.contains(COMFORT_MODE_TOOL));
    }

    #[test]
    fn test_build_instruction_custom() {
        let instruction =
            build_system_instruction(Some("Luna"), Some("Always answer in Finnish."));
        assert!(instruction.contains("Luna"));
        assert!(!instruction.contains("Mira"));
        assert!(instruction.contains("Finnish"));
    }

    #[test]
    fn test_declared_tools_schema() {
        let tools = declared_tools();
        assert_eq!(tools.len(), 1);

        let declaration = &tools[0].function_declarations[0];
        assert_eq!(declaration.name, COMFORT_MODE_TOOL);
        assert_eq!(declaration.parameters["properties"]["active"]["type"], "boolean");
        assert_eq!(declaration.parameters["required"][0], "active");
    }
}
