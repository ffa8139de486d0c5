use serde_json::{Value, json};

use crate::analysis::RiskLevel;

/// Persona and output-language framing sent as the system instruction.
pub const SYSTEM_INSTRUCTION: &str = "You are a friendly but professional senior cybersecurity consultant. \
Your goal is to help users understand the risks of using specific AI tools in their described context. \
Be encouraging but realistic. \
Write every natural-language field of your answer in Traditional Chinese (繁體中文).";

/// User prompt embedding the raw scenario text.
pub fn build_prompt(scenario: &str) -> String {
    format!(
        "Analyze the cybersecurity risks for the following AI tool usage scenario: \"{scenario}\".\n\
Focus on data privacy, intellectual property, and compliance (like GDPR).\n\
Provide a structured assessment suitable for a non-technical professional."
    )
}

/// Structured-output schema the service must conform its answer to.
pub fn response_schema() -> Value {
    let levels: Vec<&str> = RiskLevel::ALL.iter().map(|level| level.as_str()).collect();
    json!({
        "type": "OBJECT",
        "properties": {
            "riskLevel": {
                "type": "STRING",
                "enum": levels,
                "description": "The overall risk level of the scenario."
            },
            "summary": {
                "type": "STRING",
                "description": "A 2-3 sentence summary of the analysis in Traditional Chinese."
            },
            "threats": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING", "description": "Title of the threat in Traditional Chinese" },
                        "description": { "type": "STRING", "description": "Brief explanation in Traditional Chinese" }
                    },
                    "required": ["title", "description"]
                }
            },
            "recommendations": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING", "description": "Actionable advice title in Traditional Chinese" },
                        "action": { "type": "STRING", "description": "Specific steps to take in Traditional Chinese" }
                    },
                    "required": ["title", "action"]
                }
            }
        },
        "required": ["riskLevel", "summary", "threats", "recommendations"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_scenario_and_focus_areas() {
        let prompt = build_prompt("我使用 ChatGPT 整理包含客戶姓名的會議記錄");
        assert!(prompt.contains("\"我使用 ChatGPT 整理包含客戶姓名的會議記錄\""));
        assert!(prompt.contains("data privacy"));
        assert!(prompt.contains("intellectual property"));
        assert!(prompt.contains("compliance"));
    }

    #[test]
    fn system_instruction_fixes_output_language() {
        assert!(SYSTEM_INSTRUCTION.contains("Traditional Chinese"));
        assert!(SYSTEM_INSTRUCTION.contains("encouraging but realistic"));
    }

    #[test]
    fn schema_requires_all_top_level_fields() {
        let schema = response_schema();
        assert_eq!(
            schema["required"],
            json!(["riskLevel", "summary", "threats", "recommendations"])
        );
        assert_eq!(
            schema["properties"]["riskLevel"]["enum"],
            json!(["LOW", "MEDIUM", "HIGH", "CRITICAL"])
        );
        assert_eq!(schema["properties"]["threats"]["type"], "ARRAY");
        assert_eq!(
            schema["properties"]["recommendations"]["items"]["required"],
            json!(["title", "action"])
        );
    }
}
