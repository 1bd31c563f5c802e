//! Intent classification prompt: one of five categories, a short reasoning, and an emergency flag.

use crate::llm::SafetySetting;
use crate::schema::Intent;

pub const DETECT_USER_INTENT_TEMPLATE: &str = r#"You are an AI assistant that analyzes user queries to determine their intent.
Your possible intents are: Mental Health, Legal, Government Schemes, Safety, and Panic.

Analyze the following query and determine the user's intent. Provide a brief reasoning for your classification.

Query: {query}

Detect if the user's query indicates an emergency situation (e.g., contains keywords like "panic", "emergency", "urgent", "help", "danger"). If it does, set the 'emergency' field to true.

Format your response as a JSON object with 'intent' and 'reasoning' fields. If you detect an emergency, include the 'emergency' field as well."#;

/// Dangerous content is only blocked at high probability so users can describe the danger they are in.
static INTENT_SAFETY: [SafetySetting; 2] = [
    SafetySetting {
        category: "HARM_CATEGORY_DANGEROUS_CONTENT",
        threshold: "BLOCK_ONLY_HIGH",
    },
    SafetySetting {
        category: "HARM_CATEGORY_HARASSMENT",
        threshold: "BLOCK_MEDIUM_AND_ABOVE",
    },
];

pub fn detect_user_intent_prompt(query: &str) -> String {
    DETECT_USER_INTENT_TEMPLATE.replace("{query}", query)
}

pub fn intent_safety_settings() -> &'static [SafetySetting] {
    &INTENT_SAFETY
}

/// Response schema in the model API's OpenAPI subset.
pub fn intent_schema() -> serde_json::Value {
    let intents: Vec<&str> = Intent::ALL.iter().map(|i| i.as_str()).collect();
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "intent": { "type": "STRING", "enum": intents, "description": "The identified intent of the user query." },
            "reasoning": { "type": "STRING", "description": "The reasoning behind the intent classification." },
            "emergency": { "type": "BOOLEAN", "description": "True if the query indicates an emergency situation." }
        },
        "required": ["intent", "reasoning"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_query() {
        let p = detect_user_intent_prompt("my landlord kept my deposit");
        assert!(p.contains("Query: my landlord kept my deposit"));
        assert!(!p.contains("{query}"));
    }

    #[test]
    fn schema_lists_all_five_intents() {
        let schema = intent_schema();
        let values = schema["properties"]["intent"]["enum"].as_array().unwrap();
        assert_eq!(values.len(), 5);
        assert!(values.iter().any(|v| v == "Panic"));
    }
}
