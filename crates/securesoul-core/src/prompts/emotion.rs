//! Emotion detection prompt.

use crate::schema::Emotion;

pub const DETECT_EMOTION_TEMPLATE: &str = r#"Analyze the user's text to determine their emotion. The emotion must be one of: "sad", "angry", "happy", "scared", "confused", or "neutral".

Query: {query}"#;

pub fn detect_emotion_prompt(query: &str) -> String {
    DETECT_EMOTION_TEMPLATE.replace("{query}", query)
}

pub fn emotion_schema() -> serde_json::Value {
    let labels: Vec<&str> = Emotion::ALL.iter().map(|e| e.as_str()).collect();
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "emotion": { "type": "STRING", "enum": labels }
        },
        "required": ["emotion"]
    })
}
