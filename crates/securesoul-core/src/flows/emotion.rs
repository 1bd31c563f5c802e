//! Emotion detection on the user's text.

use crate::error::SoulResult;
use crate::llm::{GenerateRequest, GenerativeModel};
use crate::prompts::{self, detect_emotion_prompt, emotion_schema};
use crate::schema::EmotionDetection;

/// Detect the user's emotion. An empty model answer means `neutral`.
pub async fn detect_emotion(model: &dyn GenerativeModel, query: &str) -> SoulResult<EmotionDetection> {
    let request = GenerateRequest::text(
        prompts::DETECT_EMOTION,
        serde_json::json!({ "query": query }),
        detect_emotion_prompt(query),
    )
    .with_schema(emotion_schema());

    let detection = model
        .generate(request)
        .await?
        .json::<EmotionDetection>()?
        .unwrap_or_default();

    tracing::debug!(target: "securesoul::flow", emotion = %detection.emotion, "emotion detected");
    Ok(detection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::test_support::ScriptedModel;
    use crate::schema::Emotion;

    #[tokio::test]
    async fn reads_detected_emotion() {
        let model = ScriptedModel::answering(r#"{"emotion":"sad"}"#);
        let det = detect_emotion(&model, "I feel so alone").await.unwrap();
        assert_eq!(det.emotion, Emotion::Sad);
    }

    #[tokio::test]
    async fn no_output_defaults_to_neutral() {
        let model = ScriptedModel::silent();
        let det = detect_emotion(&model, "ok").await.unwrap();
        assert_eq!(det.emotion, Emotion::Neutral);
    }

    #[tokio::test]
    async fn transport_errors_propagate() {
        let model = ScriptedModel::failing();
        assert!(detect_emotion(&model, "ok").await.is_err());
    }
}
