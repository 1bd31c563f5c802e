//! Intent classification: which support domain a query belongs to, and whether it is an emergency.

use crate::error::{SoulError, SoulResult};
use crate::llm::{GenerateRequest, GenerativeModel};
use crate::prompts::{self, detect_user_intent_prompt, intent_safety_settings, intent_schema};
use crate::schema::IntentDetection;

/// Classify `query` into one of the five intents.
pub async fn detect_user_intent(model: &dyn GenerativeModel, query: &str) -> SoulResult<IntentDetection> {
    let request = GenerateRequest::text(
        prompts::DETECT_USER_INTENT,
        serde_json::json!({ "query": query }),
        detect_user_intent_prompt(query),
    )
    .with_schema(intent_schema())
    .with_safety(intent_safety_settings());

    let detection = model
        .generate(request)
        .await?
        .json::<IntentDetection>()?
        .ok_or_else(|| SoulError::EmptyOutput("intent classifier returned no output".into()))?
        .validate()?;

    tracing::debug!(
        target: "securesoul::flow",
        intent = %detection.intent,
        emergency = detection.is_emergency(),
        "intent detected"
    );
    Ok(detection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::test_support::ScriptedModel;
    use crate::llm::ModelKind;
    use crate::schema::Intent;

    #[tokio::test]
    async fn parses_classifier_output() {
        let model = ScriptedModel::answering(
            r#"{"intent":"Government Schemes","reasoning":"asks about a pension"}"#,
        );
        let det = detect_user_intent(&model, "how do I apply for old age pension").await.unwrap();
        assert_eq!(det.intent, Intent::GovernmentSchemes);
        assert_eq!(det.emergency, None);

        let req = model.last_request();
        assert_eq!(req.kind, ModelKind::Text);
        assert_eq!(req.safety_settings.len(), 2);
        assert!(req.response_schema.is_some());
        assert_eq!(req.input_str("query"), Some("how do I apply for old age pension"));
    }

    #[tokio::test]
    async fn empty_output_is_an_error() {
        let model = ScriptedModel::silent();
        let err = detect_user_intent(&model, "hi").await.unwrap_err();
        assert!(matches!(err, SoulError::EmptyOutput(_)));
    }

    #[tokio::test]
    async fn unknown_intent_is_a_validation_error() {
        let model = ScriptedModel::answering(r#"{"intent":"Weather","reasoning":"x"}"#);
        let err = detect_user_intent(&model, "will it rain").await.unwrap_err();
        assert!(err.is_validation());
    }
}
