//! Reply generation grounded in the routed domain's knowledge snippet.

use crate::error::{SoulError, SoulResult};
use crate::knowledge::KnowledgeBase;
use crate::llm::{GenerateRequest, GenerativeModel};
use crate::prompts::{self, rag_based_response_prompt};
use crate::schema::{GeneratedResponse, ResponseRequest};

/// Generate the assistant's reply. Output is free text, not JSON.
pub async fn rag_based_response(
    model: &dyn GenerativeModel,
    knowledge: &KnowledgeBase,
    request: &ResponseRequest,
) -> SoulResult<GeneratedResponse> {
    let prompt = rag_based_response_prompt(
        request.intent.as_str(),
        request.emotion,
        request.context.as_deref(),
        knowledge.snippet(request.intent),
        &request.query,
    );
    let input = serde_json::to_value(request)?;
    let generated = model
        .generate(GenerateRequest::text(prompts::RAG_BASED_RESPONSE, input, prompt))
        .await?;

    let text = generated
        .text
        .ok_or_else(|| SoulError::EmptyOutput("response generator returned no output".into()))?;
    GeneratedResponse { response: text }.validate()
}
