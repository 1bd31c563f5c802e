//! Retrieval-augmented reply prompt. The "retrieval" is the static knowledge snippet for the
//! routed domain.

use crate::schema::Emotion;

pub const RAG_BASED_RESPONSE_TEMPLATE: &str = r#"You are a helpful, empathetic assistant providing information to users based on their intent and a provided knowledge base.

Intent: {intent}
Emotion: {emotion}
Context: {context}

Knowledge base:
{knowledge}

Query: {query}

Formulate a clear and concise answer based on the intent, query, and context. Use plain language, short paragraphs, and bullet points for readability.
Incorporate relevant information from the knowledge base to provide a comprehensive and helpful response.
If context is present, use it to refine the answer.{tone}

Response:"#;

/// Render the reply prompt. The query goes in last so its text is never re-scanned for placeholders.
pub fn rag_based_response_prompt(
    intent: &str,
    emotion: Option<Emotion>,
    context: Option<&str>,
    knowledge: &str,
    query: &str,
) -> String {
    let emotion = emotion.unwrap_or_default();
    let tone = if emotion.is_neutral() {
        String::new()
    } else {
        format!(
            "\nThe user seems {}. Acknowledge that feeling briefly and warmly before answering.",
            emotion
        )
    };
    RAG_BASED_RESPONSE_TEMPLATE
        .replace("{intent}", intent)
        .replace("{emotion}", emotion.as_str())
        .replace("{context}", context.unwrap_or("None"))
        .replace("{knowledge}", knowledge)
        .replace("{tone}", &tone)
        .replace("{query}", query)
}
