//! Prompt templates for every model call, plus the stable prompt names used in logs.

pub mod emotion;
pub mod intent;
pub mod response;
pub mod speech;

pub const DETECT_USER_INTENT: &str = "detect_user_intent";
pub const DETECT_EMOTION: &str = "detect_emotion";
pub const RAG_BASED_RESPONSE: &str = "rag_based_response";
pub const SPEECH_TO_TEXT: &str = "speech_to_text";
pub const TEXT_TO_SPEECH: &str = "text_to_speech";

pub use emotion::{detect_emotion_prompt, emotion_schema, DETECT_EMOTION_TEMPLATE};
pub use intent::{
    detect_user_intent_prompt, intent_safety_settings, intent_schema, DETECT_USER_INTENT_TEMPLATE,
};
pub use response::{rag_based_response_prompt, RAG_BASED_RESPONSE_TEMPLATE};
pub use speech::SPEECH_TO_TEXT_INSTRUCTION;
