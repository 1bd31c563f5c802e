//! securesoul-core: schemas, knowledge base, prompts, config and the generative-model client
//! behind the SecureSoul assistant.
//!
//! The gateway and the voice crate depend on this crate for every shared type so that the
//! browser contract, the model contract and the pipeline agree on one set of definitions.

mod error;

pub mod chat;
pub mod config;
pub mod flows;
pub mod knowledge;
pub mod llm;
pub mod media;
pub mod prompts;
pub mod schema;

pub use chat::{ChatSessions, ChatState, DomainProfile, EmergencyContact, Message, Role, EMERGENCY_CONTACTS};
pub use config::{LlmMode, SoulConfig};
pub use error::{SoulError, SoulResult};
pub use flows::{detect_emotion, detect_user_intent, rag_based_response};
pub use knowledge::KnowledgeBase;
pub use llm::{
    build_model, GenerateRequest, GenerateResponse, GenerativeModel, GeminiClient, MockModel, ModelKind, Part,
    SafetySetting,
};
pub use media::DataUri;
pub use schema::{
    Domain, Emotion, EmotionDetection, GeneratedResponse, Intent, IntentDetection, ProcessUserAudioInput,
    ProcessUserMessageInput, ResponseRequest, SynthesizedSpeech, Transcription, ValidAudio, ValidMessage,
};

/// Crate version, reported by the gateway's health endpoint.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
