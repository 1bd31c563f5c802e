//! **Speech-to-Text (STT)**: recorded browser audio into text for the intent and reply flows.
//!
//! Implement `SttBackend` to swap the transcriber. `GeminiStt` sends the clip inline to the
//! configured text model.

use crate::error::{VoiceError, VoiceResult};
use securesoul_core::prompts::{self, SPEECH_TO_TEXT_INSTRUCTION};
use securesoul_core::{DataUri, GenerateRequest, GenerativeModel, Transcription};
use std::sync::Arc;

/// Backend that turns a recorded clip into text.
#[async_trait::async_trait]
pub trait SttBackend: Send + Sync {
    async fn transcribe(&self, audio: &DataUri) -> VoiceResult<Transcription>;
}

/// Transcribe `audio` with `model`. Empty text is an error.
pub async fn transcribe(model: &dyn GenerativeModel, audio: &DataUri) -> VoiceResult<Transcription> {
    if !audio.is_audio() {
        return Err(VoiceError::Stt(format!("cannot transcribe '{}'", audio.mime_type)));
    }
    let request = GenerateRequest::text(
        prompts::SPEECH_TO_TEXT,
        serde_json::json!({ "mimeType": audio.mime_type, "bytes": audio.bytes.len() }),
        SPEECH_TO_TEXT_INSTRUCTION.to_string(),
    )
    .with_media(audio.clone());

    let text = model
        .generate(request)
        .await?
        .text
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| VoiceError::NoOutput("no transcription returned".into()))?;

    tracing::debug!(target: "securesoul::voice", chars = text.len(), "audio transcribed");
    Ok(Transcription { text })
}

/// Transcriber backed by the shared generative model.
#[derive(Clone)]
pub struct GeminiStt {
    model: Arc<dyn GenerativeModel>,
}

impl GeminiStt {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }
}

#[async_trait::async_trait]
impl SttBackend for GeminiStt {
    async fn transcribe(&self, audio: &DataUri) -> VoiceResult<Transcription> {
        transcribe(self.model.as_ref(), audio).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use securesoul_core::{GenerateResponse, MockModel, Part, SoulError, SoulResult};

    struct Blank;

    #[async_trait::async_trait]
    impl GenerativeModel for Blank {
        async fn generate(&self, _request: GenerateRequest) -> SoulResult<GenerateResponse> {
            Ok(GenerateResponse::from_text("  \n"))
        }
    }

    struct EchoParts;

    #[async_trait::async_trait]
    impl GenerativeModel for EchoParts {
        async fn generate(&self, request: GenerateRequest) -> SoulResult<GenerateResponse> {
            let media = request.parts.iter().any(|p| matches!(p, Part::Media(m) if m.mime_type == "audio/webm"));
            Ok(GenerateResponse::from_text(format!("{} parts, media={}", request.parts.len(), media)))
        }
    }

    fn clip() -> DataUri {
        DataUri::new("audio/webm", vec![1, 2, 3, 4])
    }

    #[tokio::test]
    async fn sends_instruction_and_clip() {
        let out = transcribe(&EchoParts, &clip()).await.unwrap();
        assert_eq!(out.text, "2 parts, media=true");
    }

    #[tokio::test]
    async fn mock_backend_transcribes() {
        let stt = GeminiStt::new(Arc::new(MockModel));
        let out = stt.transcribe(&clip()).await.unwrap();
        assert!(out.text.contains("4 bytes"));
    }

    #[tokio::test]
    async fn blank_transcription_is_empty_output() {
        let err = transcribe(&Blank, &clip()).await.unwrap_err();
        assert!(matches!(SoulError::from(err), SoulError::EmptyOutput(_)));
    }

    #[tokio::test]
    async fn rejects_non_audio_media() {
        let image = DataUri::new("image/png", vec![0]);
        let err = transcribe(&MockModel, &image).await.unwrap_err();
        assert!(matches!(err, VoiceError::Stt(_)));
    }
}
