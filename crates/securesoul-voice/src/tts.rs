//! **Text-to-Speech (TTS)**: the assistant reply as a playable `data:audio/wav` URI.

use crate::error::{VoiceError, VoiceResult};
use crate::wav::{is_pcm16, is_wav, pcm16_to_wav, pcm_sample_rate};
use securesoul_core::prompts;
use securesoul_core::{DataUri, GenerateRequest, GenerativeModel, SynthesizedSpeech};
use std::sync::Arc;

/// Backend that turns reply text into audio.
#[async_trait::async_trait]
pub trait TtsBackend: Send + Sync {
    async fn synthesize(&self, text: &str) -> VoiceResult<SynthesizedSpeech>;
}

/// Synthesize `text` with the speech model and prebuilt `voice`.
pub async fn synthesize(model: &dyn GenerativeModel, text: &str, voice: &str) -> VoiceResult<SynthesizedSpeech> {
    let request = GenerateRequest::speech(prompts::TEXT_TO_SPEECH, text.to_string(), voice);
    let media = model
        .generate(request)
        .await?
        .media
        .ok_or_else(|| VoiceError::NoOutput("no media returned".into()))?;

    let wav = if is_wav(&media.mime_type) {
        media.bytes
    } else if is_pcm16(&media.mime_type) {
        pcm16_to_wav(&media.bytes, pcm_sample_rate(&media.mime_type))?
    } else {
        return Err(VoiceError::Tts(format!("unsupported audio format '{}'", media.mime_type)));
    };

    tracing::debug!(target: "securesoul::voice", voice, bytes = wav.len(), "reply synthesized");
    Ok(SynthesizedSpeech {
        media: DataUri::new("audio/wav", wav).to_uri(),
    })
}

/// Synthesizer backed by the shared generative model.
#[derive(Clone)]
pub struct GeminiTts {
    model: Arc<dyn GenerativeModel>,
    voice: String,
}

impl GeminiTts {
    pub fn new(model: Arc<dyn GenerativeModel>, voice: impl Into<String>) -> Self {
        Self {
            model,
            voice: voice.into(),
        }
    }
}

#[async_trait::async_trait]
impl TtsBackend for GeminiTts {
    async fn synthesize(&self, text: &str) -> VoiceResult<SynthesizedSpeech> {
        synthesize(self.model.as_ref(), text, &self.voice).await
    }
}
